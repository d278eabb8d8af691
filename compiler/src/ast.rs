//! Defines the syntax tree for the supported regular expression grammar.
//!
//! Operator precedence is encoded in the nesting rather than checked ad hoc:
//! an [Expression] is an alternation of [SubExpression]s, each of which is a
//! concatenation of individually quantifiable items.

// Expression

/// The top-level alternation: `a|b|c`.
#[derive(Debug, PartialEq)]
pub struct Expression(pub Vec<SubExpression>);

/// A single alternation branch: a concatenation of quantifiable items.
#[derive(Debug, PartialEq)]
pub struct SubExpression(pub Vec<SubExpressionItem>);

impl From<SubExpressionItem> for SubExpression {
    fn from(src: SubExpressionItem) -> Self {
        Self(vec![src])
    }
}

#[derive(Debug, PartialEq)]
pub enum SubExpressionItem {
    Match(Match),
    Group(Group),
}

impl From<Match> for SubExpressionItem {
    fn from(src: Match) -> Self {
        Self::Match(src)
    }
}

impl From<Group> for SubExpressionItem {
    fn from(src: Group) -> Self {
        Self::Group(src)
    }
}

// Group

/// A parenthesized subpattern with an optional trailing quantifier.
#[derive(Debug, PartialEq)]
pub enum Group {
    WithQuantifier {
        expression: Expression,
        quantifier: Quantifier,
    },
    WithoutQuantifier {
        expression: Expression,
    },
}

// Matchers

#[derive(Debug, PartialEq)]
pub enum Match {
    WithQuantifier {
        item: MatchItem,
        quantifier: Quantifier,
    },
    WithoutQuantifier {
        item: MatchItem,
    },
}

#[allow(clippy::enum_variant_names)]
#[derive(Debug, PartialEq)]
pub enum MatchItem {
    MatchAnyCharacter,
    MatchCharacterClass(MatchCharacterClass),
    MatchCharacter(MatchCharacter),
}

impl From<MatchCharacterClass> for MatchItem {
    fn from(src: MatchCharacterClass) -> Self {
        Self::MatchCharacterClass(src)
    }
}

#[allow(clippy::enum_variant_names)]
#[derive(Debug, PartialEq)]
pub enum MatchCharacterClass {
    CharacterGroup(CharacterGroup),
    CharacterClass(CharacterClass),
}

impl From<CharacterGroup> for MatchCharacterClass {
    fn from(src: CharacterGroup) -> Self {
        Self::CharacterGroup(src)
    }
}

impl From<CharacterClass> for MatchCharacterClass {
    fn from(src: CharacterClass) -> Self {
        Self::CharacterClass(src)
    }
}

#[derive(Debug, PartialEq)]
pub struct MatchCharacter(pub Char);

// Character Classes

/// A bracket expression, optionally negated: `[...]` / `[^...]`.
#[derive(Debug, PartialEq)]
pub enum CharacterGroup {
    NegatedItems(Vec<CharacterGroupItem>),
    Items(Vec<CharacterGroupItem>),
}

#[allow(clippy::enum_variant_names)]
#[derive(Debug, PartialEq)]
pub enum CharacterGroupItem {
    CharacterClass(CharacterClass),
    CharacterRange(Char, Char),
    Char(Char),
}

impl From<CharacterClass> for CharacterGroupItem {
    fn from(src: CharacterClass) -> Self {
        Self::CharacterClass(src)
    }
}

impl From<Char> for CharacterGroupItem {
    fn from(src: Char) -> Self {
        Self::Char(src)
    }
}

/// Shorthand classes, usable standalone or inside a bracket expression.
#[allow(clippy::enum_variant_names)]
#[derive(Debug, PartialEq)]
pub enum CharacterClass {
    AnyWord,
    AnyWordInverted,
    AnyDecimalDigit,
    AnyDecimalDigitInverted,
}

// Quantifiers

/// Represents all variants of repetition operators. Bounds of the
/// `{m,n}` form are validated semantically after parsing.
#[derive(Debug, PartialEq)]
pub enum Quantifier {
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
    /// `?`
    ZeroOrOne,
    /// `{m}`
    MatchExactRange(usize),
    /// `{m,}`
    MatchAtLeastRange(usize),
    /// `{m,n}`
    MatchBetweenRange {
        lower_bound: usize,
        upper_bound: usize,
    },
}

// Terminals

#[derive(Debug, PartialEq)]
#[repr(transparent)]
pub struct Char(pub char);

impl Char {
    pub fn as_char(&self) -> char {
        self.0
    }
}

impl AsRef<char> for Char {
    fn as_ref(&self) -> &char {
        &self.0
    }
}

impl From<Char> for char {
    fn from(src: Char) -> char {
        src.as_char()
    }
}
