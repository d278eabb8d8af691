use parcel::parsers::character::{digit, expect_character};
use parcel::prelude::v1::*;

use super::ast;

/// Characters that carry grammar meaning and must be escaped to be matched
/// literally.
const METACHARACTERS: &[char] = &['(', ')', '[', ']', '{', '|', '*', '+', '?', '.', '\\'];

#[derive(Debug, PartialEq)]
pub enum ParseErr {
    InvalidRegex,
    InvalidRepetitionRange {
        lower_bound: usize,
        upper_bound: usize,
    },
    InvalidCharacterRange {
        lower_bound: char,
        upper_bound: char,
    },
    Undefined(String),
}

impl std::fmt::Display for ParseErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRegex => write!(f, "provided regex is invalid"),
            Self::InvalidRepetitionRange {
                lower_bound,
                upper_bound,
            } => write!(
                f,
                "invalid repetition range {{{},{}}}",
                lower_bound, upper_bound
            ),
            Self::InvalidCharacterRange {
                lower_bound,
                upper_bound,
            } => write!(
                f,
                "invalid character range {}-{}",
                lower_bound, upper_bound
            ),
            Self::Undefined(err) => write!(f, "undefined parse error: {}", err),
        }
    }
}

impl std::error::Error for ParseErr {}

/// Parses a pattern into its syntax tree, requiring that the whole input is
/// consumed by the grammar.
pub fn parse(input: &str) -> Result<ast::Expression, ParseErr> {
    // The empty pattern is valid and matches exactly the empty string.
    if input.is_empty() {
        return Ok(ast::Expression(vec![ast::SubExpression(vec![])]));
    }

    let char_stream: Vec<(usize, char)> = input.chars().enumerate().collect();

    let expr = expression()
        .parse(&char_stream[..])
        .map_err(|err| ParseErr::Undefined(format!("unspecified parse error occured: {}", err)))
        .and_then(|ms| match ms {
            MatchStatus::Match {
                remainder, inner, ..
            } if remainder.is_empty() => Ok(inner),
            MatchStatus::Match { .. } | MatchStatus::NoMatch(..) => Err(ParseErr::InvalidRegex),
        })?;

    validate_expression(&expr).map(|_| expr)
}

// Semantic validation
//
// The grammar accepts any `{m,n}` bounds and any `a-z` endpoints; bound
// ordering is checked after the tree is built.

fn validate_expression(expr: &ast::Expression) -> Result<(), ParseErr> {
    expr.0
        .iter()
        .flat_map(|sub| sub.0.iter())
        .try_for_each(validate_item)
}

fn validate_item(item: &ast::SubExpressionItem) -> Result<(), ParseErr> {
    match item {
        ast::SubExpressionItem::Match(ast::Match::WithQuantifier { item, quantifier }) => {
            validate_quantifier(quantifier)?;
            validate_match_item(item)
        }
        ast::SubExpressionItem::Match(ast::Match::WithoutQuantifier { item }) => {
            validate_match_item(item)
        }
        ast::SubExpressionItem::Group(ast::Group::WithQuantifier {
            expression,
            quantifier,
        }) => {
            validate_quantifier(quantifier)?;
            validate_expression(expression)
        }
        ast::SubExpressionItem::Group(ast::Group::WithoutQuantifier { expression }) => {
            validate_expression(expression)
        }
    }
}

fn validate_quantifier(quantifier: &ast::Quantifier) -> Result<(), ParseErr> {
    match quantifier {
        ast::Quantifier::MatchBetweenRange {
            lower_bound,
            upper_bound,
        } if lower_bound > upper_bound => Err(ParseErr::InvalidRepetitionRange {
            lower_bound: *lower_bound,
            upper_bound: *upper_bound,
        }),
        _ => Ok(()),
    }
}

fn validate_match_item(item: &ast::MatchItem) -> Result<(), ParseErr> {
    let items = match item {
        ast::MatchItem::MatchCharacterClass(ast::MatchCharacterClass::CharacterGroup(
            ast::CharacterGroup::Items(items) | ast::CharacterGroup::NegatedItems(items),
        )) => items,
        _ => return Ok(()),
    };

    items.iter().try_for_each(|item| match item {
        ast::CharacterGroupItem::CharacterRange(lower, upper)
            if lower.as_char() > upper.as_char() =>
        {
            Err(ParseErr::InvalidCharacterRange {
                lower_bound: lower.as_char(),
                upper_bound: upper.as_char(),
            })
        }
        _ => Ok(()),
    })
}

// Expression

fn expression<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::Expression> {
    parcel::join(
        subexpression(),
        parcel::zero_or_more(parcel::right(parcel::join(
            expect_character('|'),
            subexpression(),
        ))),
    )
    .map(|(head, tail)| vec![head].into_iter().chain(tail).collect())
    .map(ast::Expression)
}

fn subexpression<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::SubExpression> {
    parcel::one_or_more(subexpression_item()).map(ast::SubExpression)
}

fn subexpression_item<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::SubExpressionItem>
{
    parcel::or(group().map(Into::into), || r#match().map(Into::into))
}

// Group

fn group<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::Group> {
    parcel::right(parcel::join(
        expect_character('('),
        parcel::join(
            expression(),
            parcel::right(parcel::join(
                expect_character(')'),
                parcel::optional(quantifier()),
            )),
        ),
    ))
    .map(|(expression, quantifier)| match quantifier {
        Some(quantifier) => ast::Group::WithQuantifier {
            expression,
            quantifier,
        },
        None => ast::Group::WithoutQuantifier { expression },
    })
}

// Matchers

fn r#match<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::Match> {
    parcel::join(match_item(), parcel::optional(quantifier())).map(|(match_item, quantifier)| {
        match quantifier {
            Some(quantifier) => ast::Match::WithQuantifier {
                item: match_item,
                quantifier,
            },
            None => ast::Match::WithoutQuantifier { item: match_item },
        }
    })
}

fn match_item<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::MatchItem> {
    parcel::or(match_character_class().map(Into::into), || {
        parcel::or(
            match_any_character().map(|_| ast::MatchItem::MatchAnyCharacter),
            || match_character().map(ast::MatchItem::MatchCharacter),
        )
    })
}

fn match_any_character<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], char> {
    expect_character('.')
}

fn match_character_class<'a>(
) -> impl parcel::Parser<'a, &'a [(usize, char)], ast::MatchCharacterClass> {
    parcel::or(
        character_group().map(ast::MatchCharacterClass::CharacterGroup),
        || character_class().map(ast::MatchCharacterClass::CharacterClass),
    )
}

fn match_character<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::MatchCharacter> {
    parcel::or(escaped_character(), || unescaped_character())
        .map(ast::Char)
        .map(ast::MatchCharacter)
}

// Character Classes

fn character_group<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::CharacterGroup> {
    parcel::join(
        parcel::right(parcel::join(
            expect_character('['),
            parcel::optional(expect_character('^')).map(|negation| negation.is_some()),
        )),
        parcel::left(parcel::join(
            parcel::one_or_more(character_group_item()),
            expect_character(']'),
        )),
    )
    .map(|(negated, character_group_items)| match negated {
        true => ast::CharacterGroup::NegatedItems(character_group_items),
        false => ast::CharacterGroup::Items(character_group_items),
    })
}

fn character_group_item<'a>(
) -> impl parcel::Parser<'a, &'a [(usize, char)], ast::CharacterGroupItem> {
    parcel::or(character_class().map(Into::into), || {
        parcel::or(character_range(), || group_character().map(Into::into))
    })
}

fn character_range<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::CharacterGroupItem> {
    parcel::join(
        group_character(),
        parcel::right(parcel::join(expect_character('-'), group_character())),
    )
    .map(|(lower_bound, upper_bound)| {
        ast::CharacterGroupItem::CharacterRange(lower_bound, upper_bound)
    })
}

fn group_character<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::Char> {
    parcel::or(escaped_character(), || bracket_character()).map(ast::Char)
}

fn character_class<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::CharacterClass> {
    parcel::or(character_class_any_word(), || {
        parcel::or(character_class_any_word_inverted(), || {
            parcel::or(character_class_any_decimal_digit(), || {
                character_class_any_decimal_digit_inverted()
            })
        })
    })
}

fn character_class_any_word<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::CharacterClass>
{
    parcel::join(expect_character('\\'), expect_character('w'))
        .map(|_| ast::CharacterClass::AnyWord)
}

fn character_class_any_word_inverted<'a>(
) -> impl parcel::Parser<'a, &'a [(usize, char)], ast::CharacterClass> {
    parcel::join(expect_character('\\'), expect_character('W'))
        .map(|_| ast::CharacterClass::AnyWordInverted)
}

fn character_class_any_decimal_digit<'a>(
) -> impl parcel::Parser<'a, &'a [(usize, char)], ast::CharacterClass> {
    parcel::join(expect_character('\\'), expect_character('d'))
        .map(|_| ast::CharacterClass::AnyDecimalDigit)
}

fn character_class_any_decimal_digit_inverted<'a>(
) -> impl parcel::Parser<'a, &'a [(usize, char)], ast::CharacterClass> {
    parcel::join(expect_character('\\'), expect_character('D'))
        .map(|_| ast::CharacterClass::AnyDecimalDigitInverted)
}

// Quantifiers

fn quantifier<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::Quantifier> {
    parcel::or(
        expect_character('*').map(|_| ast::Quantifier::ZeroOrMore),
        || {
            parcel::or(
                expect_character('+').map(|_| ast::Quantifier::OneOrMore),
                || {
                    parcel::or(
                        expect_character('?').map(|_| ast::Quantifier::ZeroOrOne),
                        range_quantifier,
                    )
                },
            )
        },
    )
}

/// A repetition range quantifier, representable by the following three
/// expressions.
/// `{n}`: Match exactly.
/// `{n,}`: Match at least.
/// `{n,m}` Match between range.
fn range_quantifier<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::Quantifier> {
    parcel::left(parcel::join(
        parcel::right(parcel::join(
            expect_character('{'),
            parcel::join(
                integer(),
                parcel::optional(parcel::right(parcel::join(
                    expect_character(','),
                    parcel::optional(integer()),
                ))),
            ),
        )),
        expect_character('}'),
    ))
    .map(|(lower_bound, upper_bound)| match (lower_bound, upper_bound) {
        (lower, None) => ast::Quantifier::MatchExactRange(lower),
        (lower, Some(None)) => ast::Quantifier::MatchAtLeastRange(lower),
        (lower, Some(Some(upper))) => ast::Quantifier::MatchBetweenRange {
            lower_bound: lower,
            upper_bound: upper,
        },
    })
}

// Terminals

fn integer<'a>() -> impl Parser<'a, &'a [(usize, char)], usize> {
    move |input: &'a [(usize, char)]| {
        let preparsed_input = input;
        let res = parcel::one_or_more(digit(10))
            .map(|digits| digits.into_iter().collect::<String>().parse::<usize>())
            .parse(input);

        match res {
            Ok(MatchStatus::Match {
                span,
                remainder,
                inner: Ok(int),
            }) => Ok(MatchStatus::Match {
                span,
                remainder,
                inner: int,
            }),

            Ok(MatchStatus::Match {
                inner: Err(_), ..
            }) => Ok(MatchStatus::NoMatch(preparsed_input)),

            Ok(MatchStatus::NoMatch(remainder)) => Ok(MatchStatus::NoMatch(remainder)),
            Err(e) => Err(e),
        }
    }
}

/// Any character without grammar meaning, consumed as-is.
fn unescaped_character<'a>() -> impl Parser<'a, &'a [(usize, char)], char> {
    move |input: &'a [(usize, char)]| match input.first() {
        Some(&(pos, next)) if !METACHARACTERS.contains(&next) => Ok(MatchStatus::Match {
            span: pos..pos + 1,
            remainder: &input[1..],
            inner: next,
        }),
        _ => Ok(MatchStatus::NoMatch(input)),
    }
}

/// Any character valid inside a bracket expression; `]` closes the
/// expression and `\` must introduce an escape.
fn bracket_character<'a>() -> impl Parser<'a, &'a [(usize, char)], char> {
    move |input: &'a [(usize, char)]| match input.first() {
        Some(&(pos, next)) if next != ']' && next != '\\' => Ok(MatchStatus::Match {
            span: pos..pos + 1,
            remainder: &input[1..],
            inner: next,
        }),
        _ => Ok(MatchStatus::NoMatch(input)),
    }
}

/// A backslash escape resolving to a single character. Unrecognized escape
/// sequences do not match, surfacing as a parse failure.
fn escaped_character<'a>() -> impl Parser<'a, &'a [(usize, char)], char> {
    move |input: &'a [(usize, char)]| match input.get(0..2) {
        Some(&[(escape_pos, '\\'), (to_escape_pos, to_escape)]) => {
            match char_to_escaped_equivalent(to_escape) {
                Some(escaped_char) => Ok(MatchStatus::Match {
                    span: escape_pos..to_escape_pos + 1,
                    remainder: &input[2..],
                    inner: escaped_char,
                }),
                None => Ok(MatchStatus::NoMatch(input)),
            }
        }
        _ => Ok(MatchStatus::NoMatch(input)),
    }
}

fn char_to_escaped_equivalent(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        '\'' | '\"' | '\\' => Some(c),
        '(' | ')' | '[' | ']' | '{' | '}' | '|' | '*' | '+' | '?' | '.' | '-' | '^' | '$' => {
            Some(c)
        }
        _ => None,
    }
}
