//! Thompson construction of a nondeterministic automaton from a syntax tree.
//!
//! States are arena-allocated into a flat `Vec`, with a [StateId] being an
//! index into it. Edges are labeled with inclusive scalar ranges rather than
//! single symbols so that large classes like `[^a]` stay compact.

use super::ast;
use super::compiler::CompileErr;

/// The largest scalar value a pattern character can denote.
pub const MAX_SYMBOL: u32 = char::MAX as u32;

pub type StateId = usize;

/// An inclusive range of symbol scalar values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolRange {
    pub start: u32,
    pub end: u32,
}

impl SymbolRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, symbol: u32) -> bool {
        self.start <= symbol && symbol <= self.end
    }

    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(Self { start, end })
    }
}

#[derive(Debug, Default)]
pub struct NfaState {
    pub edges: Vec<(SymbolRange, StateId)>,
    pub epsilon: Vec<StateId>,
}

#[derive(Debug)]
pub struct Nfa {
    pub states: Vec<NfaState>,
    pub start: StateId,
    pub accept: StateId,
}

impl Nfa {
    /// Returns the set of states reachable from the given states over any
    /// number of epsilon edges, sorted ascending.
    pub fn epsilon_closure(&self, states: &[StateId]) -> Vec<StateId> {
        let mut visited = vec![false; self.states.len()];
        let mut stack: Vec<StateId> = states.to_vec();

        for &state in states {
            visited[state] = true;
        }

        while let Some(state) = stack.pop() {
            for &next in &self.states[state].epsilon {
                if !visited[next] {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }

        visited
            .into_iter()
            .enumerate()
            .filter_map(|(id, seen)| seen.then_some(id))
            .collect()
    }
}

/// A partial automaton with a single entry and a single exit state.
#[derive(Debug, Clone, Copy)]
struct Fragment {
    entry: StateId,
    exit: StateId,
}

/// Builds an [Nfa] from an [ast::Expression] via Thompson's construction,
/// enforcing a cap on the number of allocated states.
pub struct ThompsonBuilder {
    states: Vec<NfaState>,
    state_limit: usize,
}

enum Quantified<'a> {
    Item(&'a ast::MatchItem),
    Expression(&'a ast::Expression),
}

impl ThompsonBuilder {
    pub fn new(state_limit: usize) -> Self {
        Self {
            states: vec![],
            state_limit,
        }
    }

    pub fn build(mut self, expr: &ast::Expression) -> Result<Nfa, CompileErr> {
        let fragment = self.expression(expr)?;

        Ok(Nfa {
            states: self.states,
            start: fragment.entry,
            accept: fragment.exit,
        })
    }

    fn new_state(&mut self) -> Result<StateId, CompileErr> {
        if self.states.len() >= self.state_limit {
            return Err(CompileErr::StateLimitExceeded {
                limit: self.state_limit,
            });
        }

        self.states.push(NfaState::default());
        Ok(self.states.len() - 1)
    }

    fn add_epsilon(&mut self, from: StateId, to: StateId) {
        self.states[from].epsilon.push(to);
    }

    fn add_edge(&mut self, from: StateId, range: SymbolRange, to: StateId) {
        self.states[from].edges.push((range, to));
    }

    fn expression(&mut self, expr: &ast::Expression) -> Result<Fragment, CompileErr> {
        // a single-branch alternation needs no fork states
        if let [sub] = expr.0.as_slice() {
            return self.subexpression(sub);
        }

        let entry = self.new_state()?;
        let exit = self.new_state()?;

        for sub in &expr.0 {
            let branch = self.subexpression(sub)?;
            self.add_epsilon(entry, branch.entry);
            self.add_epsilon(branch.exit, exit);
        }

        Ok(Fragment { entry, exit })
    }

    fn subexpression(&mut self, sub: &ast::SubExpression) -> Result<Fragment, CompileErr> {
        let entry = self.new_state()?;
        let mut exit = entry;

        for item in &sub.0 {
            let next = self.item(item)?;
            self.add_epsilon(exit, next.entry);
            exit = next.exit;
        }

        Ok(Fragment { entry, exit })
    }

    fn item(&mut self, item: &ast::SubExpressionItem) -> Result<Fragment, CompileErr> {
        match item {
            ast::SubExpressionItem::Match(ast::Match::WithoutQuantifier { item }) => {
                self.match_item(item)
            }
            ast::SubExpressionItem::Match(ast::Match::WithQuantifier { item, quantifier }) => {
                self.quantified(Quantified::Item(item), quantifier)
            }
            ast::SubExpressionItem::Group(ast::Group::WithoutQuantifier { expression }) => {
                self.expression(expression)
            }
            ast::SubExpressionItem::Group(ast::Group::WithQuantifier {
                expression,
                quantifier,
            }) => self.quantified(Quantified::Expression(expression), quantifier),
        }
    }

    fn quantifiable(&mut self, inner: &Quantified) -> Result<Fragment, CompileErr> {
        match inner {
            Quantified::Item(item) => self.match_item(item),
            Quantified::Expression(expr) => self.expression(expr),
        }
    }

    fn quantified(
        &mut self,
        inner: Quantified,
        quantifier: &ast::Quantifier,
    ) -> Result<Fragment, CompileErr> {
        match quantifier {
            ast::Quantifier::ZeroOrMore => {
                let fragment = self.quantifiable(&inner)?;
                let entry = self.new_state()?;
                let exit = self.new_state()?;

                self.add_epsilon(entry, fragment.entry);
                self.add_epsilon(entry, exit);
                self.add_epsilon(fragment.exit, fragment.entry);
                self.add_epsilon(fragment.exit, exit);

                Ok(Fragment { entry, exit })
            }
            ast::Quantifier::OneOrMore => {
                let fragment = self.quantifiable(&inner)?;
                let exit = self.new_state()?;

                self.add_epsilon(fragment.exit, fragment.entry);
                self.add_epsilon(fragment.exit, exit);

                Ok(Fragment {
                    entry: fragment.entry,
                    exit,
                })
            }
            ast::Quantifier::ZeroOrOne => {
                let fragment = self.quantifiable(&inner)?;
                let entry = self.new_state()?;
                let exit = self.new_state()?;

                self.add_epsilon(entry, fragment.entry);
                self.add_epsilon(entry, exit);
                self.add_epsilon(fragment.exit, exit);

                Ok(Fragment { entry, exit })
            }
            ast::Quantifier::MatchExactRange(n) => self.repeat(&inner, *n, Some(*n)),
            ast::Quantifier::MatchAtLeastRange(n) => self.repeat(&inner, *n, None),
            ast::Quantifier::MatchBetweenRange {
                lower_bound,
                upper_bound,
            } => self.repeat(&inner, *lower_bound, Some(*upper_bound)),
        }
    }

    /// Unrolls a bounded repetition into `min` mandatory copies followed by
    /// either optional copies up to `max` or a trailing Kleene closure.
    fn repeat(
        &mut self,
        inner: &Quantified,
        min: usize,
        max: Option<usize>,
    ) -> Result<Fragment, CompileErr> {
        let entry = self.new_state()?;
        let mut exit = entry;

        for _ in 0..min {
            let copy = self.quantifiable(inner)?;
            self.add_epsilon(exit, copy.entry);
            exit = copy.exit;
        }

        match max {
            Some(max) => {
                // optional copies may each skip straight to the final exit
                let done = self.new_state()?;

                for _ in min..max {
                    let copy = self.quantifiable(inner)?;
                    self.add_epsilon(exit, copy.entry);
                    self.add_epsilon(exit, done);
                    exit = copy.exit;
                }
                self.add_epsilon(exit, done);

                Ok(Fragment { entry, exit: done })
            }
            None => {
                let copy = self.quantifiable(inner)?;
                let done = self.new_state()?;

                self.add_epsilon(exit, copy.entry);
                self.add_epsilon(exit, done);
                self.add_epsilon(copy.exit, copy.entry);
                self.add_epsilon(copy.exit, done);

                Ok(Fragment { entry, exit: done })
            }
        }
    }

    fn match_item(&mut self, item: &ast::MatchItem) -> Result<Fragment, CompileErr> {
        let ranges = item_ranges(item);

        let entry = self.new_state()?;
        let exit = self.new_state()?;

        for range in ranges {
            self.add_edge(entry, range, exit);
        }

        Ok(Fragment { entry, exit })
    }
}

// Range derivation
//
// Every match item lowers to a normalized list of disjoint, ascending
// symbol ranges before edges are built from it.

pub(crate) fn item_ranges(item: &ast::MatchItem) -> Vec<SymbolRange> {
    match item {
        ast::MatchItem::MatchAnyCharacter => vec![SymbolRange::new(0, MAX_SYMBOL)],
        ast::MatchItem::MatchCharacter(ast::MatchCharacter(c)) => {
            let scalar = c.as_char() as u32;
            vec![SymbolRange::new(scalar, scalar)]
        }
        ast::MatchItem::MatchCharacterClass(class) => class_ranges(class),
    }
}

pub(crate) fn class_ranges(class: &ast::MatchCharacterClass) -> Vec<SymbolRange> {
    match class {
        ast::MatchCharacterClass::CharacterClass(shorthand) => shorthand_ranges(shorthand),
        ast::MatchCharacterClass::CharacterGroup(ast::CharacterGroup::Items(items)) => {
            group_ranges(items)
        }
        ast::MatchCharacterClass::CharacterGroup(ast::CharacterGroup::NegatedItems(items)) => {
            complement(&group_ranges(items))
        }
    }
}

pub(crate) fn group_ranges(items: &[ast::CharacterGroupItem]) -> Vec<SymbolRange> {
    let ranges = items
        .iter()
        .flat_map(|item| match item {
            ast::CharacterGroupItem::Char(c) => {
                let scalar = c.as_char() as u32;
                vec![SymbolRange::new(scalar, scalar)]
            }
            ast::CharacterGroupItem::CharacterRange(lower, upper) => vec![SymbolRange::new(
                lower.as_char() as u32,
                upper.as_char() as u32,
            )],
            ast::CharacterGroupItem::CharacterClass(shorthand) => shorthand_ranges(shorthand),
        })
        .collect();

    normalize(ranges)
}

pub(crate) fn shorthand_ranges(class: &ast::CharacterClass) -> Vec<SymbolRange> {
    match class {
        ast::CharacterClass::AnyDecimalDigit => vec![SymbolRange::new(48, 57)],
        ast::CharacterClass::AnyDecimalDigitInverted => {
            complement(&[SymbolRange::new(48, 57)])
        }
        ast::CharacterClass::AnyWord => vec![
            SymbolRange::new(48, 57),
            SymbolRange::new(65, 90),
            SymbolRange::new(95, 95),
            SymbolRange::new(97, 122),
        ],
        ast::CharacterClass::AnyWordInverted => complement(&[
            SymbolRange::new(48, 57),
            SymbolRange::new(65, 90),
            SymbolRange::new(95, 95),
            SymbolRange::new(97, 122),
        ]),
    }
}

/// Sorts ranges ascending and coalesces any that overlap or touch.
pub(crate) fn normalize(mut ranges: Vec<SymbolRange>) -> Vec<SymbolRange> {
    ranges.sort_by_key(|range| (range.start, range.end));

    let mut normalized: Vec<SymbolRange> = vec![];
    for range in ranges {
        match normalized.last_mut() {
            Some(last) if range.start <= last.end.saturating_add(1) => {
                last.end = last.end.max(range.end);
            }
            _ => normalized.push(range),
        }
    }

    normalized
}

/// Returns the gaps of a normalized range list over the full symbol
/// universe.
pub(crate) fn complement(ranges: &[SymbolRange]) -> Vec<SymbolRange> {
    let mut gaps = vec![];
    let mut next_uncovered = 0u32;

    for range in ranges {
        if range.start > next_uncovered {
            gaps.push(SymbolRange::new(next_uncovered, range.start - 1));
        }
        next_uncovered = range.end.saturating_add(1);
        if range.end == MAX_SYMBOL {
            return gaps;
        }
    }

    gaps.push(SymbolRange::new(next_uncovered, MAX_SYMBOL));
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn build(pattern: &str) -> Nfa {
        ThompsonBuilder::new(1 << 16)
            .build(&parse(pattern).unwrap())
            .unwrap()
    }

    fn accepts(nfa: &Nfa, input: &str) -> bool {
        let mut current = nfa.epsilon_closure(&[nfa.start]);

        for c in input.chars() {
            let symbol = c as u32;
            let mut next: Vec<StateId> = current
                .iter()
                .flat_map(|&state| nfa.states[state].edges.iter())
                .filter(|(range, _)| range.contains(symbol))
                .map(|&(_, to)| to)
                .collect();
            next.sort_unstable();
            next.dedup();
            current = nfa.epsilon_closure(&next);
        }

        current.binary_search(&nfa.accept).is_ok()
    }

    #[test]
    fn should_simulate_simple_constructions() {
        let input_output = vec![
            ("ab", "ab", true),
            ("ab", "a", false),
            ("a|b", "b", true),
            ("a|b", "c", false),
            ("a*", "", true),
            ("a*", "aaa", true),
            ("a+", "", false),
            ("a+", "aa", true),
            ("a?b", "b", true),
            ("a?b", "ab", true),
            ("a?b", "aab", false),
        ];

        for (test_id, (pattern, input, expected)) in input_output.into_iter().enumerate() {
            let nfa = build(pattern);
            assert_eq!((test_id, expected), (test_id, accepts(&nfa, input)))
        }
    }

    #[test]
    fn should_simulate_bounded_repetitions() {
        let input_output = vec![
            ("a{2}", "a", false),
            ("a{2}", "aa", true),
            ("a{2}", "aaa", false),
            ("a{2,}", "a", false),
            ("a{2,}", "aaaa", true),
            ("a{1,3}", "", false),
            ("a{1,3}", "aa", true),
            ("a{1,3}", "aaaa", false),
            ("a{0,2}", "", true),
        ];

        for (test_id, (pattern, input, expected)) in input_output.into_iter().enumerate() {
            let nfa = build(pattern);
            assert_eq!((test_id, expected), (test_id, accepts(&nfa, input)))
        }
    }

    #[test]
    fn should_simulate_character_classes() {
        let input_output = vec![
            ("[a-c]", "b", true),
            ("[a-c]", "d", false),
            ("[^a]", "b", true),
            ("[^a]", "a", false),
            ("\\d", "5", true),
            ("\\d", "x", false),
            ("\\D", "x", true),
            ("\\w", "_", true),
            ("\\w", "-", false),
            ("\\W", "-", true),
            ("[\\dab]", "a", true),
            ("[\\dab]", "7", true),
            ("[\\dab]", "c", false),
        ];

        for (test_id, (pattern, input, expected)) in input_output.into_iter().enumerate() {
            let nfa = build(pattern);
            assert_eq!((test_id, expected), (test_id, accepts(&nfa, input)))
        }
    }

    #[test]
    fn should_enforce_the_state_limit() {
        let res = ThompsonBuilder::new(4).build(&parse("abcdef").unwrap());

        assert_eq!(
            Err(CompileErr::StateLimitExceeded { limit: 4 }),
            res.map(|_| ())
        )
    }

    #[test]
    fn should_normalize_touching_and_overlapping_ranges() {
        let ranges = vec![
            SymbolRange::new(10, 20),
            SymbolRange::new(21, 30),
            SymbolRange::new(15, 25),
            SymbolRange::new(40, 50),
        ];

        assert_eq!(
            vec![SymbolRange::new(10, 30), SymbolRange::new(40, 50)],
            normalize(ranges)
        )
    }

    #[test]
    fn should_complement_over_the_symbol_universe() {
        let ranges = vec![SymbolRange::new(0, 9), SymbolRange::new(20, MAX_SYMBOL)];

        assert_eq!(vec![SymbolRange::new(10, 19)], complement(&ranges))
    }
}
