//! Subset construction of a deterministic automaton from an [Nfa].
//!
//! Each deterministic state corresponds to a sorted set of nondeterministic
//! states. Sets are interned in discovery order so the construction is fully
//! deterministic for a given input automaton.

use std::collections::{HashMap, VecDeque};

use super::compiler::CompileErr;
use super::nfa::{Nfa, StateId, SymbolRange, MAX_SYMBOL};

#[derive(Debug, Default)]
pub struct DfaState {
    pub accepting: bool,
    /// Outgoing edges, disjoint and sorted ascending by range start.
    pub edges: Vec<(SymbolRange, StateId)>,
}

#[derive(Debug)]
pub struct Dfa {
    pub states: Vec<DfaState>,
    pub start: StateId,
}

impl Dfa {
    /// Simulates the automaton over a sequence of symbols.
    pub fn accepts(&self, input: impl IntoIterator<Item = u32>) -> bool {
        let mut state = self.start;

        for symbol in input {
            let next = self.states[state]
                .edges
                .iter()
                .find(|(range, _)| range.contains(symbol))
                .map(|&(_, to)| to);

            match next {
                Some(to) => state = to,
                None => return false,
            }
        }

        self.states[state].accepting
    }
}

/// Converts an [Nfa] into an equivalent [Dfa] via the subset construction,
/// enforcing a cap on the number of generated states.
pub fn determinize(nfa: &Nfa, state_limit: usize) -> Result<Dfa, CompileErr> {
    let mut subset_ids: HashMap<Vec<StateId>, StateId> = HashMap::new();
    let mut subsets: Vec<Vec<StateId>> = vec![];
    let mut states: Vec<DfaState> = vec![];
    let mut worklist: VecDeque<StateId> = VecDeque::new();

    let mut intern = |subset: Vec<StateId>,
                      subsets: &mut Vec<Vec<StateId>>,
                      states: &mut Vec<DfaState>,
                      worklist: &mut VecDeque<StateId>|
     -> Result<StateId, CompileErr> {
        if let Some(&id) = subset_ids.get(&subset) {
            return Ok(id);
        }
        if subsets.len() >= state_limit {
            return Err(CompileErr::StateLimitExceeded { limit: state_limit });
        }

        let id = subsets.len();
        let accepting = subset.binary_search(&nfa.accept).is_ok();

        subset_ids.insert(subset.clone(), id);
        subsets.push(subset);
        states.push(DfaState {
            accepting,
            edges: vec![],
        });
        worklist.push_back(id);
        Ok(id)
    };

    let initial = nfa.epsilon_closure(&[nfa.start]);
    let start = intern(initial, &mut subsets, &mut states, &mut worklist)?;

    while let Some(id) = worklist.pop_front() {
        let subset = subsets[id].clone();

        // Split the symbol space at every range boundary in the subset's
        // outgoing edges so each segment maps to a single target set.
        let mut boundaries: Vec<u32> = vec![];
        for &state in &subset {
            for &(range, _) in &nfa.states[state].edges {
                boundaries.push(range.start);
                if range.end < MAX_SYMBOL {
                    boundaries.push(range.end + 1);
                }
            }
        }
        boundaries.sort_unstable();
        boundaries.dedup();

        for (idx, &lo) in boundaries.iter().enumerate() {
            let hi = boundaries
                .get(idx + 1)
                .map(|&next| next - 1)
                .unwrap_or(MAX_SYMBOL);

            let mut targets: Vec<StateId> = subset
                .iter()
                .flat_map(|&state| nfa.states[state].edges.iter())
                .filter(|(range, _)| range.contains(lo))
                .map(|&(_, to)| to)
                .collect();
            targets.sort_unstable();
            targets.dedup();

            if targets.is_empty() {
                continue;
            }

            let closure = nfa.epsilon_closure(&targets);
            let target_id = intern(closure, &mut subsets, &mut states, &mut worklist)?;

            // re-merge adjacent segments that land on the same state
            match states[id].edges.last_mut() {
                Some((range, to)) if *to == target_id && range.end.saturating_add(1) == lo => {
                    range.end = hi;
                }
                _ => states[id].edges.push((SymbolRange::new(lo, hi), target_id)),
            }
        }
    }

    Ok(Dfa { states, start })
}
