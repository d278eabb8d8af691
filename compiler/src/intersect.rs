//! Product-automaton intersection, used to restrict a compiled automaton to
//! the byte alphabet before its table is emitted.
//!
//! Patterns are parsed over the full character scalar universe, but the
//! emitted table speaks single bytes. Intersecting with the universal
//! automaton over `0..=255` clips every edge to that alphabet and drops
//! branches only reachable through wider symbols.

use std::collections::{HashMap, VecDeque};

use super::dfa::{Dfa, DfaState};
use super::nfa::SymbolRange;

/// The largest symbol expressible in the emitted byte-oriented table.
pub const MAX_BYTE: u32 = u8::MAX as u32;

/// The single-state automaton accepting every string over `0..=255`.
fn universal() -> Dfa {
    Dfa {
        states: vec![DfaState {
            accepting: true,
            edges: vec![(SymbolRange::new(0, MAX_BYTE), 0)],
        }],
        start: 0,
    }
}

/// Returns the product automaton accepting exactly the strings accepted by
/// both inputs. Only pairs reachable from the combined start are built.
pub fn intersect(a: &Dfa, b: &Dfa) -> Dfa {
    let mut pair_ids: HashMap<(usize, usize), usize> = HashMap::new();
    let mut pairs: Vec<(usize, usize)> = vec![];
    let mut states: Vec<DfaState> = vec![];
    let mut worklist: VecDeque<usize> = VecDeque::new();

    let start_pair = (a.start, b.start);
    pair_ids.insert(start_pair, 0);
    pairs.push(start_pair);
    states.push(DfaState {
        accepting: a.states[a.start].accepting && b.states[b.start].accepting,
        edges: vec![],
    });
    worklist.push_back(0);

    while let Some(id) = worklist.pop_front() {
        let (a_id, b_id) = pairs[id];

        for &(a_range, a_to) in &a.states[a_id].edges {
            for &(b_range, b_to) in &b.states[b_id].edges {
                let overlap = match a_range.intersect(&b_range) {
                    Some(overlap) => overlap,
                    None => continue,
                };

                let pair = (a_to, b_to);
                let target_id = match pair_ids.get(&pair) {
                    Some(&existing) => existing,
                    None => {
                        let new_id = pairs.len();
                        pair_ids.insert(pair, new_id);
                        pairs.push(pair);
                        states.push(DfaState {
                            accepting: a.states[a_to].accepting && b.states[b_to].accepting,
                            edges: vec![],
                        });
                        worklist.push_back(new_id);
                        new_id
                    }
                };

                states[id].edges.push((overlap, target_id));
            }
        }

        states[id].edges.sort_by_key(|(range, _)| range.start);
    }

    Dfa { states, start: 0 }
}

/// Clips the automaton's language to strings over the byte alphabet.
pub fn restrict_to_bytes(dfa: &Dfa) -> Dfa {
    intersect(dfa, &universal())
}
