//! State minimization over byte-restricted automata.
//!
//! Runs in two stages. Pruning drops states that cannot take part in any
//! accepted string, which keeps the emitted table partial. Refinement then
//! merges indistinguishable states with Moore's partition algorithm, using
//! per-byte transition signatures since every surviving edge fits in the
//! byte alphabet.

use std::collections::HashMap;

use super::dfa::{Dfa, DfaState};
use super::intersect::MAX_BYTE;
use super::nfa::SymbolRange;

/// Returns the unique minimal automaton for the input's language.
///
/// The input must already be restricted to the byte alphabet.
pub fn minimize(dfa: &Dfa) -> Dfa {
    refine(&prune(dfa))
}

/// Drops states that are unreachable from the start or that cannot reach an
/// accepting state. The start state survives unconditionally so the empty
/// language still has a well-formed automaton.
fn prune(dfa: &Dfa) -> Dfa {
    let state_cnt = dfa.states.len();

    let mut reachable = vec![false; state_cnt];
    let mut stack = vec![dfa.start];
    reachable[dfa.start] = true;
    while let Some(state) = stack.pop() {
        for &(_, to) in &dfa.states[state].edges {
            if !reachable[to] {
                reachable[to] = true;
                stack.push(to);
            }
        }
    }

    let mut reverse: Vec<Vec<usize>> = vec![vec![]; state_cnt];
    for (from, state) in dfa.states.iter().enumerate() {
        for &(_, to) in &state.edges {
            reverse[to].push(from);
        }
    }

    let mut productive = vec![false; state_cnt];
    let mut stack: Vec<usize> = dfa
        .states
        .iter()
        .enumerate()
        .filter_map(|(id, state)| state.accepting.then_some(id))
        .collect();
    for &state in &stack {
        productive[state] = true;
    }
    while let Some(state) = stack.pop() {
        for &from in &reverse[state] {
            if !productive[from] {
                productive[from] = true;
                stack.push(from);
            }
        }
    }

    let mut keep: Vec<usize> = (0..state_cnt)
        .filter(|&id| reachable[id] && productive[id])
        .collect();
    if keep.is_empty() {
        keep.push(dfa.start);
    }

    let mut new_ids = vec![usize::MAX; state_cnt];
    for (new_id, &old_id) in keep.iter().enumerate() {
        new_ids[old_id] = new_id;
    }

    let states = keep
        .iter()
        .map(|&old_id| DfaState {
            accepting: dfa.states[old_id].accepting,
            edges: dfa.states[old_id]
                .edges
                .iter()
                .filter(|&&(_, to)| new_ids[to] != usize::MAX)
                .map(|&(range, to)| (range, new_ids[to]))
                .collect(),
        })
        .collect();

    Dfa {
        states,
        start: new_ids[dfa.start],
    }
}

/// Merges indistinguishable states. Partitions start as accepting versus
/// non-accepting and are split until every pair of states in a class agrees
/// on the class of its successor for all 256 bytes.
fn refine(dfa: &Dfa) -> Dfa {
    let state_cnt = dfa.states.len();

    // classes are numbered by first occurrence in state order so the result
    // is independent of hashing
    let mut class_of: Vec<usize> = {
        let mut accepting_class = None;
        let mut rejecting_class = None;
        let mut next_class = 0usize;

        dfa.states
            .iter()
            .map(|state| {
                let slot = if state.accepting {
                    &mut accepting_class
                } else {
                    &mut rejecting_class
                };
                *slot.get_or_insert_with(|| {
                    let class = next_class;
                    next_class += 1;
                    class
                })
            })
            .collect()
    };

    loop {
        let signatures: Vec<(usize, Vec<Option<usize>>)> = (0..state_cnt)
            .map(|id| {
                let moves = (0..=MAX_BYTE)
                    .map(|byte| target(&dfa.states[id], byte).map(|to| class_of[to]))
                    .collect();
                (class_of[id], moves)
            })
            .collect();

        let mut signature_classes: HashMap<&(usize, Vec<Option<usize>>), usize> = HashMap::new();
        let mut next_classes = Vec::with_capacity(state_cnt);
        for signature in &signatures {
            let next_id = signature_classes.len();
            let class = *signature_classes.entry(signature).or_insert(next_id);
            next_classes.push(class);
        }

        if next_classes == class_of {
            break;
        }
        class_of = next_classes;
    }

    rebuild(dfa, &class_of)
}

fn target(state: &DfaState, symbol: u32) -> Option<usize> {
    state
        .edges
        .iter()
        .find(|(range, _)| range.contains(symbol))
        .map(|&(_, to)| to)
}

/// Collapses each class to a single state, deriving its edges from a
/// representative by run-length encoding the per-byte successor classes.
fn rebuild(dfa: &Dfa, class_of: &[usize]) -> Dfa {
    let class_cnt = class_of.iter().max().map(|&max| max + 1).unwrap_or(0);

    let mut representatives: Vec<Option<usize>> = vec![None; class_cnt];
    for (id, &class) in class_of.iter().enumerate() {
        representatives[class].get_or_insert(id);
    }

    let states = representatives
        .into_iter()
        .map(|representative| {
            let id = representative.unwrap_or_default();
            let state = &dfa.states[id];

            let mut edges: Vec<(SymbolRange, usize)> = vec![];
            for byte in 0..=MAX_BYTE {
                let to_class = match target(state, byte) {
                    Some(to) => class_of[to],
                    None => continue,
                };

                match edges.last_mut() {
                    Some((range, to)) if *to == to_class && range.end + 1 == byte => {
                        range.end = byte;
                    }
                    _ => edges.push((SymbolRange::new(byte, byte), to_class)),
                }
            }

            DfaState {
                accepting: state.accepting,
                edges,
            }
        })
        .collect();

    Dfa {
        states,
        start: class_of[dfa.start],
    }
}
