//! Lowers a minimized automaton into the runtime's serializable table form.
//!
//! State ids in the artifact are 1-based and assigned in breadth-first
//! discovery order from the start state, with edges walked in ascending
//! range order, so equal automata always render to identical documents.

use std::collections::VecDeque;

use dfa_runtime::{DfaTable, TableEntry};

use super::dfa::Dfa;

pub fn to_table(dfa: &Dfa, pattern: &str) -> DfaTable {
    let mut new_ids = vec![0u32; dfa.states.len()];
    let mut next_id = 1u32;
    let mut match_states = vec![];
    let mut entries = vec![];

    let mut worklist = VecDeque::new();
    new_ids[dfa.start] = next_id;
    next_id += 1;
    worklist.push_back(dfa.start);

    while let Some(state) = worklist.pop_front() {
        let curr_state = new_ids[state];

        if dfa.states[state].accepting {
            match_states.push(curr_state);
        }

        for &(range, to) in &dfa.states[state].edges {
            if new_ids[to] == 0 {
                new_ids[to] = next_id;
                next_id += 1;
                worklist.push_back(to);
            }

            debug_assert!(range.end <= u8::MAX as u32);
            entries.push(TableEntry::new(
                curr_state,
                range.start as u8,
                range.end as u8,
                new_ids[to],
            ));
        }
    }

    match_states.sort_unstable();
    entries.sort_by_key(|entry| (entry.curr_state, entry.range_start));

    DfaTable::new(
        format!("This corresponds to the regular expression '{}'", pattern),
        1,
        match_states,
        entries,
    )
}
