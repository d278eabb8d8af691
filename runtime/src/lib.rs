//! Provides the portable representation of a compiled deterministic finite
//! automaton: a 1-indexed, canonically-ordered transition table over the
//! byte alphabet 0-255, along with utilities for encoding it to its JSON
//! artifact form and for simulating it against an input.
//!
//! The table is partial. A state/byte pair with no covering entry is an
//! immediate reject.

use serde::{Deserialize, Serialize};

pub mod json;
pub mod matcher;

/// A single row of the transition table, covering an inclusive byte range
/// out of one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    pub curr_state: u32,
    pub range_start: u8,
    pub range_end: u8,
    pub next_state: u32,
}

impl TableEntry {
    pub const fn new(curr_state: u32, range_start: u8, range_end: u8, next_state: u32) -> Self {
        Self {
            curr_state,
            range_start,
            range_end,
            next_state,
        }
    }
}

/// The serialized automaton artifact.
///
/// Field order matches the emitted JSON document exactly:
///
/// ```json
/// {
///   "_comment": "This corresponds to the regular expression 'a'",
///   "start_state": 1,
///   "match_states": [2],
///   "transition_table": [
///     {"curr_state": 1, "range_start": 97, "range_end": 97, "next_state": 2}
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfaTable {
    #[serde(rename = "_comment")]
    pub comment: String,
    pub start_state: u32,
    pub match_states: Vec<u32>,
    pub transition_table: Vec<TableEntry>,
}

impl DfaTable {
    pub fn new(
        comment: String,
        start_state: u32,
        match_states: Vec<u32>,
        transition_table: Vec<TableEntry>,
    ) -> Self {
        Self {
            comment,
            start_state,
            match_states,
            transition_table,
        }
    }

    /// Returns the number of distinct states referenced by the table.
    pub fn state_cnt(&self) -> usize {
        let mut ids: Vec<u32> = self
            .transition_table
            .iter()
            .flat_map(|entry| [entry.curr_state, entry.next_state])
            .chain(self.match_states.iter().copied())
            .chain([self.start_state])
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    /// Returns a boolean signifying if the given state is accepting.
    pub fn is_match_state(&self, state: u32) -> bool {
        self.match_states.binary_search(&state).is_ok()
    }

    /// Returns a boolean signifying if the table upholds its ordering
    /// invariants: `match_states` strictly ascending and `transition_table`
    /// sorted by (curr_state, range_start), both ascending.
    pub fn is_canonically_ordered(&self) -> bool {
        let match_states_ascending = self.match_states.windows(2).all(|w| w[0] < w[1]);
        let entries_sorted = self
            .transition_table
            .windows(2)
            .all(|w| (w[0].curr_state, w[0].range_start) <= (w[1].curr_state, w[1].range_start));

        match_states_ascending && entries_sorted
    }
}
