//! Simulates a compiled transition table against a byte string.
//!
//! The simulation follows the partial-table policy: a byte with no covering
//! entry out of the current state rejects the input immediately.

use crate::DfaTable;

/// Returns the destination state for a single byte out of the given state,
/// or `None` when no entry covers the byte.
pub fn step(table: &DfaTable, state: u32, byte: u8) -> Option<u32> {
    table
        .transition_table
        .iter()
        .filter(|entry| entry.curr_state == state)
        .find(|entry| entry.range_start <= byte && byte <= entry.range_end)
        .map(|entry| entry.next_state)
}

/// Runs the table over the full input, returning a boolean signifying
/// whether the input is in the automaton's language.
///
/// # Example
///
/// ```
/// use dfa_runtime::{matcher, DfaTable, TableEntry};
///
/// // the minimal automaton for `a`
/// let table = DfaTable::new(
///     "This corresponds to the regular expression 'a'".to_string(),
///     1,
///     vec![2],
///     vec![TableEntry::new(1, 97, 97, 2)],
/// );
///
/// assert!(matcher::matches(&table, b"a"));
/// assert!(!matcher::matches(&table, b"b"));
/// assert!(!matcher::matches(&table, b"aa"));
/// assert!(!matcher::matches(&table, b""));
/// ```
pub fn matches(table: &DfaTable, input: &[u8]) -> bool {
    let mut state = table.start_state;

    for &byte in input {
        match step(table, state, byte) {
            Some(next) => state = next,
            None => return false,
        }
    }

    table.is_match_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TableEntry;

    fn digit_run_table() -> DfaTable {
        // the minimal automaton for `[0-9]+`
        DfaTable::new(
            "This corresponds to the regular expression '[0-9]+'".to_string(),
            1,
            vec![2],
            vec![
                TableEntry::new(1, 48, 57, 2),
                TableEntry::new(2, 48, 57, 2),
            ],
        )
    }

    #[test]
    fn should_accept_strings_in_the_language() {
        let table = digit_run_table();

        let accepted = ["0", "9", "42", "000123"];
        for input in accepted {
            assert!(matches(&table, input.as_bytes()), "rejected {:?}", input);
        }
    }

    #[test]
    fn should_reject_strings_outside_the_language() {
        let table = digit_run_table();

        let rejected = ["", "a", "4a2", "42 ", " 42"];
        for input in rejected {
            assert!(!matches(&table, input.as_bytes()), "accepted {:?}", input);
        }
    }

    #[test]
    fn should_accept_empty_input_on_accepting_start_state() {
        // the minimal automaton for `a*`
        let table = DfaTable::new(
            "This corresponds to the regular expression 'a*'".to_string(),
            1,
            vec![1],
            vec![TableEntry::new(1, 97, 97, 1)],
        );

        assert!(matches(&table, b""));
        assert!(matches(&table, b"aaa"));
        assert!(!matches(&table, b"ab"));
    }

    #[test]
    fn should_step_through_individual_transitions() {
        let table = digit_run_table();

        assert_eq!(Some(2), step(&table, 1, b'0'));
        assert_eq!(Some(2), step(&table, 2, b'9'));
        assert_eq!(None, step(&table, 1, b'a'));
        assert_eq!(None, step(&table, 3, b'0'));
    }
}
