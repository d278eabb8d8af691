//! Exhaustively cross-checks compiled tables against the `regex` crate over
//! short strings. Patterns are anchored and switched to byte-oriented mode
//! so both engines decide full-string membership over raw bytes.

use dfa_compiler::{compile, parse, to_table};
use dfa_runtime::matcher;

const PATTERNS: &[&str] = &[
    "a",
    "ab",
    "a|b",
    "a*",
    "a+",
    "a?",
    "ab|a",
    "(ab)*",
    "a{2}",
    "a{2,}",
    "a{2,3}",
    "[ab]+",
    "[^a]",
    "[^ab]*",
    "(a|b)*ab",
    "[0-9]+",
    "[a-b0-1]{2}",
    ".",
    ".*",
    "a.b",
];

const ALPHABET: &[u8] = &[b'a', b'b', b'0', b'1'];
const MAX_LEN: usize = 4;

/// Every string over [ALPHABET] of length up to [MAX_LEN].
fn all_inputs() -> Vec<Vec<u8>> {
    let mut inputs: Vec<Vec<u8>> = vec![vec![]];
    let mut frontier: Vec<Vec<u8>> = vec![vec![]];

    for _ in 0..MAX_LEN {
        let mut next = vec![];
        for input in &frontier {
            for &byte in ALPHABET {
                let mut extended = input.clone();
                extended.push(byte);
                next.push(extended);
            }
        }
        inputs.extend(next.iter().cloned());
        frontier = next;
    }

    inputs
}

#[test]
fn should_agree_with_the_reference_engine_on_short_strings() {
    let inputs = all_inputs();

    for pattern in PATTERNS {
        let table = {
            let dfa = compile(parse(pattern).unwrap()).unwrap();
            to_table(&dfa, pattern)
        };
        let reference = regex::bytes::Regex::new(&format!("(?-u)^(?:{})$", pattern)).unwrap();

        for input in &inputs {
            let expected = reference.is_match(input);
            let actual = matcher::matches(&table, input);

            assert_eq!(
                (pattern, input, expected),
                (pattern, input, actual),
                "disagreement on pattern {:?} input {:?}",
                pattern,
                input
            )
        }
    }
}
