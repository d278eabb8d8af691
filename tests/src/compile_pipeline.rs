use dfa_compiler::{compile, parse, to_table};
use dfa_runtime::{json, matcher, DfaTable, TableEntry};

fn table_for(pattern: &str) -> DfaTable {
    let dfa = compile(parse(pattern).unwrap()).unwrap();
    to_table(&dfa, pattern)
}

#[test]
fn should_emit_expected_tables_for_known_automata() {
    let input_output = vec![
        (
            "a",
            1u32,
            vec![2u32],
            vec![TableEntry::new(1, 97, 97, 2)],
        ),
        // equivalent branches collapse into one range
        ("a|b", 1, vec![2], vec![TableEntry::new(1, 97, 98, 2)]),
        (
            "[0-9]+",
            1,
            vec![2],
            vec![
                TableEntry::new(1, 48, 57, 2),
                TableEntry::new(2, 48, 57, 2),
            ],
        ),
        // the accepting start loops on itself
        ("a*", 1, vec![1], vec![TableEntry::new(1, 97, 97, 1)]),
        // the empty pattern accepts exactly the empty string
        ("", 1, vec![1], vec![]),
        (
            "aa|ab",
            1,
            vec![3],
            vec![
                TableEntry::new(1, 97, 97, 2),
                TableEntry::new(2, 97, 98, 3),
            ],
        ),
        (".", 1, vec![2], vec![TableEntry::new(1, 0, 255, 2)]),
    ];

    for (test_id, (pattern, start, match_states, entries)) in input_output.into_iter().enumerate()
    {
        let table = table_for(pattern);
        assert_eq!(
            (test_id, start, match_states, entries),
            (
                test_id,
                table.start_state,
                table.match_states,
                table.transition_table
            )
        )
    }
}

#[test]
fn should_emit_the_empty_language_for_patterns_outside_the_byte_alphabet() {
    let table = table_for("a☃");

    assert_eq!(1, table.state_cnt());
    assert!(table.match_states.is_empty());
    assert!(table.transition_table.is_empty());
    assert!(!matcher::matches(&table, b"a"));
    assert!(!matcher::matches(&table, b""));
}

#[test]
fn should_simulate_compiled_tables_against_inputs() {
    let input_output = vec![
        ("(a|b)*abb", "abb", true),
        ("(a|b)*abb", "aababb", true),
        ("(a|b)*abb", "ab", false),
        ("\\w+", "snake_case_7", true),
        ("\\w+", "kebab-case", false),
        ("[^0-9]*", "no digits here", true),
        ("[^0-9]*", "route 66", false),
        ("a{2,3}", "aa", true),
        ("a{2,3}", "aaaa", false),
    ];

    for (test_id, (pattern, input, expected)) in input_output.into_iter().enumerate() {
        let table = table_for(pattern);
        assert_eq!(
            (test_id, expected),
            (test_id, matcher::matches(&table, input.as_bytes()))
        )
    }
}

#[test]
fn should_render_identical_documents_across_repeated_compilations() {
    for pattern in ["(a|b)*[0-9]{2,4}", "[a-f]x|[c-k]y", "\\d+\\.\\d+", "a?b?c?"] {
        let first = json::to_string_pretty(&table_for(pattern)).unwrap();
        let second = json::to_string_pretty(&table_for(pattern)).unwrap();

        assert_eq!(first, second, "nondeterministic output for {:?}", pattern)
    }
}

#[test]
fn should_emit_canonically_ordered_tables() {
    for pattern in ["(a|b)*abb", "[0-9a-f]+", "\\w?\\d{2}", "x|y|z"] {
        assert!(
            table_for(pattern).is_canonically_ordered(),
            "unordered table for {:?}",
            pattern
        )
    }
}

#[test]
fn should_survive_an_encode_decode_round_trip() {
    let table = table_for("(a|b)*abb");
    let rendered = json::to_string_pretty(&table).unwrap();
    let decoded = json::from_str(&rendered).unwrap();

    assert_eq!(table, decoded);
    assert!(matcher::matches(&decoded, b"babb"));
}

#[test]
fn should_reject_malformed_patterns_before_compilation() {
    for pattern in ["(a", "a|", "[z-a]", "a{3,1}", "\\q"] {
        assert!(parse(pattern).is_err(), "accepted {:?}", pattern)
    }
}
