//! Compiles textual regular expressions into minimal deterministic
//! finite automata over the byte alphabet, rendered as transition tables
//! the runtime crate can serialize and simulate.
//!
//! # Example
//!
//! ```
//! use dfa_compiler::{compile, parse, to_table};
//! use dfa_runtime::matcher;
//!
//! let expr = parse("[0-9]+").unwrap();
//! let dfa = compile(expr).unwrap();
//! let table = to_table(&dfa, "[0-9]+");
//!
//! assert_eq!(2, table.state_cnt());
//! assert!(matcher::matches(&table, b"42"));
//! assert!(!matcher::matches(&table, b"4a"));
//! ```

pub mod ast;
pub mod compiler;
pub mod dfa;
pub mod intersect;
pub mod minimize;
pub mod nfa;
pub mod parser;
pub mod table;

pub use compiler::{compile, compile_with_limit, CompileErr, DEFAULT_STATE_LIMIT};
pub use parser::{parse, ParseErr};
pub use table::to_table;
