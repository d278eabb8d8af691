//! The compilation pipeline from a parsed pattern to a minimal automaton
//! over the byte alphabet.

use super::ast;
use super::dfa::{determinize, Dfa};
use super::intersect::restrict_to_bytes;
use super::minimize::minimize;
use super::nfa::ThompsonBuilder;
use super::parser::ParseErr;

/// The default cap on states allocated by any single pipeline stage.
pub const DEFAULT_STATE_LIMIT: usize = 1 << 16;

#[derive(Debug, PartialEq)]
pub enum CompileErr {
    Parse(ParseErr),
    StateLimitExceeded { limit: usize },
}

impl From<ParseErr> for CompileErr {
    fn from(src: ParseErr) -> Self {
        Self::Parse(src)
    }
}

impl std::fmt::Display for CompileErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{}", err),
            Self::StateLimitExceeded { limit } => {
                write!(f, "pattern exceeds the state limit of {} states", limit)
            }
        }
    }
}

impl std::error::Error for CompileErr {}

/// Compiles a parsed pattern with [DEFAULT_STATE_LIMIT].
pub fn compile(expr: ast::Expression) -> Result<Dfa, CompileErr> {
    compile_with_limit(expr, DEFAULT_STATE_LIMIT)
}

/// Compiles a parsed pattern into the minimal deterministic automaton for
/// its language over bytes.
pub fn compile_with_limit(expr: ast::Expression, state_limit: usize) -> Result<Dfa, CompileErr> {
    let nfa = ThompsonBuilder::new(state_limit).build(&expr)?;
    let dfa = determinize(&nfa, state_limit)?;

    Ok(minimize(&restrict_to_bytes(&dfa)))
}
