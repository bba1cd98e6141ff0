//! Generator and automaton error types (§7: GeneratorConflict, ParseError).

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// A shift/reduce or reduce/reduce conflict that was not a recoverable
    /// shift-wins case.
    Conflict {
        state: usize,
        terminal: String,
        existing: String,
        incoming: String,
    },
    /// A state ended up with no actions at all.
    DeadState { state: usize },
    /// An entry-point non-terminal had more than one production.
    AmbiguousEntry { name: String },
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorError::Conflict {
                state,
                terminal,
                existing,
                incoming,
            } => write!(
                f,
                "conflict in state {state} on {terminal}: {existing} vs {incoming}"
            ),
            GeneratorError::DeadState { state } => {
                write!(f, "state {state} has no actions")
            }
            GeneratorError::AmbiguousEntry { name } => {
                write!(f, "entry point {name} has more than one production")
            }
        }
    }
}

impl std::error::Error for GeneratorError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No action for this terminal in this state.
    Reject { state: usize, terminal: String, offset: u32 },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Reject {
                state,
                terminal,
                offset,
            } => write!(
                f,
                "parse error at byte {offset}: no action for {terminal} in state {state}"
            ),
        }
    }
}

impl std::error::Error for ParseError {}
