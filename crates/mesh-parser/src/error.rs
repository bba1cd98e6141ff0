use std::fmt;

use mesh_common::Span;

/// Raised when an `alternative` scope's inner parse does not match.
///
/// This is the backtracking signal (§4.2 "Design Notes"): it is never a
/// panic and never unwinds past the enclosing `alternative`/`lookahead`
/// call that is waiting to catch it. A `Rejected` that escapes every
/// enclosing alternative becomes the parser's final [`SyntaxError`].
#[derive(Debug, Clone)]
pub struct Rejected {
    pub message: String,
    pub span: Span,
}

impl Rejected {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {:?}", self.message, self.span)
    }
}

/// The error surfaced to callers once no enclosing alternative can absorb
/// the rejection: a hard syntax error at a fixed position.
#[derive(Debug, Clone)]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "syntax error: {} at {:?}", self.message, self.span)
    }
}

impl std::error::Error for SyntaxError {}

impl From<Rejected> for SyntaxError {
    fn from(r: Rejected) -> Self {
        SyntaxError {
            message: r.message,
            span: r.span,
        }
    }
}
