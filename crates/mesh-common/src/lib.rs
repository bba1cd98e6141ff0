//! Shared types for the Mesh analyzer (spans, tokens, diagnostics).

pub mod diagnostics;
pub mod span;
pub mod token;

pub use diagnostics::{Diagnostic, DiagnosticCategory, Severity};
pub use span::{LineIndex, Span};
pub use token::{KeywordKind, NumberFlags, StringFlags, Token, TokenKind};
