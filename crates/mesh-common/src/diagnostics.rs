//! Ambient diagnostic type shared by every stage of the pipeline.
//!
//! The core subsystems never abort on error (§7): the scanner folds
//! problems into token flags, the generator distinguishes recoverable
//! conflicts from fatal ones, and the atomizer accumulates `UNKNOWN` atoms
//! with an attached category. `Diagnostic` is the common shape the CLI
//! driver collects all of these into so it can decide exit status and
//! render them with `ariadne` in one place, rather than each subsystem
//! knowing how to format itself for a terminal.

use std::fmt;

use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// Which stage of the pipeline raised this diagnostic, and under what
/// taxonomy bucket from §7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCategory {
    /// Scanner-level flag (EINVALID, EUNMATCHED, or a flagged-but-valid token).
    ScannerFlag,
    /// Generator conflict: recoverable (shift wins) or fatal.
    GeneratorConflict,
    /// AST-parser alternative-rejection that escaped every enclosing scope.
    ParseError,
    /// Atomizer: SYNTAX_ERROR category (§4.5, §7).
    SyntaxError,
    /// Atomizer: TYPE_ERROR category (§4.5, §7).
    TypeError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub category: DiagnosticCategory,
    pub message: String,
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        category: DiagnosticCategory,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            span,
        }
    }

    pub fn error(category: DiagnosticCategory, message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Error, category, message, Some(span))
    }

    pub fn warning(category: DiagnosticCategory, message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Warning, category, message, Some(span))
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sev = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{sev}: {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_sets_error_severity() {
        let d = Diagnostic::error(DiagnosticCategory::TypeError, "bad", Span::new(0, 1));
        assert!(d.is_error());
    }

    #[test]
    fn warning_is_not_error() {
        let d = Diagnostic::warning(DiagnosticCategory::GeneratorConflict, "shift wins", Span::new(0, 1));
        assert!(!d.is_error());
    }

    #[test]
    fn display_includes_message() {
        let d = Diagnostic::error(DiagnosticCategory::SyntaxError, "oops", Span::new(0, 1));
        assert_eq!(format!("{d}"), "error: oops");
    }
}
