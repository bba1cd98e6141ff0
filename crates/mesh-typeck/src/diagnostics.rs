//! Ariadne-based rendering of atomizer diagnostics (§6 "Output").

use ariadne::{Color, Config, Label, Report, ReportKind, Source};

use mesh_common::{Diagnostic, DiagnosticCategory, Severity};

use crate::error::TypeError;

fn error_code(err: &TypeError) -> &'static str {
    match err {
        TypeError::UndefinedName { .. } => "E0001",
        TypeError::NotCallable { .. } => "E0002",
        TypeError::NoSuchAttribute { .. } => "E0003",
        TypeError::UnsupportedOperator { .. } => "E0004",
        TypeError::UnsupportedUnaryOperator { .. } => "E0005",
        TypeError::TooManyArguments { .. } => "E0006",
        TypeError::MissingArgument { .. } => "E0007",
        TypeError::UnexpectedKeywordArgument { .. } => "E0008",
        TypeError::NotSubscriptable { .. } => "E0009",
        TypeError::NotIterable { .. } => "E0010",
        TypeError::ReturnOutsideFunction { .. } => "E0011",
        TypeError::UnannotatedParameter { .. } => "E0012",
        TypeError::InvalidInTypeContext { .. } => "E0013",
    }
}

/// Turn a `TypeError` into the ambient `Diagnostic` shape (§7): a
/// `SYNTAX_ERROR` for `return` misuse and unannotated parameters (the
/// atomizer flags these the way a parser would), `TYPE_ERROR` otherwise.
pub fn to_diagnostic(err: &TypeError) -> Diagnostic {
    let category = match err {
        TypeError::ReturnOutsideFunction { .. } | TypeError::UnannotatedParameter { .. } => {
            DiagnosticCategory::SyntaxError
        }
        _ => DiagnosticCategory::TypeError,
    };
    Diagnostic::new(Severity::Error, category, err.to_string(), Some(err.span()))
}

/// Render a `TypeError` as an `ariadne` report for terminal display.
pub fn render(err: &TypeError, source: &str) -> String {
    let config = Config::default().with_color(false);
    let span = err.span();
    let len = source.len();
    let clamp = |s: usize, e: usize| -> std::ops::Range<usize> {
        let s = s.min(len);
        let e = e.min(len).max(s);
        if s == e { s..e.saturating_add(1).min(len).max(s) } else { s..e }
    };
    let range = clamp(span.start as usize, span.end as usize);

    let report = Report::build(ReportKind::Error, range.clone())
        .with_code(error_code(err))
        .with_message(err.to_string())
        .with_config(config)
        .with_label(Label::new(range).with_message(err.to_string()).with_color(Color::Red))
        .finish();

    let mut buf = Vec::new();
    report.write(Source::from(source), &mut buf).expect("diagnostic render should not fail");
    String::from_utf8(buf).expect("diagnostic output should be valid UTF-8")
}
