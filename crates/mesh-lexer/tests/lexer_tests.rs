use mesh_common::token::TokenPayload;
use mesh_common::{KeywordKind, TokenKind};
use mesh_lexer::Scanner;

fn kinds(source: &str) -> Vec<TokenKind> {
    Scanner::tokenize(source).into_iter().map(|t| t.kind).collect()
}

#[test]
fn function_def_produces_balanced_indent_dedent() {
    let source = "def f(x):\n    if x:\n        return x\n    return 0\n";
    let tokens = Scanner::tokenize(source);
    let indents = tokens.iter().filter(|t| t.kind == TokenKind::Indent).count();
    let dedents = tokens.iter().filter(|t| t.kind == TokenKind::Dedent).count();
    assert_eq!(indents, dedents);
    assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
}

#[test]
fn blank_and_comment_only_lines_do_not_affect_indentation() {
    let a = kinds("if x:\n    pass\n");
    let b = kinds("if x:\n\n    # a comment\n    pass\n");
    assert_eq!(a, b);
}

#[test]
fn all_keywords_recognized_with_payload() {
    let tokens = Scanner::tokenize("class");
    assert_eq!(tokens[0].kind, TokenKind::Keyword);
    assert!(tokens[0].is_keyword(KeywordKind::Class));
}

#[test]
fn import_from_statement() {
    let kinds = kinds("from mod import name\n");
    assert_eq!(
        kinds,
        vec![
            TokenKind::Keyword,
            TokenKind::Identifier,
            TokenKind::Keyword,
            TokenKind::Identifier,
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn dict_literal_keeps_brackets_balanced_across_lines() {
    let tokens = Scanner::tokenize("x = {\n  1: 2,\n  3: 4,\n}\n");
    let newline_count = tokens.iter().filter(|t| t.kind == TokenKind::Newline).count();
    // Only the trailing newline after the closing brace is significant.
    assert_eq!(newline_count, 1);
}

#[test]
fn hex_octal_binary_prefixes_set_their_flag() {
    let cases: [(&str, fn(&TokenPayload) -> bool); 3] = [
        ("0x1F", |p| matches!(p, TokenPayload::Number(f) if f.hexadecimal)),
        ("0o17", |p| matches!(p, TokenPayload::Number(f) if f.octal)),
        ("0b101", |p| matches!(p, TokenPayload::Number(f) if f.binary)),
    ];
    for (src, check) in cases {
        let tokens = Scanner::tokenize(src);
        assert!(check(&tokens[0].payload), "flag not set for {src}");
    }
}

#[test]
fn float_with_exponent_sets_float_flag() {
    let tokens = Scanner::tokenize("1.5e10");
    assert!(matches!(&tokens[0].payload, TokenPayload::Number(f) if f.float));
}

#[test]
fn missing_exponent_digits_flagged_invalid() {
    let tokens = Scanner::tokenize("1e");
    assert!(matches!(&tokens[0].payload, TokenPayload::Number(f) if f.invalid_exponent));
}

#[test]
fn leading_zero_on_decimal_flagged() {
    let tokens = Scanner::tokenize("007");
    assert!(matches!(&tokens[0].payload, TokenPayload::Number(f) if f.leading_zero));
}

#[test]
fn mismatched_bracket_nesting_yields_eunmatched() {
    let tokens = Scanner::tokenize("(]");
    assert_eq!(tokens[0].kind, TokenKind::OpenParen);
    assert_eq!(tokens[1].kind, TokenKind::EUnmatched);
}

#[test]
fn directive_comment_is_its_own_token() {
    let tokens = Scanner::tokenize("#[inline]\npass\n");
    assert_eq!(tokens[0].kind, TokenKind::Directive);
    match &tokens[0].payload {
        TokenPayload::Directive(text) => assert_eq!(text, "[inline]"),
        other => panic!("expected directive payload, got {other:?}"),
    }
}

#[test]
fn triple_quoted_string_spans_multiple_lines() {
    let tokens = Scanner::tokenize("\"\"\"a\nb\"\"\"\n");
    assert_eq!(tokens[0].kind, TokenKind::String);
    if let TokenPayload::String(flags) = &tokens[0].payload {
        assert!(!flags.unterminated);
    } else {
        panic!("expected string payload");
    }
}
