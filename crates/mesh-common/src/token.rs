use serde::Serialize;

use crate::span::Span;

/// A token produced by the Mesh scanner.
///
/// Beyond `kind` and `span`, some kinds carry extra bookkeeping that the
/// scanner fills in but the kind alone cannot express: identifier text,
/// number/string flag sets, and indent/dedent consistency bits. These live
/// in `payload` rather than as extra `TokenKind` variants so that matching
/// on `kind` stays exhaustive and cheap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    #[serde(skip_serializing_if = "TokenPayload::is_none")]
    pub payload: TokenPayload,
}

impl Token {
    pub fn new(kind: TokenKind, start: u32, end: u32) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
            payload: TokenPayload::None,
        }
    }

    pub fn with_payload(kind: TokenKind, start: u32, end: u32, payload: TokenPayload) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
            payload,
        }
    }

    pub fn is_keyword(&self, kw: KeywordKind) -> bool {
        matches!(&self.payload, TokenPayload::Keyword(k) if *k == kw)
    }
}

/// Kind-specific data a token carries alongside its span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TokenPayload {
    None,
    /// `Keyword` tokens carry which keyword matched.
    Keyword(KeywordKind),
    /// Number literal flags (see [`NumberFlags`]).
    Number(NumberFlags),
    /// String literal flags (see [`StringFlags`]).
    String(StringFlags),
    /// Indent/dedent consistency bookkeeping (`scan_indentation`, §4.1).
    Indent { inconsistent: bool, diverges: bool },
    /// Directive content: the text inside a `#[...]` comment.
    Directive(String),
}

impl TokenPayload {
    fn is_none(&self) -> bool {
        matches!(self, TokenPayload::None)
    }
}

/// Flags describing how a number literal was spelled.
///
/// Mirrors the scanner's literal bookkeeping (§3, §4.1): these never change
/// whether the token is emitted, only what diagnostics the caller may want
/// to raise about its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NumberFlags {
    pub binary: bool,
    pub octal: bool,
    pub hexadecimal: bool,
    pub float: bool,
    pub imaginary: bool,
    pub empty: bool,
    pub leading_zero: bool,
    pub consecutive_underscores: bool,
    pub trailing_underscore: bool,
    pub invalid_exponent: bool,
}

/// Flags describing how a string literal was spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StringFlags {
    pub raw: bool,
    pub bytes: bool,
    pub format: bool,
    pub unterminated: bool,
    pub duplicate_prefix: bool,
}

/// Every kind of token the scanner can produce.
///
/// This is the complete vocabulary for the `syntax/typethon` dialect: a
/// reduced Python-like surface syntax (see DESIGN.md for why the smaller
/// keyword set was chosen as the grounding source over the full Python
/// dialect). Operators, delimiters, indentation, literals, and scanner-level
/// error tokens are covered; keywords are a payload on the `Keyword` variant
/// rather than one `TokenKind` per keyword, which keeps grammar terminals
/// and token kinds cleanly separable for §4.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // ── Structural ─────────────────────────────────────────────────────
    /// Start of a source file / logical line, before any indentation check.
    Indent,
    Dedent,
    /// Significant newline outside brackets.
    Newline,
    /// End of file.
    Eof,

    // ── Literals and names ────────────────────────────────────────────
    Identifier,
    Number,
    String,
    /// `#[...]` directive comment.
    Directive,
    /// A keyword; see [`Token::is_keyword`] / [`TokenPayload::Keyword`].
    Keyword,

    // ── Delimiters ─────────────────────────────────────────────────────
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Colon,
    Comma,
    Semicolon,
    Dot,

    // ── Operators ──────────────────────────────────────────────────────
    Plus,
    Minus,
    Star,
    At,
    Slash,
    VerticalBar,
    Ampersand,
    Lthan,
    Gthan,
    Equal,
    Percent,
    Tilde,
    Circumflex,
    Question,
    Tick,

    DoubleColon,
    DoubleSlash,
    EqEqual,
    NotEqual,
    LthanEq,
    GthanEq,
    DoubleLthan,
    DoubleGthan,
    DoubleStar,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    AtEqual,
    PercentEqual,
    AmpersandEqual,
    VerticalBarEqual,
    CircumflexEqual,
    ColonEqual,
    Rarrow,

    DoubleLthanEqual,
    DoubleGthanEqual,
    DoubleStarEqual,
    DoubleSlashEqual,
    Ellipsis,

    // ── Scanner-level failures (never abort scanning, §4.1/§7) ────────
    /// An invalid single character (or the longest run of them) was seen.
    EInvalid,
    /// A closing bracket did not match the top of the bracket stack.
    EUnmatched,
}

/// The fixed punctuation table, longest-match first so the scanner's trie
/// walk resolves `**=` before `**` before `*`.
pub const PUNCTUATION: &[(&str, TokenKind)] = &[
    ("(", TokenKind::OpenParen),
    (")", TokenKind::CloseParen),
    ("[", TokenKind::OpenBracket),
    ("]", TokenKind::CloseBracket),
    ("{", TokenKind::OpenBrace),
    ("}", TokenKind::CloseBrace),
    (":", TokenKind::Colon),
    (",", TokenKind::Comma),
    (";", TokenKind::Semicolon),
    (".", TokenKind::Dot),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("@", TokenKind::At),
    ("/", TokenKind::Slash),
    ("|", TokenKind::VerticalBar),
    ("&", TokenKind::Ampersand),
    ("<", TokenKind::Lthan),
    (">", TokenKind::Gthan),
    ("=", TokenKind::Equal),
    ("%", TokenKind::Percent),
    ("~", TokenKind::Tilde),
    ("^", TokenKind::Circumflex),
    ("'", TokenKind::Tick),
    ("::", TokenKind::DoubleColon),
    ("//", TokenKind::DoubleSlash),
    ("==", TokenKind::EqEqual),
    ("!=", TokenKind::NotEqual),
    ("<=", TokenKind::LthanEq),
    (">=", TokenKind::GthanEq),
    ("<<", TokenKind::DoubleLthan),
    (">>", TokenKind::DoubleGthan),
    ("**", TokenKind::DoubleStar),
    ("+=", TokenKind::PlusEqual),
    ("-=", TokenKind::MinusEqual),
    ("*=", TokenKind::StarEqual),
    ("/=", TokenKind::SlashEqual),
    ("@=", TokenKind::AtEqual),
    ("%=", TokenKind::PercentEqual),
    ("&=", TokenKind::AmpersandEqual),
    ("|=", TokenKind::VerticalBarEqual),
    ("^=", TokenKind::CircumflexEqual),
    (":=", TokenKind::ColonEqual),
    ("->", TokenKind::Rarrow),
    ("<<=", TokenKind::DoubleLthanEqual),
    (">>=", TokenKind::DoubleGthanEqual),
    ("**=", TokenKind::DoubleStarEqual),
    ("//=", TokenKind::DoubleSlashEqual),
    ("...", TokenKind::Ellipsis),
    ("?", TokenKind::Question),
];

/// Every keyword in the `syntax/typethon` dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum KeywordKind {
    SelfKw,
    True,
    False,
    And,
    Break,
    Class,
    Continue,
    Def,
    Elif,
    Else,
    For,
    From,
    If,
    Import,
    In,
    Is,
    Not,
    None_,
    Or,
    Pass,
    Return,
    While,
    Assert,
    Global,
    Nonlocal,
}

/// Look up a keyword from its string representation.
pub fn keyword_from_str(s: &str) -> Option<KeywordKind> {
    Some(match s {
        "Self" => KeywordKind::SelfKw,
        "True" => KeywordKind::True,
        "False" => KeywordKind::False,
        "and" => KeywordKind::And,
        "break" => KeywordKind::Break,
        "class" => KeywordKind::Class,
        "continue" => KeywordKind::Continue,
        "def" => KeywordKind::Def,
        "elif" => KeywordKind::Elif,
        "else" => KeywordKind::Else,
        "for" => KeywordKind::For,
        "from" => KeywordKind::From,
        "if" => KeywordKind::If,
        "import" => KeywordKind::Import,
        "in" => KeywordKind::In,
        "is" => KeywordKind::Is,
        "not" => KeywordKind::Not,
        "None" => KeywordKind::None_,
        "or" => KeywordKind::Or,
        "pass" => KeywordKind::Pass,
        "return" => KeywordKind::Return,
        "while" => KeywordKind::While,
        "assert" => KeywordKind::Assert,
        "global" => KeywordKind::Global,
        "nonlocal" => KeywordKind::Nonlocal,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_from_str_recognizes_all_keywords() {
        let keywords = [
            ("Self", KeywordKind::SelfKw),
            ("True", KeywordKind::True),
            ("False", KeywordKind::False),
            ("and", KeywordKind::And),
            ("break", KeywordKind::Break),
            ("class", KeywordKind::Class),
            ("continue", KeywordKind::Continue),
            ("def", KeywordKind::Def),
            ("elif", KeywordKind::Elif),
            ("else", KeywordKind::Else),
            ("for", KeywordKind::For),
            ("from", KeywordKind::From),
            ("if", KeywordKind::If),
            ("import", KeywordKind::Import),
            ("in", KeywordKind::In),
            ("is", KeywordKind::Is),
            ("not", KeywordKind::Not),
            ("None", KeywordKind::None_),
            ("or", KeywordKind::Or),
            ("pass", KeywordKind::Pass),
            ("return", KeywordKind::Return),
            ("while", KeywordKind::While),
            ("assert", KeywordKind::Assert),
            ("global", KeywordKind::Global),
            ("nonlocal", KeywordKind::Nonlocal),
        ];
        for (s, expected) in keywords {
            assert_eq!(keyword_from_str(s), Some(expected));
        }
        assert_eq!(keywords.len(), 24);
    }

    #[test]
    fn keyword_from_str_rejects_non_keywords() {
        assert_eq!(keyword_from_str("foo"), None);
        assert_eq!(keyword_from_str("IF"), None);
        assert_eq!(keyword_from_str(""), None);
    }

    #[test]
    fn token_new_constructor() {
        let tok = Token::new(TokenKind::Identifier, 10, 12);
        assert_eq!(tok.kind, TokenKind::Identifier);
        assert_eq!(tok.span, Span::new(10, 12));
        assert_eq!(tok.payload, TokenPayload::None);
    }

    #[test]
    fn is_keyword_checks_payload() {
        let tok = Token::with_payload(
            TokenKind::Keyword,
            0,
            2,
            TokenPayload::Keyword(KeywordKind::If),
        );
        assert!(tok.is_keyword(KeywordKind::If));
        assert!(!tok.is_keyword(KeywordKind::Else));
    }
}
