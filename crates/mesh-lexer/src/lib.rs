//! Mesh scanner -- indentation-sensitive tokenizer for the Mesh language.
//!
//! Converts source text into a stream of [`Token`]s. Unlike a typical
//! whitespace-insensitive lexer, this scanner tracks a logical-line
//! indentation stack (emitting synthetic INDENT/DEDENT tokens), a
//! bracket-matching stack (to suppress NEWLINE inside `(...)`/`[...]`/
//! `{...}`), and per-token literal flags (§3, §4.1). It never aborts:
//! malformed input becomes an `EInvalid`/`EUnmatched` token or a flag on an
//! otherwise well-formed token, never a panic.

mod cursor;

use cursor::Cursor;
use mesh_common::token::{keyword_from_str, NumberFlags, StringFlags, TokenPayload, PUNCTUATION};
use mesh_common::{KeywordKind, Token, TokenKind};

/// Indentation is measured two ways at once (§4.1): spaces weighted
/// `TABSIZE`, and every indentation character (including tabs) weighted
/// `ALTTABSIZE`. Disagreement between the two measures -- e.g. mixing tabs
/// and spaces inconsistently -- is what "inconsistent" flags, without the
/// scanner ever trying to guess the "right" interpretation.
const TABSIZE: u32 = 8;
const ALTTABSIZE: u32 = 1;

/// One opening bracket on the match stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BracketFrame {
    kind: TokenKind,
}

fn matching_close(open: TokenKind) -> Option<TokenKind> {
    Some(match open {
        TokenKind::OpenParen => TokenKind::CloseParen,
        TokenKind::OpenBracket => TokenKind::CloseBracket,
        TokenKind::OpenBrace => TokenKind::CloseBrace,
        _ => return None,
    })
}

fn is_open_bracket(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::OpenParen | TokenKind::OpenBracket | TokenKind::OpenBrace
    )
}

fn is_close_bracket(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::CloseBrace
    )
}

/// The Mesh scanner. Produces one token per call to [`Scanner::scan`], or
/// iterate it directly -- it implements `Iterator<Item = Token>`.
pub struct Scanner<'src> {
    cursor: Cursor<'src>,
    /// (space-weighted, alt-weighted) indentation of each open block, outermost first.
    indent_stack: Vec<(u32, u32)>,
    /// Currently-open brackets, for NEWLINE suppression and EUnmatched detection.
    bracket_stack: Vec<BracketFrame>,
    /// Synthesized INDENT/DEDENT/NEWLINE tokens queued ahead of the cursor.
    pending: Vec<Token>,
    /// True at the first token of a logical line -- triggers indentation scanning.
    at_line_start: bool,
    emitted_eof: bool,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            indent_stack: vec![(0, 0)],
            bracket_stack: Vec::new(),
            pending: Vec::new(),
            at_line_start: true,
            emitted_eof: false,
        }
    }

    pub fn tokenize(source: &str) -> Vec<Token> {
        Scanner::new(source).collect()
    }

    /// Produce the next token. Equivalent to calling `next()` via `Iterator`
    /// but named to match the scanner's contract in §4.1.
    pub fn scan(&mut self) -> Option<Token> {
        self.next()
    }

    fn emit(&mut self, token: Token) -> Token {
        if token.kind == TokenKind::Eof {
            self.emitted_eof = true;
        }
        token
    }

    /// Handle indentation at the start of a logical line (§4.1). Queues any
    /// INDENT/DEDENT tokens into `pending` and returns once the line's
    /// first real token can be scanned.
    fn scan_indentation(&mut self) {
        if !self.bracket_stack.is_empty() {
            // Indentation is only significant outside brackets.
            return;
        }

        loop {
            let mut spaces = 0u32;
            let mut alt = 0u32;

            loop {
                match self.cursor.peek() {
                    Some(' ') => {
                        self.cursor.advance();
                        spaces += 1;
                        alt += 1;
                    }
                    Some('\t') => {
                        self.cursor.advance();
                        // A tab rounds the space-weighted column up to the next
                        // TABSIZE stop, but only ever advances the alt-weighted
                        // column by one -- the disagreement between the two is
                        // exactly what flags inconsistent tab/space mixing.
                        spaces = (spaces / TABSIZE + 1) * TABSIZE;
                        alt += ALTTABSIZE;
                    }
                    _ => break,
                }
            }

            match self.cursor.peek() {
                None => {
                    // EOF on a blank line: no indentation token, let scan_normal emit EOF.
                    return;
                }
                Some('\n') | Some('\r') => {
                    // Blank line: consume the newline and keep scanning indentation.
                    self.cursor.advance();
                    if self.cursor.peek() == Some('\n') {
                        self.cursor.advance();
                    }
                    continue;
                }
                Some('#') => {
                    // Comment-only line: consume it, then keep scanning indentation.
                    let start = self.cursor.pos();
                    self.lex_comment(start);
                    continue;
                }
                _ => {}
            }

            let (top_spaces, top_alt) = *self.indent_stack.last().unwrap();
            let pos = self.cursor.pos();

            if spaces == top_spaces {
                // Same indentation level: no INDENT/DEDENT token. A disagreeing
                // alt-measure at an unchanged level has nothing to attach an
                // inconsistency flag to, so it passes through unflagged --
                // the same ambiguity a later push or pop at this same offset
                // will catch.
            } else if spaces > top_spaces {
                let inconsistent = alt <= top_alt;
                self.indent_stack.push((spaces, alt));
                self.pending.push(Token::with_payload(
                    TokenKind::Indent,
                    pos,
                    pos,
                    TokenPayload::Indent {
                        inconsistent,
                        diverges: false,
                    },
                ));
            } else {
                let mut diverges = false;
                while self.indent_stack.len() > 1 && self.indent_stack.last().unwrap().0 > spaces {
                    self.indent_stack.pop();
                    let (cur_spaces, cur_alt) = *self.indent_stack.last().unwrap();
                    let inconsistent = cur_spaces != spaces && alt == cur_alt
                        || cur_spaces == spaces && alt != cur_alt;
                    self.pending.push(Token::with_payload(
                        TokenKind::Dedent,
                        pos,
                        pos,
                        TokenPayload::Indent {
                            inconsistent,
                            diverges,
                        },
                    ));
                    diverges = false;
                }
                if self.indent_stack.last().unwrap().0 != spaces {
                    // Popped past every recorded frame without finding a match.
                    diverges = true;
                    if let Some(last) = self.pending.last_mut() {
                        if let TokenPayload::Indent { diverges: d, .. } = &mut last.payload {
                            *d = diverges;
                        }
                    }
                }
            }
            return;
        }
    }

    fn skip_whitespace(&mut self) {
        self.cursor.eat_while(|c| c == ' ' || c == '\t');
    }

    /// Longest-match punctuation lookup (§4.1: "resolved by a longest-match trie").
    fn lex_punctuation(&mut self, start: u32) -> Token {
        let mut best: Option<(usize, TokenKind)> = None;
        for (spelling, kind) in PUNCTUATION {
            if self.cursor.matches_at(start, spelling) {
                if best.map_or(true, |(len, _)| spelling.len() > len) {
                    best = Some((spelling.len(), *kind));
                }
            }
        }
        match best {
            Some((len, kind)) => {
                for _ in 0..spelling_char_count(len) {
                    self.cursor.advance();
                }
                let end = self.cursor.pos();
                if is_open_bracket(kind) {
                    self.bracket_stack.push(BracketFrame { kind });
                } else if is_close_bracket(kind) {
                    match self.bracket_stack.last() {
                        Some(frame) if matching_close(frame.kind) == Some(kind) => {
                            self.bracket_stack.pop();
                        }
                        _ => {
                            return Token::new(TokenKind::EUnmatched, start, end);
                        }
                    }
                }
                Token::new(kind, start, end)
            }
            None => {
                self.cursor.advance();
                Token::new(TokenKind::EInvalid, start, self.cursor.pos())
            }
        }
    }

    fn lex_comment(&mut self, start: u32) -> Token {
        self.cursor.advance(); // consume '#'
        if self.cursor.peek() == Some('[') {
            let content_start = self.cursor.pos();
            self.cursor.eat_while(|c| c != '\n' && c != '\r');
            let content_end = self.cursor.pos();
            let text = self.cursor.slice(content_start, content_end).to_string();
            return Token::with_payload(
                TokenKind::Directive,
                start,
                content_end,
                TokenPayload::Directive(text),
            );
        }
        self.cursor.eat_while(|c| c != '\n' && c != '\r');
        // Comments are not tokens of their own outside directives; caller
        // loops to the next real token.
        Token::new(TokenKind::Eof, start, self.cursor.pos())
    }

    fn lex_number(&mut self, start: u32) -> Token {
        let mut flags = NumberFlags::default();
        let first = self.cursor.advance().unwrap();

        if first == '0' {
            match self.cursor.peek() {
                Some('x' | 'X') => {
                    flags.hexadecimal = true;
                    self.cursor.advance();
                    self.eat_digit_run(&mut flags, |c| c.is_ascii_hexdigit());
                    return self.finish_number(start, flags);
                }
                Some('b' | 'B') => {
                    flags.binary = true;
                    self.cursor.advance();
                    self.eat_digit_run(&mut flags, |c| c == '0' || c == '1');
                    return self.finish_number(start, flags);
                }
                Some('o' | 'O') => {
                    flags.octal = true;
                    self.cursor.advance();
                    self.eat_digit_run(&mut flags, |c| matches!(c, '0'..='7'));
                    return self.finish_number(start, flags);
                }
                _ => {
                    if matches!(self.cursor.peek(), Some('0'..='9')) {
                        flags.leading_zero = true;
                    }
                }
            }
        }

        self.eat_digit_run(&mut flags, |c| c.is_ascii_digit());

        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            flags.float = true;
            self.cursor.advance();
            self.eat_digit_run(&mut flags, |c| c.is_ascii_digit());
        }

        if matches!(self.cursor.peek(), Some('e' | 'E')) {
            flags.float = true;
            self.lex_exponent(&mut flags);
        }

        if matches!(self.cursor.peek(), Some('j' | 'J')) {
            flags.imaginary = true;
            self.cursor.advance();
        }

        self.finish_number(start, flags)
    }

    fn eat_digit_run(&mut self, flags: &mut NumberFlags, is_digit: impl Fn(char) -> bool) {
        let mut saw_digit = false;
        let mut last_was_underscore = false;
        let mut consecutive = false;
        loop {
            match self.cursor.peek() {
                Some(c) if is_digit(c) => {
                    self.cursor.advance();
                    saw_digit = true;
                    last_was_underscore = false;
                }
                Some('_') => {
                    self.cursor.advance();
                    if last_was_underscore {
                        consecutive = true;
                    }
                    last_was_underscore = true;
                }
                _ => break,
            }
        }
        if consecutive {
            flags.consecutive_underscores = true;
        }
        if last_was_underscore {
            flags.trailing_underscore = true;
        }
        if !saw_digit {
            flags.empty = true;
        }
    }

    fn lex_exponent(&mut self, flags: &mut NumberFlags) {
        self.cursor.advance(); // e/E
        if matches!(self.cursor.peek(), Some('+' | '-')) {
            self.cursor.advance();
        }
        if !matches!(self.cursor.peek(), Some('0'..='9')) {
            flags.invalid_exponent = true;
        }
        self.eat_digit_run(flags, |c| c.is_ascii_digit());
    }

    fn finish_number(&mut self, start: u32, flags: NumberFlags) -> Token {
        Token::with_payload(
            TokenKind::Number,
            start,
            self.cursor.pos(),
            TokenPayload::Number(flags),
        )
    }

    /// Identifiers, keywords, and string-prefix-qualified strings (§4.1).
    fn lex_ident(&mut self, start: u32) -> Token {
        self.cursor.advance();
        self.cursor.eat_while(is_ident_continue);
        let end = self.cursor.pos();
        let text = self.cursor.slice(start, end);

        if matches!(self.cursor.peek(), Some('\'') | Some('"')) {
            if let Some(flags) = string_prefix_flags(text) {
                return self.lex_string(start, flags);
            }
        }

        match keyword_from_str(text) {
            Some(kw) => Token::with_payload(TokenKind::Keyword, start, end, TokenPayload::Keyword(kw)),
            None => Token::new(TokenKind::Identifier, start, end),
        }
    }

    fn lex_string(&mut self, start: u32, mut flags: StringFlags) -> Token {
        let quote = self.cursor.advance().unwrap(); // consume opening quote
        let triple = self.cursor.peek() == Some(quote) && self.cursor.peek_next() == Some(quote);
        if triple {
            self.cursor.advance();
            self.cursor.advance();
        }

        loop {
            match self.cursor.peek() {
                None => {
                    flags.unterminated = true;
                    break;
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some(c) if c == quote => {
                    if !triple {
                        self.cursor.advance();
                        break;
                    }
                    self.cursor.advance();
                    if self.cursor.peek() == Some(quote) && self.cursor.peek_next() == Some(quote) {
                        self.cursor.advance();
                        self.cursor.advance();
                        break;
                    }
                }
                Some('\n') | Some('\r') if !triple => {
                    flags.unterminated = true;
                    break;
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }

        Token::with_payload(
            TokenKind::String,
            start,
            self.cursor.pos(),
            TokenPayload::String(flags),
        )
    }

    fn scan_normal(&mut self) -> Token {
        self.skip_whitespace();
        let start = self.cursor.pos();

        let Some(c) = self.cursor.peek() else {
            while self.indent_stack.len() > 1 {
                self.indent_stack.pop();
                self.pending.push(Token::with_payload(
                    TokenKind::Dedent,
                    start,
                    start,
                    TokenPayload::Indent {
                        inconsistent: false,
                        diverges: false,
                    },
                ));
            }
            if !self.pending.is_empty() {
                return self.pending.remove(0);
            }
            return Token::new(TokenKind::Eof, start, start);
        };

        match c {
            '\n' | '\r' => {
                self.cursor.advance();
                if c == '\r' && self.cursor.peek() == Some('\n') {
                    self.cursor.advance();
                }
                self.at_line_start = true;
                if !self.bracket_stack.is_empty() {
                    // Inside an open bracket, newlines are not significant.
                    self.next_inner()
                } else {
                    Token::new(TokenKind::Newline, start, self.cursor.pos())
                }
            }
            '#' => {
                let tok = self.lex_comment(start);
                if tok.kind == TokenKind::Directive {
                    tok
                } else {
                    self.next_inner()
                }
            }
            '0'..='9' => self.lex_number(start),
            '\'' | '"' => self.lex_string(start, StringFlags::default()),
            c if is_ident_start(c) => self.lex_ident(start),
            _ => self.lex_punctuation(start),
        }
    }

    fn next_inner(&mut self) -> Token {
        if self.emitted_eof {
            return Token::new(TokenKind::Eof, self.cursor.pos(), self.cursor.pos());
        }
        if !self.pending.is_empty() {
            return self.pending.remove(0);
        }
        if self.at_line_start {
            self.at_line_start = false;
            self.scan_indentation();
            if !self.pending.is_empty() {
                return self.pending.remove(0);
            }
        }
        self.scan_normal()
    }
}

impl<'src> Iterator for Scanner<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }
        let token = self.next_inner();
        Some(self.emit(token))
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || (c as u32) >= 0x80
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || (c as u32) >= 0x80
}

/// `r`, `b`, `f` string prefixes, order-insensitive; any other letter
/// defeats prefix interpretation (the identifier is emitted on its own and
/// the quote starts a fresh, unprefixed string -- handled by the caller
/// simply not calling this function when it returns `None`).
fn string_prefix_flags(text: &str) -> Option<StringFlags> {
    if text.is_empty() || text.len() > 3 {
        return None;
    }
    let mut flags = StringFlags::default();
    let mut seen = [false; 3];
    for c in text.chars() {
        let idx = match c {
            'r' => 0,
            'b' => 1,
            'f' => 2,
            _ => return None,
        };
        if seen[idx] {
            flags.duplicate_prefix = true;
        }
        seen[idx] = true;
        match idx {
            0 => flags.raw = true,
            1 => flags.bytes = true,
            2 => flags.format = true,
            _ => unreachable!(),
        }
    }
    Some(flags)
}

fn spelling_char_count(byte_len: usize) -> usize {
    // Every punctuation spelling in PUNCTUATION is pure ASCII, so byte
    // length and char count coincide; named to make the call site read.
    byte_len
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Scanner::tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn scenario_a_if_block() {
        let tokens = Scanner::tokenize("if x:\n    pass\n");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Indent,
                TokenKind::Keyword,
                TokenKind::Newline,
                TokenKind::Dedent,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn brackets_suppress_newline() {
        let kinds = kinds("(1,\n2)\n");
        assert!(!kinds.contains(&TokenKind::Newline) || kinds.iter().filter(|k| **k == TokenKind::Newline).count() == 1);
    }

    #[test]
    fn unmatched_closer_flags_eunmatched() {
        let tokens = Scanner::tokenize(")");
        assert_eq!(tokens[0].kind, TokenKind::EUnmatched);
    }

    #[test]
    fn consecutive_underscore_flag() {
        let tokens = Scanner::tokenize("1__000");
        let TokenPayload::Number(flags) = &tokens[0].payload else {
            panic!("expected number payload");
        };
        assert!(flags.consecutive_underscores);
    }

    #[test]
    fn clean_underscore_separator_no_flag() {
        let tokens = Scanner::tokenize("1_000_000");
        let TokenPayload::Number(flags) = &tokens[0].payload else {
            panic!("expected number payload");
        };
        assert!(!flags.consecutive_underscores);
        assert!(!flags.trailing_underscore);
    }

    #[test]
    fn string_prefix_recognized() {
        let tokens = Scanner::tokenize(r#"rb"x""#);
        assert_eq!(tokens[0].kind, TokenKind::String);
        let TokenPayload::String(flags) = &tokens[0].payload else {
            panic!("expected string payload");
        };
        assert!(flags.raw && flags.bytes);
    }

    #[test]
    fn unknown_prefix_letter_emits_identifier_then_string() {
        let kinds = kinds(r#"zz"x""#);
        assert_eq!(kinds, vec![TokenKind::Identifier, TokenKind::String, TokenKind::Eof]);
    }

    #[test]
    fn unterminated_string_flagged() {
        let tokens = Scanner::tokenize("\"abc");
        let TokenPayload::String(flags) = &tokens[0].payload else {
            panic!("expected string payload");
        };
        assert!(flags.unterminated);
    }
}
