//! Backtracking token-stream machinery (§4.2).
//!
//! `Parser` owns the full token buffer and a single cursor into it.
//! `alternative` snapshots that cursor before running a sub-parse and
//! rewinds it if the sub-parse is `Rejected`; `lookahead` always rewinds,
//! whether the sub-parse accepted or not. Together they give the
//! recursive-descent grammar its speculative "try this, else try that"
//! shape without ever unwinding past the call that can absorb it.

use mesh_common::{KeywordKind, Span, Token, TokenKind};

use crate::error::Rejected;

pub struct Parser<'a> {
    tokens: &'a [Token],
    source: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], source: &'a str) -> Self {
        Self { tokens, source, pos: 0 }
    }

    /// Source text spanned by `span`, for identifier/number/string tokens
    /// whose spelling the scanner does not copy into the token itself.
    pub fn text(&self, span: Span) -> &'a str {
        &self.source[span.start as usize..span.end as usize]
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    fn at(&self, offset: usize) -> &Token {
        self.tokens
            .get(self.pos + offset)
            .unwrap_or_else(|| self.tokens.last().expect("token stream must end in EOF"))
    }

    pub fn peek(&self) -> &Token {
        self.at(0)
    }

    pub fn peek_at(&self, offset: usize) -> &Token {
        self.at(offset)
    }

    pub fn at_kind(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub fn at_keyword(&self, kw: KeywordKind) -> bool {
        self.peek().is_keyword(kw)
    }

    pub fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    pub fn expect_kind(&mut self, kind: TokenKind) -> Result<Token, Rejected> {
        if self.at_kind(kind) {
            Ok(self.advance())
        } else {
            let token = self.peek();
            Err(Rejected::new(
                format!("expected {kind:?}, found {:?}", token.kind),
                token.span,
            ))
        }
    }

    pub fn expect_keyword(&mut self, kw: KeywordKind) -> Result<Token, Rejected> {
        if self.at_keyword(kw) {
            Ok(self.advance())
        } else {
            let token = self.peek();
            Err(Rejected::new(
                format!("expected keyword {kw:?}, found {:?}", token.kind),
                token.span,
            ))
        }
    }

    pub fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Run `f` speculatively: on `Err`, the cursor is rewound as if `f`
    /// had never consumed anything. On `Ok`, the cursor stays wherever
    /// `f` left it.
    pub fn alternative<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, Rejected>,
    ) -> Result<T, Rejected> {
        let checkpoint = self.pos;
        match f(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.pos = checkpoint;
                Err(err)
            }
        }
    }

    /// Run `f` purely to test whether it would accept; the cursor is
    /// always restored afterward, regardless of the outcome.
    pub fn lookahead(&mut self, f: impl FnOnce(&mut Self) -> Result<(), Rejected>) -> bool {
        let checkpoint = self.pos;
        let accepted = f(self).is_ok();
        self.pos = checkpoint;
        accepted
    }

    /// Run `f`; if it fails, swallow the rejection and return `None`
    /// rather than propagating it, restoring the cursor either way.
    pub fn optional<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, Rejected>) -> Option<T> {
        self.alternative(f).ok()
    }
}
