//! Cursor over the lexed tokens, with soft keywords reclassified on the fly.

use crate::location::TextRange;
use crate::parsing::reclassify::{Reclassified, ReclassifyState, reclassify};
use crate::parsing::tokens::{Token, TokenKind};
use crate::parsing::context::FuturePhase;

pub struct TokenStream<'src> {
    src: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    pub state: ReclassifyState,
}

impl<'src> TokenStream<'src> {
    /// `tokens` must end with [`TokenKind::Eof`].
    pub fn new(src: &'src str, mut tokens: Vec<Token>, state: ReclassifyState) -> Self {
        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            let end = src.len() as u32;
            tokens.push(Token {
                kind: TokenKind::Eof,
                range: TextRange::empty(end),
            });
        }
        Self {
            src,
            tokens,
            pos: 0,
            state,
        }
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Index of the current token.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn reset(&mut self, pos: usize) {
        self.pos = pos.min(self.tokens.len() - 1);
    }

    fn token(&self, n: usize) -> Token {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        self.tokens[idx]
    }

    /// Effective kind of the current token.
    pub fn current(&self) -> TokenKind {
        self.nth(0)
    }

    /// Effective kind `n` tokens ahead.
    pub fn nth(&self, n: usize) -> TokenKind {
        let token = self.token(n);
        if token.kind != TokenKind::Identifier {
            return token.kind;
        }
        match reclassify(&self.state, self.slice(token.range)) {
            Reclassified::Keyword(kind) => kind,
            Reclassified::Unchanged | Reclassified::EnterFuture => TokenKind::Identifier,
        }
    }

    /// Lexer kind `n` tokens ahead, before reclassification.
    pub fn nth_raw(&self, n: usize) -> TokenKind {
        self.token(n).kind
    }

    pub fn text(&self) -> &'src str {
        self.slice(self.token(0).range)
    }

    fn slice(&self, range: TextRange) -> &'src str {
        self.src.get(range.start as usize..range.end as usize).unwrap_or("")
    }

    pub fn at_eof(&self) -> bool {
        self.nth_raw(0) == TokenKind::Eof
    }

    /// Consume the current token and return its effective kind.  Consuming
    /// `__future__` right after `from` moves the future phase forward.
    /// The cursor never moves past EOF.
    pub fn bump(&mut self) -> TokenKind {
        let token = self.token(0);
        let kind = if token.kind == TokenKind::Identifier {
            match reclassify(&self.state, self.slice(token.range)) {
                Reclassified::Keyword(kind) => kind,
                Reclassified::EnterFuture => {
                    self.state.phase = FuturePhase::Future;
                    TokenKind::Identifier
                }
                Reclassified::Unchanged => TokenKind::Identifier,
            }
        } else {
            token.kind
        };
        if kind != TokenKind::Eof {
            self.pos += 1;
        }
        kind
    }
}
