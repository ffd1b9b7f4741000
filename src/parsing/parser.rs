//! Recursive-descent parser driving the event builder.
//!
//! Grammar rules live in `statements.rs`, `expressions.rs` and
//! `functions.rs` as further `impl Parser` blocks; this file holds the
//! shared token-level helpers and the public entry point.

use crate::parsing::builder::{Event, Marker, build_tree};
use crate::parsing::context::{ParsingContext, ParsingScope};
use crate::parsing::lexer::tokenize;
use crate::parsing::reclassify::ReclassifyState;
use crate::parsing::stream::TokenStream;
use crate::parsing::tokens::{Token, TokenKind};
use crate::parsing::tree::{NodeKind, SyntaxTree};
use std::mem;

pub(crate) const EXPRESSION_EXPECTED: &str = "Expression expected";
pub(crate) const IDENTIFIER_EXPECTED: &str = "Identifier expected";

/// Parse a whole module.  Never fails: problems are recorded in
/// [`SyntaxTree::errors`] and parsing resumes at the next token.
pub fn parse_module(src: &str, context: &ParsingContext) -> SyntaxTree {
    let lexed = tokenize(src);
    let mut p = Parser::new(src, lexed.tokens, context);

    let file = p.mark();
    while !p.at_eof() {
        p.parse_statement(ParsingScope::default());
    }
    file.commit(&mut p, NodeKind::File);

    let (events, tokens) = p.finish();
    build_tree(events, &tokens, &lexed.comments, src.len() as u32)
}

pub struct Parser<'src> {
    pub(crate) stream: TokenStream<'src>,
    pub(crate) events: Vec<Event>,
    /// `(node, parent)` event positions linked by `precede`, oldest first.
    pub(crate) preceded: Vec<(u32, u32)>,
}

impl<'src> Parser<'src> {
    pub fn new(
        src: &'src str,
        tokens: Vec<Token>,
        context: &ParsingContext,
    ) -> Self {
        let state = ReclassifyState {
            level: context.language_level,
            futures: context.futures.clone(),
            ..ReclassifyState::default()
        };
        Self {
            stream: TokenStream::new(src, tokens, state),
            events: Vec::new(),
            preceded: Vec::new(),
        }
    }

    pub fn finish(self) -> (Vec<Event>, Vec<Token>) {
        (self.events, self.stream.into_tokens())
    }

    // ── Lookahead ─────────────────────────────────────────────────────────────

    pub(crate) fn current(&self) -> TokenKind {
        self.stream.current()
    }

    pub(crate) fn nth(&self, n: usize) -> TokenKind {
        self.stream.nth(n)
    }

    pub(crate) fn nth_raw(&self, n: usize) -> TokenKind {
        self.stream.nth_raw(n)
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.stream.at_eof()
    }

    pub(crate) fn at_end_of_statement(&self) -> bool {
        self.current().is_end_of_statement()
    }

    pub(crate) fn text(&self) -> &'src str {
        self.stream.text()
    }

    // ── Consumption ───────────────────────────────────────────────────────────

    pub(crate) fn bump(&mut self) {
        if self.at_eof() {
            return;
        }
        let kind = self.stream.bump();
        self.events.push(Event::Token { kind });
    }

    /// Consume the current token if it is `kind`.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or record `message`.
    pub(crate) fn expect(&mut self, kind: TokenKind, message: &str) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(message);
            false
        }
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        self.events.push(Event::Error {
            message: message.into(),
            at_token: None,
        });
    }

    pub(crate) fn mark(&mut self) -> Marker {
        let pos = self.events.len() as u32;
        self.events.push(Event::Open {
            kind: None,
            forward_parent: None,
        });
        Marker::new(pos, self.stream.pos())
    }

    /// Run `f` with the expect-`as` flag set to `value`, restoring the
    /// previous value afterwards.
    pub(crate) fn with_expect_as<T>(&mut self, value: bool, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = mem::replace(&mut self.stream.state.expect_as, value);
        let out = f(self);
        self.stream.state.expect_as = saved;
        out
    }

    pub(crate) fn is_py3k(&self) -> bool {
        self.stream.state.level.is_py3k()
    }
}
