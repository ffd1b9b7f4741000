//! Event-based tree construction.
//!
//! The parser never builds nodes directly.  It appends [`Event`]s through
//! [`Marker`]s, which makes backtracking a truncation of the event list and
//! lets a finished node be wrapped by a parent opened later
//! ([`CompletedMarker::precede`]).  [`build_tree`] replays the events into a
//! [`SyntaxTree`] once parsing is done.

use crate::location::TextRange;
use crate::parsing::parser::Parser;
use crate::parsing::tokens::{Token, TokenKind};
use crate::parsing::tree::{Child, NodeData, NodeId, NodeKind, SyntaxError, SyntaxTree, TokenData};
use std::mem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Start of a node.  `kind` is `None` while the marker is pending and
    /// stays `None` if it is discarded, in which case no `Close` follows.
    /// `forward_parent` is the distance to an `Open` that must wrap this one.
    Open {
        kind: Option<NodeKind>,
        forward_parent: Option<u32>,
    },
    Close {
        /// Extend the node over comments that sit between its last token and
        /// the next significant token.
        bind_trailing_comments: bool,
    },
    Token {
        kind: TokenKind,
    },
    Error {
        message: String,
        /// Token the error is reported at; `None` means the next one.
        at_token: Option<usize>,
    },
    Tombstone,
}

/// A pending node start.  Must be resolved with one of `commit`,
/// `commit_block`, `error`, `discard` or `rollback`.
#[must_use]
#[derive(Debug)]
pub struct Marker {
    pos: u32,
    token_pos: usize,
}

impl Marker {
    pub(crate) fn new(pos: u32, token_pos: usize) -> Self {
        Self { pos, token_pos }
    }

    pub fn commit(self, p: &mut Parser<'_>, kind: NodeKind) -> CompletedMarker {
        self.close(p, kind, false)
    }

    /// Commit, also claiming trailing comments.
    pub fn commit_block(self, p: &mut Parser<'_>, kind: NodeKind) -> CompletedMarker {
        self.close(p, kind, true)
    }

    /// Commit as an [`NodeKind::Error`] node reporting `message` at the
    /// marker's start.
    pub fn error(self, p: &mut Parser<'_>, message: impl Into<String>) -> CompletedMarker {
        p.events.push(Event::Error {
            message: message.into(),
            at_token: Some(self.token_pos),
        });
        self.close(p, NodeKind::Error, false)
    }

    /// Forget the node but keep everything parsed since the mark.
    pub fn discard(self, _p: &mut Parser<'_>) {}

    /// Forget the node and everything parsed since the mark, rewinding the
    /// token cursor.
    pub fn rollback(self, p: &mut Parser<'_>) {
        let cut = self.pos;
        p.events.truncate(cut as usize);
        // Links are recorded in increasing parent order, so only the tail
        // can point past the cut.
        while let Some(&(child, parent)) = p.preceded.last() {
            if parent < cut {
                break;
            }
            p.preceded.pop();
            if let Some(Event::Open { forward_parent, .. }) = p.events.get_mut(child as usize) {
                *forward_parent = None;
            }
        }
        p.stream.reset(self.token_pos);
    }

    fn close(self, p: &mut Parser<'_>, kind: NodeKind, bind: bool) -> CompletedMarker {
        if let Some(Event::Open { kind: slot, .. }) = p.events.get_mut(self.pos as usize) {
            *slot = Some(kind);
        }
        p.events.push(Event::Close {
            bind_trailing_comments: bind,
        });
        CompletedMarker {
            pos: self.pos,
            token_pos: self.token_pos,
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CompletedMarker {
    pos: u32,
    token_pos: usize,
    kind: NodeKind,
}

impl CompletedMarker {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Open a new node that starts where this one starts and will contain it.
    pub fn precede(self, p: &mut Parser<'_>) -> Marker {
        let pos = p.events.len() as u32;
        p.events.push(Event::Open {
            kind: None,
            forward_parent: None,
        });
        if let Some(Event::Open { forward_parent, .. }) = p.events.get_mut(self.pos as usize) {
            *forward_parent = Some(pos - self.pos);
            p.preceded.push((self.pos, pos));
        }
        Marker::new(pos, self.token_pos)
    }

    /// Rename a finished node.
    pub fn change_kind(mut self, p: &mut Parser<'_>, kind: NodeKind) -> CompletedMarker {
        if let Some(Event::Open { kind: slot, .. }) = p.events.get_mut(self.pos as usize) {
            *slot = Some(kind);
        }
        self.kind = kind;
        self
    }
}

// ── Tree sink ─────────────────────────────────────────────────────────────────

/// Replay `events` over `tokens` into a tree.  The root node is stretched
/// to cover the whole source.
pub fn build_tree(
    mut events: Vec<Event>,
    tokens: &[Token],
    comments: &[TextRange],
    src_len: u32,
) -> SyntaxTree {
    let mut sink = Sink {
        tokens,
        comments,
        cursor: 0,
        tree: SyntaxTree::default(),
        stack: Vec::new(),
    };

    let mut parents = Vec::new();
    for i in 0..events.len() {
        match mem::replace(&mut events[i], Event::Tombstone) {
            Event::Open {
                kind,
                forward_parent,
            } => {
                parents.push(kind);
                let mut idx = i;
                let mut fwd = forward_parent;
                while let Some(distance) = fwd {
                    idx += distance as usize;
                    fwd = match events.get_mut(idx).map(|e| mem::replace(e, Event::Tombstone)) {
                        Some(Event::Open {
                            kind,
                            forward_parent,
                        }) => {
                            parents.push(kind);
                            forward_parent
                        }
                        _ => None,
                    };
                }
                for kind in parents.drain(..).rev().flatten() {
                    sink.open(kind);
                }
            }
            Event::Close {
                bind_trailing_comments,
            } => sink.close(bind_trailing_comments),
            Event::Token { kind } => sink.token(kind),
            Event::Error { message, at_token } => sink.error(message, at_token),
            Event::Tombstone => {}
        }
    }
    while !sink.stack.is_empty() {
        sink.close(false);
    }

    let mut tree = sink.tree;
    if let Some(root) = tree.nodes.first_mut() {
        root.range = TextRange::new(0, src_len);
    }
    tree
}

struct Sink<'a> {
    tokens: &'a [Token],
    comments: &'a [TextRange],
    cursor: usize,
    tree: SyntaxTree,
    stack: Vec<NodeId>,
}

impl Sink<'_> {
    fn next_token_start(&self) -> u32 {
        self.tokens
            .get(self.cursor)
            .or(self.tokens.last())
            .map_or(0, |t| t.range.start)
    }

    fn open(&mut self, kind: NodeKind) {
        let id = NodeId(self.tree.nodes.len() as u32);
        let parent = self.stack.last().copied();
        if let Some(parent) = parent {
            self.tree.nodes[parent.0 as usize].children.push(Child::Node(id));
        }
        self.tree.nodes.push(NodeData {
            kind,
            range: TextRange::empty(self.next_token_start()),
            parent,
            children: Vec::new(),
        });
        self.stack.push(id);
    }

    fn child_range(&self, child: Child) -> TextRange {
        match child {
            Child::Node(n) => self.tree.nodes[n.0 as usize].range,
            Child::Token(t) => self.tree.tokens[t as usize].range,
        }
    }

    fn close(&mut self, bind_trailing_comments: bool) {
        let Some(id) = self.stack.pop() else {
            return;
        };
        let children = &self.tree.nodes[id.0 as usize].children;
        let mut filled = children
            .iter()
            .map(|&c| self.child_range(c))
            .filter(|r| !r.is_empty());
        let mut range = match filled.next() {
            Some(first) => {
                let end = filled.last().map_or(first.end, |r| r.end);
                TextRange::new(first.start, end)
            }
            None => {
                let anchor = children
                    .first()
                    .map(|&c| self.child_range(c).start)
                    .unwrap_or_else(|| self.next_token_start());
                TextRange::empty(anchor)
            }
        };

        if bind_trailing_comments {
            let limit = self.next_token_start();
            let from = self.comments.partition_point(|c| c.start < range.end);
            for comment in &self.comments[from..] {
                if comment.end > limit {
                    break;
                }
                range.end = comment.end;
            }
        }
        self.tree.nodes[id.0 as usize].range = range;
    }

    fn token(&mut self, kind: TokenKind) {
        let Some(raw) = self.tokens.get(self.cursor) else {
            return;
        };
        self.cursor += 1;
        let idx = self.tree.tokens.len() as u32;
        self.tree.tokens.push(TokenData {
            kind,
            range: raw.range,
        });
        if let Some(&top) = self.stack.last() {
            self.tree.nodes[top.0 as usize].children.push(Child::Token(idx));
        }
    }

    fn error(&mut self, message: String, at_token: Option<usize>) {
        let offset = match at_token {
            Some(idx) => self
                .tokens
                .get(idx)
                .map_or_else(|| self.next_token_start(), |t| t.range.start),
            None => self.next_token_start(),
        };
        self.tree.errors.push(SyntaxError { message, offset });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(kind: TokenKind, start: u32, end: u32) -> Token {
        Token {
            kind,
            range: TextRange::new(start, end),
        }
    }

    fn open(kind: NodeKind) -> Event {
        Event::Open {
            kind: Some(kind),
            forward_parent: None,
        }
    }

    fn close() -> Event {
        Event::Close {
            bind_trailing_comments: false,
        }
    }

    #[test]
    fn test_forward_parent_wraps_earlier_node() {
        // `a.b`: Reference(a) is preceded by Reference(a.b).
        let tokens = [
            tok(TokenKind::Identifier, 0, 1),
            tok(TokenKind::Dot, 1, 2),
            tok(TokenKind::Identifier, 2, 3),
            tok(TokenKind::Eof, 3, 3),
        ];
        let events = vec![
            open(NodeKind::File),
            Event::Open {
                kind: Some(NodeKind::ReferenceExpression),
                forward_parent: Some(3),
            },
            Event::Token {
                kind: TokenKind::Identifier,
            },
            close(),
            open(NodeKind::ReferenceExpression),
            Event::Token { kind: TokenKind::Dot },
            Event::Token {
                kind: TokenKind::Identifier,
            },
            close(),
            close(),
        ];
        let tree = build_tree(events, &tokens, &[], 3);
        let outer = tree.child_nodes(tree.root()).next().unwrap();
        assert_eq!(tree.range(outer), TextRange::new(0, 3));
        let inner = tree.child_nodes(outer).next().unwrap();
        assert_eq!(tree.range(inner), TextRange::new(0, 1));
        assert_eq!(tree.parent(inner), Some(outer));
    }

    #[test]
    fn test_discarded_marker_leaves_children_with_parent() {
        let tokens = [tok(TokenKind::PassKeyword, 0, 4), tok(TokenKind::Eof, 4, 4)];
        let events = vec![
            open(NodeKind::File),
            Event::Open {
                kind: None,
                forward_parent: None,
            },
            Event::Token {
                kind: TokenKind::PassKeyword,
            },
            close(),
        ];
        let tree = build_tree(events, &tokens, &[], 4);
        assert_eq!(tree.nodes.len(), 1);
        assert_eq!(tree.child_tokens(tree.root()).count(), 1);
    }

    #[test]
    fn test_empty_node_anchors_at_next_token() {
        let tokens = [tok(TokenKind::Identifier, 2, 3), tok(TokenKind::Eof, 3, 3)];
        let events = vec![
            open(NodeKind::File),
            open(NodeKind::ArgumentList),
            close(),
            close(),
        ];
        let tree = build_tree(events, &tokens, &[], 3);
        let args = tree.child_nodes(tree.root()).next().unwrap();
        assert_eq!(tree.range(args), TextRange::empty(2));
    }

    #[test]
    fn test_error_offset_is_next_token() {
        let tokens = [tok(TokenKind::Identifier, 0, 1), tok(TokenKind::Eof, 5, 5)];
        let events = vec![
            open(NodeKind::File),
            Event::Token {
                kind: TokenKind::Identifier,
            },
            Event::Error {
                message: "Colon expected".into(),
                at_token: None,
            },
            close(),
        ];
        let tree = build_tree(events, &tokens, &[], 5);
        assert_eq!(tree.errors[0].offset, 5);
        assert_eq!(tree.range(tree.root()), TextRange::new(0, 5));
    }

    #[test]
    fn test_block_binds_trailing_comments() {
        // "x\n# c\ny"
        let tokens = [
            tok(TokenKind::Identifier, 0, 1),
            tok(TokenKind::StatementBreak, 1, 2),
            tok(TokenKind::Identifier, 6, 7),
            tok(TokenKind::Eof, 7, 7),
        ];
        let comments = [TextRange::new(2, 5)];
        let mut events = vec![
            open(NodeKind::File),
            open(NodeKind::StatementList),
            Event::Token {
                kind: TokenKind::Identifier,
            },
            Event::Token {
                kind: TokenKind::StatementBreak,
            },
            Event::Close {
                bind_trailing_comments: true,
            },
        ];
        events.push(Event::Token {
            kind: TokenKind::Identifier,
        });
        events.push(close());
        let tree = build_tree(events, &tokens, &comments, 7);
        let block = tree.child_nodes(tree.root()).next().unwrap();
        assert_eq!(tree.range(block), TextRange::new(0, 5));
    }

    #[test]
    fn test_rollback_unlinks_only_cut_precedes() {
        use crate::parsing::context::ParsingContext;
        use crate::parsing::lexer::tokenize;

        let src = "a.b = c\n";
        let mut p = Parser::new(src, tokenize(src).tokens, &ParsingContext::default());
        let outer = p.mark();
        let head = p.mark();
        p.bump();
        let kept = head.commit(&mut p, NodeKind::ReferenceExpression);
        let wrapper = kept.precede(&mut p);
        wrapper.commit(&mut p, NodeKind::ReferenceExpression);

        let speculative = p.mark();
        p.bump();
        let inner = p.mark();
        p.bump();
        let done = inner.commit(&mut p, NodeKind::ReferenceExpression);
        done.precede(&mut p).discard(&mut p);
        assert_eq!(p.preceded.len(), 2);

        speculative.rollback(&mut p);
        assert_eq!(p.preceded.len(), 1);
        assert_eq!(p.current(), TokenKind::Dot);
        assert!(matches!(
            p.events[1],
            Event::Open {
                forward_parent: Some(_),
                ..
            }
        ));
        outer.discard(&mut p);
    }
}
