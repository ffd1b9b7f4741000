//! Arena-backed concrete syntax tree.
//!
//! Nodes own an ordered list of children, each either another node or a
//! token.  Every consumed token appears exactly once, so the tree's leaves
//! in order reproduce the significant tokens of the source.

use crate::location::TextRange;
use crate::parsing::tokens::TokenKind;
use serde::Serialize;
use std::fmt::{self, Write as _};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    File,
    StatementList,
    Error,

    // ── Simple statements ──
    ExpressionStatement,
    AssignmentStatement,
    AugAssignmentStatement,
    PrintStatement,
    PrintTarget,
    AssertStatement,
    BreakStatement,
    ContinueStatement,
    DelStatement,
    ExecStatement,
    GlobalStatement,
    NonlocalStatement,
    ImportStatement,
    FromImportStatement,
    ImportElement,
    StarImportElement,
    PassStatement,
    ReturnStatement,
    RaiseStatement,

    // ── Compound statements ──
    IfStatement,
    IfPartIf,
    IfPartElif,
    ElsePart,
    ForStatement,
    ForPart,
    WhileStatement,
    WhilePart,
    TryExceptStatement,
    TryPart,
    ExceptPart,
    FinallyPart,
    WithStatement,
    WithItem,
    ClassDeclaration,

    // ── Functions ──
    FunctionDeclaration,
    ParameterList,
    NamedParameter,
    TupleParameter,
    SingleStarParameter,
    Annotation,
    DecoratorList,
    Decorator,
    ArgumentList,
    KeywordArgument,
    StarArgument,

    // ── Expressions ──
    ReferenceExpression,
    TargetExpression,
    IntegerLiteral,
    FloatLiteral,
    ImaginaryLiteral,
    EllipsisLiteral,
    StringLiteral,
    NoneLiteral,
    BoolLiteral,
    TupleExpression,
    ListLiteral,
    DictLiteral,
    SetLiteral,
    KeyValue,
    ParenthesizedExpression,
    CallExpression,
    SubscriptionExpression,
    SliceExpression,
    SliceItem,
    BinaryExpression,
    PrefixExpression,
    ConditionalExpression,
    LambdaExpression,
    YieldExpression,
    ListCompExpression,
    GeneratorExpression,
    DictCompExpression,
    SetCompExpression,
    ReprExpression,
    StarExpression,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Child {
    Node(NodeId),
    /// Index into [`SyntaxTree::tokens`].
    Token(u32),
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeData {
    pub kind: NodeKind,
    pub range: TextRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    pub children: Vec<Child>,
}

/// A consumed token with its effective (reclassified) kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenData {
    pub kind: TokenKind,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxError {
    pub message: String,
    /// Byte offset of the token the parser was looking at.
    pub offset: u32,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.offset, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyntaxTree {
    pub nodes: Vec<NodeData>,
    pub tokens: Vec<TokenData>,
    pub errors: Vec<SyntaxError>,
}

impl SyntaxTree {
    pub const ROOT: NodeId = NodeId(0);

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0 as usize]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    pub fn range(&self, id: NodeId) -> TextRange {
        self.node(id).range
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn text<'a>(&self, id: NodeId, src: &'a str) -> &'a str {
        src.get(std::ops::Range::from(self.range(id))).unwrap_or("")
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Direct child nodes, skipping tokens.
    pub fn child_nodes(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).children.iter().filter_map(|c| match *c {
            Child::Node(n) => Some(n),
            Child::Token(_) => None,
        })
    }

    /// Direct child tokens, skipping nodes.
    pub fn child_tokens(&self, id: NodeId) -> impl Iterator<Item = TokenData> + '_ {
        self.node(id).children.iter().filter_map(|c| match *c {
            Child::Token(t) => Some(self.tokens[t as usize]),
            Child::Node(_) => None,
        })
    }

    /// `id` and all nodes below it, in pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.child_nodes(n).collect::<Vec<_>>().into_iter().rev());
        }
        out
    }

    /// Every node of `kind`, in pre-order.
    pub fn find_all(&self, kind: NodeKind) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|&n| self.kind(n) == kind)
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// Indented, human-readable rendering: one line per node and token,
    /// then the error list.
    pub fn debug_dump(&self, src: &str) -> String {
        let mut out = String::new();
        if !self.nodes.is_empty() {
            self.dump_node(self.root(), src, 0, &mut out);
        }
        for error in &self.errors {
            let _ = writeln!(out, "error@{}: {}", error.offset, error.message);
        }
        out
    }

    fn dump_node(&self, id: NodeId, src: &str, depth: usize, out: &mut String) {
        let node = self.node(id);
        let _ = writeln!(out, "{:indent$}{}@{}", "", node.kind, node.range, indent = depth * 2);
        for child in &node.children {
            match *child {
                Child::Node(n) => self.dump_node(n, src, depth + 1, out),
                Child::Token(t) => {
                    let token = self.tokens[t as usize];
                    let text = src.get(std::ops::Range::from(token.range)).unwrap_or("");
                    let _ = writeln!(
                        out,
                        "{:indent$}{:?}@{} {:?}",
                        "",
                        token.kind,
                        token.range,
                        text,
                        indent = (depth + 1) * 2
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> SyntaxTree {
        // File { PassStatement { 'pass' } }
        SyntaxTree {
            nodes: vec![
                NodeData {
                    kind: NodeKind::File,
                    range: TextRange::new(0, 5),
                    parent: None,
                    children: vec![Child::Node(NodeId(1))],
                },
                NodeData {
                    kind: NodeKind::PassStatement,
                    range: TextRange::new(0, 4),
                    parent: Some(NodeId(0)),
                    children: vec![Child::Token(0)],
                },
            ],
            tokens: vec![TokenData {
                kind: TokenKind::PassKeyword,
                range: TextRange::new(0, 4),
            }],
            errors: vec![SyntaxError {
                message: "oops".into(),
                offset: 4,
            }],
        }
    }

    #[test]
    fn test_navigation() {
        let tree = tiny();
        let pass = tree.child_nodes(tree.root()).next().unwrap();
        assert_eq!(tree.kind(pass), NodeKind::PassStatement);
        assert_eq!(tree.parent(pass), Some(SyntaxTree::ROOT));
        assert_eq!(tree.text(pass, "pass\n"), "pass");
        assert_eq!(tree.find_all(NodeKind::PassStatement), vec![pass]);
        assert_eq!(tree.child_tokens(pass).count(), 1);
    }

    #[test]
    fn test_debug_dump_layout() {
        let tree = tiny();
        let dump = tree.debug_dump("pass\n");
        assert_eq!(
            dump,
            "File@0..5\n  PassStatement@0..4\n    PassKeyword@0..4 \"pass\"\nerror@4: oops\n"
        );
    }

    #[test]
    fn test_serializes_to_json() {
        let json = tiny().to_json().unwrap();
        assert_eq!(json["nodes"][1]["kind"], "PassStatement");
        assert_eq!(json["nodes"][0]["children"][0]["node"], 1);
        assert_eq!(json["errors"][0]["offset"], 4);
    }
}
