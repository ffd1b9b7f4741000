//! Token kinds produced by the lexer and consumed by the parser.

use crate::location::TextRange;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Literals
    Identifier,
    Integer,
    Float,
    Imaginary,
    /// Any string literal, prefix and delimiters included.
    String,

    // Structural
    StatementBreak,
    Indent,
    Dedent,
    /// An unindent that matches no enclosing indentation level.
    InconsistentDedent,
    Eof,

    // Hard keywords, always reserved regardless of language level.
    AndKeyword,
    AssertKeyword,
    BreakKeyword,
    ClassKeyword,
    ContinueKeyword,
    DefKeyword,
    DelKeyword,
    ElifKeyword,
    ElseKeyword,
    ExceptKeyword,
    FinallyKeyword,
    ForKeyword,
    FromKeyword,
    GlobalKeyword,
    IfKeyword,
    ImportKeyword,
    InKeyword,
    IsKeyword,
    LambdaKeyword,
    NotKeyword,
    OrKeyword,
    PassKeyword,
    RaiseKeyword,
    ReturnKeyword,
    TryKeyword,
    WhileKeyword,
    YieldKeyword,

    // Soft keywords.  The lexer never produces these; they are promoted
    // from `Identifier` by the reclassifier.
    AsKeyword,
    WithKeyword,
    PrintKeyword,
    NoneKeyword,
    TrueKeyword,
    FalseKeyword,
    DebugKeyword,
    NonlocalKeyword,
    ExecKeyword,

    // Operators
    Plus,     // +
    Minus,    // -
    Mult,     // *
    Exp,      // **
    Div,      // /
    FloorDiv, // //
    Perc,     // %
    LtLt,     // <<
    GtGt,     // >>
    And,      // &
    Or,       // |
    Xor,      // ^
    Tilde,    // ~
    Lt,       // <
    Gt,       // >
    Le,       // <=
    Ge,       // >=
    EqEq,     // ==
    Ne,       // !=
    NeOld,    // <>
    At,       // @

    // Delimiters
    LPar,
    RPar,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Dot,
    Semicolon,
    Eq,
    Backtick,
    RArrow, // ->

    // Augmented assignment
    PlusEq,
    MinusEq,
    MultEq,
    AtEq,
    DivEq,
    FloorDivEq,
    PercEq,
    AndEq,
    OrEq,
    XorEq,
    LtLtEq,
    GtGtEq,
    ExpEq,

    BadCharacter,
}

impl TokenKind {
    pub fn is_aug_assign(self) -> bool {
        matches!(
            self,
            TokenKind::PlusEq
                | TokenKind::MinusEq
                | TokenKind::MultEq
                | TokenKind::AtEq
                | TokenKind::DivEq
                | TokenKind::FloorDivEq
                | TokenKind::PercEq
                | TokenKind::AndEq
                | TokenKind::OrEq
                | TokenKind::XorEq
                | TokenKind::LtLtEq
                | TokenKind::GtGtEq
                | TokenKind::ExpEq
        )
    }

    /// Tokens that terminate a simple statement.
    pub fn is_end_of_statement(self) -> bool {
        matches!(
            self,
            TokenKind::StatementBreak | TokenKind::Semicolon | TokenKind::Eof
        )
    }

    /// Comparison operators other than the keyword forms (`in`, `not in`,
    /// `is`, `is not`).
    pub fn is_comparison_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::Le
                | TokenKind::Ge
                | TokenKind::EqEq
                | TokenKind::Ne
                | TokenKind::NeOld
        )
    }

    /// Human-readable name used in "found …" error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Integer => "integer literal",
            TokenKind::Float => "float literal",
            TokenKind::Imaginary => "imaginary literal",
            TokenKind::String => "string literal",
            TokenKind::StatementBreak => "statement break",
            TokenKind::Indent => "indent",
            TokenKind::Dedent => "dedent",
            TokenKind::InconsistentDedent => "inconsistent dedent",
            TokenKind::Eof => "end of file",
            TokenKind::AndKeyword => "'and'",
            TokenKind::AssertKeyword => "'assert'",
            TokenKind::BreakKeyword => "'break'",
            TokenKind::ClassKeyword => "'class'",
            TokenKind::ContinueKeyword => "'continue'",
            TokenKind::DefKeyword => "'def'",
            TokenKind::DelKeyword => "'del'",
            TokenKind::ElifKeyword => "'elif'",
            TokenKind::ElseKeyword => "'else'",
            TokenKind::ExceptKeyword => "'except'",
            TokenKind::FinallyKeyword => "'finally'",
            TokenKind::ForKeyword => "'for'",
            TokenKind::FromKeyword => "'from'",
            TokenKind::GlobalKeyword => "'global'",
            TokenKind::IfKeyword => "'if'",
            TokenKind::ImportKeyword => "'import'",
            TokenKind::InKeyword => "'in'",
            TokenKind::IsKeyword => "'is'",
            TokenKind::LambdaKeyword => "'lambda'",
            TokenKind::NotKeyword => "'not'",
            TokenKind::OrKeyword => "'or'",
            TokenKind::PassKeyword => "'pass'",
            TokenKind::RaiseKeyword => "'raise'",
            TokenKind::ReturnKeyword => "'return'",
            TokenKind::TryKeyword => "'try'",
            TokenKind::WhileKeyword => "'while'",
            TokenKind::YieldKeyword => "'yield'",
            TokenKind::AsKeyword => "'as'",
            TokenKind::WithKeyword => "'with'",
            TokenKind::PrintKeyword => "'print'",
            TokenKind::NoneKeyword => "'None'",
            TokenKind::TrueKeyword => "'True'",
            TokenKind::FalseKeyword => "'False'",
            TokenKind::DebugKeyword => "'__debug__'",
            TokenKind::NonlocalKeyword => "'nonlocal'",
            TokenKind::ExecKeyword => "'exec'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Mult => "'*'",
            TokenKind::Exp => "'**'",
            TokenKind::Div => "'/'",
            TokenKind::FloorDiv => "'//'",
            TokenKind::Perc => "'%'",
            TokenKind::LtLt => "'<<'",
            TokenKind::GtGt => "'>>'",
            TokenKind::And => "'&'",
            TokenKind::Or => "'|'",
            TokenKind::Xor => "'^'",
            TokenKind::Tilde => "'~'",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::Le => "'<='",
            TokenKind::Ge => "'>='",
            TokenKind::EqEq => "'=='",
            TokenKind::Ne => "'!='",
            TokenKind::NeOld => "'<>'",
            TokenKind::At => "'@'",
            TokenKind::LPar => "'('",
            TokenKind::RPar => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::Dot => "'.'",
            TokenKind::Semicolon => "';'",
            TokenKind::Eq => "'='",
            TokenKind::Backtick => "'`'",
            TokenKind::RArrow => "'->'",
            TokenKind::PlusEq => "'+='",
            TokenKind::MinusEq => "'-='",
            TokenKind::MultEq => "'*='",
            TokenKind::AtEq => "'@='",
            TokenKind::DivEq => "'/='",
            TokenKind::FloorDivEq => "'//='",
            TokenKind::PercEq => "'%='",
            TokenKind::AndEq => "'&='",
            TokenKind::OrEq => "'|='",
            TokenKind::XorEq => "'^='",
            TokenKind::LtLtEq => "'<<='",
            TokenKind::GtGtEq => "'>>='",
            TokenKind::ExpEq => "'**='",
            TokenKind::BadCharacter => "bad character",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A lexed token.  Text is recovered by slicing the source with `range`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
}
