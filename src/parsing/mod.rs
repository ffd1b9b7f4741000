//! Fault-tolerant Python statement parser.
//!
//! Pipeline: [`lexer`] turns source into tokens with indentation and
//! statement breaks resolved, [`stream`] reclassifies soft keywords on the
//! fly, the grammar in [`parser`] and its sibling files records builder
//! events, and [`builder`] folds those events into a [`SyntaxTree`].

pub mod builder;
pub mod context;
mod expressions;
mod functions;
pub mod lexer;
pub mod parser;
pub mod reclassify;
mod statements;
pub mod stream;
pub mod tokens;
pub mod tree;

pub use context::{FutureFeature, FutureFlags, LanguageLevel, ParsingContext, ParsingScope};
pub use parser::{Parser, parse_module};
pub use tokens::TokenKind;
pub use tree::{NodeId, NodeKind, SyntaxError, SyntaxTree};
