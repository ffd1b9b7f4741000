pub mod diagnostics;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod location;
pub mod parsing;

pub use error::ConfigError;
pub use parsing::{
    FutureFeature, LanguageLevel, NodeKind, ParsingContext, SyntaxTree, parse_module,
};
