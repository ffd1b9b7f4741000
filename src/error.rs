use thiserror::Error;

/// Errors raised while turning command-line or config strings into a
/// [`ParsingContext`](crate::parsing::ParsingContext).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown language level '{0}' (expected one of 2.4, 2.5, 2.6, 2.7, 3.0, 3.1)")]
    UnknownLanguageLevel(String),

    #[error("unknown __future__ feature '{0}'")]
    UnknownFutureFeature(String),
}
