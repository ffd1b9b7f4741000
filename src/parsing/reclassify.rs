//! Soft-keyword reclassification.
//!
//! Whether `with`, `as`, `print` and friends are keywords depends on the
//! language level, on `__future__` imports seen so far, and on the parser's
//! position in the statement.  The decision is made fresh each time the
//! parser looks at an identifier and is never written back to the token.

use crate::parsing::context::{FutureFeature, FutureFlags, FuturePhase, LanguageLevel};
use crate::parsing::tokens::TokenKind;

/// Inputs to [`reclassify`].  Owned by the token stream.
#[derive(Debug, Clone, Default)]
pub struct ReclassifyState {
    pub level: LanguageLevel,
    pub futures: FutureFlags,
    pub phase: FuturePhase,
    /// An `as` is syntactically expected at this point (import or except).
    pub expect_as: bool,
}

/// Outcome of looking at an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reclassified {
    Unchanged,
    Keyword(TokenKind),
    /// `__future__` seen right after `from`; the stream moves to
    /// [`FuturePhase::Future`].
    EnterFuture,
}

/// Decide the effective kind of the identifier `text`.  Rules apply in
/// order and the first match wins.
pub fn reclassify(state: &ReclassifyState, text: &str) -> Reclassified {
    let level = state.level;
    match text {
        "as" if state.expect_as || level.has_with_statement() => {
            Reclassified::Keyword(TokenKind::AsKeyword)
        }
        "__future__" if state.phase == FuturePhase::From => Reclassified::EnterFuture,
        "with"
            if level.has_with_statement()
                || state.futures.contains(FutureFeature::WithStatement) =>
        {
            Reclassified::Keyword(TokenKind::WithKeyword)
        }
        "print"
            if level.has_print_statement()
                && !state.futures.contains(FutureFeature::PrintFunction) =>
        {
            Reclassified::Keyword(TokenKind::PrintKeyword)
        }
        _ if level.is_py3k() => match text {
            "None" => Reclassified::Keyword(TokenKind::NoneKeyword),
            "True" => Reclassified::Keyword(TokenKind::TrueKeyword),
            "False" => Reclassified::Keyword(TokenKind::FalseKeyword),
            "__debug__" => Reclassified::Keyword(TokenKind::DebugKeyword),
            "nonlocal" => Reclassified::Keyword(TokenKind::NonlocalKeyword),
            _ => Reclassified::Unchanged,
        },
        "exec" => Reclassified::Keyword(TokenKind::ExecKeyword),
        _ => Reclassified::Unchanged,
    }
}
