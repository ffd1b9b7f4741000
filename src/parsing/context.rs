//! Per-file parsing configuration and the small amount of state that the
//! statement parser threads through recursive calls.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ── Language level ────────────────────────────────────────────────────────────

/// Python dialect the source is parsed as.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum LanguageLevel {
    #[serde(rename = "2.4")]
    Python24,
    #[serde(rename = "2.5")]
    Python25,
    #[serde(rename = "2.6")]
    Python26,
    #[default]
    #[serde(rename = "2.7")]
    Python27,
    #[serde(rename = "3.0")]
    Python30,
    #[serde(rename = "3.1")]
    Python31,
}

impl LanguageLevel {
    pub const ALL: [LanguageLevel; 6] = [
        LanguageLevel::Python24,
        LanguageLevel::Python25,
        LanguageLevel::Python26,
        LanguageLevel::Python27,
        LanguageLevel::Python30,
        LanguageLevel::Python31,
    ];

    /// `with` is a keyword without a `__future__` import from 2.6 on.
    pub fn has_with_statement(self) -> bool {
        self >= LanguageLevel::Python26
    }

    pub fn has_print_statement(self) -> bool {
        self < LanguageLevel::Python30
    }

    pub fn is_py3k(self) -> bool {
        self >= LanguageLevel::Python30
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LanguageLevel::Python24 => "2.4",
            LanguageLevel::Python25 => "2.5",
            LanguageLevel::Python26 => "2.6",
            LanguageLevel::Python27 => "2.7",
            LanguageLevel::Python30 => "3.0",
            LanguageLevel::Python31 => "3.1",
        }
    }
}

impl fmt::Display for LanguageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageLevel {
    type Err = ConfigError;

    /// Accepts `2.7`, `27`, `py27`, `python2.7`, and a bare major version
    /// (`2`, `3`) meaning the newest supported release of that line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let lower = raw.to_ascii_lowercase();
        let digits: String = lower
            .trim_start_matches("python")
            .trim_start_matches("py")
            .chars()
            .filter(|c| *c != '.')
            .collect();
        let level = match digits.as_str() {
            "24" => LanguageLevel::Python24,
            "25" => LanguageLevel::Python25,
            "26" => LanguageLevel::Python26,
            "27" | "2" => LanguageLevel::Python27,
            "30" => LanguageLevel::Python30,
            "31" | "3" => LanguageLevel::Python31,
            _ => return Err(ConfigError::UnknownLanguageLevel(raw.to_string())),
        };
        Ok(level)
    }
}

// ── Future features ───────────────────────────────────────────────────────────

/// A `from __future__ import …` feature name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FutureFeature {
    AbsoluteImport,
    Division,
    Generators,
    NestedScopes,
    WithStatement,
    PrintFunction,
}

impl FutureFeature {
    pub const ALL: [FutureFeature; 6] = [
        FutureFeature::AbsoluteImport,
        FutureFeature::Division,
        FutureFeature::Generators,
        FutureFeature::NestedScopes,
        FutureFeature::WithStatement,
        FutureFeature::PrintFunction,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FutureFeature::AbsoluteImport => "absolute_import",
            FutureFeature::Division => "division",
            FutureFeature::Generators => "generators",
            FutureFeature::NestedScopes => "nested_scopes",
            FutureFeature::WithStatement => "with_statement",
            FutureFeature::PrintFunction => "print_function",
        }
    }

    /// Features whose import changes how later tokens are classified, and
    /// which the parser therefore records.
    pub fn from_import_name(name: &str) -> Option<Self> {
        match name {
            "with_statement" => Some(FutureFeature::WithStatement),
            "nested_scopes" => Some(FutureFeature::NestedScopes),
            "print_function" => Some(FutureFeature::PrintFunction),
            _ => None,
        }
    }
}

impl fmt::Display for FutureFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FutureFeature {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        FutureFeature::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownFutureFeature(s.to_string()))
    }
}

/// The set of future features in effect.  Only ever grows during a parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FutureFlags(BTreeSet<FutureFeature>);

impl FutureFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, feature: FutureFeature) -> bool {
        self.0.contains(&feature)
    }

    pub fn insert(&mut self, feature: FutureFeature) {
        self.0.insert(feature);
    }
}

/// Where the parser is inside a `from __future__ import …` statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FuturePhase {
    #[default]
    None,
    /// `from` has been seen; the next name may be `__future__`.
    From,
    /// `__future__` has been seen.
    Future,
    /// `import` after `__future__` has been seen.
    Import,
}

// ── Context and scope ─────────────────────────────────────────────────────────

/// Configuration supplied by the caller for one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingContext {
    pub language_level: LanguageLevel,
    /// Features treated as already imported before the first line.
    pub futures: FutureFlags,
}

impl ParsingContext {
    pub fn new(language_level: LanguageLevel) -> Self {
        Self {
            language_level,
            futures: FutureFlags::new(),
        }
    }

    pub fn with_future(mut self, feature: FutureFeature) -> Self {
        self.futures.insert(feature);
        self
    }
}

/// Syntactic position of the statement being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParsingScope {
    /// Inside a single-line suite (`if x: a; b`).
    pub in_suite: bool,
    /// Inside a class body.
    pub in_class: bool,
}

impl ParsingScope {
    pub fn with_suite(self, in_suite: bool) -> Self {
        Self { in_suite, ..self }
    }

    pub fn with_class(self, in_class: bool) -> Self {
        Self { in_class, ..self }
    }
}
