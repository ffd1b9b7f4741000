//! Parse a batch of files in parallel and resolve their errors to
//! line/column diagnostics.

use crate::diagnostics::Diagnostic;
use crate::location::LineIndex;
use crate::parsing::{ParsingContext, SyntaxTree, parse_module};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// One parsed file.  `source` is kept so callers can render the tree.
#[derive(Debug)]
pub struct FileReport {
    pub file: String,
    pub source: String,
    pub tree: SyntaxTree,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileReport {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Parse every file in `files`.  Fails on the first file that cannot be
/// read; reports come back sorted by path.
pub fn parse_files(files: &[PathBuf], context: &ParsingContext) -> Result<Vec<FileReport>> {
    let mut reports = files
        .par_iter()
        .map(|path| parse_file(path, context))
        .collect::<Result<Vec<_>>>()?;
    reports.sort_by(|a, b| a.file.cmp(&b.file));
    Ok(reports)
}

pub fn parse_file(path: &Path, context: &ParsingContext) -> Result<FileReport> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file = path.to_string_lossy().to_string();
    Ok(parse_source(file, source, context))
}

/// Parse in-memory `source` as though it were read from `file`.
pub fn parse_source(file: String, source: String, context: &ParsingContext) -> FileReport {
    let tree = parse_module(&source, context);
    let index = LineIndex::new(&source);
    let diagnostics = tree
        .errors
        .iter()
        .map(|error| {
            let (line, col) = index.line_col(error.offset as usize);
            Diagnostic {
                file: file.clone(),
                line,
                col,
                message: error.message.clone(),
            }
        })
        .collect();
    FileReport {
        file,
        source,
        tree,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{FutureFeature, LanguageLevel};
    use tempfile::TempDir;

    fn report(src: &str) -> FileReport {
        parse_source("t.py".to_string(), src.to_string(), &ParsingContext::default())
    }

    #[test]
    fn test_clean_source_has_no_diagnostics() {
        let r = report("import os\nprint os.sep\n");
        assert!(!r.has_errors());
    }

    #[test]
    fn test_error_position_is_one_based() {
        let r = report("x = 1\nif x\n    pass\n");
        let d = &r.diagnostics[0];
        assert_eq!(d.message, "Colon expected");
        assert_eq!((d.line, d.col), (2, 5));
    }

    #[test]
    fn test_context_is_applied() {
        let src = "print(1, file=f)\n";
        assert!(report(src).has_errors());
        let ctx = ParsingContext::new(LanguageLevel::Python27).with_future(FutureFeature::PrintFunction);
        let r = parse_source("t.py".into(), src.into(), &ctx);
        assert!(!r.has_errors(), "{:?}", r.diagnostics);
    }

    #[test]
    fn test_files_sorted_by_path() {
        let dir = TempDir::new().unwrap();
        let b = dir.path().join("b.py");
        let a = dir.path().join("a.py");
        fs::write(&b, "x = (\n").unwrap();
        fs::write(&a, "x = 1\n").unwrap();

        let reports = parse_files(&[b, a], &ParsingContext::default()).unwrap();
        assert!(reports[0].file.ends_with("a.py"));
        assert!(reports[1].file.ends_with("b.py"));
        assert!(!reports[0].has_errors());
        assert!(reports[1].has_errors());
    }

    #[test]
    fn test_missing_file_names_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.py");
        let err = parse_files(&[missing], &ParsingContext::default()).unwrap_err();
        assert!(format!("{err:#}").contains("nope.py"));
    }
}
