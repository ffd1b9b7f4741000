//! Collect Python sources (`.py` and `.pyi`) under a directory.
//!
//! The walk honours `.gitignore` / `.ignore`, skips hidden entries, and
//! never descends into the environment and cache directories named in
//! [`ALWAYS_EXCLUDE`].  Callers may add further directory or file names to
//! skip.

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::path::{Component, Path, PathBuf};

const PYTHON_EXTENSIONS: &[&str] = &["py", "pyi"];

/// Directory names skipped even when they are neither hidden nor ignored.
const ALWAYS_EXCLUDE: &[&str] = &[
    "venv",
    "env",
    "virtualenv",
    "__pycache__",
    "site-packages",
    "build",
    "dist",
    "node_modules",
];

/// Every Python source reachable from `root`, sorted by path.
///
/// A component of the path equal to one of `exclude` drops the entry.
pub fn discover_python_files(root: &Path, exclude: &[String]) -> Result<Vec<PathBuf>> {
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .require_git(false)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        if is_python_source(path) && !is_excluded(path, exclude) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

fn is_python_source(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| PYTHON_EXTENSIONS.contains(&ext))
}

fn is_excluded(path: &Path, exclude: &[String]) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => {
            let name = name.to_string_lossy();
            ALWAYS_EXCLUDE.contains(&name.as_ref()) || exclude.iter().any(|ex| *ex == name)
        }
        _ => false,
    })
}
