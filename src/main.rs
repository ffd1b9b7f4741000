use clap::{CommandFactory, Parser};
use colored::Colorize;
use pysyntax::driver::{self, FileReport};
use pysyntax::{ConfigError, FutureFeature, LanguageLevel, ParsingContext, discovery};
use serde_json::json;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    name = "pysyntax",
    about = "Fault-tolerant Python syntax checker",
    version,
    long_about = "pysyntax parses Python 2.4 to 3.1 sources into concrete syntax trees, \
                  recovering from errors, and reports every syntax error it finds."
)]
struct Cli {
    /// Files or directories to parse.
    #[arg()]
    paths: Vec<PathBuf>,

    /// Python language level, e.g. 2.5, py27 or 3.
    #[arg(long, default_value = "2.7")]
    language_level: String,

    /// Comma-separated `__future__` features enabled from the first line
    /// (e.g. --future print_function,with_statement).
    #[arg(long, value_delimiter = ',')]
    future: Option<Vec<String>>,

    /// Skip directories or files with any of these comma-separated names.
    /// Hidden, virtual-environment and cache directories are always skipped.
    #[arg(long, value_delimiter = ',')]
    exclude: Option<Vec<String>>,

    /// Emit results as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Also print the syntax tree of every file.
    #[arg(long)]
    tree: bool,

    /// Exit with code 0 even when syntax errors are found.
    #[arg(long)]
    no_exit_code: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.paths.is_empty() {
        let _ = Cli::command().print_help();
        return;
    }

    let context = match build_context(&cli.language_level, cli.future.as_deref().unwrap_or_default()) {
        Ok(c) => c,
        Err(e) => fail(e),
    };
    let exclude: Vec<String> = cli.exclude.unwrap_or_default();

    // ── file discovery ────────────────────────────────────────────────────────
    let mut files = Vec::new();
    for path in &cli.paths {
        if path.is_file() {
            files.push(path.clone());
        } else {
            match discovery::discover_python_files(path, &exclude) {
                Ok(found) => files.extend(found),
                Err(e) => fail(format!("{e:#}")),
            }
        }
    }

    // ── parsing ───────────────────────────────────────────────────────────────
    let reports = match driver::parse_files(&files, &context) {
        Ok(r) => r,
        Err(e) => fail(format!("{e:#}")),
    };

    let error_count: usize = reports.iter().map(|r| r.diagnostics.len()).sum();
    let files_with_errors = reports.iter().filter(|r| r.has_errors()).count();

    // ── output ────────────────────────────────────────────────────────────────
    if cli.json {
        print_json(&reports, cli.tree, error_count);
    } else {
        for report in &reports {
            if cli.tree {
                println!("{}", format!("── {} ──", report.file).bold());
                print!("{}", report.tree.debug_dump(&report.source));
            }
            for d in &report.diagnostics {
                println!("{d}");
            }
        }
        if error_count == 0 {
            println!("{}", "No syntax errors found".green());
        } else {
            println!(
                "{}",
                format!("Found {error_count} syntax error(s) in {files_with_errors} file(s)")
                    .yellow()
                    .bold()
            );
        }
    }

    if !cli.no_exit_code && error_count > 0 {
        process::exit(1);
    }
}

fn build_context(level: &str, futures: &[String]) -> Result<ParsingContext, ConfigError> {
    let mut context = ParsingContext::new(level.parse::<LanguageLevel>()?);
    for name in futures {
        context = context.with_future(name.trim().parse::<FutureFeature>()?);
    }
    Ok(context)
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}: {message}", "error".red().bold());
    process::exit(2);
}

fn print_json(reports: &[FileReport], with_tree: bool, count: usize) {
    let files: Vec<serde_json::Value> = reports
        .iter()
        .map(|r| {
            let mut entry = json!({
                "file":   r.file,
                "errors": r.diagnostics,
            });
            if with_tree {
                entry["tree"] = r.tree.to_json().unwrap_or(serde_json::Value::Null);
            }
            entry
        })
        .collect();

    let output = json!({
        "files": files,
        "count": count,
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&output).unwrap_or_else(|e| fail(e))
    );
}
