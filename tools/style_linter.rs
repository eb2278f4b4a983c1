/// Style Linter — validates story style files.
///
/// Usage: style_linter <path>... (RON files or directories of them)

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;

use story_weaver::schema::style::{LintReport, StoryStyle};

#[derive(Parser, Debug)]
#[command(name = "style_linter", about = "Validate story style files")]
struct Cli {
    /// Style files or directories to check
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Warn when a slot has fewer phrases than this
    #[arg(long, default_value_t = 3)]
    min_phrases: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut files = Vec::new();
    for path in &cli.paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            collect_ron_files(path, &mut files);
        } else {
            eprintln!("ERROR: Path '{}' does not exist", path.display());
            process::exit(1);
        }
    }
    files.sort();

    let mut total = LintReport::default();
    for file in &files {
        println!("Checking {}", file.display());
        let report = lint_file(file, cli.min_phrases);
        for warning in &report.warnings {
            println!("  WARNING: {}", warning);
        }
        for error in &report.errors {
            println!("  ERROR: {}", error);
        }
        total.errors.extend(report.errors);
        total.warnings.extend(report.warnings);
    }

    println!(
        "\nSummary: {} files, {} errors, {} warnings",
        files.len(),
        total.errors.len(),
        total.warnings.len()
    );

    if !total.errors.is_empty() {
        process::exit(1);
    }
}

fn collect_ron_files(dir: &Path, files: &mut Vec<PathBuf>) {
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                collect_ron_files(&path, files);
            } else if path.extension().and_then(|s| s.to_str()) == Some("ron") {
                files.push(path);
            }
        }
    }
}

fn lint_file(path: &Path, min_phrases: usize) -> LintReport {
    match StoryStyle::load_from_ron(path) {
        Ok(style) => style.lint(min_phrases),
        Err(e) => LintReport {
            errors: vec![e.to_string()],
            warnings: Vec::new(),
        },
    }
}
