use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use regex::Regex;

use dev_test_runner::{fixture_files, fixtures_dir, load_suites, run_suite};

/// run the JSON fixture suites against the validator
#[derive(Parser, Debug)]
#[command(name = "dev-test-runner")]
struct Args {
    /// directory of `*.json` fixture files (defaults to this crate's `fixtures/`)
    dir: Option<PathBuf>,

    /// only run cases whose `suite / case` description matches this regex
    filter: Option<String>,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let dir = args.dir.unwrap_or_else(fixtures_dir);
    let filter = args.filter.as_deref().map(Regex::new).transpose()?;

    let (mut passed, mut failed) = (0usize, 0usize);
    for file in fixture_files(&dir)? {
        println!("{}", file.display().to_string().bold());
        for suite in load_suites(&file)? {
            for result in run_suite(&suite, filter.as_ref()) {
                if result.passed {
                    passed += 1;
                    println!("  {} {} / {}", "✓".green(), result.suite, result.case);
                } else {
                    failed += 1;
                    println!("  {} {} / {}", "✗".red(), result.suite, result.case);
                    if !result.detail.is_empty() {
                        println!("      {}", result.detail.dimmed());
                    }
                }
            }
        }
    }

    let summary = format!("{passed} passed, {failed} failed");
    if failed == 0 {
        println!("{}", summary.green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{}", summary.red().bold());
        Ok(ExitCode::FAILURE)
    }
}
