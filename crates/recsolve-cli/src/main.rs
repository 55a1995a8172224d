//! Batch driver for the recurrence solver
//!
//! Walks a directory for `comass??.txt` files, solves each recurrence into a
//! closed form, verifies it numerically against iterative evaluation, and
//! writes `comass??-dir.txt` next to it (or into a separate output
//! directory). Files are processed in parallel; a failed file logs its error
//! and produces no output, and the process exits non-zero if any file
//! failed.

use anyhow::{Context, Result};
use clap::Parser;
use once_cell::sync::Lazy;
use rayon::prelude::*;
use recsolve_core::formatter;
use recsolve_core::parser::input::parse_input;
use recsolve_core::RecurrenceSolver;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "recsolve")]
#[command(about = "Solve recurrence relations into closed-form solutions", long_about = None)]
struct Args {
    /// Input directory containing comass??.txt files
    input_dir: PathBuf,

    /// Output directory; defaults to the input directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// How many values to cross-check between closed form and iteration
    #[arg(long, default_value_t = 50)]
    check: u32,

    /// Verification precision in decimal places
    #[arg(long, default_value_t = 4)]
    precision: u32,

    /// Only print warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Print debugging information
    #[arg(short, long)]
    verbose: bool,
}

static INPUT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^comass\d\d\.txt$").expect("valid filename pattern"));

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else if args.quiet {
        log::LevelFilter::Warn
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .format_timestamp(None)
        .init();

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| args.input_dir.clone());
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let inputs = discover_inputs(&args.input_dir)?;
    if inputs.is_empty() {
        log::warn!(
            "no comass??.txt files found in {}",
            args.input_dir.display()
        );
    }

    let failures: Vec<PathBuf> = inputs
        .par_iter()
        .filter_map(|path| {
            match process_file(path, &output_dir, args.check, args.precision) {
                Ok(()) => None,
                Err(error) => {
                    log::error!("{}: {:#}", path.display(), error);
                    Some(path.clone())
                }
            }
        })
        .collect();

    log::info!(
        "processed {} file(s), {} failed",
        inputs.len(),
        failures.len()
    );
    if !failures.is_empty() {
        anyhow::bail!("{} file(s) failed", failures.len());
    }
    Ok(())
}

/// Matching input files in deterministic (sorted) order
fn discover_inputs(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("reading input directory {}", input_dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| INPUT_PATTERN.is_match(name));
        if matches {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// Solve one input file and write its closed form
fn process_file(path: &Path, output_dir: &Path, check: u32, precision: u32) -> Result<()> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let parsed = parse_input(&text)?;

    let mut solver = RecurrenceSolver::new(&parsed)?;
    let closed_form = solver.solve()?;
    solver.verify_range(check, precision)?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .context("input path has no file name")?;
    let output_path = output_dir.join(file_name.replace(".txt", "-dir.txt"));
    fs::write(&output_path, formatter::solution_line(&closed_form))
        .with_context(|| format!("writing {}", output_path.display()))?;

    log::info!("{} -> {}", path.display(), output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_pattern() {
        assert!(INPUT_PATTERN.is_match("comass07.txt"));
        assert!(INPUT_PATTERN.is_match("comass33.txt"));
        assert!(!INPUT_PATTERN.is_match("comass7.txt"));
        assert!(!INPUT_PATTERN.is_match("comass07-dir.txt"));
        assert!(!INPUT_PATTERN.is_match("comass007.txt"));
    }

    #[test]
    fn test_process_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("comass03.txt");
        fs::write(
            &input_path,
            "eqs :=\n[\ns(n) = -4*s(n-2) + 4*s(n-1),\ns(0) = 6,\ns(1) = 8\n];\n",
        )
        .unwrap();

        process_file(&input_path, dir.path(), 20, 4).unwrap();

        let output = fs::read_to_string(dir.path().join("comass03-dir.txt")).unwrap();
        assert!(output.starts_with("sdir := n -> "));
        assert!(output.ends_with(";\n"));
    }

    #[test]
    fn test_failed_file_writes_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("comass09.txt");
        // Complex characteristic roots: must fail without an output file
        fs::write(
            &input_path,
            "eqs :=\n[\ns(n) = -s(n-2),\ns(0) = 1,\ns(1) = 1\n];\n",
        )
        .unwrap();

        assert!(process_file(&input_path, dir.path(), 20, 4).is_err());
        assert!(!dir.path().join("comass09-dir.txt").exists());
    }

    #[test]
    fn test_discover_inputs_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["comass12.txt", "comass03.txt", "notes.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let inputs = discover_inputs(dir.path()).unwrap();
        let names: Vec<_> = inputs
            .iter()
            .map(|path| path.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["comass03.txt", "comass12.txt"]);
    }
}
