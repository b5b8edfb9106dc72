// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Command-line interface for board2md.
//!
//! This binary provides the `board2md` command for converting board JSON
//! exports into a Markdown directory tree, one folder per list and one
//! subfolder per card, with attachments downloaded alongside.

use board2md::export::{self, ExportError, ExportOptions};
use board2md::fetch::{FetchError, Fetcher};
use board2md::parser;
use lexopt::prelude::*;
use snafu::{OptionExt, ensure, prelude::*};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

struct Cli {
    input: Vec<PathBuf>,
    output: Option<PathBuf>,
    skip_attachments: bool,
    quiet: bool,
    dry_run: bool,
}

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to parse arguments: {source}"))]
    ParseArgs { source: lexopt::Error },

    #[snafu(display("at least one input file or directory is required"))]
    NoInputFiles,

    #[snafu(display("failed to build HTTP client: {source}"))]
    BuildFetcher { source: FetchError },

    #[snafu(display("failed to read {}: {source}", path.display()))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to parse {}: {source}", path.display()))]
    ParseFile {
        path: PathBuf,
        source: parser::ParseError,
    },

    #[snafu(display("invalid input filename: no file stem"))]
    InvalidFilename,

    #[snafu(display("failed to export {}: {source}", path.display()))]
    Export {
        path: PathBuf,
        source: ExportError,
    },
}

fn print_help() {
    println!(
        "\
{name} {version}
Convert board JSON exports to a Markdown directory tree

Usage: {name} [OPTIONS] <INPUT>...

Arguments:
  <INPUT>...  Board JSON files or directories containing exports

Options:
  -o, --output <DIR>        Parent directory for the export trees
                            (default: next to each input, extension stripped)
      --skip-attachments    Do not download attachments (link lines are still written)
  -q, --quiet               Suppress progress messages
  -n, --dry-run             Show what would be exported without writing
  -h, --help                Print help
  -V, --version             Print version",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
    );
}

fn parse_args() -> Result<Cli, lexopt::Error> {
    // Show help if no arguments provided
    if std::env::args().len() == 1 {
        print_help();
        std::process::exit(0);
    }

    let mut input = Vec::new();
    let mut output: Option<PathBuf> = None;
    let mut skip_attachments = false;
    let mut quiet = false;
    let mut dry_run = false;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Short('o') | Long("output") => {
                output = Some(parser.value()?.parse()?);
            }
            Long("skip-attachments") => skip_attachments = true,
            Short('q') | Long("quiet") => quiet = true,
            Short('n') | Long("dry-run") => dry_run = true,
            Short('h') | Long("help") => {
                print_help();
                std::process::exit(0);
            }
            Short('V') | Long("version") => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            Value(val) => input.push(val.parse()?),
            _ => return Err(arg.unexpected()),
        }
    }

    Ok(Cli {
        input,
        output,
        skip_attachments,
        quiet,
        dry_run,
    })
}

fn main() -> Result<(), Error> {
    let cli = parse_args().context(ParseArgsSnafu)?;

    init_logging(cli.quiet);

    ensure!(!cli.input.is_empty(), NoInputFilesSnafu);

    // Collect all input files first
    let files = collect_input_files(&cli.input);

    let fetcher = Fetcher::new().context(BuildFetcherSnafu)?;

    for file in &files {
        process_file(file, &fetcher, &cli)?;
    }

    Ok(())
}

/// Initializes the diagnostic channel: stderr, `RUST_LOG` overridable.
fn init_logging(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Collects all JSON files from the given inputs (files and directories).
fn collect_input_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
            {
                files.push(entry.path().to_path_buf());
            }
        } else {
            files.push(input.clone());
        }
    }
    files
}

/// The base directory one input exports into: the input filename with its
/// extension stripped, placed next to the input or under `--output`.
fn base_dir_for(input: &Path, output: Option<&Path>) -> Result<PathBuf, Error> {
    match output {
        Some(dir) => {
            let stem = input.file_stem().context(InvalidFilenameSnafu)?;
            Ok(dir.join(stem))
        }
        None => Ok(input.with_extension("")),
    }
}

/// Exports a single board file into its base directory.
fn process_file(input: &Path, fetcher: &Fetcher, cli: &Cli) -> Result<(), Error> {
    let base_dir = base_dir_for(input, cli.output.as_deref())?;

    // Handle dry-run mode
    if cli.dry_run {
        eprintln!(
            "Would export {} -> {}",
            input.display(),
            base_dir.display()
        );
        return Ok(());
    }

    let json = std::fs::read_to_string(input).context(ReadFileSnafu { path: input })?;
    let board = parser::parse_board(&json).context(ParseFileSnafu { path: input })?;

    let opts = ExportOptions {
        fetch_attachments: !cli.skip_attachments,
    };
    let summary =
        export::export_board(&board, &base_dir, fetcher, &opts).context(ExportSnafu { path: input })?;

    tracing::info!(
        "exported {} -> {} ({} lists, {} cards, {} attachments, {} failed downloads)",
        input.display(),
        base_dir.display(),
        summary.lists,
        summary.cards,
        summary.attachments,
        summary.failed_downloads
    );

    Ok(())
}
