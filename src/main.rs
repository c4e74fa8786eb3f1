//! pyreqs - Python requirements scanner
//!
//! Statically scans a Python source tree for import statements, resolves
//! each import to the pip distribution that provides it, and writes a
//! deduplicated, sorted requirements.txt. Can also create or reuse a local
//! virtual environment and install the result after confirmation.

use clap::Parser;
use std::path::PathBuf;

mod cli;
mod commands;
mod error;
mod manifest;
mod progress;
mod resolver;
mod scanner;
mod venv;

use cli::{Cli, Commands};
use error::{PyreqsError, Result};

/// Check that the scan root exists and is a directory
fn check_scan_root(path: Option<&PathBuf>) -> Result<()> {
    let root = match path {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };

    if !root.is_dir() {
        return Err(PyreqsError::RootNotFound {
            path: root.display().to_string(),
        });
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // Version and completions run anywhere; scanning commands need a root
    let needs_root = matches!(cli.command, Commands::Scan(_) | Commands::Install(_));

    if needs_root {
        if let Err(e) = check_scan_root(cli.path.as_ref()) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    let result = match cli.command {
        Commands::Scan(args) => commands::scan::run(cli.path, args, cli.verbose),
        Commands::Install(args) => commands::install::run(cli.path, args, cli.verbose),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
