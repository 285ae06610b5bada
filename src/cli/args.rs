//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Surface
//!
//! Three positional arguments name the migration: the store being read, the
//! destination repository, and the branch to create. Global flags:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--quiet` / `-q`: Minimal output
//! - `--debug`: Verbose diagnostics on stderr
//! - `--dry-run`: Validate the metadata log without touching the destination
//! - `--json`: Machine-readable run summary on stdout

use clap::Parser;
use std::path::PathBuf;

/// Attic - migrate a legacy versions store into linear Git history
#[derive(Parser, Debug)]
#[command(name = "attic")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    # Migrate a store onto a new branch of an existing repository
    attic ./old-versions ./repo imports/legacy

    # Check the metadata log before committing to a run
    attic --dry-run ./old-versions ./repo imports/legacy

    # Scripted usage
    attic --quiet --json ./old-versions ./repo imports/legacy")]
pub struct Cli {
    /// Path of the legacy versions store (read-only input)
    pub store: PathBuf,

    /// Path of the destination Git repository
    pub repo: PathBuf,

    /// Branch to create in the destination; must not already exist
    pub branch: String,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Parse and validate every section without touching the destination
    #[arg(long)]
    pub dry_run: bool,

    /// Print a machine-readable run summary to stdout
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}
