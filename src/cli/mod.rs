//! cli
//!
//! Command-line interface layer for Attic.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and flags
//! - Delegate to the engine
//! - Does NOT touch the store or the destination repository directly
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, builds the engine
//! [`Context`], and hands the three validated inputs to [`engine::run`].
//! All destination mutations flow through the engine's pipeline.

pub mod args;

pub use args::Cli;

use anyhow::{Context as _, Result};

use crate::core::types::BranchName;
use crate::engine::{self, Context};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`. Errors bubble up
/// with their typed cause intact so `main` can map them to exit codes.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let branch = BranchName::new(&cli.branch)
        .with_context(|| format!("invalid destination branch name '{}'", cli.branch))?;

    let ctx = Context {
        quiet: cli.quiet,
        debug: cli.debug,
        dry_run: cli.dry_run,
    };

    let report = engine::run(&ctx, &cli.store, &cli.repo, &branch)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
