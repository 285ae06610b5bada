//! engine
//!
//! Orchestrates the migration pipeline: Parse → Assemble → Apply → Commit.
//!
//! # Architecture
//!
//! The engine drives sections from the metadata log through the full
//! pipeline, one change-set at a time:
//!
//! ```text
//! Parser -> Assembler -> Applier -> Emitter
//! ```
//!
//! Data flows strictly forward and sequentially, because each commit's tree
//! depends on the cumulative state left by all prior change-sets: the
//! working tree is mutated in place, never reconstructed.
//!
//! # Lifecycle
//!
//! 1. Validate inputs: store shape, destination repository
//! 2. Create the history-less destination branch (fails if it exists)
//! 3. Clear the working tree and index to empty
//! 4. Resolve the committer email once, reused for every commit
//! 5. Replay sections strictly in metadata-log order
//!
//! # Invariants
//!
//! - The run aborts on the first error from any stage; there are no
//!   partial-section commits and no continuation after failure
//! - The partially-built branch is left inspectable, not rolled back
//! - The source store is never mutated

pub mod apply;

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::core::changeset::{ChangeSet, ValidationError};
use crate::core::log::{FormatError, MetadataLog};
use crate::core::types::{BranchName, Oid, SectionId};
use crate::engine::apply::FileSystemError;
use crate::git::{Git, GitError};
use crate::store::{StoreError, VersionStore};
use crate::ui::output::{self, Verbosity};

/// Execution context threaded from the CLI into the engine.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Minimal output
    pub quiet: bool,
    /// Verbose diagnostics on stderr
    pub debug: bool,
    /// Parse and validate every section without touching the destination
    pub dry_run: bool,
}

impl Context {
    fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }
}

/// Errors from validating inputs and preparing the destination.
///
/// Setup failures occur before any commit is created.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The versions store is missing or malformed at the directory level.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The destination repository could not be prepared: not a repository,
    /// bare, branch already exists, or no committer identity configured.
    #[error("destination: {0}")]
    Destination(#[source] GitError),
}

/// Umbrella error for a migration run. All variants are fatal; there is no
/// retry and no partial recovery. Diagnostics carry the offending section
/// id, field name, or filename so the operator can fix the source metadata
/// and re-run from scratch.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    FileSystem(#[from] FileSystemError),

    #[error(transparent)]
    Vcs(#[from] GitError),
}

impl MigrateError {
    /// Process exit code for this failure: 2 for setup and validation
    /// failures, 1 for mid-run replay failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            MigrateError::Setup(_) | MigrateError::Validation(_) => 2,
            _ => 1,
        }
    }
}

/// One migrated section in the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct CommitEntry {
    /// The section this commit replays
    pub section: SectionId,
    /// The created commit, absent in a dry run
    pub commit: Option<Oid>,
    /// The change-set author
    pub author: String,
    /// Epoch seconds of the commit time
    pub timestamp: i64,
}

/// Summary of a completed run, one entry per section in replay order.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    /// The destination branch
    pub branch: BranchName,
    /// Whether the destination was left untouched
    pub dry_run: bool,
    /// Per-section results in metadata-log order
    pub commits: Vec<CommitEntry>,
}

/// Run the migration.
///
/// Drives every section of the store's metadata log through the pipeline
/// and returns the run summary, or the first error from any stage.
pub fn run(
    ctx: &Context,
    store_path: &Path,
    repo_path: &Path,
    branch: &BranchName,
) -> Result<MigrationReport, MigrateError> {
    let verbosity = ctx.verbosity();

    let store = VersionStore::open(store_path).map_err(SetupError::from)?;
    let log = MetadataLog::load(&store.log_path())?;

    if ctx.dry_run {
        return dry_run(&log, branch, verbosity);
    }

    let git = Git::open(repo_path).map_err(SetupError::Destination)?;
    git.create_orphan_branch(branch)
        .map_err(SetupError::Destination)?;
    git.clear_worktree().map_err(SetupError::Destination)?;
    let email = git.committer_email().map_err(SetupError::Destination)?;
    output::debug(
        format!("committer email resolved as <{email}>"),
        verbosity,
    );

    let mut commits = Vec::new();
    for section in log.sections() {
        let changeset = ChangeSet::assemble(section?)?;
        apply::apply(&store, git.workdir(), &changeset)?;
        git.stage_all()?;
        let oid = git.commit(
            &changeset.author,
            &email,
            changeset.time,
            &changeset.commit_message(),
        )?;

        output::print(
            format!(
                "{} -> {} ({})",
                changeset.id,
                oid.short(7),
                changeset.author
            ),
            verbosity,
        );
        commits.push(CommitEntry {
            section: changeset.id,
            commit: Some(oid),
            author: changeset.author,
            timestamp: changeset.time.seconds(),
        });
    }

    output::print(
        format!("migrated {} change-set(s) onto '{branch}'", commits.len()),
        verbosity,
    );
    Ok(MigrationReport {
        branch: branch.clone(),
        dry_run: false,
        commits,
    })
}

/// Parse and validate every section without touching the destination.
fn dry_run(
    log: &MetadataLog,
    branch: &BranchName,
    verbosity: Verbosity,
) -> Result<MigrationReport, MigrateError> {
    let mut commits = Vec::new();
    for section in log.sections() {
        let changeset = ChangeSet::assemble(section?)?;
        output::print(
            format!("{}: ok ({})", changeset.id, changeset.author),
            verbosity,
        );
        commits.push(CommitEntry {
            section: changeset.id,
            commit: None,
            author: changeset.author,
            timestamp: changeset.time.seconds(),
        });
    }
    output::print(
        format!("dry run: {} change-set(s) validated", commits.len()),
        verbosity,
    );
    Ok(MigrationReport {
        branch: branch.clone(),
        dry_run: true,
        commits,
    })
}
