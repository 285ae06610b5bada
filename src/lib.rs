//! Attic - migrate legacy versions stores into linear Git history
//!
//! Attic is a single-binary tool that converts a legacy "versions store" — a
//! directory tree of file snapshots plus a structured metadata log — into a
//! Git branch with one commit per recorded change-set, preserving original
//! authorship and timestamps.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Orchestrates the Parse → Assemble → Apply → Commit pipeline
//! - [`core`] - Domain types, metadata-log parsing, change-set assembly
//! - [`store`] - Read-only view of the legacy versions store on disk
//! - [`git`] - Single interface for all Git operations
//! - [`ui`] - Output utilities
//!
//! # Correctness Invariants
//!
//! Attic maintains the following invariants:
//!
//! 1. Change-sets are replayed strictly in metadata-log order
//! 2. Every commit's tree is the cumulative replay of all prior change-sets
//! 3. The source store is never mutated
//! 4. The run aborts on the first error from any stage; no partial-section
//!    commits are ever created

pub mod cli;
pub mod core;
pub mod engine;
pub mod git;
pub mod store;
pub mod ui;
