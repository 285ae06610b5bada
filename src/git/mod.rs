//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **only doorway** to Git. Every destination-repository
//! read and write flows through this interface, using the `git2` crate
//! exclusively (no shelling out to the git CLI). No other module should
//! import `git2`.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - Orphan-branch lifecycle (create, verify absence)
//! - Working-tree and index clearing
//! - Staging the full tree state and creating commits with an explicit
//!   author identity and timestamp
//! - Resolving the run-wide committer email from repository configuration
//!
//! # Invariants
//!
//! - Commits are only ever appended to the branch the run created
//! - All operations return strong types ([`crate::core::types::Oid`],
//!   [`crate::core::types::BranchName`])

mod interface;

pub use interface::{Git, GitError};
