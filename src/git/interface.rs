//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to all Git operations in
//! Attic. Every interaction with the destination repository flows through
//! this interface, which provides structured results and normalizes errors
//! into typed failure categories.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: Not inside a Git repository
//! - [`GitError::BareRepo`]: Destination has no working directory
//! - [`GitError::BranchExists`]: Destination branch already exists
//! - [`GitError::MissingIdentity`]: No committer email configured
//!
//! # Example
//!
//! ```ignore
//! use attic::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let email = git.committer_email()?;
//! git.create_orphan_branch(&branch)?;
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::{BranchName, CommitTime, Oid, TypeError};

/// Errors from Git operations.
///
/// These error types cover all categories of backend failures the run
/// needs to handle distinctly. Branch-lifecycle and identity failures are
/// setup-time; staging and commit failures abort the replay mid-run.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// The destination branch already exists.
    ///
    /// The run only ever appends to a branch it created itself; an existing
    /// branch means a previous run's output would be clobbered.
    #[error("branch already exists: {branch}")]
    BranchExists {
        /// The branch that was found
        branch: BranchName,
    },

    /// No committer email could be resolved from repository configuration.
    #[error("cannot resolve committer identity: {message}")]
    MissingIdentity {
        /// Description of the problem
        message: String,
    },

    /// Invalid object id produced by the backend.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Permission or filesystem error while touching the working tree.
    #[error("repository access error: {message}")]
    AccessError {
        /// Description of the error
        message: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with richer context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::Locked => GitError::AccessError {
                message: format!("repository is locked: {}", err.message()),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => GitError::InvalidOid { oid: msg },
            other => GitError::Internal {
                message: other.to_string(),
            },
        }
    }
}

/// The Git interface.
///
/// This is the **single point of interaction** with Git. All destination
/// reads and writes flow through this interface. No other module should
/// import `git2` directly.
///
/// # Example
///
/// ```ignore
/// use attic::git::Git;
/// use std::path::Path;
///
/// let git = Git::open(Path::new("/dest/repo"))?;
/// git.create_orphan_branch(&branch)?;
/// git.clear_worktree()?;
/// // ... apply file operations to git.workdir() ...
/// git.stage_all()?;
/// let oid = git.commit("Ada Lovelace", &email, time, "Title\n\nBody")?;
/// ```
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
    /// The working directory (non-bare guaranteed at open)
    work_dir: PathBuf,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening and Info
    // =========================================================================

    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover` to find the repository root,
    /// so `path` can be any directory within the repository.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        let work_dir = repo.workdir().ok_or(GitError::BareRepo)?.to_path_buf();

        Ok(Self { repo, work_dir })
    }

    /// The repository's working directory.
    pub fn workdir(&self) -> &Path {
        &self.work_dir
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Resolve the committer email from repository configuration.
    ///
    /// The email is resolved once per run and reused for every commit's
    /// author and committer identity (only the display name varies per
    /// change-set).
    ///
    /// # Errors
    ///
    /// - [`GitError::MissingIdentity`] if no `user.email` is configured
    pub fn committer_email(&self) -> Result<String, GitError> {
        let signature = self.repo.signature().map_err(|e| GitError::MissingIdentity {
            message: e.message().to_string(),
        })?;
        let email = signature.email().ok_or_else(|| GitError::MissingIdentity {
            message: "configured email is not valid UTF-8".to_string(),
        })?;
        Ok(email.to_string())
    }

    // =========================================================================
    // Branch Lifecycle
    // =========================================================================

    /// Check whether a local branch exists.
    pub fn branch_exists(&self, branch: &BranchName) -> bool {
        self.repo.find_reference(&branch.refname()).is_ok()
    }

    /// Point HEAD at a new, history-less branch.
    ///
    /// The branch ref is not created yet; it materializes with the first
    /// commit. Until then HEAD is unborn.
    ///
    /// # Errors
    ///
    /// - [`GitError::BranchExists`] if the branch ref already exists
    pub fn create_orphan_branch(&self, branch: &BranchName) -> Result<(), GitError> {
        if self.branch_exists(branch) {
            return Err(GitError::BranchExists {
                branch: branch.clone(),
            });
        }
        let refname = branch.refname();
        self.repo
            .set_head(&refname)
            .map_err(|e| GitError::from_git2(e, &refname))
    }

    // =========================================================================
    // Working Tree and Index
    // =========================================================================

    /// Remove every tracked and untracked file from the working tree and
    /// clear the index.
    ///
    /// Everything under the working directory except `.git` is deleted, so
    /// the replay starts from an empty tree regardless of what the
    /// destination contained before.
    pub fn clear_worktree(&self) -> Result<(), GitError> {
        let access = |e: std::io::Error| GitError::AccessError {
            message: e.to_string(),
        };

        for entry in std::fs::read_dir(&self.work_dir).map_err(access)? {
            let entry = entry.map_err(access)?;
            if entry.file_name() == ".git" {
                continue;
            }
            let path = entry.path();
            if entry.file_type().map_err(access)?.is_dir() {
                std::fs::remove_dir_all(&path).map_err(access)?;
            } else {
                std::fs::remove_file(&path).map_err(access)?;
            }
        }

        let mut index = self
            .repo
            .index()
            .map_err(|e| GitError::from_git2(e, "index"))?;
        index
            .clear()
            .map_err(|e| GitError::from_git2(e, "index clear"))?;
        index
            .write()
            .map_err(|e| GitError::from_git2(e, "index write"))?;
        Ok(())
    }

    /// Stage the entire current working-tree state.
    ///
    /// Additions, modifications, and removals are all recorded: `add_all`
    /// picks up new and changed paths, `update_all` records deletions of
    /// tracked paths.
    pub fn stage_all(&self) -> Result<(), GitError> {
        let mut index = self
            .repo
            .index()
            .map_err(|e| GitError::from_git2(e, "index"))?;
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .map_err(|e| GitError::from_git2(e, "stage additions"))?;
        index
            .update_all(["*"].iter(), None)
            .map_err(|e| GitError::from_git2(e, "stage removals"))?;
        index
            .write()
            .map_err(|e| GitError::from_git2(e, "index write"))?;
        Ok(())
    }

    // =========================================================================
    // Commit Creation
    // =========================================================================

    /// Create a commit from the staged index state, advancing HEAD.
    ///
    /// Author and committer share the given display name, email, and
    /// timestamp. The first commit on an unborn branch has no parent; every
    /// later commit's parent is the current HEAD.
    pub fn commit(
        &self,
        author_name: &str,
        email: &str,
        time: CommitTime,
        message: &str,
    ) -> Result<Oid, GitError> {
        let mut index = self
            .repo
            .index()
            .map_err(|e| GitError::from_git2(e, "index"))?;
        let tree_oid = index
            .write_tree()
            .map_err(|e| GitError::from_git2(e, "write tree"))?;
        let tree = self
            .repo
            .find_tree(tree_oid)
            .map_err(|e| GitError::from_git2(e, "find tree"))?;

        let when = git2::Time::new(time.seconds(), time.offset_minutes());
        let signature = git2::Signature::new(author_name, email, &when)
            .map_err(|e| GitError::from_git2(e, "signature"))?;

        let parent = match self.repo.head() {
            Ok(head) => Some(
                head.peel_to_commit()
                    .map_err(|e| GitError::from_git2(e, "HEAD"))?,
            ),
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                None
            }
            Err(e) => return Err(GitError::from_git2(e, "HEAD")),
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .map_err(|e| GitError::from_git2(e, "commit"))?;

        Ok(Oid::new(oid.to_string())?)
    }
}
