//! engine::apply
//!
//! Working-tree replay of one change-set.
//!
//! # Contract
//!
//! Operations are applied strictly in declaration order: copy-in for index
//! copies and `added`/`modified`, removal for `deleted`. Copies overwrite an
//! existing file of the same name, so a later operation on a filename
//! supersedes an earlier one within the same section.
//!
//! Removal performs no existence check first: deleting a file that is not in
//! the working tree is a fatal [`FileSystemError`], mirroring the
//! destination's strictness.

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::core::changeset::{ChangeSet, FileOpKind, TreeOp};
use crate::core::types::SectionId;
use crate::store::{VersionStore, INDEX_FILE};

/// Errors from replaying file operations against the working tree.
#[derive(Debug, Error)]
pub enum FileSystemError {
    /// A content directory's `index` file could not be copied in.
    #[error("section '{section}': failed to copy index of '{directory}': {source}")]
    IndexCopy {
        /// The offending section
        section: SectionId,
        /// The content directory being referenced
        directory: String,
        /// Underlying I/O error
        source: io::Error,
    },

    /// A referenced blob could not be copied in.
    #[error("section '{section}': failed to copy '{directory}/{filename}': {source}")]
    BlobCopy {
        /// The offending section
        section: SectionId,
        /// The content directory holding the blob
        directory: String,
        /// The referenced filename
        filename: String,
        /// Underlying I/O error
        source: io::Error,
    },

    /// A deletion target could not be removed (including: does not exist).
    #[error("section '{section}': failed to delete '{filename}': {source}")]
    Remove {
        /// The offending section
        section: SectionId,
        /// The filename that could not be removed
        filename: String,
        /// Underlying I/O error
        source: io::Error,
    },
}

/// Replay a change-set's operations against the working tree.
///
/// The store is read-only input; `worktree` is mutated in place. On the
/// first failing operation the error is returned and the tree is left as-is
/// (the run aborts, so no cleanup is attempted).
pub fn apply(
    store: &VersionStore,
    worktree: &Path,
    changeset: &ChangeSet,
) -> Result<(), FileSystemError> {
    for op in &changeset.ops {
        match op {
            TreeOp::CopyIndex { directory } => {
                copy_overwriting(&store.index_path(directory), &worktree.join(INDEX_FILE))
                    .map_err(|source| FileSystemError::IndexCopy {
                        section: changeset.id.clone(),
                        directory: directory.clone(),
                        source,
                    })?;
            }
            TreeOp::File { directory, op } => match op.kind {
                FileOpKind::Added | FileOpKind::Modified => {
                    copy_overwriting(
                        &store.blob_path(directory, &op.filename),
                        &worktree.join(&op.filename),
                    )
                    .map_err(|source| FileSystemError::BlobCopy {
                        section: changeset.id.clone(),
                        directory: directory.clone(),
                        filename: op.filename.clone(),
                        source,
                    })?;
                }
                FileOpKind::Deleted => {
                    std::fs::remove_file(worktree.join(&op.filename)).map_err(|source| {
                        FileSystemError::Remove {
                            section: changeset.id.clone(),
                            filename: op.filename.clone(),
                            source,
                        }
                    })?;
                }
            },
        }
    }
    Ok(())
}

/// Copy a file, overwriting the destination and creating any missing parent
/// directories for filenames containing path separators.
fn copy_overwriting(from: &Path, to: &Path) -> io::Result<()> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(from, to)?;
    Ok(())
}
