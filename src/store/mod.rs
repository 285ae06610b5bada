//! store
//!
//! Read-only view of the legacy versions store.
//!
//! # Layout
//!
//! ```text
//! <root>/
//!   metadata            the section-scoped key/value log
//!   <directory>/        one subdirectory per distinct `directory` value
//!     index             per-directory reference file, copied on declaration
//!     <blob files>      contents referenced by added/modified operations
//! ```
//!
//! The store is input only. This module computes paths and validates the
//! root's shape; it never mutates anything beneath it.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Filename of the metadata log at the store root.
pub const METADATA_LOG: &str = "metadata";

/// Filename of the per-directory reference file.
pub const INDEX_FILE: &str = "index";

/// Errors from opening a versions store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store root does not exist or is not a directory.
    #[error("versions store not found at '{path}'")]
    NotADirectory {
        /// The path that was checked
        path: PathBuf,
    },

    /// The store root has no metadata log.
    #[error("versions store at '{root}' has no '{METADATA_LOG}' log")]
    MissingLog {
        /// The store root
        root: PathBuf,
    },
}

/// A validated handle to the versions store on disk.
#[derive(Debug, Clone)]
pub struct VersionStore {
    root: PathBuf,
}

impl VersionStore {
    /// Open a store, verifying the root is a directory containing the
    /// metadata log.
    pub fn open(root: &Path) -> Result<Self, StoreError> {
        if !root.is_dir() {
            return Err(StoreError::NotADirectory {
                path: root.to_path_buf(),
            });
        }
        let store = Self {
            root: root.to_path_buf(),
        };
        if !store.log_path().is_file() {
            return Err(StoreError::MissingLog {
                root: store.root.clone(),
            });
        }
        Ok(store)
    }

    /// The store root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the metadata log.
    pub fn log_path(&self) -> PathBuf {
        self.root.join(METADATA_LOG)
    }

    /// Path of a blob file inside a content directory.
    pub fn blob_path(&self, directory: &str, filename: &str) -> PathBuf {
        self.root.join(directory).join(filename)
    }

    /// Path of a content directory's `index` file.
    pub fn index_path(&self, directory: &str) -> PathBuf {
        self.root.join(directory).join(INDEX_FILE)
    }
}
