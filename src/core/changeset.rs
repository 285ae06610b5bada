//! core::changeset
//!
//! Change-set assembly.
//!
//! # Overview
//!
//! A change-set is one section's worth of metadata plus file operations, and
//! becomes exactly one commit. [`ChangeSet::assemble`] runs a small state
//! machine over a section's ordered pairs; order matters because a
//! `directory` declaration scopes the file operations after it, and `message`
//! lines accumulate after `title`.
//!
//! # Invariants
//!
//! - Every `added`/`modified`/`deleted` operation must be preceded, within
//!   its section, by a `directory` declaration. Violations are a fatal
//!   [`ValidationError`], never a silent skip.
//! - `timestamp` and `author` are required; a section missing either aborts
//!   the run.
//! - A section with a directory and zero file operations is valid (a
//!   metadata-only edit) and still produces a commit.
//!
//! The commit time is fixed here, at assembly: epoch seconds from the
//! `timestamp` key plus the local machine's UTC offset at that instant.

use thiserror::Error;

use crate::core::log::{Key, Section};
use crate::core::types::{CommitTime, SectionId};

/// Errors from assembling a section into a change-set.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The section declared no `timestamp`.
    #[error("section '{section}': timestamp missing")]
    MissingTimestamp {
        /// The offending section
        section: SectionId,
    },

    /// The section declared no `author`.
    #[error("section '{section}': author missing")]
    MissingAuthor {
        /// The offending section
        section: SectionId,
    },

    /// The `timestamp` value is not integer epoch seconds.
    #[error("section '{section}': invalid timestamp '{value}'")]
    InvalidTimestamp {
        /// The offending section
        section: SectionId,
        /// The unparseable value
        value: String,
    },

    /// A file operation appeared before any `directory` declaration.
    #[error("section '{section}': directory missing for '{key} = {filename}'")]
    DirectoryMissing {
        /// The offending section
        section: SectionId,
        /// The operation key (`added`, `modified`, or `deleted`)
        key: Key,
        /// The filename the operation referenced
        filename: String,
    },
}

/// The kind of a file operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOpKind {
    Added,
    Modified,
    Deleted,
}

impl std::fmt::Display for FileOpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FileOpKind::Added => "added",
            FileOpKind::Modified => "modified",
            FileOpKind::Deleted => "deleted",
        };
        write!(f, "{s}")
    }
}

/// One declared file operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOp {
    /// What happened to the file
    pub kind: FileOpKind,
    /// The filename, relative to the working-tree root
    pub filename: String,
}

/// One queued working-tree mutation, in declaration order.
///
/// Besides explicit file operations, each `directory` declaration queues an
/// unconditional copy of that directory's `index` file — a structural copy
/// independent of `added`/`modified` entries, overwriting any `index` staged
/// by an earlier declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeOp {
    /// Copy `<directory>/index` from the store into the working-tree root.
    CopyIndex {
        /// The content directory being referenced
        directory: String,
    },

    /// A declared file operation, scoped to the directory current at the
    /// point of declaration. `Deleted` removes from the working tree and
    /// does not read the directory, but one must still have been declared.
    File {
        /// The content directory in effect when the op was declared
        directory: String,
        /// The operation itself
        op: FileOp,
    },
}

/// One unit of history: a validated section, ready to replay and commit.
///
/// Constructed by [`ChangeSet::assemble`], consumed exactly once by the
/// applier and emitter, then discarded.
#[derive(Debug, Clone)]
pub struct ChangeSet {
    /// The originating section id
    pub id: SectionId,
    /// Author display name
    pub author: String,
    /// Author and committer time, offset fixed at assembly
    pub time: CommitTime,
    /// First line of the commit message, if declared
    pub title: Option<String>,
    /// Additional message lines, in declaration order
    pub message_lines: Vec<String>,
    /// Working-tree mutations, in declaration order
    pub ops: Vec<TreeOp>,
}

impl ChangeSet {
    /// Assemble one section's ordered pairs into a change-set.
    ///
    /// Pairs are processed strictly in input order; see the module docs for
    /// the ordering and presence invariants enforced here.
    pub fn assemble(section: Section) -> Result<Self, ValidationError> {
        let Section { id, pairs } = section;

        let mut author: Option<String> = None;
        let mut time: Option<CommitTime> = None;
        let mut directory: Option<String> = None;
        let mut title: Option<String> = None;
        let mut message_lines: Vec<String> = Vec::new();
        let mut ops: Vec<TreeOp> = Vec::new();

        for pair in pairs {
            match pair.key {
                Key::Author => author = Some(pair.value),
                Key::Timestamp => {
                    let seconds: i64 =
                        pair.value
                            .parse()
                            .map_err(|_| ValidationError::InvalidTimestamp {
                                section: id.clone(),
                                value: pair.value.clone(),
                            })?;
                    let fixed = CommitTime::from_epoch(seconds).map_err(|_| {
                        ValidationError::InvalidTimestamp {
                            section: id.clone(),
                            value: pair.value,
                        }
                    })?;
                    time = Some(fixed);
                }
                Key::Directory => {
                    directory = Some(pair.value.clone());
                    ops.push(TreeOp::CopyIndex {
                        directory: pair.value,
                    });
                }
                Key::Added | Key::Modified | Key::Deleted => {
                    let Some(dir) = directory.clone() else {
                        return Err(ValidationError::DirectoryMissing {
                            section: id,
                            key: pair.key,
                            filename: pair.value,
                        });
                    };
                    let kind = match pair.key {
                        Key::Added => FileOpKind::Added,
                        Key::Modified => FileOpKind::Modified,
                        _ => FileOpKind::Deleted,
                    };
                    ops.push(TreeOp::File {
                        directory: dir,
                        op: FileOp {
                            kind,
                            filename: pair.value,
                        },
                    });
                }
                Key::Title => title = Some(pair.value),
                Key::Message => message_lines.push(pair.value),
            }
        }

        let time = time.ok_or_else(|| ValidationError::MissingTimestamp {
            section: id.clone(),
        })?;
        let author = author.ok_or_else(|| ValidationError::MissingAuthor {
            section: id.clone(),
        })?;

        Ok(Self {
            id,
            author,
            time,
            title,
            message_lines,
            ops,
        })
    }

    /// The commit message: title line, blank line, then message lines,
    /// verbatim. Absent parts are simply omitted.
    pub fn commit_message(&self) -> String {
        match (&self.title, self.message_lines.is_empty()) {
            (Some(title), true) => title.clone(),
            (Some(title), false) => format!("{}\n\n{}", title, self.message_lines.join("\n")),
            (None, _) => self.message_lines.join("\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log::MetadataLog;

    fn section(text: &str) -> Section {
        MetadataLog::from_text(text)
            .sections()
            .next()
            .expect("no section")
            .expect("parse failed")
    }

    #[test]
    fn assembles_a_full_section() {
        let cs = ChangeSet::assemble(section(
            "[v001]\n\
             author = Ada Lovelace\n\
             timestamp = 1441065600\n\
             directory = notes\n\
             title = First pass\n\
             message = details here\n\
             added = analysis.txt\n\
             deleted = draft.txt\n",
        ))
        .unwrap();

        assert_eq!(cs.id.as_str(), "v001");
        assert_eq!(cs.author, "Ada Lovelace");
        assert_eq!(cs.time.seconds(), 1441065600);
        assert_eq!(
            cs.ops,
            vec![
                TreeOp::CopyIndex {
                    directory: "notes".into()
                },
                TreeOp::File {
                    directory: "notes".into(),
                    op: FileOp {
                        kind: FileOpKind::Added,
                        filename: "analysis.txt".into()
                    }
                },
                TreeOp::File {
                    directory: "notes".into(),
                    op: FileOp {
                        kind: FileOpKind::Deleted,
                        filename: "draft.txt".into()
                    }
                },
            ]
        );
    }

    #[test]
    fn later_directory_scopes_later_ops() {
        let cs = ChangeSet::assemble(section(
            "[v002]\n\
             author = a\n\
             timestamp = 1\n\
             directory = one\n\
             added = f1\n\
             directory = two\n\
             added = f2\n",
        ))
        .unwrap();

        let dirs: Vec<_> = cs
            .ops
            .iter()
            .filter_map(|op| match op {
                TreeOp::File { directory, .. } => Some(directory.as_str()),
                TreeOp::CopyIndex { .. } => None,
            })
            .collect();
        assert_eq!(dirs, ["one", "two"]);
    }

    #[test]
    fn missing_timestamp_is_fatal() {
        let err = ChangeSet::assemble(section("[v001]\nauthor = a\n")).unwrap_err();
        assert!(matches!(err, ValidationError::MissingTimestamp { .. }));
        assert!(err.to_string().contains("v001"));
    }

    #[test]
    fn missing_author_is_fatal() {
        let err = ChangeSet::assemble(section("[v001]\ntimestamp = 1\n")).unwrap_err();
        assert!(matches!(err, ValidationError::MissingAuthor { .. }));
    }

    #[test]
    fn non_numeric_timestamp_is_fatal() {
        let err =
            ChangeSet::assemble(section("[v001]\nauthor = a\ntimestamp = soon\n")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidTimestamp { .. }));
    }

    #[test]
    fn file_op_before_directory_is_fatal() {
        let err = ChangeSet::assemble(section(
            "[v003]\nauthor = a\ntimestamp = 1\nadded = orphan.txt\n",
        ))
        .unwrap_err();
        match err {
            ValidationError::DirectoryMissing {
                section,
                key,
                filename,
            } => {
                assert_eq!(section.as_str(), "v003");
                assert_eq!(key, Key::Added);
                assert_eq!(filename, "orphan.txt");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn metadata_only_section_is_valid() {
        let cs = ChangeSet::assemble(section(
            "[v001]\nauthor = a\ntimestamp = 1\ndirectory = d\n",
        ))
        .unwrap();
        assert_eq!(
            cs.ops,
            vec![TreeOp::CopyIndex {
                directory: "d".into()
            }]
        );
    }

    #[test]
    fn commit_message_layout() {
        let cs = ChangeSet::assemble(section(
            "[v001]\n\
             author = a\n\
             timestamp = 1\n\
             title = Summary\n\
             message = line one\n\
             message = line two\n",
        ))
        .unwrap();
        assert_eq!(cs.commit_message(), "Summary\n\nline one\nline two");
    }

    #[test]
    fn commit_message_title_only() {
        let cs =
            ChangeSet::assemble(section("[v001]\nauthor = a\ntimestamp = 1\ntitle = T\n")).unwrap();
        assert_eq!(cs.commit_message(), "T");
    }

    #[test]
    fn commit_message_without_title() {
        let cs = ChangeSet::assemble(section(
            "[v001]\nauthor = a\ntimestamp = 1\nmessage = only body\n",
        ))
        .unwrap();
        assert_eq!(cs.commit_message(), "only body");
    }
}
