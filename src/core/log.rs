//! core::log
//!
//! Metadata-log parsing.
//!
//! # Format
//!
//! The store's metadata log is a section-scoped key/value text format:
//!
//! ```text
//! [v001]
//! author = Ada Lovelace
//! timestamp = 1441065600
//! directory = notes
//! added = analysis.txt
//! ```
//!
//! A `[section-id]` header opens a section; every `key = value` line below it
//! belongs to that section until the next header. Blank lines and lines
//! starting with `#` or `;` are ignored. Section ids are opaque ordered
//! tokens — their position in the file defines replay order.
//!
//! # Ordering
//!
//! Pairs are yielded in declaration order with duplicate keys intact. The
//! format is order-significant (a `directory` declaration scopes the file
//! operations after it, and repeated `message` keys accumulate lines), so the
//! parser never collapses a section into a map.
//!
//! # Recognized keys
//!
//! Keys are matched case-insensitively against the fixed set `author`,
//! `timestamp`, `directory`, `title`, `message`, `added`, `modified`,
//! `deleted`. Unrecognized keys are dropped here; structurally malformed
//! lines are a [`FormatError`].

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::SectionId;

/// Errors from reading or structurally parsing the metadata log.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The log file could not be read.
    #[error("failed to read metadata log '{path}': {source}")]
    Unreadable {
        /// Path of the log file
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// A section header is not of the form `[id]`.
    #[error("malformed section header at line {line}: '{text}'")]
    MalformedHeader {
        /// 1-based line number
        line: usize,
        /// The offending line
        text: String,
    },

    /// A key/value line appeared before any section header.
    #[error("key/value pair outside any section at line {line}: '{text}'")]
    PairOutsideSection {
        /// 1-based line number
        line: usize,
        /// The offending line
        text: String,
    },

    /// A non-blank, non-comment line has no `=` separator.
    #[error("missing '=' separator at line {line}: '{text}'")]
    MissingSeparator {
        /// 1-based line number
        line: usize,
        /// The offending line
        text: String,
    },
}

/// The fixed set of recognized metadata keys.
///
/// Dispatch over this enum replaces string comparison at every use site;
/// anything outside the set is discarded during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Author,
    Timestamp,
    Directory,
    Title,
    Message,
    Added,
    Modified,
    Deleted,
}

impl Key {
    /// Match a raw key case-insensitively against the recognized set.
    ///
    /// Returns `None` for unrecognized keys, which the parser ignores.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = match raw.to_ascii_lowercase().as_str() {
            "author" => Key::Author,
            "timestamp" => Key::Timestamp,
            "directory" => Key::Directory,
            "title" => Key::Title,
            "message" => Key::Message,
            "added" => Key::Added,
            "modified" => Key::Modified,
            "deleted" => Key::Deleted,
            _ => return None,
        };
        Some(key)
    }

    /// Canonical lowercase spelling, for diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Key::Author => "author",
            Key::Timestamp => "timestamp",
            Key::Directory => "directory",
            Key::Title => "title",
            Key::Message => "message",
            Key::Added => "added",
            Key::Modified => "modified",
            Key::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One recognized key/value pair, in declaration order within its section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    /// The recognized key
    pub key: Key,
    /// The single-line value, surrounding whitespace trimmed
    pub value: String,
}

/// One section of the metadata log: its id plus ordered pairs.
#[derive(Debug, Clone)]
pub struct Section {
    /// The section identifier (e.g. `v001`)
    pub id: SectionId,
    /// Recognized pairs in declaration order, duplicates intact
    pub pairs: Vec<Pair>,
}

/// The loaded metadata log.
///
/// Loading reads the whole file once; [`MetadataLog::sections`] then yields
/// sections lazily and can be called again to restart from the first section.
#[derive(Debug)]
pub struct MetadataLog {
    text: String,
}

impl MetadataLog {
    /// Load the metadata log from disk.
    pub fn load(path: &Path) -> Result<Self, FormatError> {
        let text = std::fs::read_to_string(path).map_err(|source| FormatError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { text })
    }

    /// Build a log from already-loaded text. Used by tests.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Iterate over sections in file order.
    ///
    /// Each call returns a fresh iterator starting at the first section.
    /// Iteration stops after the first `Err`.
    pub fn sections(&self) -> Sections<'_> {
        Sections {
            lines: self.text.lines().enumerate(),
            pending_header: None,
            done: false,
        }
    }
}

/// Lazy iterator over the log's sections.
pub struct Sections<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    /// A header line consumed while collecting the previous section's pairs.
    pending_header: Option<(usize, &'a str)>,
    done: bool,
}

impl<'a> Sections<'a> {
    /// Parse a `[id]` header line into a section id.
    fn parse_header(line_no: usize, line: &str) -> Result<SectionId, FormatError> {
        let malformed = || FormatError::MalformedHeader {
            line: line_no + 1,
            text: line.to_string(),
        };
        let inner = line
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(malformed)?;
        SectionId::new(inner.trim()).map_err(|_| malformed())
    }

    /// True for lines carrying no content.
    fn is_skippable(line: &str) -> bool {
        line.is_empty() || line.starts_with('#') || line.starts_with(';')
    }
}

impl<'a> Iterator for Sections<'a> {
    type Item = Result<Section, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        // Locate this section's header: either one stashed while finishing
        // the previous section, or the next header line in the stream.
        let (header_no, header_line) = match self.pending_header.take() {
            Some(header) => header,
            None => loop {
                let (no, raw) = match self.lines.next() {
                    Some(entry) => entry,
                    None => {
                        self.done = true;
                        return None;
                    }
                };
                let line = raw.trim();
                if Self::is_skippable(line) {
                    continue;
                }
                if line.starts_with('[') {
                    break (no, line);
                }
                self.done = true;
                return Some(Err(FormatError::PairOutsideSection {
                    line: no + 1,
                    text: line.to_string(),
                }));
            },
        };

        let id = match Self::parse_header(header_no, header_line) {
            Ok(id) => id,
            Err(err) => {
                self.done = true;
                return Some(Err(err));
            }
        };

        // Collect pairs until the next header or end of file.
        let mut pairs = Vec::new();
        for (no, raw) in self.lines.by_ref() {
            let line = raw.trim();
            if Self::is_skippable(line) {
                continue;
            }
            if line.starts_with('[') {
                self.pending_header = Some((no, line));
                break;
            }
            let Some((raw_key, raw_value)) = line.split_once('=') else {
                self.done = true;
                return Some(Err(FormatError::MissingSeparator {
                    line: no + 1,
                    text: line.to_string(),
                }));
            };
            if let Some(key) = Key::parse(raw_key.trim()) {
                pairs.push(Pair {
                    key,
                    value: raw_value.trim().to_string(),
                });
            }
            // Unrecognized keys are ignored by contract.
        }

        Some(Ok(Section { id, pairs }))
    }
}
