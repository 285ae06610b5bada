//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`BranchName`] - Validated Git branch name
//! - [`Oid`] - Git object identifier (SHA)
//! - [`SectionId`] - Opaque identifier of one metadata-log section
//! - [`CommitTime`] - Epoch seconds fixed with the local UTC offset
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use attic::core::types::{BranchName, Oid, SectionId};
//!
//! let branch = BranchName::new("imports/legacy").unwrap();
//! let oid = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
//! let section = SectionId::new("v001").unwrap();
//!
//! assert!(BranchName::new("invalid..name").is_err());
//! assert!(Oid::new("not-a-sha").is_err());
//! assert!(SectionId::new("").is_err());
//! ```

use chrono::{DateTime, FixedOffset, Local, Offset, TimeZone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid object id: {0}")]
    InvalidOid(String),

    #[error("invalid section id: {0}")]
    InvalidSectionId(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// A validated Git branch name.
///
/// Branch names must conform to Git's refname rules (see
/// `git check-ref-format`): non-empty, no leading `.` or `-`, no trailing
/// `.lock` or `/`, no `..`, `@{`, `//`, control characters, or the
/// characters `~^:\?*[` and space, and not exactly `@`.
///
/// # Example
///
/// ```
/// use attic::core::types::BranchName;
///
/// let name = BranchName::new("imports/legacy").unwrap();
/// assert_eq!(name.as_str(), "imports/legacy");
///
/// assert!(BranchName::new("").is_err());
/// assert!(BranchName::new("has space").is_err());
/// assert!(BranchName::new("branch.lock").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name violates Git's
    /// refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// Validate a branch name against Git's refname rules.
    fn validate(name: &str) -> Result<(), TypeError> {
        let fail = |msg: &str| Err(TypeError::InvalidBranchName(msg.to_string()));

        if name.is_empty() {
            return fail("branch name cannot be empty");
        }
        if name == "@" {
            return fail("branch name cannot be '@' (reserved)");
        }
        if name.starts_with('-') {
            return fail("branch name cannot start with '-'");
        }
        if name.ends_with('/') {
            return fail("branch name cannot end with '/'");
        }
        if name.contains("..") {
            return fail("branch name cannot contain '..'");
        }
        if name.contains("@{") {
            return fail("branch name cannot contain '@{'");
        }
        if name.contains("//") {
            return fail("branch name cannot contain '//'");
        }

        const INVALID_CHARS: [char; 8] = [' ', '~', '^', ':', '\\', '?', '*', '['];
        if name.contains(&INVALID_CHARS[..]) {
            return fail("branch name contains a forbidden character");
        }
        if name.chars().any(|c| c.is_ascii_control()) {
            return fail("branch name cannot contain control characters");
        }

        // Per-component rules (components are separated by '/')
        for component in name.split('/') {
            if component.starts_with('.') {
                return fail("path component cannot start with '.'");
            }
            if component.ends_with(".lock") {
                return fail("path component cannot end with '.lock'");
            }
        }

        Ok(())
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The full ref name for this branch (`refs/heads/<name>`).
    pub fn refname(&self) -> String {
        format!("refs/heads/{}", self.0)
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A Git object identifier (SHA-1 or SHA-256).
///
/// OIDs are normalized to lowercase for consistency.
///
/// # Example
///
/// ```
/// use attic::core::types::Oid;
///
/// let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
/// assert_eq!(oid.short(7), "abc123d");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid(String);

impl Oid {
    /// Create a new validated object id.
    ///
    /// The OID is normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` if the string is not a valid hex OID.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().to_ascii_lowercase();
        // SHA-1 is 40 hex chars, SHA-256 is 64
        if oid.len() != 40 && oid.len() != 64 {
            return Err(TypeError::InvalidOid(format!(
                "expected 40 or 64 hex characters, got {}",
                oid.len()
            )));
        }
        if !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidOid(
                "contains non-hex characters".to_string(),
            ));
        }
        Ok(Self(oid))
    }

    /// Get the OID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get an abbreviated form of the OID.
    ///
    /// Returns the first `len` characters. If `len` exceeds the OID length,
    /// returns the full OID.
    pub fn short(&self, len: usize) -> &str {
        &self.0[..len.min(self.0.len())]
    }
}

impl TryFrom<String> for Oid {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Oid> for String {
    fn from(oid: Oid) -> Self {
        oid.0
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The identifier of one metadata-log section (e.g. `v001`).
///
/// Section ids are opaque ordered tokens: their relative position in the log
/// defines replay order, and no numeric or lexical meaning is read into the
/// token itself. The only structural requirements are that the id is
/// non-empty and contains no `]`, whitespace, or control characters (which
/// could not have survived the log's header syntax).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SectionId(String);

impl SectionId {
    /// Create a new validated section id.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TypeError::InvalidSectionId(
                "section id cannot be empty".to_string(),
            ));
        }
        if id.contains(']') || id.chars().any(|c| c.is_whitespace() || c.is_ascii_control()) {
            return Err(TypeError::InvalidSectionId(format!(
                "section id '{id}' contains forbidden characters"
            )));
        }
        Ok(Self(id))
    }

    /// Get the section id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SectionId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<SectionId> for String {
    fn from(id: SectionId) -> Self {
        id.0
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A commit timestamp: epoch seconds plus the local machine's UTC offset.
///
/// The offset is captured at construction time (from the local timezone at
/// that instant, so DST is respected), which is the moment a change-set's
/// authorship time becomes fixed. Author and committer times are always
/// identical.
///
/// # Example
///
/// ```
/// use attic::core::types::CommitTime;
///
/// let time = CommitTime::from_epoch(1_500_000_000).unwrap();
/// assert_eq!(time.seconds(), 1_500_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitTime {
    seconds: i64,
    offset_minutes: i32,
}

impl CommitTime {
    /// Fix a commit time from epoch seconds, capturing the local UTC offset
    /// in effect at that instant.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidTimestamp` if the epoch value is outside
    /// the representable datetime range.
    pub fn from_epoch(seconds: i64) -> Result<Self, TypeError> {
        let local = Local
            .timestamp_opt(seconds, 0)
            .single()
            .ok_or_else(|| TypeError::InvalidTimestamp(format!("epoch {seconds} out of range")))?;
        Ok(Self {
            seconds,
            offset_minutes: local.offset().fix().local_minus_utc() / 60,
        })
    }

    /// Epoch seconds.
    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// UTC offset in minutes, as captured at construction.
    pub fn offset_minutes(&self) -> i32 {
        self.offset_minutes
    }

    /// The timestamp as a timezone-fixed datetime.
    pub fn to_datetime(&self) -> DateTime<FixedOffset> {
        // The offset was validated at construction; 0 is a safe fallback for
        // an offset that cannot be rebuilt (it cannot in practice).
        let offset =
            FixedOffset::east_opt(self.offset_minutes * 60).unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
        offset
            .timestamp_opt(self.seconds, 0)
            .single()
            .expect("epoch validated at construction")
    }
}

impl std::fmt::Display for CommitTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_datetime().to_rfc2822())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_name_accepts_valid_names() {
        for name in ["main", "imports/legacy", "user@feature", "v2"] {
            assert!(BranchName::new(name).is_ok(), "rejected {name}");
        }
    }

    #[test]
    fn branch_name_rejects_invalid_names() {
        for name in ["", "@", "-lead", "trail/", "a..b", "a@{b", "a//b", "a b", "x.lock"] {
            assert!(BranchName::new(name).is_err(), "accepted {name}");
        }
    }

    #[test]
    fn oid_normalizes_to_lowercase() {
        let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
        assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
    }

    #[test]
    fn section_id_rejects_structurally_impossible_tokens() {
        assert!(SectionId::new("v001").is_ok());
        assert!(SectionId::new("").is_err());
        assert!(SectionId::new("v0]01").is_err());
        assert!(SectionId::new("v 1").is_err());
    }

    #[test]
    fn commit_time_preserves_epoch() {
        let time = CommitTime::from_epoch(1_500_000_000).unwrap();
        assert_eq!(time.seconds(), 1_500_000_000);
        assert_eq!(time.to_datetime().timestamp(), 1_500_000_000);
    }
}
