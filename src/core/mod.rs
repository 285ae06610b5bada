//! core
//!
//! Domain types and the conversion core.
//!
//! # Responsibilities
//!
//! - Strong types for branch names, section ids, commit times ([`types`])
//! - Parsing the store's metadata log into ordered sections ([`log`])
//! - Assembling one section into a validated change-set ([`changeset`])
//!
//! This module performs no I/O beyond reading the metadata log and never
//! touches the destination repository.

pub mod changeset;
pub mod log;
pub mod types;
