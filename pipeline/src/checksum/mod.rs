//! Checksum manifest parsing and verification.
//!
//! # Sub-modules
//!
//! - [`digest`] - Streaming SHA-256 over readers.
//! - [`manifest_parser`] - `<hex> [*]<path>` manifest lines to entries.
//! - [`verification`] - Per-file results, diff markers, and report rows.

pub mod digest;
pub mod manifest_parser;
pub mod verification;

pub use manifest_parser::{ChecksumEntry, parse_manifest};
pub use verification::{CheckResult, verify_manifest, verify_one};
