//! Release artifact pipeline library.
//!
//! This crate fetches per-channel build artifacts, verifies their SHA-256
//! manifests, extracts them, and validates and publishes them with an external
//! distribution tool. It is used by the `artifacts` CLI binary and can be
//! driven programmatically with stubbed collaborators for testing.
//!
//! # Modules
//!
//! - [`artifact`] - Artifact descriptors, catalog, channel filter, and
//!   platform/arch inference
//! - [`checksum`] - Manifest parsing, streaming SHA-256, and verification reports
//! - [`cli`] - Command-line argument definitions
//! - [`command`] - Argument vector building and external command invocation
//! - [`config`] - Settings file loading and the built-in catalog
//! - [`error`] - Semantic error types for pipeline runs
//! - [`fs`] - Filesystem capability used for directory creation and removal
//! - [`output`] - Console line formatting
//! - [`pacing`] - Inter-call delay for rate-limited tools
//! - [`pipeline`] - Stage orchestration over the active artifact set
//! - [`stage`] - Stage ordering, policies, and per-artifact outcomes

pub mod artifact;
pub mod checksum;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod fs;
pub mod output;
pub mod pacing;
pub mod pipeline;
pub mod stage;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
