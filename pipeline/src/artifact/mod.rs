//! Artifact descriptors and the catalog they live in.
//!
//! # Sub-modules
//!
//! - [`catalog`] - Immutable artifact list and the channel filter view.
//! - [`descriptor`] - The `Artifact` record and its construction rules.
//! - [`error`] - Configuration errors raised while building descriptors.
//! - [`platform`] - Platform and architecture inference from channel names.

pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod platform;

pub use catalog::{ActiveSet, Catalog};
pub use descriptor::{Artifact, ArtifactSpec};
pub use platform::{Arch, Platform};
