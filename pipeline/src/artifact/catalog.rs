//! The immutable artifact catalog and its filtered views.
//!
//! A [`Catalog`] is built once at startup. Narrowing it by channel produces an
//! [`ActiveSet`] of borrowed artifacts; the catalog itself is never mutated.

use super::descriptor::{Artifact, ArtifactSpec};
use super::error::{ArtifactError, Result};
use log::debug;
use std::collections::HashSet;

/// Ordered, immutable list of artifacts with unique channels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    artifacts: Vec<Artifact>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate channels.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::DuplicateChannel`] if two artifacts share a
    /// channel.
    pub fn new(artifacts: Vec<Artifact>) -> Result<Self> {
        let mut seen = HashSet::new();
        for artifact in &artifacts {
            if !seen.insert(artifact.channel()) {
                return Err(ArtifactError::DuplicateChannel {
                    channel: artifact.channel().to_owned(),
                });
            }
        }
        Ok(Self { artifacts })
    }

    /// Convert raw descriptors and build a catalog from them.
    ///
    /// # Errors
    ///
    /// Returns the first descriptor error, or a duplicate-channel error.
    ///
    /// # Examples
    ///
    /// ```
    /// use artifacts_pipeline::artifact::{ArtifactSpec, Catalog};
    ///
    /// let catalog = Catalog::from_specs([
    ///     ArtifactSpec::new("linux-x64").with_file("EkoScape-linux-x64.tar.gz"),
    ///     ArtifactSpec::new("windows-x64").with_file("EkoScape-windows-x64.zip"),
    /// ])?;
    /// assert_eq!(catalog.len(), 2);
    /// # Ok::<(), artifacts_pipeline::artifact::error::ArtifactError>(())
    /// ```
    pub fn from_specs<I>(specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = ArtifactSpec>,
    {
        let artifacts = specs
            .into_iter()
            .map(Artifact::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::new(artifacts)
    }

    /// All artifacts in declaration order.
    #[must_use]
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Number of artifacts in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether the catalog has no artifacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// A view over every artifact.
    #[must_use]
    pub fn all(&self) -> ActiveSet<'_> {
        ActiveSet {
            artifacts: self.artifacts.iter().collect(),
            catalog_len: self.artifacts.len(),
        }
    }

    /// A view over the artifacts whose channel contains any of `fragments`.
    ///
    /// Matching is a case-insensitive substring test against each trimmed
    /// fragment. Blank fragments are ignored, and an empty fragment list
    /// selects everything. Catalog order is preserved.
    ///
    /// # Examples
    ///
    /// ```
    /// use artifacts_pipeline::artifact::{ArtifactSpec, Catalog};
    ///
    /// let catalog = Catalog::from_specs([
    ///     ArtifactSpec::new("linux-x64").with_dir("linux"),
    ///     ArtifactSpec::new("windows-x64").with_dir("windows"),
    /// ])?;
    /// let active = catalog.filter(&["WIN"]);
    /// assert_eq!(active.channels(), ["windows-x64"]);
    /// assert!(catalog.filter(&["haiku"]).is_empty());
    /// # Ok::<(), artifacts_pipeline::artifact::error::ArtifactError>(())
    /// ```
    #[must_use]
    pub fn filter<S: AsRef<str>>(&self, fragments: &[S]) -> ActiveSet<'_> {
        let needles: Vec<String> = fragments
            .iter()
            .map(|fragment| fragment.as_ref().trim().to_lowercase())
            .filter(|fragment| !fragment.is_empty())
            .collect();
        if needles.is_empty() {
            return self.all();
        }

        let artifacts: Vec<&Artifact> = self
            .artifacts
            .iter()
            .filter(|artifact| {
                let channel = artifact.channel().to_lowercase();
                needles.iter().any(|needle| channel.contains(needle.as_str()))
            })
            .collect();
        debug!(
            "channel filter {needles:?} selected {} of {} artifacts",
            artifacts.len(),
            self.artifacts.len()
        );

        ActiveSet {
            artifacts,
            catalog_len: self.artifacts.len(),
        }
    }
}

/// Borrowed, ordered subset of a [`Catalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSet<'a> {
    artifacts: Vec<&'a Artifact>,
    catalog_len: usize,
}

impl<'a> ActiveSet<'a> {
    /// Iterate the active artifacts in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Artifact> + '_ {
        self.artifacts.iter().copied()
    }

    /// Number of active artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether no artifact is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Whether the view still contains the whole catalog.
    #[must_use]
    pub fn covers_catalog(&self) -> bool {
        self.artifacts.len() == self.catalog_len
    }

    /// Channels of the active artifacts in catalog order.
    #[must_use]
    pub fn channels(&self) -> Vec<&'a str> {
        self.artifacts.iter().map(|artifact| artifact.channel()).collect()
    }
}
