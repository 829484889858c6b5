//! Settings file loader and the built-in EkoScape release catalog.
//!
//! Settings live in `artifacts.toml` next to the build. Every field is
//! optional: omitted values fall back to the defaults, which reproduce the
//! EkoScape release layout, so a project only writes what differs.
//!
//! ```toml
//! project = "esotericpig/ekoscape"
//! artifacts_dir = "build/artifacts"
//! pacing_ms = 500
//!
//! [tools]
//! publish = ["butler"]
//!
//! [[artifact]]
//! channel = "linux-x64"
//! name = "linux-appimage-x64"
//! file = "EkoScape-linux-x64.tar.gz"
//! ignore = ["*.debug"]
//! ```

use crate::artifact::{ArtifactSpec, Catalog};
use crate::error::{PipelineError, Result};
use crate::pacing::DEFAULT_PACING;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::Deserialize;
use std::time::Duration;

/// Settings file consulted when no path is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "artifacts.toml";

/// Publish address used when none is configured.
pub const DEFAULT_PROJECT: &str = "esotericpig/ekoscape";

/// Artifacts directory used when none is configured.
pub const DEFAULT_ARTIFACTS_DIR: &str = "build/artifacts";

/// Run-wide settings.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Publish address prefix, `<user>/<game>`.
    pub project: String,
    /// Directory artifacts are downloaded to and extracted in.
    pub artifacts_dir: Utf8PathBuf,
    /// Delay after each processed artifact, in milliseconds.
    pub pacing_ms: u64,
    /// Command prefixes for the external tools.
    pub tools: ToolCommands,
    /// Artifact descriptors, one `[[artifact]]` table each.
    #[serde(rename = "artifact")]
    pub artifacts: Vec<ArtifactSpec>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project: DEFAULT_PROJECT.to_owned(),
            artifacts_dir: Utf8PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            pacing_ms: u64::try_from(DEFAULT_PACING.as_millis()).unwrap_or(500),
            tools: ToolCommands::default(),
            artifacts: default_artifacts(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ConfigFile`] with `path` when the text is not
    /// valid settings TOML.
    ///
    /// # Examples
    ///
    /// ```
    /// use artifacts_pipeline::config::Settings;
    /// use camino::Utf8Path;
    ///
    /// let settings = Settings::from_toml("project = \"me/game\"", Utf8Path::new("inline"))?;
    /// assert_eq!(settings.project, "me/game");
    /// assert_eq!(settings.artifacts.len(), 3);
    /// # Ok::<(), artifacts_pipeline::error::PipelineError>(())
    /// ```
    pub fn from_toml(text: &str, path: &Utf8Path) -> Result<Self> {
        toml::from_str(text).map_err(|err| PipelineError::ConfigFile {
            path: path.to_owned(),
            reason: err.message().to_owned(),
        })
    }

    /// Read and parse the settings file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ConfigFile`] if the file cannot be read or
    /// parsed.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|err| PipelineError::ConfigFile {
            path: path.to_owned(),
            reason: err.to_string(),
        })?;
        Self::from_toml(&text, path)
    }

    /// Load `path` if given, else [`DEFAULT_CONFIG_FILE`] if it exists, else
    /// the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ConfigFile`] if the chosen file cannot be read
    /// or parsed. An explicit path that does not exist is an error.
    pub fn load_or_default(path: Option<&Utf8Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let fallback = Utf8Path::new(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            debug!(target: "config", "loading settings from {fallback}");
            return Self::load(fallback);
        }
        debug!(target: "config", "no {DEFAULT_CONFIG_FILE}; using built-in settings");
        Ok(Self::default())
    }

    /// Apply command-line overrides; blank values are ignored.
    #[must_use]
    pub fn with_overrides(mut self, project: Option<&str>, artifacts_dir: Option<&Utf8Path>) -> Self {
        if let Some(project) = project.map(str::trim).filter(|value| !value.is_empty()) {
            project.clone_into(&mut self.project);
        }
        if let Some(dir) = artifacts_dir.filter(|dir| !dir.as_str().trim().is_empty()) {
            dir.clone_into(&mut self.artifacts_dir);
        }
        self
    }

    /// Delay after each processed artifact.
    #[must_use]
    pub const fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    /// Build the immutable catalog from the artifact descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] for a malformed descriptor.
    pub fn catalog(&self) -> Result<Catalog> {
        Ok(Catalog::from_specs(self.artifacts.iter().cloned())?)
    }
}

/// Command prefixes for each external tool.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ToolCommands {
    /// Prefix of the download command; `download` is appended.
    pub download: Vec<String>,
    /// Prefix of the tar extractor.
    pub tar: Vec<String>,
    /// Prefix of the zip extractor.
    pub unzip: Vec<String>,
    /// Prefix of the publish tool.
    pub publish: Vec<String>,
}

impl Default for ToolCommands {
    fn default() -> Self {
        Self {
            download: words(&["gh", "run"]),
            tar: words(&["tar"]),
            unzip: words(&["unzip"]),
            publish: words(&["butler"]),
        }
    }
}

fn words(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|token| (*token).to_owned()).collect()
}

fn default_artifacts() -> Vec<ArtifactSpec> {
    vec![
        ArtifactSpec::new("linux-x64")
            .with_name("linux-appimage-x64")
            .with_file("EkoScape-linux-x64.tar.gz"),
        ArtifactSpec::new("macos-universal")
            .with_name("macos-uni")
            .with_file("EkoScape-macos-universal.tar.gz"),
        ArtifactSpec::new("windows-x64")
            .with_name("windows-x64")
            .with_file("EkoScape-windows-x64.zip"),
    ]
}
