//! Error types for pipeline runs.
//!
//! Verification mismatches, missing checksum targets, and failing external
//! tools are reported results rather than errors; the variants here are the
//! conditions that stop a run.

use crate::artifact::error::ArtifactError;
use crate::stage::Stage;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// An artifact descriptor is malformed.
    #[error("invalid artifact configuration: {0}")]
    Configuration(#[from] ArtifactError),

    /// The settings file could not be read or parsed.
    #[error("invalid settings file {path}: {reason}")]
    ConfigFile {
        /// Path of the settings file.
        path: Utf8PathBuf,
        /// Description of the read or parse failure.
        reason: String,
    },

    /// The source file has an extension no extractor handles.
    #[error("unsupported archive type: {file}; expected .tar.gz or .zip")]
    UnsupportedArchive {
        /// The rejected source file.
        file: Utf8PathBuf,
    },

    /// A tracked stage failed for a channel, so the run was stopped.
    #[error("{stage} failed for channel [{channel}]; aborting remaining work")]
    ChannelFailed {
        /// Stage that was running.
        stage: Stage,
        /// Channel whose action failed.
        channel: String,
    },

    /// A filesystem operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path the operation touched.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Writing to the console failed.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Wrap an I/O error with the path it concerns.
    #[must_use]
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using [`PipelineError`].
pub type Result<T> = std::result::Result<T, PipelineError>;
