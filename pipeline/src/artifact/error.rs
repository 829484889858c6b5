//! Error types for malformed artifact descriptors.
//!
//! Each variant names the offending channel or file so that a broken settings
//! file can be fixed without re-reading the whole catalog.

use thiserror::Error;

/// Errors arising from invalid artifact descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtifactError {
    /// The channel is missing or blank.
    #[error("artifact channel must not be empty")]
    EmptyChannel,

    /// Neither a source file nor an explicit directory was given.
    #[error("artifact for channel \"{channel}\" needs a source file or a directory")]
    MissingSource {
        /// Channel of the rejected descriptor.
        channel: String,
    },

    /// Stripping the extension from the source file left nothing behind.
    #[error("cannot derive a directory from file \"{file}\"")]
    InvalidSourceFile {
        /// The rejected source file.
        file: String,
    },

    /// Two descriptors share a channel.
    #[error("duplicate artifact channel \"{channel}\"")]
    DuplicateChannel {
        /// The repeated channel.
        channel: String,
    },
}

/// Result type alias using [`ArtifactError`].
pub type Result<T> = std::result::Result<T, ArtifactError>;
