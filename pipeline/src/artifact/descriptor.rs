//! The artifact record and its construction rules.
//!
//! An [`ArtifactSpec`] is the raw descriptor as written in the settings file;
//! converting it into an [`Artifact`] trims every field, derives the
//! destination directory, and layers explicit platform/arch overrides over
//! inference from the channel name.

use super::error::{ArtifactError, Result};
use super::platform::{Arch, Platform};
use camino::Utf8Path;
use serde::Deserialize;

/// Raw artifact descriptor as read from configuration.
///
/// # Examples
///
/// ```
/// use artifacts_pipeline::artifact::descriptor::{Artifact, ArtifactSpec};
///
/// let spec = ArtifactSpec::new("linux-x64")
///     .with_name("linux-appimage-x64")
///     .with_file("EkoScape-linux-x64.tar.gz");
/// let artifact = Artifact::try_from(spec).expect("valid descriptor");
/// assert_eq!(artifact.dest_dir(), "EkoScape-linux-x64");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArtifactSpec {
    /// Release channel; the publish address suffix.
    pub channel: String,
    /// Name of the artifact in the build-artifact store.
    pub name: Option<String>,
    /// Compressed artifact, relative to the artifacts directory.
    pub file: Option<String>,
    /// Explicit destination directory, relative to the artifacts directory.
    pub dir: Option<String>,
    /// Patterns excluded from publishing.
    pub ignore: Vec<String>,
    /// Explicit platform; inferred from the channel when absent.
    pub platform: Option<Platform>,
    /// Explicit architecture; inferred from the channel when absent.
    pub arch: Option<Arch>,
}

impl ArtifactSpec {
    /// Start a descriptor for `channel` with every other field empty.
    #[must_use]
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            ..Self::default()
        }
    }

    /// Set the build-artifact store name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the compressed source file.
    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Set an explicit destination directory.
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<String>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Append a publish ignore pattern.
    #[must_use]
    pub fn with_ignore(mut self, pattern: impl Into<String>) -> Self {
        self.ignore.push(pattern.into());
        self
    }

    /// Pin the platform instead of inferring it.
    #[must_use]
    pub const fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Pin the architecture instead of inferring it.
    #[must_use]
    pub const fn with_arch(mut self, arch: Arch) -> Self {
        self.arch = Some(arch);
        self
    }
}

/// One distributable unit for one release channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    channel: String,
    name: Option<String>,
    source_file: Option<String>,
    dest_dir: String,
    ignore_patterns: Vec<String>,
    platform: Option<Platform>,
    arch: Option<Arch>,
}

impl Artifact {
    /// Release channel, unique within a catalog.
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Build-artifact store name; `None` means the artifact is not fetchable.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Compressed source file; `None` means the artifact is already a directory.
    #[must_use]
    pub fn source_file(&self) -> Option<&str> {
        self.source_file.as_deref()
    }

    /// Directory the contents are extracted to and published from.
    #[must_use]
    pub fn dest_dir(&self) -> &str {
        &self.dest_dir
    }

    /// Publish ignore patterns in declaration order.
    #[must_use]
    pub fn ignore_patterns(&self) -> &[String] {
        &self.ignore_patterns
    }

    /// Explicit or inferred platform.
    #[must_use]
    pub const fn platform(&self) -> Option<Platform> {
        self.platform
    }

    /// Explicit or inferred architecture.
    #[must_use]
    pub const fn arch(&self) -> Option<Arch> {
        self.arch
    }
}

impl TryFrom<ArtifactSpec> for Artifact {
    type Error = ArtifactError;

    fn try_from(spec: ArtifactSpec) -> Result<Self> {
        let channel = spec.channel.trim().to_owned();
        if channel.is_empty() {
            return Err(ArtifactError::EmptyChannel);
        }

        let source_file = non_blank(spec.file);
        let dest_dir = match (non_blank(spec.dir), source_file.as_deref()) {
            (Some(dir), _) => dir,
            (None, Some(file)) => derive_dest_dir(file)?,
            (None, None) => return Err(ArtifactError::MissingSource { channel }),
        };

        let ignore_patterns = spec
            .ignore
            .iter()
            .map(|pattern| pattern.trim())
            .filter(|pattern| !pattern.is_empty())
            .map(str::to_owned)
            .collect();

        Ok(Self {
            platform: spec.platform.or_else(|| Platform::infer(&channel)),
            arch: spec.arch.or_else(|| Arch::infer(&channel)),
            name: non_blank(spec.name),
            source_file,
            dest_dir,
            ignore_patterns,
            channel,
        })
    }
}

/// Strip the extension group from a source file to name its directory.
///
/// The extension group is the longest run of `.<ext>` suffixes, so `.tar.gz`
/// is removed as one unit. Any parent directories of the file are preserved.
///
/// # Errors
///
/// Returns [`ArtifactError::InvalidSourceFile`] when nothing remains.
///
/// # Examples
///
/// ```
/// use artifacts_pipeline::artifact::descriptor::derive_dest_dir;
///
/// assert_eq!(derive_dest_dir("EkoScape-linux-x64.tar.gz").unwrap(), "EkoScape-linux-x64");
/// assert_eq!(derive_dest_dir("nightly/EkoScape.zip").unwrap(), "nightly/EkoScape");
/// assert!(derive_dest_dir(".zip").is_err());
/// ```
pub fn derive_dest_dir(file: &str) -> Result<String> {
    let invalid = || ArtifactError::InvalidSourceFile {
        file: file.to_owned(),
    };
    let path = Utf8Path::new(file.trim());
    let file_name = path.file_name().ok_or_else(invalid)?;
    let stem = file_name.split('.').next().unwrap_or_default();
    if stem.is_empty() {
        return Err(invalid());
    }

    let dest = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .map_or_else(|| stem.to_owned(), |parent| parent.join(stem).into_string());
    Ok(dest)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::tar_gz("EkoScape-linux-x64.tar.gz", "EkoScape-linux-x64")]
    #[case::zip("EkoScape-windows-x64.zip", "EkoScape-windows-x64")]
    #[case::no_extension("EkoScape", "EkoScape")]
    #[case::dotted_version("EkoScape-v1.2.zip", "EkoScape-v1")]
    #[case::nested("nightly/EkoScape.tar.gz", "nightly/EkoScape")]
    #[case::padded("  EkoScape.zip  ", "EkoScape")]
    fn derives_dest_dir(#[case] file: &str, #[case] expected: &str) {
        assert_eq!(derive_dest_dir(file).expect("derivable"), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::only_extension(".zip")]
    #[case::hidden(".hidden.tar.gz")]
    #[case::dot(".")]
    fn rejects_underivable_files(#[case] file: &str) {
        let err = derive_dest_dir(file).expect_err("should not derive");
        assert!(matches!(err, ArtifactError::InvalidSourceFile { .. }));
    }

    #[test]
    fn derivation_is_deterministic() {
        let first = derive_dest_dir("EkoScape-macos-universal.tar.gz").expect("derivable");
        let second = derive_dest_dir("EkoScape-macos-universal.tar.gz").expect("derivable");
        assert_eq!(first, second);
    }

    #[test]
    fn builds_artifact_with_inferred_metadata() {
        let artifact = Artifact::try_from(
            ArtifactSpec::new(" windows-x64 ")
                .with_name("windows-x64")
                .with_file("EkoScape-windows-x64.zip"),
        )
        .expect("valid");

        assert_eq!(artifact.channel(), "windows-x64");
        assert_eq!(artifact.name(), Some("windows-x64"));
        assert_eq!(artifact.source_file(), Some("EkoScape-windows-x64.zip"));
        assert_eq!(artifact.dest_dir(), "EkoScape-windows-x64");
        assert_eq!(artifact.platform(), Some(Platform::Windows));
        assert_eq!(artifact.arch(), Some(Arch::X64));
    }

    #[test]
    fn explicit_dir_wins_over_derivation() {
        let artifact = Artifact::try_from(
            ArtifactSpec::new("linux-x64")
                .with_file("EkoScape-linux-x64.tar.gz")
                .with_dir("custom"),
        )
        .expect("valid");
        assert_eq!(artifact.dest_dir(), "custom");
    }

    #[test]
    fn directory_artifact_has_no_source_file() {
        let artifact =
            Artifact::try_from(ArtifactSpec::new("linux-x64").with_dir("local-build")).expect("valid");
        assert_eq!(artifact.source_file(), None);
        assert_eq!(artifact.name(), None);
        assert_eq!(artifact.dest_dir(), "local-build");
    }

    #[test]
    fn explicit_metadata_overrides_inference() {
        let artifact = Artifact::try_from(
            ArtifactSpec::new("win-or-mac")
                .with_dir("out")
                .with_platform(Platform::Linux)
                .with_arch(Arch::X86),
        )
        .expect("valid");
        assert_eq!(artifact.platform(), Some(Platform::Linux));
        assert_eq!(artifact.arch(), Some(Arch::X86));
    }

    #[test]
    fn ambiguous_channel_leaves_platform_absent() {
        let artifact =
            Artifact::try_from(ArtifactSpec::new("win-or-mac").with_dir("out")).expect("valid");
        assert_eq!(artifact.platform(), None);
    }

    #[test]
    fn ignore_patterns_are_trimmed_and_blank_ones_dropped() {
        let artifact = Artifact::try_from(
            ArtifactSpec::new("linux-x64")
                .with_dir("out")
                .with_ignore(" *.pdb ")
                .with_ignore("   ")
                .with_ignore("logs/"),
        )
        .expect("valid");
        assert_eq!(artifact.ignore_patterns(), ["*.pdb", "logs/"]);
    }

    #[rstest]
    #[case::blank_channel(ArtifactSpec::new("   ").with_dir("out"))]
    #[case::no_source(ArtifactSpec::new("linux-x64"))]
    #[case::blank_sources(ArtifactSpec::new("linux-x64").with_file(" ").with_dir(""))]
    fn rejects_incomplete_descriptors(#[case] spec: ArtifactSpec) {
        assert!(Artifact::try_from(spec).is_err());
    }

    #[test]
    fn missing_source_names_the_channel() {
        let err = Artifact::try_from(ArtifactSpec::new("linux-x64")).expect_err("no source");
        assert_eq!(
            err,
            ArtifactError::MissingSource {
                channel: "linux-x64".to_owned()
            }
        );
    }
}
