//! Platform and architecture metadata for publish-tool flags.
//!
//! Both values are inferred from the channel name when the settings file does
//! not pin them. Inference only answers when exactly one keyword family
//! matches; a channel such as `win-or-mac` yields no platform at all, so the
//! publish tool never receives a guessed `--platform` or `--arch` flag.

use log::trace;
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::sync::LazyLock;

/// Operating system family an artifact targets.
///
/// # Examples
///
/// ```
/// use artifacts_pipeline::artifact::platform::Platform;
///
/// assert_eq!(Platform::infer("linux-x64"), Some(Platform::Linux));
/// assert_eq!(Platform::MacOs.as_flag(), "darwin");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Microsoft Windows.
    Windows,
    /// Linux distributions.
    Linux,
    /// Apple macOS.
    #[serde(alias = "mac", alias = "osx", alias = "darwin")]
    MacOs,
}

impl Platform {
    /// Return the value passed to the publish tool's `--platform` flag.
    #[must_use]
    pub const fn as_flag(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::MacOs => "darwin",
        }
    }

    /// Infer the platform from a channel name.
    ///
    /// Returns `None` when no keyword family or more than one matches.
    #[must_use]
    pub fn infer(channel: &str) -> Option<Self> {
        let found = infer_unique(&normalise_channel(channel), &PLATFORM_PATTERNS);
        trace!("platform inference for {channel:?}: {found:?}");
        found
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_flag())
    }
}

/// Processor architecture family an artifact targets.
///
/// # Examples
///
/// ```
/// use artifacts_pipeline::artifact::platform::Arch;
///
/// assert_eq!(Arch::infer("windows-x64"), Some(Arch::X64));
/// assert_eq!(Arch::infer("linux-x86_64"), Some(Arch::X64));
/// assert_eq!(Arch::infer("win32-i686"), Some(Arch::X86));
/// assert_eq!(Arch::infer("macos-universal"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Arch {
    /// 32-bit x86.
    #[serde(rename = "386", alias = "x86", alias = "i386", alias = "i686", alias = "32")]
    X86,
    /// 64-bit x86.
    #[serde(rename = "amd64", alias = "x64", alias = "x86_64", alias = "64")]
    X64,
}

impl Arch {
    /// Return the value passed to the publish tool's `--arch` flag.
    #[must_use]
    pub const fn as_flag(self) -> &'static str {
        match self {
            Self::X86 => "386",
            Self::X64 => "amd64",
        }
    }

    /// Infer the architecture from a channel name.
    ///
    /// Returns `None` when no marker family or both families match.
    #[must_use]
    pub fn infer(channel: &str) -> Option<Self> {
        let found = infer_unique(&normalise_channel(channel), &ARCH_PATTERNS);
        trace!("arch inference for {channel:?}: {found:?}");
        found
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_flag())
    }
}

// Keywords may sit inside a longer token (`windows10`, `ekoscapelinux`). A
// leading boundary keeps `darwin` out of Windows and `tarmac` out of macOS.
static PLATFORM_PATTERNS: LazyLock<Vec<(Platform, Regex)>> = LazyLock::new(|| {
    compile_families(&[
        (Platform::Windows, r"\bwin(?:dows)?"),
        (Platform::Linux, r"linux"),
        (Platform::MacOs, r"\bmac|osx"),
    ])
});

// `x86-64` is folded into `x64` before matching, so a bare `x86` is 32-bit.
// Bit markers may follow letters (`linux64`, `win32`) but not other digits.
static ARCH_PATTERNS: LazyLock<Vec<(Arch, Regex)>> = LazyLock::new(|| {
    compile_families(&[
        (Arch::X86, r"(?:^|\D)(?:i?[3-6]86|32(?:bit)?)(?:\D|$)|x86(?:\D|$)"),
        (Arch::X64, r"amd64|x64|(?:^|\D)64(?:bit)?(?:\D|$)"),
    ])
});

#[expect(
    clippy::expect_used,
    reason = "patterns are string literals covered by the unit tests"
)]
fn compile_families<T: Copy>(patterns: &[(T, &str)]) -> Vec<(T, Regex)> {
    patterns
        .iter()
        .map(|(family, pattern)| {
            let regex = Regex::new(pattern).expect("family pattern should compile");
            (*family, regex)
        })
        .collect()
}

/// Lower-case the channel, fold separators, and drop ARM 64-bit markers.
///
/// ARM builds have no publish-tool arch flag, so `arm64` must not read as a
/// 64-bit x86 marker.
fn normalise_channel(channel: &str) -> String {
    channel
        .trim()
        .to_lowercase()
        .replace('_', "-")
        .replace("x86-64", "x64")
        .replace("aarch64", "arm")
        .replace("arm64", "arm")
}

/// Return the single family whose pattern matches, or `None`.
fn infer_unique<T: Copy + PartialEq>(haystack: &str, families: &[(T, Regex)]) -> Option<T> {
    let mut matched: Option<T> = None;
    for (family, regex) in families {
        if !regex.is_match(haystack) {
            continue;
        }
        if matched.is_some_and(|previous| previous != *family) {
            return None;
        }
        matched = Some(*family);
    }
    matched
}
