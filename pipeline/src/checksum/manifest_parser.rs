//! Checksum manifest parsing.
//!
//! A manifest holds one `<hex-digest><whitespace>[*]<relative-path>` entry
//! per line, as written by `sha256sum`. Lines that do not split into two
//! non-empty parts are skipped rather than reported, since blank lines and
//! comments are common in hand-edited manifests.

/// One expected digest for one file, relative to the manifest's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumEntry {
    expected_hex: String,
    relative_file: String,
}

impl ChecksumEntry {
    /// The digest the file is expected to hash to.
    #[must_use]
    pub fn expected_hex(&self) -> &str {
        &self.expected_hex
    }

    /// The file path as written in the manifest.
    #[must_use]
    pub fn relative_file(&self) -> &str {
        &self.relative_file
    }
}

/// Parse one manifest line into an entry.
///
/// The line is split on its first run of whitespace; a single `*`
/// binary-mode marker in front of the path is dropped.
///
/// # Examples
///
/// ```
/// use artifacts_pipeline::checksum::manifest_parser::parse_line;
///
/// let entry = parse_line("abc123 *EkoScape.zip").expect("entry");
/// assert_eq!(entry.expected_hex(), "abc123");
/// assert_eq!(entry.relative_file(), "EkoScape.zip");
/// assert!(parse_line("   ").is_none());
/// ```
#[must_use]
pub fn parse_line(line: &str) -> Option<ChecksumEntry> {
    let (digest, rest) = line.trim().split_once(char::is_whitespace)?;
    let path = rest.trim_start();
    let file = path.strip_prefix('*').unwrap_or(path).trim();
    let hex = digest.trim();
    if hex.is_empty() || file.is_empty() {
        return None;
    }
    Some(ChecksumEntry {
        expected_hex: hex.to_owned(),
        relative_file: file.to_owned(),
    })
}

/// Parse manifest text, tolerating a UTF-8 byte order mark.
#[must_use]
pub fn parse_manifest(text: &str) -> Vec<ChecksumEntry> {
    text.strip_prefix('\u{feff}')
        .unwrap_or(text)
        .lines()
        .filter_map(parse_line)
        .collect()
}
