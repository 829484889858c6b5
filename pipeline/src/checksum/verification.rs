//! Per-file checksum verification and report rows.

use super::digest::sha256_reader;
use super::manifest_parser::parse_manifest;
use crate::error::{PipelineError, Result};
use crate::fs::FileSystem;
use crate::output::{report_line, result_row};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::io::{Read, Write};

/// Outcome of checking one file against its expected digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    /// The digest matched, or the check ran in dry-run.
    Ok,
    /// The digest differed.
    Mismatch {
        /// Digest from the manifest.
        expected: String,
        /// Digest computed from the file.
        actual: String,
    },
    /// The target file does not exist.
    MissingFile,
}

impl CheckResult {
    /// Whether the check passed.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Report tag for the first column.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Ok => "[ok]",
            Self::Mismatch { .. } => "[BAD hex]",
            Self::MissingFile => "[NO file]",
        }
    }
}

/// Build a marker line pointing at differing characters.
///
/// Positions where both strings hold the same character get a space; every
/// other position, including those past the end of the shorter string, gets
/// a `^`.
///
/// # Examples
///
/// ```
/// use artifacts_pipeline::checksum::verification::diff_marker;
///
/// assert_eq!(diff_marker("abcd", "abXd"), "  ^ ");
/// assert_eq!(diff_marker("ab", "abcd"), "  ^^");
/// ```
#[must_use]
pub fn diff_marker(expected: &str, actual: &str) -> String {
    let expected: Vec<char> = expected.chars().collect();
    let actual: Vec<char> = actual.chars().collect();
    let len = expected.len().max(actual.len());
    (0..len)
        .map(|i| match (expected.get(i), actual.get(i)) {
            (Some(a), Some(b)) if a == b => ' ',
            _ => '^',
        })
        .collect()
}

/// Check `file` against `expected_hex` and write its report rows to `out`.
///
/// `file` is checked and read through `fs`. In dry-run nothing is read; the
/// file is reported `[ok]`.
///
/// # Errors
///
/// Returns [`PipelineError::Io`] when the file exists but cannot be read, or
/// [`PipelineError::WriteFailed`] when a report row cannot be written.
pub fn verify_one(
    fs: &dyn FileSystem,
    file: &Utf8Path,
    expected_hex: &str,
    dry_run: bool,
    out: &mut dyn Write,
) -> Result<CheckResult> {
    let result = check(fs, file, expected_hex.trim(), dry_run)?;
    report_line(out, result_row(result.tag(), file))?;
    if let CheckResult::Mismatch { expected, actual } = &result {
        report_line(out, result_row("", format!("{:<10}{expected}", "expected:")))?;
        report_line(out, result_row("", format!("{:<10}{actual}", "actual:")))?;
        report_line(
            out,
            result_row("", format!("{:<10}{}", "diff:", diff_marker(expected, actual))),
        )?;
    }
    Ok(result)
}

fn check(fs: &dyn FileSystem, file: &Utf8Path, expected: &str, dry_run: bool) -> Result<CheckResult> {
    if dry_run {
        debug!(target: "checksum", "dry-run; not hashing {file}");
        return Ok(CheckResult::Ok);
    }
    if !fs.is_file(file) {
        return Ok(CheckResult::MissingFile);
    }

    let actual = fs
        .open(file)
        .and_then(sha256_reader)
        .map_err(|source| PipelineError::io(file, source))?;
    if actual == expected {
        Ok(CheckResult::Ok)
    } else {
        Ok(CheckResult::Mismatch {
            expected: expected.to_owned(),
            actual,
        })
    }
}

/// Verify every entry of the manifest at `manifest_path`, read through `fs`.
///
/// Entry paths resolve against the manifest's directory. Every entry is
/// checked and reported even after a failure; the result is `true` only if
/// all of them passed, and `true` for a manifest without entries.
///
/// # Errors
///
/// Returns [`PipelineError::Io`] when the manifest or an existing target
/// cannot be read, or [`PipelineError::WriteFailed`] when the report cannot
/// be written.
pub fn verify_manifest(
    fs: &dyn FileSystem,
    manifest_path: &Utf8Path,
    dry_run: bool,
    out: &mut dyn Write,
) -> Result<bool> {
    let mut text = String::new();
    fs.open(manifest_path)
        .and_then(|mut reader| reader.read_to_string(&mut text))
        .map_err(|source| PipelineError::io(manifest_path, source))?;
    let base = manifest_path.parent().unwrap_or_else(|| Utf8Path::new(""));

    let mut all_ok = true;
    for entry in parse_manifest(&text) {
        let target: Utf8PathBuf = base.join(entry.relative_file());
        let result = verify_one(fs, &target, entry.expected_hex(), dry_run, out)?;
        all_ok &= result.is_ok();
    }
    Ok(all_ok)
}

#[cfg(test)]
#[path = "verification_tests.rs"]
mod tests;
