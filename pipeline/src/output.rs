//! Console line formatting for pipeline runs.
//!
//! Release tooling scrapes these lines, so their shapes are fixed: result rows
//! are a nine-column left-aligned tag followed by a value, and channel banners
//! start with `=>`. Result rows and banners go through [`report_line`], which
//! fails the run when they cannot be written; command echoes and spacing use
//! the best-effort [`write_line`].

use crate::error::{PipelineError, Result};
use std::fmt::Display;
use std::io::Write;

/// Width of the tag column in result rows.
pub const TAG_WIDTH: usize = 9;

/// Write a line to `out`, ignoring write failures.
pub fn write_line(out: &mut dyn Write, message: impl Display) {
    if writeln!(out, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Write a report line to `out`.
///
/// # Errors
///
/// Returns [`PipelineError::WriteFailed`] if the line cannot be written.
pub fn report_line(out: &mut dyn Write, message: impl Display) -> Result<()> {
    writeln!(out, "{message}").map_err(|source| PipelineError::WriteFailed { source })
}

/// Format a result row: the tag padded to [`TAG_WIDTH`], a space, the value.
///
/// # Examples
///
/// ```
/// use artifacts_pipeline::output::result_row;
///
/// assert_eq!(result_row("[ok]", "a.zip"), "[ok]      a.zip");
/// assert_eq!(result_row("", "diff: ^"), "          diff: ^");
/// ```
#[must_use]
pub fn result_row(tag: &str, value: impl Display) -> String {
    format!("{tag:<TAG_WIDTH$} {value}")
}

/// Banner printed after a tracked action finishes for a channel.
#[must_use]
pub fn channel_banner(channel: &str, succeeded: bool) -> String {
    let verdict = if succeeded { "succeeded" } else { "failed" };
    format!("=> Channel [{channel}] {verdict}!")
}

/// Banner printed when every tracked channel in a stage succeeded.
#[must_use]
pub fn all_channels_banner(channels: &[&str]) -> String {
    format!("=> All channels succeeded! [{}]", channels.join(", "))
}
