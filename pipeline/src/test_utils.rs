//! Shared test utilities for the pipeline crate.
//!
//! The recorders here stand in for the executor, filesystem, and pacer so that
//! whole pipeline runs can be driven without spawning tools, touching disk, or
//! sleeping. [`FailingWriter`] exercises report write errors.

use crate::command::CommandExecutor;
use crate::fs::FileSystem;
use crate::pacing::Pacer;
use camino::{Utf8Path, Utf8PathBuf};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::io::{self, Cursor, Read, Write};
use std::process::ExitStatus;
use std::time::Duration;

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code.unsigned_abs())
}

/// A [`CommandExecutor`] that records every call and replays exit codes.
///
/// Exit codes are consumed in call order; once they run out every call
/// succeeds.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: RefCell<Vec<Vec<String>>>,
    exit_codes: RefCell<VecDeque<i32>>,
}

impl RecordingExecutor {
    /// An executor whose calls all succeed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An executor that returns `codes` for its first calls.
    #[must_use]
    pub fn with_exit_codes(codes: impl IntoIterator<Item = i32>) -> Self {
        Self {
            calls: RefCell::default(),
            exit_codes: RefCell::new(codes.into_iter().collect()),
        }
    }

    /// Recorded calls, program first.
    #[must_use]
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    /// Recorded calls joined with spaces.
    #[must_use]
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|call| call.join(" ")).collect()
    }
}

impl CommandExecutor for RecordingExecutor {
    fn run(&self, program: &str, args: &[String]) -> io::Result<ExitStatus> {
        let mut call = vec![program.to_owned()];
        call.extend(args.iter().cloned());
        self.calls.borrow_mut().push(call);
        let code = self.exit_codes.borrow_mut().pop_front().unwrap_or(0);
        Ok(exit_status(code))
    }
}

/// An in-memory [`FileSystem`] that records creations and removals.
#[derive(Debug, Default)]
pub struct RecordingFileSystem {
    dirs: RefCell<BTreeSet<Utf8PathBuf>>,
    files: BTreeMap<Utf8PathBuf, Vec<u8>>,
    created: RefCell<Vec<Utf8PathBuf>>,
    removed: RefCell<Vec<Utf8PathBuf>>,
}

impl RecordingFileSystem {
    /// An empty filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an existing directory.
    #[must_use]
    pub fn with_dir(self, path: impl Into<Utf8PathBuf>) -> Self {
        self.dirs.borrow_mut().insert(path.into());
        self
    }

    /// Add an existing file holding `contents`.
    #[must_use]
    pub fn with_file(
        mut self,
        path: impl Into<Utf8PathBuf>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }

    /// Directories created so far, in order.
    #[must_use]
    pub fn created(&self) -> Vec<Utf8PathBuf> {
        self.created.borrow().clone()
    }

    /// Directories removed so far, in order.
    #[must_use]
    pub fn removed(&self) -> Vec<Utf8PathBuf> {
        self.removed.borrow().clone()
    }
}

impl FileSystem for RecordingFileSystem {
    fn is_dir(&self, path: &Utf8Path) -> bool {
        self.dirs.borrow().contains(path)
    }

    fn is_file(&self, path: &Utf8Path) -> bool {
        self.files.contains_key(path)
    }

    fn create_dir_all(&self, path: &Utf8Path) -> io::Result<()> {
        self.dirs.borrow_mut().insert(path.to_owned());
        self.created.borrow_mut().push(path.to_owned());
        Ok(())
    }

    fn remove_dir_all(&self, path: &Utf8Path) -> io::Result<()> {
        let mut dirs = self.dirs.borrow_mut();
        if !dirs.contains(path) {
            return Err(io::Error::new(io::ErrorKind::NotFound, path.as_str()));
        }
        dirs.retain(|dir| !dir.starts_with(path));
        self.removed.borrow_mut().push(path.to_owned());
        Ok(())
    }

    fn open(&self, path: &Utf8Path) -> io::Result<Box<dyn Read>> {
        let contents = self
            .files
            .get(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.as_str()))?;
        Ok(Box::new(Cursor::new(contents.clone())))
    }
}

/// A [`Pacer`] that records requested pauses instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingPacer {
    pauses: RefCell<Vec<Duration>>,
}

impl RecordingPacer {
    /// A pacer with no recorded pauses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pauses requested so far.
    #[must_use]
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.borrow().clone()
    }
}

impl Pacer for RecordingPacer {
    fn pause(&self, interval: Duration) {
        self.pauses.borrow_mut().push(interval);
    }
}

/// A [`Write`] implementation that always fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("simulated write failure"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::other("simulated flush failure"))
    }
}
