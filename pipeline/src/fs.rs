//! Filesystem capability for the artifacts tree.
//!
//! Stages check, create, and remove directories and read manifests and
//! archives only through [`FileSystem`].

use camino::Utf8Path;
use std::fs::File;
use std::io::{self, Read};

/// Filesystem operations the pipeline performs on the artifacts tree.
#[cfg_attr(test, mockall::automock)]
pub trait FileSystem {
    /// Whether `path` is an existing directory.
    fn is_dir(&self, path: &Utf8Path) -> bool;

    /// Whether `path` is an existing regular file.
    fn is_file(&self, path: &Utf8Path) -> bool;

    /// Create `path` and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn create_dir_all(&self, path: &Utf8Path) -> io::Result<()>;

    /// Remove `path` and everything below it.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn remove_dir_all(&self, path: &Utf8Path) -> io::Result<()>;

    /// Open the file at `path` for reading.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn open(&self, path: &Utf8Path) -> io::Result<Box<dyn Read>>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFileSystem;

impl FileSystem for SystemFileSystem {
    fn is_dir(&self, path: &Utf8Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Utf8Path) -> bool {
        path.is_file()
    }

    fn create_dir_all(&self, path: &Utf8Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn remove_dir_all(&self, path: &Utf8Path) -> io::Result<()> {
        std::fs::remove_dir_all(path)
    }

    fn open(&self, path: &Utf8Path) -> io::Result<Box<dyn Read>> {
        Ok(Box::new(File::open(path)?))
    }
}
