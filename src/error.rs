//! Error types for nestfs.
//!
//! This module provides the [`Error`] enum containing all possible errors
//! that can occur during path and tree operations, and the [`Result`] type
//! alias.
//!
//! # Error Categories
//!
//! | Category | Errors |
//! |----------|--------|
//! | Confinement | [`Error::ConfinementViolation`] |
//! | IO | [`Error::Io`], [`Error::Rename`], [`Error::Symlink`], [`Error::TempFile`], [`Error::Persist`] |
//! | Validation | [`Error::SourceNotFound`], [`Error::IsADirectory`], [`Error::DestinationInsideSource`], [`Error::UnsupportedFileType`] |
//! | Fatal | [`Error::InvariantViolated`] |
//!
//! Failed anchor-relative symlinks never surface here: [`symlink`](crate::symlink)
//! falls back to a direct link instead.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for nestfs operations.
///
/// This is a type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during nestfs operations.
///
/// All errors include the offending path(s). No operation retries; OS-level
/// failures are reported as they came from the filesystem call.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A joined path would escape its root directory
    ///
    /// Returned by [`nest_path`](crate::nest_path) when `path`, once joined
    /// under `root`, does not resolve inside `root`.
    #[error("Path {path} escapes root {root} (joined as {joined})")]
    ConfinementViolation {
        /// The confinement root
        root: PathBuf,
        /// The untrusted path that was joined
        path: PathBuf,
        /// The joined, unresolved result
        joined: PathBuf,
    },

    /// IO error on a single path
    #[error("IO error at {path}: {source}")]
    Io {
        /// The path the failed operation was applied to
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to rename an entry into place
    #[error("Failed to rename {from} to {to}: {source}")]
    Rename {
        /// Entry being moved
        from: PathBuf,
        /// Destination of the move
        to: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to create a symlink
    #[error("Failed to create symlink {link} -> {target}: {source}")]
    Symlink {
        /// Target string that was to be stored in the link
        target: PathBuf,
        /// Location of the link
        link: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to create temporary file
    #[error("Failed to create temporary file in {path}: {source}")]
    TempFile {
        /// Directory where temp file creation was attempted
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to persist temporary file
    #[error("Failed to persist temporary file to {path}: {source}")]
    Persist {
        /// Target path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Source path does not exist
    #[error("Source path does not exist: {0}")]
    SourceNotFound(PathBuf),

    /// A non-directory entry would replace an existing directory
    #[error("Destination is a directory: {0}")]
    IsADirectory(PathBuf),

    /// Destination lies inside the source directory
    ///
    /// Copying or moving a directory into its own subtree would never
    /// terminate (copy) or is rejected by the OS midway (move).
    #[error("Destination {dst} is inside source directory {src}")]
    DestinationInsideSource {
        /// Source directory
        src: PathBuf,
        /// Destination path
        dst: PathBuf,
    },

    /// Source is neither a directory, a regular file, nor a symlink
    #[error("Unsupported file type (fifo, socket or device): {0}")]
    UnsupportedFileType(PathBuf),

    /// A copied entry does not have the type of its source
    ///
    /// This means the filesystem or the copy primitive misbehaved. It is
    /// not a recoverable condition and must not be retried.
    #[error("Invariant violated at {path}: expected {expected}")]
    InvariantViolated {
        /// The destination entry that failed the check
        path: PathBuf,
        /// What the entry was expected to be
        expected: &'static str,
    },
}

impl Error {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The underlying OS error, if this error came from a filesystem call.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::path::Path;
    ///
    /// if let Err(e) = nestfs::movetree(Path::new("a"), Path::new("/mnt/other/a")) {
    ///     if let Some(io_err) = e.io_error() {
    ///         eprintln!("os error: {:?}", io_err.raw_os_error());
    ///     }
    /// }
    /// ```
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::Io { source, .. }
            | Self::Rename { source, .. }
            | Self::Symlink { source, .. }
            | Self::TempFile { source, .. }
            | Self::Persist { source, .. } => Some(source),
            _ => None,
        }
    }
}
