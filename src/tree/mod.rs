//! Recursive tree copy and move with merge-on-existing semantics.
//!
//! Both walks mirror the source tree at the destination. Where the
//! destination already has a directory of the same name, they recurse into
//! it instead of replacing it, so entries that only exist at the destination
//! survive.
//!
//! Entries are inspected without following symlinks, at every level
//! including the top: a symlink to a directory is copied or moved as a
//! symlink.
//!
//! There is no locking. Callers must not let other processes mutate the
//! same subtrees while a walk runs.

mod copy;
mod file;
mod mover;

pub use copy::{copy_tree_with, copytree};
pub use mover::{move_tree_with, movetree};

use crate::error::{Error, Result};
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;

/// What happened to one visited entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryOutcome {
    /// New entry created at the destination
    Copied,
    /// Entry renamed to a destination that did not exist
    Moved,
    /// Directory merged into an existing destination directory
    Merged,
    /// Existing destination entry replaced
    Overwritten,
}

/// Statistics from a tree operation.
///
/// Returned by [`copy_tree_with`] and [`move_tree_with`].
///
/// # Example
///
/// ```no_run
/// use nestfs::{copy_tree_with, TreeOptions};
/// use std::path::Path;
///
/// let stats = copy_tree_with(Path::new("src"), Path::new("dst"), &TreeOptions::default())?;
/// println!("Copied {} entries ({} bytes)", stats.entries_copied, stats.bytes_copied);
/// println!("Merged into {} existing directories", stats.dirs_merged);
/// # Ok::<(), nestfs::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Files and symlinks created at a previously free destination
    pub entries_copied: u64,
    /// Entries renamed to a previously free destination
    pub entries_moved: u64,
    /// Existing destination files or symlinks replaced
    pub entries_overwritten: u64,
    /// Destination directories created
    pub dirs_created: u64,
    /// Source directories merged into existing destination directories
    pub dirs_merged: u64,
    /// Emptied source directories removed (move with pruning only)
    pub dirs_pruned: u64,
    /// Total bytes of file contents copied
    pub bytes_copied: u64,
    /// Duration of the operation
    pub duration: std::time::Duration,
}

impl TreeStats {
    pub(crate) fn record(&mut self, outcome: EntryOutcome) {
        match outcome {
            EntryOutcome::Copied => self.entries_copied += 1,
            EntryOutcome::Moved => self.entries_moved += 1,
            EntryOutcome::Merged => self.dirs_merged += 1,
            EntryOutcome::Overwritten => self.entries_overwritten += 1,
        }
    }
}

/// `symlink_metadata` of the top-level source, mapping absence to
/// [`Error::SourceNotFound`].
pub(crate) fn source_metadata(src: &Path) -> Result<Metadata> {
    match fs::symlink_metadata(src) {
        Ok(meta) => Ok(meta),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(Error::SourceNotFound(src.to_path_buf()))
        }
        Err(e) => Err(Error::io(src, e)),
    }
}

/// Reject a directory walk whose destination lies inside its own source.
pub(crate) fn ensure_outside(src: &Path, dst: &Path) -> Result<()> {
    if crate::path::is_nested_in(src, dst) {
        return Err(Error::DestinationInsideSource {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
        });
    }
    Ok(())
}

/// Create the parent directories of `path`, if it has any.
pub(crate) fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))
        }
        _ => Ok(()),
    }
}

/// Metadata of `path` without following symlinks, or `None` if it does not
/// exist.
pub(crate) fn existing(path: &Path) -> Result<Option<Metadata>> {
    match fs::symlink_metadata(path) {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Whether an existing destination entry can be merged into as a directory.
///
/// Follows a symlink at the destination (`lib -> lib64`); source entries are
/// never followed.
pub(crate) fn is_merge_target(path: &Path, meta: &Metadata) -> bool {
    meta.is_dir()
        || (meta.file_type().is_symlink() && fs::metadata(path).is_ok_and(|m| m.is_dir()))
}

/// A directory cannot be placed over an existing non-directory.
pub(crate) fn not_a_directory(dst: &Path) -> Error {
    Error::io(
        dst,
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "destination exists and is not a directory",
        ),
    )
}
