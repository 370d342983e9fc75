//! Recursive tree copy.

use crate::error::{Error, Result};
use crate::options::TreeOptions;
use std::fs::{self, Metadata};
use std::path::Path;
use std::time::Instant;

use super::file::{copy_regular, copy_symlink};
use super::{
    EntryOutcome, TreeStats, create_parent, ensure_outside, existing, is_merge_target,
    not_a_directory, source_metadata,
};

/// Copy `src` to `dst` with default [`TreeOptions`].
///
/// See [`copy_tree_with`].
pub fn copytree(src: &Path, dst: &Path) -> Result<()> {
    copy_tree_with(src, dst, &TreeOptions::default()).map(|_| ())
}

/// Copy a file, symlink or directory tree from `src` to `dst`.
///
/// - Directory: `dst` (and missing parents) is created if absent, then each
///   child is copied to `dst/<name>`. Existing destination directories are
///   merged into: entries only present at `dst` are left alone, entries
///   present on both sides are overwritten.
/// - Symlink: recreated with the same target string, never followed.
/// - Regular file: copied atomically with its permissions and timestamps
///   (per `options`).
///
/// Running the same copy twice gives the same result as running it once.
///
/// # Errors
///
/// - Source does not exist ([`Error::SourceNotFound`])
/// - `dst` is inside the source directory ([`Error::DestinationInsideSource`])
/// - A file or symlink would replace a directory ([`Error::IsADirectory`])
/// - Source contains a fifo, socket or device ([`Error::UnsupportedFileType`])
/// - A copied entry has the wrong type afterwards ([`Error::InvariantViolated`])
/// - IO operations fail ([`Error::Io`], [`Error::Symlink`], [`Error::TempFile`],
///   [`Error::Persist`])
///
/// On error the destination may be partially populated.
pub fn copy_tree_with(src: &Path, dst: &Path, options: &TreeOptions) -> Result<TreeStats> {
    let start_time = Instant::now();
    let src_meta = source_metadata(src)?;

    if src_meta.is_dir() {
        ensure_outside(src, dst)?;
    }

    let mut stats = TreeStats::default();
    copy_entry(src, dst, &src_meta, options, &mut stats)?;
    stats.duration = start_time.elapsed();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        src = %src.display(),
        dst = %dst.display(),
        copied = stats.entries_copied,
        overwritten = stats.entries_overwritten,
        merged = stats.dirs_merged,
        bytes = stats.bytes_copied,
        "copied tree"
    );

    Ok(stats)
}

fn copy_entry(
    src: &Path,
    dst: &Path,
    src_meta: &Metadata,
    options: &TreeOptions,
    stats: &mut TreeStats,
) -> Result<()> {
    let file_type = src_meta.file_type();

    if file_type.is_dir() {
        return copy_dir(src, dst, src_meta, options, stats);
    }

    create_parent(dst)?;
    let copy = if file_type.is_symlink() {
        copy_symlink(src, dst, src_meta, options)?
    } else if file_type.is_file() {
        copy_regular(src, dst, src_meta, options)?
    } else {
        return Err(Error::UnsupportedFileType(src.to_path_buf()));
    };
    check_copied(src_meta, dst)?;

    #[cfg(feature = "tracing")]
    tracing::trace!(src = %src.display(), dst = %dst.display(), outcome = ?copy.outcome, "copied entry");

    stats.record(copy.outcome);
    stats.bytes_copied += copy.bytes;
    Ok(())
}

fn copy_dir(
    src: &Path,
    dst: &Path,
    src_meta: &Metadata,
    options: &TreeOptions,
    stats: &mut TreeStats,
) -> Result<()> {
    let merged = match existing(dst)? {
        Some(meta) if is_merge_target(dst, &meta) => true,
        Some(_) => return Err(not_a_directory(dst)),
        None => {
            fs::create_dir_all(dst).map_err(|e| Error::io(dst, e))?;
            stats.dirs_created += 1;
            false
        }
    };

    for entry in fs::read_dir(src).map_err(|e| Error::io(src, e))? {
        let entry = entry.map_err(|e| Error::io(src, e))?;
        let child = entry.path();
        let child_meta = fs::symlink_metadata(&child).map_err(|e| Error::io(&child, e))?;
        copy_entry(&child, &dst.join(entry.file_name()), &child_meta, options, stats)?;
    }

    if merged {
        stats.record(EntryOutcome::Merged);
    }

    // After the children, so a read-only source directory does not block
    // writing into its copy.
    if options.preserve_dir_permissions {
        if let Err(e) = fs::set_permissions(dst, src_meta.permissions()) {
            options.warn(&format!(
                "Failed to set permissions on {}: {}",
                dst.display(),
                e
            ));
        }
    }

    Ok(())
}

/// A symlink must stay a symlink; anything else must at least exist.
fn check_copied(src_meta: &Metadata, dst: &Path) -> Result<()> {
    let expects_symlink = src_meta.file_type().is_symlink();
    let expected = if expects_symlink { "symlink" } else { "existing entry" };

    let Ok(dst_meta) = fs::symlink_metadata(dst) else {
        return Err(Error::InvariantViolated {
            path: dst.to_path_buf(),
            expected,
        });
    };
    if expects_symlink && !dst_meta.file_type().is_symlink() {
        return Err(Error::InvariantViolated {
            path: dst.to_path_buf(),
            expected,
        });
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
