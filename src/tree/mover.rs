//! Recursive tree move.

use crate::error::{Error, Result};
use crate::options::TreeOptions;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::{
    EntryOutcome, TreeStats, create_parent, ensure_outside, existing, is_merge_target,
    not_a_directory, source_metadata,
};

/// Move `src` to `dst` with default [`TreeOptions`].
///
/// See [`move_tree_with`].
pub fn movetree(src: &Path, dst: &Path) -> Result<()> {
    move_tree_with(src, dst, &TreeOptions::default()).map(|_| ())
}

/// Move a file, symlink or directory tree from `src` to `dst`, merging into
/// existing directories.
///
/// - Directory: `dst` is created if absent. Each child that is a directory
///   and meets an existing directory at the destination is merged
///   recursively; every other child is renamed into place, replacing a
///   same-named file at the destination.
/// - Anything else: missing parents of `dst` are created, then `src` is
///   renamed to `dst`.
///
/// Renames are atomic per entry on the same filesystem. Across filesystems
/// the OS error (`EXDEV`) is returned unchanged; there is no copy fallback.
///
/// Source directories emptied by the walk are left behind unless
/// [`TreeOptions::prune_merged_dirs`] is set.
///
/// # Errors
///
/// - Source does not exist ([`Error::SourceNotFound`])
/// - `dst` is inside the source directory ([`Error::DestinationInsideSource`])
/// - A rename fails, e.g. a directory onto a non-empty directory or across
///   devices ([`Error::Rename`])
/// - Other IO operations fail ([`Error::Io`])
///
/// On error some entries may already have been moved.
pub fn move_tree_with(src: &Path, dst: &Path, options: &TreeOptions) -> Result<TreeStats> {
    let start_time = Instant::now();
    let src_meta = source_metadata(src)?;
    let mut stats = TreeStats::default();

    if src_meta.is_dir() {
        ensure_outside(src, dst)?;
        move_dir(src, dst, options, &mut stats)?;
        if options.prune_merged_dirs {
            prune(src, &mut stats)?;
        }
    } else {
        create_parent(dst)?;
        rename_into_place(src, dst, &mut stats)?;
    }

    stats.duration = start_time.elapsed();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        src = %src.display(),
        dst = %dst.display(),
        moved = stats.entries_moved,
        overwritten = stats.entries_overwritten,
        merged = stats.dirs_merged,
        pruned = stats.dirs_pruned,
        "moved tree"
    );

    Ok(stats)
}

fn move_dir(src: &Path, dst: &Path, options: &TreeOptions, stats: &mut TreeStats) -> Result<()> {
    match existing(dst)? {
        Some(meta) if is_merge_target(dst, &meta) => stats.record(EntryOutcome::Merged),
        Some(_) => return Err(not_a_directory(dst)),
        None => {
            fs::create_dir_all(dst).map_err(|e| Error::io(dst, e))?;
            stats.dirs_created += 1;
        }
    }

    // Snapshot the listing first: entries are renamed out of `src` as we go.
    let mut children: Vec<(PathBuf, PathBuf, bool)> = Vec::new();
    for entry in fs::read_dir(src).map_err(|e| Error::io(src, e))? {
        let entry = entry.map_err(|e| Error::io(src, e))?;
        let is_dir = entry.file_type().map_err(|e| Error::io(&entry.path(), e))?.is_dir();
        children.push((entry.path(), dst.join(entry.file_name()), is_dir));
    }

    for (child, target, child_is_dir) in children {
        let target_is_dir = existing(&target)?.is_some_and(|m| is_merge_target(&target, &m));

        if child_is_dir && target_is_dir {
            move_dir(&child, &target, options, stats)?;
            if options.prune_merged_dirs {
                prune(&child, stats)?;
            }
        } else {
            rename_into_place(&child, &target, stats)?;
        }
    }

    Ok(())
}

fn rename_into_place(from: &Path, to: &Path, stats: &mut TreeStats) -> Result<()> {
    let outcome = if existing(to)?.is_some() {
        EntryOutcome::Overwritten
    } else {
        EntryOutcome::Moved
    };

    fs::rename(from, to).map_err(|source| Error::Rename {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;

    #[cfg(feature = "tracing")]
    tracing::trace!(from = %from.display(), to = %to.display(), outcome = ?outcome, "moved entry");

    stats.record(outcome);
    Ok(())
}

/// Remove a source directory whose children have all been moved out.
fn prune(dir: &Path, stats: &mut TreeStats) -> Result<()> {
    fs::remove_dir(dir).map_err(|e| Error::io(dir, e))?;
    stats.dirs_pruned += 1;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
