//! Single-entry copies: regular files and symlinks.
//!
//! Regular files are written to a temporary file next to the destination and
//! renamed over it, so the destination never holds a partial file. Renaming
//! also means an existing destination symlink is replaced rather than
//! written through.

use crate::error::{Error, Result};
use crate::options::TreeOptions;
use crate::utils::{copy_file_contents, preserve_timestamps, symlink};
use std::fs::{self, File, Metadata};
use std::path::Path;

use super::{EntryOutcome, existing};

/// Result of copying one non-directory entry.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EntryCopy {
    pub outcome: EntryOutcome,
    pub bytes: u64,
}

/// Copy a regular file to `dst`, replacing any file or symlink there.
///
/// # Errors
///
/// - `dst` is a directory ([`Error::IsADirectory`])
/// - Temp file creation fails ([`Error::TempFile`])
/// - Atomic rename fails ([`Error::Persist`])
/// - Reading the source or writing the copy fails ([`Error::Io`])
pub(crate) fn copy_regular(
    src: &Path,
    dst: &Path,
    src_meta: &Metadata,
    options: &TreeOptions,
) -> Result<EntryCopy> {
    let outcome = match existing(dst)? {
        Some(meta) if meta.is_dir() => return Err(Error::IsADirectory(dst.to_path_buf())),
        Some(_) => EntryOutcome::Overwritten,
        None => EntryOutcome::Copied,
    };
    let file_len = src_meta.len();

    // Reflink needs a free destination, so only fresh copies try it.
    #[cfg(all(feature = "reflink", any(target_os = "linux", target_os = "macos")))]
    if outcome == EntryOutcome::Copied && reflink_copy::reflink(src, dst).is_ok() {
        apply_file_metadata(src_meta, dst, options);
        return Ok(EntryCopy {
            outcome,
            bytes: file_len,
        });
    }

    let src_file = File::open(src).map_err(|e| Error::io(src, e))?;

    let dst_parent = match dst.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let temp_file = if options.preserve_permissions {
        // 0o600 until the source permissions are applied below
        tempfile::NamedTempFile::new_in(dst_parent)
    } else {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tempfile::Builder::new()
                .permissions(fs::Permissions::from_mode(0o666))
                .tempfile_in(dst_parent)
        }
        #[cfg(not(unix))]
        {
            tempfile::NamedTempFile::new_in(dst_parent)
        }
    }
    .map_err(|e| Error::TempFile {
        path: dst_parent.to_path_buf(),
        source: e,
    })?;

    let bytes = copy_file_contents(&src_file, temp_file.as_file(), file_len)
        .map_err(|e| Error::io(src, e))?;

    if options.fsync {
        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| Error::io(temp_file.path(), e))?;
    }

    if options.preserve_permissions {
        fs::set_permissions(temp_file.path(), src_meta.permissions())
            .map_err(|e| Error::io(temp_file.path(), e))?;
    }

    temp_file.persist(dst).map_err(|e| Error::Persist {
        path: dst.to_path_buf(),
        source: e.error,
    })?;

    if options.preserve_timestamps {
        if let Err(e) = preserve_timestamps(src_meta, dst) {
            options.warn(&format!(
                "Failed to preserve timestamps on {}: {}",
                dst.display(),
                e
            ));
        }
    }

    Ok(EntryCopy { outcome, bytes })
}

/// After a reflink, bring permissions and timestamps in line with the
/// options; the clone carries the source's own.
#[cfg(all(feature = "reflink", any(target_os = "linux", target_os = "macos")))]
fn apply_file_metadata(src_meta: &Metadata, dst: &Path, options: &TreeOptions) {
    if !options.preserve_permissions {
        use std::os::unix::fs::PermissionsExt;
        // umask does not apply to chmod, so fall back to a conventional mode
        if let Err(e) = fs::set_permissions(dst, fs::Permissions::from_mode(0o644)) {
            options.warn(&format!("Failed to reset permissions on {}: {}", dst.display(), e));
        }
    }

    let result = if options.preserve_timestamps {
        preserve_timestamps(src_meta, dst)
    } else {
        let now = filetime::FileTime::now();
        filetime::set_file_times(dst, now, now)
    };
    if let Err(e) = result {
        options.warn(&format!("Failed to set timestamps on {}: {}", dst.display(), e));
    }
}

/// Recreate the symlink `src` at `dst` with the same target string.
///
/// An existing file or symlink at `dst` is removed first. Symlink
/// permissions are not copied (Linux has no `lchmod`).
///
/// # Errors
///
/// - `dst` is a directory ([`Error::IsADirectory`])
/// - The link cannot be read or removed ([`Error::Io`])
/// - The new link cannot be created ([`Error::Symlink`])
pub(crate) fn copy_symlink(
    src: &Path,
    dst: &Path,
    src_meta: &Metadata,
    options: &TreeOptions,
) -> Result<EntryCopy> {
    let target = fs::read_link(src).map_err(|e| Error::io(src, e))?;

    let outcome = match existing(dst)? {
        Some(meta) if meta.is_dir() => return Err(Error::IsADirectory(dst.to_path_buf())),
        Some(_) => {
            fs::remove_file(dst).map_err(|e| Error::io(dst, e))?;
            EntryOutcome::Overwritten
        }
        None => EntryOutcome::Copied,
    };

    symlink(&target, dst).map_err(|source| Error::Symlink {
        target,
        link: dst.to_path_buf(),
        source,
    })?;

    if options.preserve_timestamps {
        if let Err(e) = preserve_timestamps(src_meta, dst) {
            options.warn(&format!(
                "Failed to preserve timestamps on symlink {}: {}",
                dst.display(),
                e
            ));
        }
    }

    Ok(EntryCopy { outcome, bytes: 0 })
}

// =============================================================================
// Tests
// =============================================================================
