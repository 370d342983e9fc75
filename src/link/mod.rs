//! Symlink creation with targets relative to an anchor directory.
//!
//! A plain symlink stores whatever target string it was given. [`symlink`]
//! can instead store the target relative to a caller-chosen *anchor*
//! directory. A farm of such links keeps working when the anchor directory
//! is moved, as long as the linked files keep the same offset from it.
//!
//! Anchoring is best-effort. If the relative target cannot be verified from
//! the anchor, the link is created with the target as given and the result
//! says so ([`LinkOutcome::Direct`]).

#[cfg(unix)]
mod handle;

use crate::error::{Error, Result};
use crate::utils;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// How a link created by [`symlink`] stores its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Target stored relative to the anchor directory
    Anchored(PathBuf),
    /// Target stored exactly as passed in
    Direct(PathBuf),
}

impl LinkOutcome {
    /// The target string written into the link.
    pub fn target(&self) -> &Path {
        match self {
            Self::Anchored(target) | Self::Direct(target) => target,
        }
    }

    /// Whether the anchored form was used.
    pub fn is_anchored(&self) -> bool {
        matches!(self, Self::Anchored(_))
    }
}

/// Result of trying the anchored form. Failure here is not an error: the
/// caller falls back to a direct link.
#[derive(Debug)]
enum AnchorAttempt {
    Created(PathBuf),
    Fallback(io::Error),
}

/// Create a symlink at `dst` pointing at `src`.
///
/// Missing parent directories of `dst` are created first.
///
/// With `relative_to: None` the link stores `src` as given. With
/// `Some(anchor)`, the stored target is [`relative_path`](crate::relative_path)
/// from `anchor` to `src`. The anchor and the directory that will hold the
/// link are each opened once as directory handles, and the relative target
/// must reach the same file as `src` from both: from the anchor so the farm
/// can be relocated, and from the link's own directory because that is where
/// the OS resolves it. The link is created through the second handle. Both
/// handles are closed before returning on every path.
///
/// In practice this means anchored links live in `anchor` itself, or in a
/// directory that resolves to it.
///
/// If any step of the anchored attempt fails (anchor missing or not a
/// directory, `src` missing, either check mismatching, link creation error),
/// a direct link is created instead. Only the direct attempt reports errors.
///
/// # Errors
///
/// - Creating the parent of `dst` fails ([`Error::Io`])
/// - The direct link cannot be created, e.g. `dst` exists ([`Error::Symlink`])
///
/// # Example
///
/// ```no_run
/// use nestfs::symlink;
/// use std::path::Path;
///
/// let outcome = symlink(
///     Path::new("/srv/store/libfoo.so.1"),
///     Path::new("/srv/farm/libfoo.so"),
///     Some(Path::new("/srv/farm")),
/// )?;
/// assert_eq!(outcome.target(), Path::new("../store/libfoo.so.1"));
/// # Ok::<(), nestfs::Error>(())
/// ```
pub fn symlink(src: &Path, dst: &Path, relative_to: Option<&Path>) -> Result<LinkOutcome> {
    if let Some(parent) = dst.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    if let Some(anchor) = relative_to {
        match anchored(src, dst, anchor) {
            AnchorAttempt::Created(target) => return Ok(LinkOutcome::Anchored(target)),
            AnchorAttempt::Fallback(_reason) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    src = %src.display(),
                    dst = %dst.display(),
                    anchor = %anchor.display(),
                    reason = %_reason,
                    "anchored symlink failed, creating direct link"
                );
            }
        }
    }

    utils::symlink(src, dst).map_err(|source| Error::Symlink {
        target: src.to_path_buf(),
        link: dst.to_path_buf(),
        source,
    })?;
    Ok(LinkOutcome::Direct(src.to_path_buf()))
}

#[cfg(unix)]
fn anchored(src: &Path, dst: &Path, anchor: &Path) -> AnchorAttempt {
    match try_anchored(src, dst, anchor) {
        Ok(target) => AnchorAttempt::Created(target),
        Err(e) => AnchorAttempt::Fallback(e),
    }
}

#[cfg(unix)]
fn try_anchored(src: &Path, dst: &Path, anchor: &Path) -> io::Result<PathBuf> {
    use std::os::unix::fs::MetadataExt;

    let name = dst.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", dst.display()),
        )
    })?;
    let parent = match dst.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let anchor_dir = handle::DirHandle::open(anchor)?;
    let link_dir = handle::DirHandle::open(parent)?;
    let target = crate::path::relative_path(src, anchor);

    let meta = fs::metadata(src)?;
    let identity = (meta.dev(), meta.ino());
    ensure_reaches(&anchor_dir, &target, identity, src, anchor)?;
    ensure_reaches(&link_dir, &target, identity, src, parent)?;

    link_dir.symlink_at(&target, Path::new(name))?;
    Ok(target)
}

/// Check that `target`, read from `dir`, lands on the file with `identity`.
#[cfg(unix)]
fn ensure_reaches(
    dir: &handle::DirHandle,
    target: &Path,
    identity: (u64, u64),
    src: &Path,
    from: &Path,
) -> io::Result<()> {
    if dir.identity_at(target)? == identity {
        return Ok(());
    }
    Err(io::Error::new(
        io::ErrorKind::InvalidData,
        format!(
            "{} does not reach {} from {}",
            target.display(),
            src.display(),
            from.display()
        ),
    ))
}

#[cfg(not(unix))]
fn anchored(_src: &Path, _dst: &Path, _anchor: &Path) -> AnchorAttempt {
    AnchorAttempt::Fallback(io::Error::new(
        io::ErrorKind::Unsupported,
        "anchored symlinks need *at system calls",
    ))
}
