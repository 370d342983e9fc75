//! Containment tests and confined joins.

use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};

use super::resolve::resolve;

/// Check whether `child` lies inside `parent` (or is `parent` itself).
///
/// Both paths are resolved through symlinks first (missing trailing
/// components are resolved lexically), so neither `..` segments nor symlinks
/// pointing elsewhere can fake containment. The comparison is by whole
/// components, so `/usr/sharex` is not inside `/usr/share`.
///
/// Never fails: if either path cannot be resolved (symlink loop, permission
/// denied while reading a link, unreadable current directory) the answer is
/// `false`.
///
/// # Example
///
/// ```no_run
/// use nestfs::is_nested_in;
/// use std::path::Path;
///
/// assert!(is_nested_in(Path::new("/usr"), Path::new("/usr/share")));
/// assert!(!is_nested_in(Path::new("/usr/share"), Path::new("/usr")));
/// assert!(!is_nested_in(Path::new("/usr/share"), Path::new("/usr/share/../lib")));
/// ```
pub fn is_nested_in(parent: &Path, child: &Path) -> bool {
    let (Ok(parent), Ok(child)) = (resolve(parent), resolve(child)) else {
        return false;
    };

    match child.strip_prefix(&parent) {
        Ok(rest) => !rest.components().any(|c| c == Component::ParentDir),
        Err(_) => false,
    }
}

/// Join an untrusted `path` under `root`, refusing anything that escapes.
///
/// Leading root (and, on Windows, drive prefix) components of `path` are
/// dropped, so `/share/locale` is treated like `share/locale`. The joined
/// path is then checked with [`is_nested_in`], which resolves `..` and
/// symlinks on disk.
///
/// The returned path is the *unresolved* join; only the check resolves it.
///
/// # Errors
///
/// Returns [`Error::ConfinementViolation`] if the joined path does not stay
/// within `root`.
///
/// # Example
///
/// ```no_run
/// use nestfs::nest_path;
/// use std::path::Path;
///
/// let p = nest_path(Path::new("/srv/www"), Path::new("/static/app.js"))?;
/// assert_eq!(p, Path::new("/srv/www/static/app.js"));
///
/// assert!(nest_path(Path::new("/srv/www"), Path::new("../../etc/passwd")).is_err());
/// # Ok::<(), nestfs::Error>(())
/// ```
pub fn nest_path(root: &Path, path: &Path) -> Result<PathBuf> {
    let relative = strip_root(path);
    let joined = root.join(&relative);

    if !is_nested_in(root, &joined) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            root = %root.display(),
            path = %path.display(),
            "rejected path escaping its root"
        );
        return Err(Error::ConfinementViolation {
            root: root.to_path_buf(),
            path: path.to_path_buf(),
            joined,
        });
    }

    Ok(joined)
}

/// Drop leading `Prefix`/`RootDir` components so the path joins as relative.
fn strip_root(path: &Path) -> PathBuf {
    path.components()
        .skip_while(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
        .collect()
}
