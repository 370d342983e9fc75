//! Glob pattern detection.
//!
//! Only detects whether a path *looks like* a pattern. Matching is left to a
//! dedicated glob crate.

use std::ffi::OsStr;
use std::path::Path;

/// Returns `true` if any component of `path` contains a `*`.
///
/// Accepts anything path-like, so plain strings work too:
///
/// ```
/// use nestfs::is_glob_pattern;
///
/// assert!(is_glob_pattern("a/b/**/*.png"));
/// assert!(!is_glob_pattern("a/b/a.png"));
/// ```
pub fn is_glob_pattern<P: AsRef<Path>>(path: P) -> bool {
    is_glob_segments(path.as_ref().iter())
}

/// Returns `true` if any of the given segments contains a `*`.
///
/// ```
/// use nestfs::is_glob_segments;
///
/// assert!(is_glob_segments(["assets", "*", "icon.png"]));
/// assert!(!is_glob_segments(["assets", "icon.png"]));
/// ```
pub fn is_glob_segments<I, S>(segments: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    segments.into_iter().any(|s| contains_star(s.as_ref()))
}

#[cfg(unix)]
fn contains_star(segment: &OsStr) -> bool {
    use std::os::unix::ffi::OsStrExt;
    segment.as_bytes().contains(&b'*')
}

#[cfg(not(unix))]
fn contains_star(segment: &OsStr) -> bool {
    segment.to_string_lossy().contains('*')
}
