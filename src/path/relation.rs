//! Lexical path arithmetic.
//!
//! Nothing in here touches the filesystem except for reading the current
//! directory to absolutize relative inputs. `..` components are treated as
//! ordinary names; they are never collapsed.

use std::path::{Component, Path, PathBuf};

/// Make `path` absolute without resolving symlinks or `..`.
///
/// Falls back to the path as given when the current directory cannot be
/// determined (for example when it has been deleted).
pub fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Compute the path that, resolved relative to `dst`, reaches `src`.
///
/// Both inputs are made absolute first (see [`absolute`]). The result climbs
/// out of `dst` with one `..` per component not shared with `src`, then
/// descends along the rest of `src`. Equal inputs give `"."`.
///
/// This is purely lexical. `dst` is interpreted as a directory, and neither
/// path needs to exist.
///
/// # Example
///
/// ```
/// use nestfs::relative_path;
/// use std::path::Path;
///
/// let rel = relative_path(Path::new("/data/assets/logo.png"), Path::new("/data/site/img"));
/// assert_eq!(rel, Path::new("../../assets/logo.png"));
/// ```
///
/// # Windows
///
/// Paths on different drives have no relative form; the absolute `src` is
/// returned in that case.
pub fn relative_path(src: &Path, dst: &Path) -> PathBuf {
    let src = absolute(src);
    let dst = absolute(dst);

    let src_parts: Vec<Component<'_>> = src.components().collect();
    let dst_parts: Vec<Component<'_>> = dst.components().collect();

    let common = common_prefix_len(&src_parts, &dst_parts);
    if common == 0 {
        return src;
    }

    let mut rel = PathBuf::new();
    for _ in common..dst_parts.len() {
        rel.push(Component::ParentDir);
    }
    for part in &src_parts[common..] {
        rel.push(part);
    }

    if rel.as_os_str().is_empty() {
        rel.push(Component::CurDir);
    }
    rel
}

/// Number of leading components the two sequences have in common.
pub(crate) fn common_prefix_len(a: &[Component<'_>], b: &[Component<'_>]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
