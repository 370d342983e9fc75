//! Symlink-following resolution that tolerates missing tails.
//!
//! `std::fs::canonicalize` fails as soon as any component does not exist.
//! Confinement checks mostly run on paths that are *about* to be created, so
//! [`resolve`] resolves the existing prefix through symlinks and appends the
//! rest lexically, the way `realpath` does in non-strict mode.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Linux gives up at 40 nested links (`ELOOP`); use the same limit.
const MAX_SYMLINK_FOLLOWS: usize = 40;

/// A component still waiting to be applied to the resolved prefix.
enum Step {
    Root(PathBuf),
    Parent,
    Name(OsString),
}

fn push_components(stack: &mut Vec<Step>, path: &Path) {
    // Stack is popped from the end, so push in reverse order.
    for component in path.components().rev() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                stack.push(Step::Root(PathBuf::from(component.as_os_str())));
            }
            Component::CurDir => {}
            Component::ParentDir => stack.push(Step::Parent),
            Component::Normal(name) => stack.push(Step::Name(name.to_os_string())),
        }
    }
}

/// Resolve `path` to an absolute path without symlinks, `.` or `..`.
///
/// Components that exist are resolved through symlinks. Missing components
/// are appended as they are, and a following `..` removes them again.
/// A `Root` step following a `Prefix` (Windows `C:` then `\`) extends the
/// prefix instead of replacing it.
///
/// # Errors
///
/// Fails if the current directory cannot be read, a link cannot be read,
/// a component cannot be stat'ed for a reason other than not existing,
/// or more than 40 symlinks are followed.
pub fn resolve(path: &Path) -> io::Result<PathBuf> {
    if let Ok(canonical) = fs::canonicalize(path) {
        return Ok(canonical);
    }

    let absolute = std::path::absolute(path)?;
    let mut pending = Vec::new();
    push_components(&mut pending, &absolute);

    let mut resolved = PathBuf::new();
    let mut follows = 0usize;

    while let Some(step) = pending.pop() {
        match step {
            Step::Root(root) => {
                if resolved.has_root() || resolved.as_os_str().is_empty() {
                    resolved = root;
                } else {
                    resolved.push(root);
                }
            }
            Step::Parent => {
                resolved.pop();
            }
            Step::Name(name) => {
                let candidate = resolved.join(&name);
                match fs::symlink_metadata(&candidate) {
                    Ok(meta) if meta.file_type().is_symlink() => {
                        follows += 1;
                        if follows > MAX_SYMLINK_FOLLOWS {
                            return Err(io::Error::other(format!(
                                "too many levels of symbolic links: {}",
                                path.display()
                            )));
                        }
                        let target = fs::read_link(&candidate)?;
                        // Relative targets continue from the link's parent,
                        // which `resolved` already is.
                        push_components(&mut pending, &target);
                    }
                    Ok(_) => resolved = candidate,
                    // A later `..` can climb back into existing directories,
                    // so keep stat'ing instead of switching to lexical mode.
                    Err(e) if e.kind() == io::ErrorKind::NotFound => resolved = candidate,
                    Err(e) => return Err(e),
                }
            }
        }
    }

    Ok(resolved)
}
