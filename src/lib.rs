//! # nestfs
//!
//! Path confinement, anchor-relative symlinks, and merging tree copy/move.
//!
//! ## Core Features
//!
//! - **Containment tests**: [`is_nested_in`] resolves symlinks and `..` before
//!   comparing, so neither can fake containment
//! - **Confined joins**: [`nest_path`] joins untrusted paths under a root and
//!   refuses anything that escapes it
//! - **Relative paths**: [`relative_path`] computes the lexical path from one
//!   location to another
//! - **Anchored symlinks**: [`symlink`] can store targets relative to an
//!   anchor directory, so a farm of links survives relocation
//! - **Merging tree copy**: [`copytree`] mirrors a tree, merging into existing
//!   directories, keeping symlinks as symlinks, writing files atomically
//! - **Merging tree move**: [`movetree`] renames entries into place and
//!   recurses where a directory already exists at the destination
//!
//! ## Confinement
//!
//! ```no_run
//! use nestfs::{is_nested_in, nest_path};
//! use std::path::Path;
//!
//! let root = Path::new("/srv/uploads");
//! let target = nest_path(root, Path::new("/user/avatar.png"))?;
//! assert_eq!(target, Path::new("/srv/uploads/user/avatar.png"));
//! assert!(is_nested_in(root, &target));
//!
//! // `..` escapes are rejected
//! assert!(nest_path(root, Path::new("../../etc/shadow")).is_err());
//! # Ok::<(), nestfs::Error>(())
//! ```
//!
//! ## Tree Operations
//!
//! ```no_run
//! use nestfs::{copytree, movetree, TreeBuilder};
//! use std::path::Path;
//!
//! copytree(Path::new("template"), Path::new("project"))?;
//! movetree(Path::new("staging"), Path::new("live"))?;
//!
//! let stats = TreeBuilder::new("staging", "live")
//!     .prune_merged_dirs()
//!     .move_tree()?;
//! println!("{} merged, {} pruned", stats.dirs_merged, stats.dirs_pruned);
//! # Ok::<(), nestfs::Error>(())
//! ```
//!
//! ## Concurrency
//!
//! Every operation is synchronous and holds no state between calls. There is
//! no locking: callers must serialize operations on overlapping subtrees, and
//! nothing here protects against other processes changing a tree mid-walk.
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `tracing` | Structured logging with tracing crate |
//! | `serde` | Serialize/Deserialize for [`TreeOptions`] |
//! | `reflink` | Copy-on-write clones for fresh file copies (Linux, macOS) |
//! | `full` | Enable all optional features |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod error;
mod glob;
mod link;
mod options;
mod path;
mod tree;
mod utils;

pub use builder::TreeBuilder;
pub use error::{Error, Result};
pub use glob::{is_glob_pattern, is_glob_segments};
pub use link::{LinkOutcome, symlink};
pub use options::TreeOptions;
pub use path::{absolute, is_nested_in, nest_path, relative_path};
pub use tree::{TreeStats, copy_tree_with, copytree, move_tree_with, movetree};
