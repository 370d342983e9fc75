//! Builder API for tree operations.
//!
//! The builder pattern provides a fluent interface for configuring and
//! executing a copy or move. This is often more convenient than manually
//! constructing [`TreeOptions`].
//!
//! # Examples
//!
//! ## Copy
//!
//! ```no_run
//! use nestfs::TreeBuilder;
//!
//! let stats = TreeBuilder::new("assets", "build/assets")
//!     .fsync()
//!     .copy()?;
//! println!("Copied {} entries", stats.entries_copied);
//! # Ok::<(), nestfs::Error>(())
//! ```
//!
//! ## Merging move
//!
//! ```no_run
//! use nestfs::TreeBuilder;
//!
//! // Merge staging into the live tree and clean up what is left of staging
//! let stats = TreeBuilder::new("staging", "live")
//!     .prune_merged_dirs()
//!     .move_tree()?;
//! println!("Merged {} directories", stats.dirs_merged);
//! # Ok::<(), nestfs::Error>(())
//! ```

use crate::error::Result;
use crate::options::TreeOptions;
use crate::tree::{TreeStats, copy_tree_with, move_tree_with};
use std::path::{Path, PathBuf};

/// A builder for configuring and executing tree copies and moves.
///
/// # Example
///
/// ```no_run
/// use nestfs::TreeBuilder;
///
/// let stats = TreeBuilder::new("/data/project", "/backup/project")
///     .no_timestamps()
///     .copy()?;
/// # Ok::<(), nestfs::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    src: PathBuf,
    dst: PathBuf,
    options: TreeOptions,
}

impl TreeBuilder {
    /// Create a new `TreeBuilder` with the given source and destination paths.
    ///
    /// Uses default options (preserve permissions and timestamps, no fsync,
    /// no pruning).
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Self {
        Self {
            src: src.as_ref().to_path_buf(),
            dst: dst.as_ref().to_path_buf(),
            options: TreeOptions::default(),
        }
    }

    /// Sync each copied file to disk before renaming it into place.
    #[must_use]
    pub fn fsync(mut self) -> Self {
        self.options = self.options.with_fsync();
        self
    }

    /// Don't preserve file timestamps.
    #[must_use]
    pub fn no_timestamps(mut self) -> Self {
        self.options = self.options.without_timestamps();
        self
    }

    /// Don't preserve permissions; copies get umask defaults.
    #[must_use]
    pub fn no_permissions(mut self) -> Self {
        self.options = self.options.without_permissions();
        self
    }

    /// Remove source directories left empty by a merging move.
    ///
    /// Has no effect on copies.
    #[must_use]
    pub fn prune_merged_dirs(mut self) -> Self {
        self.options = self.options.with_prune_merged_dirs();
        self
    }

    /// Set a warning handler for non-fatal problems.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nestfs::TreeBuilder;
    ///
    /// let stats = TreeBuilder::new("src", "dst")
    ///     .on_warning(|msg| eprintln!("Warning: {}", msg))
    ///     .copy()?;
    /// # Ok::<(), nestfs::Error>(())
    /// ```
    #[must_use]
    pub fn on_warning(mut self, handler: fn(&str)) -> Self {
        self.options = self.options.with_warn_handler(handler);
        self
    }

    /// Get a reference to the current options.
    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Copy the source to the destination.
    ///
    /// See [`copy_tree_with`] for the semantics.
    pub fn copy(self) -> Result<TreeStats> {
        copy_tree_with(&self.src, &self.dst, &self.options)
    }

    /// Move the source to the destination, merging into existing directories.
    ///
    /// See [`move_tree_with`] for the semantics.
    pub fn move_tree(self) -> Result<TreeStats> {
        move_tree_with(&self.src, &self.dst, &self.options)
    }
}
