//! Configuration options for tree operations.
//!
//! This module provides [`TreeOptions`], shared by
//! [`copy_tree_with`](crate::copy_tree_with) and
//! [`move_tree_with`](crate::move_tree_with).
//!
//! # Example
//!
//! ```
//! use nestfs::TreeOptions;
//!
//! let options = TreeOptions::default()
//!     .with_fsync()
//!     .with_prune_merged_dirs();
//! ```

/// Options for tree copy and move operations.
///
/// Use [`Default::default()`] to get the defaults, then customize using the
/// builder methods.
///
/// # Default Values
///
/// | Field | Default | Used by |
/// |-------|---------|---------|
/// | `preserve_permissions` | `true` | copy |
/// | `preserve_dir_permissions` | `true` | copy |
/// | `preserve_timestamps` | `true` | copy |
/// | `fsync` | `false` | copy |
/// | `prune_merged_dirs` | `false` | move |
///
/// Moves are renames, which keep metadata on their own.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::struct_excessive_bools)]
pub struct TreeOptions {
    /// Whether to copy file permissions (default: true)
    pub preserve_permissions: bool,

    /// Whether to copy directory permissions (default: true)
    ///
    /// Applied after a directory's children have been copied, so read-only
    /// source directories do not block their own copy.
    pub preserve_dir_permissions: bool,

    /// Whether to copy mtime and atime (default: true)
    ///
    /// Symlinks get their own timestamps, not their targets'.
    pub preserve_timestamps: bool,

    /// Whether to sync each copied file to disk before renaming it into
    /// place (default: false)
    pub fsync: bool,

    /// Remove source directories emptied by a merging move (default: false)
    ///
    /// When a source directory is merged into an existing destination
    /// directory, its children are moved one by one and the now empty source
    /// directory stays behind. With this option set, such directories are
    /// removed, including the top-level source directory.
    pub prune_merged_dirs: bool,

    /// Callback for warnings (optional)
    ///
    /// Receives non-fatal problems such as timestamps or permissions that
    /// could not be applied. If not set and the `tracing` feature is enabled,
    /// warnings are logged via tracing. Otherwise, warnings are dropped.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub warn_handler: Option<fn(&str)>,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            preserve_permissions: true,
            preserve_dir_permissions: true,
            preserve_timestamps: true,
            fsync: false,
            prune_merged_dirs: false,
            warn_handler: None,
        }
    }
}

impl TreeOptions {
    /// Create options with a warning handler
    #[must_use]
    pub fn with_warn_handler(mut self, handler: fn(&str)) -> Self {
        self.warn_handler = Some(handler);
        self
    }

    /// Sync copied files to disk before they are renamed into place
    #[must_use]
    pub fn with_fsync(mut self) -> Self {
        self.fsync = true;
        self
    }

    /// Remove source directories left empty by a merging move
    #[must_use]
    pub fn with_prune_merged_dirs(mut self) -> Self {
        self.prune_merged_dirs = true;
        self
    }

    /// Disable timestamp preservation
    #[must_use]
    pub fn without_timestamps(mut self) -> Self {
        self.preserve_timestamps = false;
        self
    }

    /// Disable permission preservation for files, symlinks and directories
    ///
    /// Copied entries get the default permissions for the current umask.
    #[must_use]
    pub fn without_permissions(mut self) -> Self {
        self.preserve_permissions = false;
        self.preserve_dir_permissions = false;
        self
    }

    pub(crate) fn warn(&self, msg: &str) {
        if let Some(handler) = self.warn_handler {
            handler(msg);
        } else {
            #[cfg(feature = "tracing")]
            tracing::warn!("{}", msg);
        }
    }
}
