//! Scoped directory handle for `*at` system calls.

use std::ffi::CString;
use std::fs::OpenOptions;
use std::io;
use std::os::fd::{AsRawFd, OwnedFd};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

/// An open directory used as the base for relative `*at` calls.
///
/// The descriptor is owned, so it is closed when the handle is dropped,
/// on every exit path of the function that opened it.
#[derive(Debug)]
pub(crate) struct DirHandle {
    fd: OwnedFd,
}

impl DirHandle {
    /// Open `path`, failing with `ENOTDIR` unless it is a directory.
    pub(crate) fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_DIRECTORY | libc::O_CLOEXEC)
            .open(path)?;
        Ok(Self { fd: file.into() })
    }

    /// Device and inode of `rel`, resolved against this directory (following
    /// symlinks).
    pub(crate) fn identity_at(&self, rel: &Path) -> io::Result<(u64, u64)> {
        let rel = c_path(rel)?;
        let mut st = std::mem::MaybeUninit::<libc::stat>::uninit();

        // SAFETY: `rel` is a valid NUL-terminated string, the descriptor is
        // open for the lifetime of `self`, and `st` is only read on success.
        let rc = unsafe { libc::fstatat(self.fd.as_raw_fd(), rel.as_ptr(), st.as_mut_ptr(), 0) };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }

        // SAFETY: fstatat returned 0, so it filled in the buffer.
        let st = unsafe { st.assume_init() };
        #[allow(clippy::unnecessary_cast)]
        Ok((st.st_dev as u64, st.st_ino as u64))
    }

    /// Create a symlink at `link` storing `target`. A relative `link` is
    /// interpreted against this directory.
    pub(crate) fn symlink_at(&self, target: &Path, link: &Path) -> io::Result<()> {
        let target = c_path(target)?;
        let link = c_path(link)?;

        // SAFETY: both strings are NUL-terminated and the descriptor is open.
        let rc = unsafe { libc::symlinkat(target.as_ptr(), self.fd.as_raw_fd(), link.as_ptr()) };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

fn c_path(path: &Path) -> io::Result<CString> {
    CString::new(path.as_os_str().as_bytes()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("path contains a NUL byte: {}", path.display()),
        )
    })
}
