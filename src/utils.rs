//! Range validation and platform helpers for descriptor teardown.

use std::fs::File;
use std::io;
use std::ops::Range;

use crate::errors::{MmapHandleError, Result};

/// Validate [offset, offset+len) against `total` and return it as a usize range.
///
/// # Errors
///
/// Returns `MmapHandleError::OutOfBounds` if the range overflows or exceeds
/// `total`.
#[allow(clippy::cast_possible_truncation)]
pub fn checked_range(offset: u64, len: u64, total: u64) -> Result<Range<usize>> {
    let end = offset
        .checked_add(len)
        .ok_or(MmapHandleError::OutOfBounds { offset, len, total })?;
    if end > total {
        return Err(MmapHandleError::OutOfBounds { offset, len, total });
    }
    // Casts cannot truncate: the range fits inside a mapped region, which
    // itself fits in addressable memory.
    Ok(offset as usize..end as usize)
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        /// Close a file descriptor, reporting the result of `close(2)`.
        ///
        /// Dropping a `File` discards any close error; lifecycle teardown
        /// must surface it instead.
        ///
        /// # Errors
        ///
        /// Returns the OS error from `close(2)` on failure.
        pub fn close_file(file: File) -> io::Result<()> {
            use std::os::fd::IntoRawFd;

            let fd = file.into_raw_fd();
            // SAFETY: the descriptor was just detached from `file`; nothing
            // else owns it, so closing exactly once is sound.
            let rc = unsafe { libc::close(fd) };
            if rc == 0 {
                Ok(())
            } else {
                Err(io::Error::last_os_error())
            }
        }
    } else {
        /// Close a file handle. On non-Unix platforms the handle is released
        /// on drop and close errors are not observable.
        ///
        /// # Errors
        ///
        /// Never fails on this platform.
        pub fn close_file(file: File) -> io::Result<()> {
            drop(file);
            Ok(())
        }
    }
}
