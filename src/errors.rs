//! Crate-specific error types for hybrid-mmap.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias for hybrid-mmap operations.
pub type Result<T> = std::result::Result<T, MmapHandleError>;

/// Error type covering lifecycle syscall failures, bounds, and mode issues.
#[derive(Debug, Error)]
pub enum MmapHandleError {
    /// A lifecycle operation (open, sync, munmap, truncate, close, remove)
    /// failed against the named file.
    #[error("while {op} file {}: {source}", .path.display())]
    Io {
        /// Name of the failing operation.
        op: &'static str,
        /// Path of the backing file.
        path: PathBuf,
        /// Underlying system error.
        source: io::Error,
    },

    /// Error returned when attempting an operation in an incompatible mode.
    #[error("invalid access mode: {0}")]
    InvalidMode(&'static str),

    /// Error when a requested offset/length pair is out of bounds.
    #[error("range out of bounds: offset={offset}, len={len}, total={total}")]
    OutOfBounds {
        /// Requested offset.
        offset: u64,
        /// Requested length.
        len: u64,
        /// Total size of the mapped region.
        total: u64,
    },

    /// Error when a path names a remote-storage scheme this build does not
    /// support.
    #[cfg(feature = "remote")]
    #[error("remote storage path not supported: {0}")]
    RemoteUnsupported(String),
}

impl MmapHandleError {
    pub(crate) fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}
