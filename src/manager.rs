//! High-level convenience functions for mapped-file handles.

use std::path::Path;

use crate::backend::{MapBackend, OpenMode};
use crate::errors::Result;
use crate::handle::MappedFileHandle;

/// Create (or open) the file at `path` and map it read-write, pre-allocating
/// an empty file to `max_size` bytes.
///
/// # Errors
///
/// Returns errors from `MappedFileHandle::open`.
pub fn create_mmap<P: AsRef<Path>>(path: P, max_size: u64) -> Result<MappedFileHandle> {
    MappedFileHandle::open(path, OpenMode::Create, max_size)
}

/// Open an existing file and map it in the requested mode.
///
/// # Errors
///
/// Returns errors from `MappedFileHandle::open`.
pub fn load_mmap<P: AsRef<Path>>(
    path: P,
    mode: OpenMode,
    max_size: u64,
) -> Result<MappedFileHandle> {
    MappedFileHandle::open(path, mode, max_size)
}

/// Flush a handle that may be absent.
///
/// Callers that hold an `Option<MappedFileHandle>` (a table whose mapping may
/// have been replaced or not yet established) use this instead of
/// null-tolerant method semantics: `None` succeeds trivially.
///
/// # Errors
///
/// Returns errors from `MappedFileHandle::flush`.
pub fn flush_or_noop<B: MapBackend>(handle: Option<&MappedFileHandle<B>>) -> Result<()> {
    match handle {
        Some(h) => h.flush(),
        None => Ok(()),
    }
}

#[cfg(feature = "async")]
pub mod r#async {
    //! Async helpers (Tokio) for creating mapped files without blocking the
    //! current thread on file creation and pre-allocation.

    use std::path::Path;

    use tokio::fs as tfs;

    use crate::backend::OpenMode;
    use crate::errors::{MmapHandleError, Result};
    use crate::handle::MappedFileHandle;

    /// Create the file and pre-allocate it asynchronously, then map it
    /// read-write.
    ///
    /// The mapping itself is established synchronously; only file creation
    /// and sizing go through Tokio.
    ///
    /// # Errors
    ///
    /// Returns `MmapHandleError::Io` from async file operations or mapping.
    pub async fn create_mmap_async<P: AsRef<Path>>(
        path: P,
        max_size: u64,
    ) -> Result<MappedFileHandle> {
        let path_ref = path.as_ref();
        let file = tfs::OpenOptions::new()
            .create(true)
            .write(true)
            .read(true)
            .open(path_ref)
            .await
            .map_err(|e| MmapHandleError::io("open", path_ref, e))?;
        let len = file
            .metadata()
            .await
            .map_err(|e| MmapHandleError::io("stat", path_ref, e))?
            .len();
        if len == 0 && max_size > 0 {
            file.set_len(max_size)
                .await
                .map_err(|e| MmapHandleError::io("truncate", path_ref, e))?;
        }
        drop(file);
        MappedFileHandle::open(path_ref, OpenMode::ReadWrite, max_size)
    }
}
