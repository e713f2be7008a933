//! Mapped-file handle owning a region and its optional backing descriptor.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use log::debug;

use crate::backend::{MapBackend, MmapBackend, MmapRegion, OpenMode, Region};
use crate::errors::{MmapHandleError, Result};
use crate::utils::{checked_range, close_file};

/// Backing descriptor for a file-backed handle. The path is kept alongside
/// the file so teardown errors can name it.
struct Backing {
    file: File,
    path: PathBuf,
}

/// Handle owning a memory-mapped byte region plus an optional backing file.
///
/// Two flavors exist:
/// - file-backed, produced by [`MappedFileHandle::open`]: the handle owns the
///   mapping and the descriptor, and its disposal protocol (flush, close,
///   delete) drives the underlying file;
/// - buffer-backed, produced by [`MappedFileHandle::from_buffer`]: the region
///   was substituted directly by the caller, no descriptor exists, and every
///   lifecycle operation is a defined no-op.
///
/// `close` and `delete` are terminal and consume the handle, so the region
/// cannot be touched after either succeeds.
///
/// The handle is not internally synchronized: it is built for a single
/// logical owner, and mutation requires `&mut self`. Callers that share a
/// handle must serialize access themselves.
///
/// # Examples
///
/// ```no_run
/// use hybrid_mmap::{MappedFileHandle, OpenMode};
///
/// let mut handle = MappedFileHandle::open("table.sst", OpenMode::Create, 4096)?;
/// handle.update_region(0, b"hello")?;
/// handle.flush()?;
/// // Shrink the file to the bytes actually written, then release everything.
/// handle.close(Some(5))?;
/// # Ok::<(), hybrid_mmap::MmapHandleError>(())
/// ```
pub struct MappedFileHandle<B: MapBackend = MmapBackend> {
    backend: B,
    region: B::Region,
    backing: Option<Backing>,
}

impl<B: MapBackend> std::fmt::Debug for MappedFileHandle<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedFileHandle")
            .field("path", &self.path())
            .field("len", &self.len())
            .finish()
    }
}

impl MappedFileHandle<MmapBackend> {
    /// Open the file at `path` per `mode` and map it into memory.
    ///
    /// `max_size` is a pre-allocation hint: an empty writable file is
    /// extended to `max_size` bytes before mapping; a non-empty file is
    /// mapped at its current size.
    ///
    /// # Errors
    ///
    /// Returns `MmapHandleError::Io` if the file cannot be opened, extended,
    /// or mapped.
    pub fn open<P: AsRef<Path>>(path: P, mode: OpenMode, max_size: u64) -> Result<Self> {
        Self::open_with(MmapBackend, path, mode, max_size)
    }

    /// Wrap a directly-supplied buffer in a handle with no backing file.
    ///
    /// Flush, close, and delete on the returned handle succeed trivially and
    /// change no file-system state.
    #[must_use]
    pub fn from_buffer(buf: Vec<u8>) -> Self {
        Self {
            backend: MmapBackend,
            region: MmapRegion::Buf(buf),
            backing: None,
        }
    }
}

impl<B: MapBackend> MappedFileHandle<B> {
    /// Open and map through an explicit backend. See [`MappedFileHandle::open`].
    ///
    /// # Errors
    ///
    /// Returns `MmapHandleError::Io` if the backend fails to establish the
    /// mapping. With the `remote` feature enabled, returns
    /// `MmapHandleError::RemoteUnsupported` for remote-storage paths.
    pub fn open_with<P: AsRef<Path>>(
        backend: B,
        path: P,
        mode: OpenMode,
        max_size: u64,
    ) -> Result<Self> {
        let path_ref = path.as_ref();
        #[cfg(feature = "remote")]
        if let Some(s) = path_ref.to_str() {
            if crate::remote::is_remote_path(s) {
                return Err(MmapHandleError::RemoteUnsupported(s.to_owned()));
            }
        }
        let (region, file) = backend
            .map(path_ref, mode, max_size)
            .map_err(|e| MmapHandleError::io("mmap", path_ref, e))?;
        debug!(
            "mapped {} ({:?}, {} bytes)",
            path_ref.display(),
            mode,
            region.len()
        );
        Ok(Self {
            backend,
            region,
            backing: Some(Backing {
                file,
                path: path_ref.to_path_buf(),
            }),
        })
    }

    /// Wrap a backend-produced region in a handle with no backing file.
    #[must_use]
    pub fn from_region(backend: B, region: B::Region) -> Self {
        Self {
            backend,
            region,
            backing: None,
        }
    }

    /// Path of the backing file, if one exists.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.backing.as_ref().map(|b| b.path.as_path())
    }

    /// Length of the mapped region in bytes.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.region.len() as u64
    }

    /// Whether the mapped region is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.region.is_empty()
    }

    /// Read-only slice of the region for [offset, offset+len).
    ///
    /// # Errors
    ///
    /// Returns `MmapHandleError::OutOfBounds` if the range exceeds the
    /// region.
    pub fn as_slice(&self, offset: u64, len: u64) -> Result<&[u8]> {
        let range = checked_range(offset, len, self.len())?;
        Ok(&self.region.as_slice()[range])
    }

    /// Mutable slice of the region for [offset, offset+len).
    ///
    /// # Errors
    ///
    /// Returns `MmapHandleError::OutOfBounds` if the range exceeds the
    /// region, or `MmapHandleError::InvalidMode` for read-only mappings.
    pub fn as_mut_slice(&mut self, offset: u64, len: u64) -> Result<&mut [u8]> {
        let range = checked_range(offset, len, self.len())?;
        Ok(&mut self.region.as_mut_slice()?[range])
    }

    /// Copy `data` into the region at `offset`.
    ///
    /// # Errors
    ///
    /// Returns `MmapHandleError::OutOfBounds` if the write exceeds the
    /// region, or `MmapHandleError::InvalidMode` for read-only mappings.
    pub fn update_region(&mut self, offset: u64, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        let dst = self.as_mut_slice(offset, data.len() as u64)?;
        dst.copy_from_slice(data);
        Ok(())
    }

    /// Copy `buf.len()` bytes out of the region starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns `MmapHandleError::OutOfBounds` if the read exceeds the region.
    pub fn read_into(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let src = self.as_slice(offset, buf.len() as u64)?;
        buf.copy_from_slice(src);
        Ok(())
    }

    /// Synchronize the region to persistent storage.
    ///
    /// No-op for handles without a backing descriptor.
    ///
    /// # Errors
    ///
    /// Returns `MmapHandleError::Io` with op `"sync"` if the msync fails.
    pub fn flush(&self) -> Result<()> {
        let Some(backing) = &self.backing else {
            return Ok(());
        };
        self.backend
            .sync(&self.region)
            .map_err(|e| MmapHandleError::io("sync", &backing.path, e))
    }

    /// Synchronize `len` bytes starting at `offset` to persistent storage.
    ///
    /// No-op for handles without a backing descriptor.
    ///
    /// # Errors
    ///
    /// Returns `MmapHandleError::OutOfBounds` if the range exceeds the
    /// region, or `MmapHandleError::Io` with op `"sync"` if the msync fails.
    pub fn flush_range(&self, offset: u64, len: u64) -> Result<()> {
        let Some(backing) = &self.backing else {
            return Ok(());
        };
        if len == 0 {
            return Ok(());
        }
        let range = checked_range(offset, len, self.len())?;
        self.backend
            .sync_range(&self.region, range.start, range.end - range.start)
            .map_err(|e| MmapHandleError::io("sync", &backing.path, e))
    }

    /// Release the mapping and descriptor, optionally truncating the file.
    ///
    /// Terminal: consumes the handle. No-op for handles without a backing
    /// descriptor. Otherwise runs sync, munmap, optional truncate to
    /// `truncate_to` bytes, then closes the descriptor. The steps
    /// short-circuit: the first failure is surfaced and later steps are not
    /// attempted, which can leave the mapping or descriptor unreleased.
    /// `None` skips truncation and leaves the file at its mapped size.
    ///
    /// The file is never removed; use [`MappedFileHandle::delete`] for that.
    ///
    /// # Errors
    ///
    /// Returns `MmapHandleError::Io` naming the failing step (`"sync"`,
    /// `"munmap"`, `"truncate"`, or `"close"`) and the file path.
    pub fn close(self, truncate_to: Option<u64>) -> Result<()> {
        let Self {
            backend,
            region,
            backing,
        } = self;
        let Some(Backing { file, path }) = backing else {
            return Ok(());
        };
        debug!("closing {} (truncate_to: {:?})", path.display(), truncate_to);
        backend
            .sync(&region)
            .map_err(|e| MmapHandleError::io("sync", &path, e))?;
        backend
            .unmap(region)
            .map_err(|e| MmapHandleError::io("munmap", &path, e))?;
        if let Some(size) = truncate_to {
            file.set_len(size)
                .map_err(|e| MmapHandleError::io("truncate", &path, e))?;
        }
        close_file(file).map_err(|e| MmapHandleError::io("close", &path, e))
    }

    /// Release the mapping and descriptor, then remove the file.
    ///
    /// Terminal: consumes the handle. No-op for handles without a backing
    /// descriptor. Otherwise runs munmap, truncate to zero, descriptor
    /// close, then file removal, short-circuiting on the first failure as
    /// [`MappedFileHandle::close`] does. Dirty pages are not synced first:
    /// the contents are being discarded.
    ///
    /// # Errors
    ///
    /// Returns `MmapHandleError::Io` naming the failing step (`"munmap"`,
    /// `"truncate"`, `"close"`, or `"remove"`) and the file path.
    pub fn delete(self) -> Result<()> {
        let Self {
            backend,
            region,
            backing,
        } = self;
        let Some(Backing { file, path }) = backing else {
            return Ok(());
        };
        debug!("deleting {}", path.display());
        backend
            .unmap(region)
            .map_err(|e| MmapHandleError::io("munmap", &path, e))?;
        file.set_len(0)
            .map_err(|e| MmapHandleError::io("truncate", &path, e))?;
        close_file(file).map_err(|e| MmapHandleError::io("close", &path, e))?;
        fs::remove_file(&path).map_err(|e| MmapHandleError::io("remove", &path, e))
    }
}
