//! # hybrid-mmap: lifecycle management for memory-mapped storage files
//!
//! This crate owns the lifecycle of a file that a storage engine accesses
//! through a memory mapping: open/create and map, read and write through the
//! region, flush to disk, close with optional truncation, and delete.
//!
//! ## Features
//!
//! - **Hybrid handles**: a handle wraps either a file-backed mapping or a
//!   plain in-memory buffer substituted by the caller; buffer-backed handles
//!   treat every lifecycle operation as a defined no-op
//! - **Terminal disposal**: `close` and `delete` consume the handle, so the
//!   region cannot be used after teardown
//! - **Fail-fast teardown**: the first failing step aborts the sequence and
//!   is reported with the operation name and file path
//! - **Pluggable mapping primitive**: the handle depends on the [`MapBackend`]
//!   trait; tests substitute in-memory or fault-injecting doubles
//!
//! ## Quick Start
//!
//! ```no_run
//! use hybrid_mmap::create_mmap;
//!
//! // Create a file pre-allocated to 1MB and map it read-write
//! let mut handle = create_mmap("data.bin", 1024 * 1024)?;
//!
//! // Write data at offset 100 and persist it
//! handle.update_region(100, b"hello, mmap")?;
//! handle.flush()?;
//!
//! // Shrink the file to the bytes in use and release everything
//! handle.close(Some(111))?;
//! # Ok::<(), hybrid_mmap::MmapHandleError>(())
//! ```
//!
//! ## Modules
//!
//! - [`errors`]: Error types for all handle operations
//! - [`backend`]: The mapping primitive contract and its memmap2 backend
//! - [`handle`]: Core `MappedFileHandle` implementation
//! - [`manager`]: High-level convenience functions
//! - [`utils`]: Range validation and platform helpers
//!
//! ## Feature Flags
//!
//! - `async`: Enables Tokio-based async creation helpers
//! - `remote`: Enables remote-storage path detection; `open` rejects such
//!   paths instead of treating them as local files

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(missing_docs)]

pub mod backend;
pub mod errors;
pub mod handle;
pub mod manager;
#[cfg(feature = "remote")]
pub mod remote;
pub mod utils;

pub use backend::{MapBackend, MmapBackend, MmapRegion, OpenMode, Region};
pub use errors::{MmapHandleError, Result};
pub use handle::MappedFileHandle;
pub use manager::{create_mmap, flush_or_noop, load_mmap};
