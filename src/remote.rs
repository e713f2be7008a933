//! Remote-storage path detection (extension point).
//!
//! No remote backend exists; this module only recognizes remote-storage
//! schemes so that `open` can reject them explicitly instead of handing a
//! URL to the local file system.

/// URL schemes recognized as remote storage.
pub const REMOTE_SCHEMES: &[&str] = &["s3://"];

/// Whether `path` names a remote-storage location.
#[must_use]
pub fn is_remote_path(path: &str) -> bool {
    REMOTE_SCHEMES.iter().any(|scheme| path.starts_with(scheme))
}
