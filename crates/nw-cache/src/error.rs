// error.rs — Error types for the snapshot cache.

use thiserror::Error;

/// Errors that can occur while persisting the goal snapshot.
///
/// Load-side failures never surface here: a missing or corrupt snapshot
/// degrades to an empty list at the [`crate::SnapshotStore`] boundary.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    /// Failed to serialize the goal snapshot.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
