// error.rs — Error types for the synchronization engine.
//
// Most engine operations deliberately have no error channel: local
// durability is guaranteed before any fallible step, and remote or
// projection faults degrade behavior instead of failing the call. This
// enum covers the places an error object still exists — observer
// callbacks and internal logging.

use thiserror::Error;

/// Errors inside the synchronization engine.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Local snapshot persistence failed (logged and swallowed; the
    /// session continues in memory).
    #[error(transparent)]
    Cache(#[from] nw_cache::CacheError),

    /// The remote store reported a failure (degrades to local-only mode).
    #[error(transparent)]
    Remote(#[from] nw_remote::RemoteError),

    /// Writing a document projection failed.
    #[error(transparent)]
    Projection(#[from] nw_projection::ProjectionError),

    /// An observer callback failed (logged; fan-out continues).
    #[error("observer error: {0}")]
    Observer(String),
}
