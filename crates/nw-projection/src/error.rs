// error.rs — Error type for projection write-back.

use thiserror::Error;

/// Errors from writing goal values back into a document.
///
/// Reading never fails — a document without a matching projection simply
/// yields `None`.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The host document engine rejected a text replacement.
    #[error("edit rejected at {locator}: {reason}")]
    EditRejected { locator: String, reason: String },

    /// A locator returned by a scan no longer resolves in the document.
    #[error("stale locator: {0}")]
    StaleLocator(String),
}
