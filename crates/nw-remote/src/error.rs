// error.rs — Error type for the remote store boundary.
//
// The engine does not distinguish between these variants: any RemoteError
// flips it into local-only mode. The variants exist for logs and for the
// CLI's error surfaces, not for control flow.

use thiserror::Error;

/// Errors from the remote goal store.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request never completed (DNS, connect, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("server returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    /// The response body did not decode into a goal record.
    #[error("failed to decode server response: {0}")]
    Decode(String),

    /// No remote endpoint is configured for this session.
    #[error("remote store not configured")]
    NotConfigured,

    /// Simulated outage from a test double.
    #[error("remote unavailable: {0}")]
    Unavailable(String),
}
