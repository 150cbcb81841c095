//! Unified error type for the OCOP client.

use ocop_protocol::ProtocolError;
use ocop_session::{SessionError, StoreError};
use ocop_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `ocop` meta-crate, you deal with this single error type
/// instead of importing errors from each sub-crate. The `#[from]` attribute
/// on each variant generates the `From` impls, so `?` converts sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum OcopError {
    /// Gateway setup failed (bad base URL, HTTP client).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Encoding or decoding failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session operation failed (login, persistence).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The credential store failed outside a session operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A global tracing subscriber was already installed.
    #[error("logging setup failed: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}
