//! Error types for the protocol layer.
//!
//! Each crate in the workspace defines its own error enum. When you see a
//! `ProtocolError`, the problem is in serialization/deserialization, not in
//! networking or credential storage.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: an HTML error page instead of JSON, missing required
    /// fields, or a truncated body.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The body decoded, but it is not a valid envelope, e.g. the
    /// `success` discriminator is missing, or `success: true` arrived
    /// without the payload the operation needs.
    #[error("invalid envelope: {0}")]
    InvalidEnvelope(String),
}
