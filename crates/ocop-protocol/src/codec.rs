//! Body encoding for auth requests and responses.
//!
//! The interpretation layer doesn't care HOW bodies are serialized; it
//! just needs something that implements [`Codec`]. The backend speaks JSON
//! today, so [`JsonCodec`] is the only implementation.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Converts request bodies to bytes and response bodies back.
///
/// `Send + Sync + 'static` because the codec is owned by a gateway that
/// may be shared across async tasks for the lifetime of the client.
///
/// `DeserializeOwned` (vs plain `Deserialize`) means the decoded value
/// doesn't borrow from the input bytes, so the response buffer can be
/// dropped right after decoding.
pub trait Codec: Send + Sync + 'static {
    /// The `Content-Type` this codec produces and expects.
    fn content_type(&self) -> &'static str;

    /// Encodes a request body.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Decodes a response body (or part of one).
    ///
    /// # Errors
    /// `ProtocolError::Decode` if the body isn't in this codec's format or
    /// doesn't have the shape `T` needs.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// The backend's wire format.
///
/// Needs the `json` feature (on by default).
///
/// ## Example
///
/// ```rust
/// use ocop_protocol::{Codec, JsonCodec, LoginRequest};
///
/// let body = JsonCodec
///     .encode(&LoginRequest::new("admin@ocop.vn", "admin123"))
///     .unwrap();
/// assert_eq!(
///     body,
///     br#"{"email":"admin@ocop.vn","password":"admin123"}"#.to_vec()
/// );
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
