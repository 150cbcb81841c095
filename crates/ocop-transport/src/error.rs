/// Errors that can occur while setting up a transport.
///
/// Request-time failures are not `TransportError`s: they are reported to
/// the session layer as [`AuthFailure`](ocop_protocol::AuthFailure)s.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The base URL is empty, unparsable, or not `http(s)`.
    #[error("invalid base url {0:?}")]
    InvalidBaseUrl(String),

    /// The HTTP client could not be built (TLS backend, etc.).
    #[cfg(feature = "http")]
    #[error("http client setup failed: {0}")]
    Client(#[source] reqwest::Error),
}
