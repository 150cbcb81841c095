//! Transport layer for the OCOP client.
//!
//! Provides [`HttpGateway`], the [`AuthGateway`](ocop_session::AuthGateway)
//! that talks to the backend's REST auth endpoints, and [`Endpoints`], the
//! paths it calls.
//!
//! # Feature Flags
//!
//! - `http` (default) — HTTP gateway via `reqwest`

mod error;
#[cfg(feature = "http")]
mod http;

pub use error::TransportError;
#[cfg(feature = "http")]
pub use http::{HttpGateway, HttpGatewayBuilder};

use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Paths of the auth endpoints, relative to the API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// `POST`, body `{ email, password }`.
    pub login: String,
    /// `GET`, `Authorization: Bearer <token>`.
    pub who_am_i: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: "/auth/login".to_string(),
            who_am_i: "/auth/me".to_string(),
        }
    }
}

/// Checks that `base_url` can serve as an API root and normalizes it
/// (surrounding whitespace and trailing slashes removed).
///
/// # Errors
/// [`TransportError::InvalidBaseUrl`] for empty or non-`http(s)` input.
pub fn normalize_base_url(base_url: &str) -> Result<String, TransportError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let lower = trimmed.to_ascii_lowercase();
    let has_scheme = lower.starts_with("http://") || lower.starts_with("https://");
    let has_host = trimmed.split("://").nth(1).is_some_and(|rest| !rest.is_empty());
    if !has_scheme || !has_host {
        return Err(TransportError::InvalidBaseUrl(base_url.to_string()));
    }
    Ok(trimmed.to_string())
}
