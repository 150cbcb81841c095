//! Turns the backend's response envelope into a tagged result.
//!
//! Every auth endpoint answers with the same loose shape:
//!
//! ```text
//! { "success": true,  "data": { ... } }
//! { "success": false, "message": "Invalid password" }
//! ```
//!
//! Nothing outside this module looks at `success`, `message` or `data`.
//! Callers get either a typed payload ([`LoginGrant`], [`Principal`]) or an
//! [`AuthFailure`] whose [`FailureKind`] says what went wrong.
//!
//! Decoding happens in two passes: first just the status fields, so a
//! `success: false` envelope with an odd `data` value is still read as a
//! rejection, then the payload, only when `success` is `true`.

use std::fmt;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{Codec, Credential, Principal, ProtocolError};

/// Reason shown when the backend gives no message of its own.
pub const GENERIC_LOGIN_FAILURE: &str = "Login failed";

// ---------------------------------------------------------------------------
// Tagged results
// ---------------------------------------------------------------------------

/// What a successful login hands back: who you are, and the proof.
///
/// Both are always present together. There is no way to build a grant
/// with one and not the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGrant {
    pub principal: Principal,
    pub credential: Credential,
}

/// The three ways an auth call can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The server looked at the identifier/secret (or the stored token)
    /// and said no.
    InvalidCredentials,

    /// The server could not be reached, or the connection broke before a
    /// full response arrived.
    NetworkFailure,

    /// The server answered, but not with anything we can use: a 5xx, an
    /// HTML error page, a missing `success` flag, a missing token.
    ServerError,
}

/// A failed auth call: the kind, plus the server's own message if it sent
/// one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFailure {
    pub kind: FailureKind,
    pub message: Option<String>,
}

impl AuthFailure {
    /// Creates a failure without a server message.
    pub fn new(kind: FailureKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    /// Attaches a server message. Blank messages are dropped so that
    /// [`reason`](Self::reason) falls back to the generic text.
    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message.filter(|m| !m.trim().is_empty());
        self
    }

    /// Shorthand for a [`FailureKind::InvalidCredentials`] failure.
    pub fn invalid_credentials(message: Option<String>) -> Self {
        Self::new(FailureKind::InvalidCredentials).with_message(message)
    }

    /// Shorthand for a [`FailureKind::NetworkFailure`] failure.
    pub fn network() -> Self {
        Self::new(FailureKind::NetworkFailure)
    }

    /// Shorthand for a [`FailureKind::ServerError`] failure.
    pub fn server_error(message: Option<String>) -> Self {
        Self::new(FailureKind::ServerError).with_message(message)
    }

    /// The most specific human-readable reason available.
    pub fn reason(&self) -> &str {
        self.message.as_deref().unwrap_or(GENERIC_LOGIN_FAILURE)
    }
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

impl std::error::Error for AuthFailure {}

impl From<ProtocolError> for AuthFailure {
    fn from(e: ProtocolError) -> Self {
        tracing::debug!(error = %e, "unusable auth response");
        Self::server_error(None)
    }
}

// ---------------------------------------------------------------------------
// Raw envelope shapes
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct Status {
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
struct Payload<T> {
    data: Option<T>,
}

#[derive(Deserialize)]
struct LoginData {
    user: Principal,
    token: Credential,
}

/// `/auth/me` has been seen both ways: the user nested under `user`, or
/// the user as `data` itself.
#[derive(Deserialize)]
#[serde(untagged)]
enum MeData {
    Wrapped { user: Principal },
    Bare(Principal),
}

impl From<MeData> for Principal {
    fn from(data: MeData) -> Self {
        match data {
            MeData::Wrapped { user } => user,
            MeData::Bare(user) => user,
        }
    }
}

// ---------------------------------------------------------------------------
// Interpretation
// ---------------------------------------------------------------------------

/// Interprets a login response body.
///
/// # Errors
/// - [`FailureKind::InvalidCredentials`] — `success: false`
/// - [`FailureKind::ServerError`] — anything else that isn't a usable grant
pub fn login<C: Codec>(
    codec: &C,
    body: &[u8],
) -> Result<LoginGrant, AuthFailure> {
    let data: LoginData = successful_payload(codec, body)?;
    if data.token.is_blank() {
        return Err(AuthFailure::server_error(None));
    }
    Ok(LoginGrant {
        principal: data.user,
        credential: data.token,
    })
}

/// Interprets a "who am I" response body.
///
/// # Errors
/// Same mapping as [`login`].
pub fn who_am_i<C: Codec>(
    codec: &C,
    body: &[u8],
) -> Result<Principal, AuthFailure> {
    let data: MeData = successful_payload(codec, body)?;
    Ok(data.into())
}

/// Best-effort extraction of the `message` field from any body.
///
/// Used for responses that are failures regardless of their content
/// (e.g. a 5xx status), where the message is still worth showing.
pub fn message<C: Codec>(codec: &C, body: &[u8]) -> Option<String> {
    codec
        .decode::<Status>(body)
        .ok()
        .and_then(|status| status.message)
        .filter(|m| !m.trim().is_empty())
}

fn successful_payload<C: Codec, T: DeserializeOwned>(
    codec: &C,
    body: &[u8],
) -> Result<T, AuthFailure> {
    let status: Status = codec.decode(body)?;
    match status.success {
        Some(true) => {}
        Some(false) => {
            return Err(AuthFailure::invalid_credentials(status.message));
        }
        None => return Err(AuthFailure::server_error(status.message)),
    }

    let payload: Payload<T> = codec.decode(body)?;
    payload.data.ok_or_else(|| {
        AuthFailure::from(ProtocolError::InvalidEnvelope(
            "success without data".into(),
        ))
    })
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{JsonCodec, Role};

    // =====================================================================
    // login()
    // =====================================================================

    #[test]
    fn test_login_success_returns_grant() {
        let body = br#"{"success":true,"data":{"user":{"email":"admin@ocop.vn","role":"admin"},"token":"T1"}}"#;

        let grant = login(&JsonCodec, body).expect("should succeed");

        assert_eq!(grant.principal.email, "admin@ocop.vn");
        assert_eq!(grant.principal.role, Role::Admin);
        assert_eq!(grant.credential.as_str(), "T1");
    }

    #[test]
    fn test_login_rejected_carries_server_message() {
        let body = br#"{"success":false,"message":"Invalid password"}"#;

        let failure = login(&JsonCodec, body).unwrap_err();

        assert_eq!(failure.kind, FailureKind::InvalidCredentials);
        assert_eq!(failure.reason(), "Invalid password");
    }

    #[test]
    fn test_login_rejected_without_message_uses_generic_reason() {
        let failure = login(&JsonCodec, br#"{"success":false}"#).unwrap_err();

        assert_eq!(failure.kind, FailureKind::InvalidCredentials);
        assert_eq!(failure.reason(), GENERIC_LOGIN_FAILURE);
    }

    #[test]
    fn test_login_rejected_ignores_malformed_data() {
        // A rejection is a rejection even if `data` has the wrong shape.
        let body = br#"{"success":false,"message":"Locked","data":[1,2]}"#;

        let failure = login(&JsonCodec, body).unwrap_err();

        assert_eq!(failure.kind, FailureKind::InvalidCredentials);
        assert_eq!(failure.reason(), "Locked");
    }

    #[test]
    fn test_login_missing_success_flag_is_server_error() {
        let body = br#"{"data":{"user":{"email":"a@b.vn"},"token":"T1"}}"#;

        let failure = login(&JsonCodec, body).unwrap_err();

        assert_eq!(failure.kind, FailureKind::ServerError);
    }

    #[test]
    fn test_login_success_without_token_is_server_error() {
        let body = br#"{"success":true,"data":{"user":{"email":"a@b.vn"}}}"#;

        let failure = login(&JsonCodec, body).unwrap_err();

        assert_eq!(failure.kind, FailureKind::ServerError);
    }

    #[test]
    fn test_login_success_with_blank_token_is_server_error() {
        let body = br#"{"success":true,"data":{"user":{"email":"a@b.vn"},"token":""}}"#;

        let failure = login(&JsonCodec, body).unwrap_err();

        assert_eq!(failure.kind, FailureKind::ServerError);
    }

    #[test]
    fn test_login_success_without_data_is_generic_server_error() {
        let failure = login(&JsonCodec, br#"{"success":true}"#).unwrap_err();

        assert_eq!(failure.kind, FailureKind::ServerError);
        assert_eq!(failure.reason(), GENERIC_LOGIN_FAILURE);
    }

    #[test]
    fn test_login_user_with_both_id_fields_is_accepted() {
        let body = br#"{"success":true,"data":{"user":{"_id":"64f0","id":"64f0","email":"admin@ocop.vn","role":"admin"},"token":"T1"}}"#;

        let grant = login(&JsonCodec, body).expect("should succeed");

        assert_eq!(grant.principal.id.as_deref(), Some("64f0"));
        assert!(grant.principal.is_admin());
    }

    #[test]
    fn test_login_null_role_defaults_to_user() {
        let body = br#"{"success":true,"data":{"user":{"_id":"1","email":"a@b.vn","role":null,"name":null},"token":"T1"}}"#;

        let grant = login(&JsonCodec, body).expect("should succeed");

        assert_eq!(grant.principal.role, Role::User);
        assert_eq!(grant.principal.name, None);
    }

    #[test]
    fn test_login_non_json_body_is_server_error() {
        let failure =
            login(&JsonCodec, b"<html>502 Bad Gateway</html>").unwrap_err();

        assert_eq!(failure.kind, FailureKind::ServerError);
        assert_eq!(failure.reason(), GENERIC_LOGIN_FAILURE);
    }

    // =====================================================================
    // who_am_i()
    // =====================================================================

    #[test]
    fn test_who_am_i_accepts_wrapped_user() {
        let body = br#"{"success":true,"data":{"user":{"email":"a@b.vn","role":"admin"}}}"#;

        let principal = who_am_i(&JsonCodec, body).expect("should succeed");

        assert_eq!(principal.email, "a@b.vn");
        assert!(principal.is_admin());
    }

    #[test]
    fn test_who_am_i_accepts_bare_user() {
        let body = br#"{"success":true,"data":{"_id":"1","email":"a@b.vn","name":"An"}}"#;

        let principal = who_am_i(&JsonCodec, body).expect("should succeed");

        assert_eq!(principal.id.as_deref(), Some("1"));
        assert_eq!(principal.role, Role::User);
        assert_eq!(principal.display_name(), "An");
    }

    #[test]
    fn test_who_am_i_unknown_role_is_other() {
        let body = br#"{"success":true,"data":{"email":"a@b.vn","role":"vendor"}}"#;

        let principal = who_am_i(&JsonCodec, body).expect("should succeed");

        assert_eq!(principal.role, Role::Other);
    }

    #[test]
    fn test_who_am_i_rejected_token() {
        let body = br#"{"success":false,"message":"Token expired"}"#;

        let failure = who_am_i(&JsonCodec, body).unwrap_err();

        assert_eq!(failure.kind, FailureKind::InvalidCredentials);
        assert_eq!(failure.reason(), "Token expired");
    }

    // =====================================================================
    // message() / AuthFailure
    // =====================================================================

    #[test]
    fn test_message_extracts_from_any_envelope() {
        let body = br#"{"success":false,"message":"Internal error"}"#;
        assert_eq!(
            message(&JsonCodec, body).as_deref(),
            Some("Internal error")
        );
        assert_eq!(message(&JsonCodec, b"oops"), None);
        assert_eq!(message(&JsonCodec, br#"{"message":"  "}"#), None);
    }

    #[test]
    fn test_auth_failure_blank_message_is_dropped() {
        let failure = AuthFailure::invalid_credentials(Some(" ".into()));
        assert_eq!(failure.message, None);
        assert_eq!(failure.to_string(), GENERIC_LOGIN_FAILURE);
    }
}
