//! Identity types that travel on the wire.
//!
//! Everything here is serialized to or deserialized from the backend's
//! auth endpoints. Field names follow the backend's JSON (`_id`, `email`,
//! `role`, `name`, `avatar`), not Rust conventions, which is what the
//! `#[serde(...)]` attributes are for.

use serde::{Deserialize, Deserializer, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// The permission level of a [`Principal`].
///
/// The backend sends roles as lowercase strings. Anything we don't know
/// about deserializes to [`Role::Other`] instead of failing the whole
/// response. A new role on the server must not lock everyone out of the
/// client.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access to the admin surfaces.
    Admin,

    /// A regular storefront customer. This is what the backend assigns
    /// when a role is not set explicitly.
    #[default]
    User,

    /// A role this client version doesn't recognize.
    #[serde(other)]
    Other,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
            Self::Other => write!(f, "other"),
        }
    }
}

// ---------------------------------------------------------------------------
// Principal
// ---------------------------------------------------------------------------

/// The authenticated identity, as the backend describes it.
///
/// A `Principal` is an immutable snapshot: the session layer replaces it
/// wholesale on every successful login or reconciliation and never edits
/// individual fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPrincipal")]
pub struct Principal {
    /// Server-side identifier. Document databases call it `_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Login email.
    pub email: String,

    /// Permission level. Defaults to [`Role::User`] when absent or null.
    pub role: Role,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Avatar image reference (unresolved; see the media crate).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Principal {
    /// Creates a principal with just an email and a role.
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            id: None,
            email: email.into(),
            role,
            name: None,
            avatar: None,
        }
    }

    /// Returns `true` if this principal may use the admin surfaces.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Name to show in the UI: the display name, falling back to the email.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

/// What the backend actually sends for a user. Document databases may
/// include both `_id` and an `id` virtual, and unset fields may be `null`.
#[derive(Deserialize)]
struct RawPrincipal {
    #[serde(default, rename = "_id")]
    object_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    role: Role,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
}

impl From<RawPrincipal> for Principal {
    fn from(raw: RawPrincipal) -> Self {
        Self {
            id: raw.id.or(raw.object_id),
            email: raw.email,
            role: raw.role,
            name: raw.name,
            avatar: raw.avatar,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Credential
// ---------------------------------------------------------------------------

/// An opaque bearer token proving a [`Principal`]'s authentication.
///
/// The client never looks inside the token. It stores it, replays it as an
/// `Authorization: Bearer …` header, and throws it away on logout.
///
/// `Debug` is implemented by hand so a token never ends up in a log line
/// through `{:?}`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the credential and returns the raw token.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns `true` if the token is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// The value for an HTTP `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

// ---------------------------------------------------------------------------
// LoginRequest
// ---------------------------------------------------------------------------

/// Body of the login call: the identifier/secret pair.
///
/// Borrows both strings. The request is encoded immediately and dropped.
#[derive(Clone, Copy, Serialize)]
pub struct LoginRequest<'a> {
    /// The identifier. The backend identifies accounts by email.
    pub email: &'a str,
    /// The secret.
    pub password: &'a str,
}

impl<'a> LoginRequest<'a> {
    /// Creates a login request.
    pub fn new(email: &'a str, password: &'a str) -> Self {
        Self { email, password }
    }
}

impl fmt::Debug for LoginRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
