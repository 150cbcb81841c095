//! Error types for the session layer.

use ocop_protocol::{AuthFailure, FailureKind};

/// Errors returned by [`SessionManager::login`](crate::SessionManager::login).
///
/// The first three variants are the login taxonomy. Each carries the
/// human-readable reason that also ends up in
/// [`SessionState::Errored`](crate::SessionState::Errored), so a caller
/// can render the message without matching on the kind.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The server rejected the identifier/secret pair.
    #[error("{0}")]
    InvalidCredentials(String),

    /// The backend could not be reached.
    #[error("{0}")]
    NetworkFailure(String),

    /// The backend answered with something that isn't a usable response.
    #[error("{0}")]
    ServerError(String),

    /// Login succeeded on the server but the credential could not be
    /// persisted, so the session was not established.
    #[error("could not save credential: {0}")]
    Storage(#[from] StoreError),

    /// The response arrived after a newer login, reconciliation or logout
    /// and was discarded.
    #[error("superseded by a newer session change")]
    Superseded,
}

impl SessionError {
    /// The login failure kind, if this is one of the taxonomy variants.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            Self::InvalidCredentials(_) => Some(FailureKind::InvalidCredentials),
            Self::NetworkFailure(_) => Some(FailureKind::NetworkFailure),
            Self::ServerError(_) => Some(FailureKind::ServerError),
            Self::Storage(_) | Self::Superseded => None,
        }
    }

    /// The message to show the user.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

impl From<AuthFailure> for SessionError {
    fn from(failure: AuthFailure) -> Self {
        let reason = failure.reason().to_owned();
        match failure.kind {
            FailureKind::InvalidCredentials => Self::InvalidCredentials(reason),
            FailureKind::NetworkFailure => Self::NetworkFailure(reason),
            FailureKind::ServerError => Self::ServerError(reason),
        }
    }
}

/// Errors from a [`CredentialStore`](crate::CredentialStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading, writing or removing the backing file failed.
    #[error("credential store I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
