//! Session types: what a UI surface observes about the current user.
//!
//! A [`Session`] is a read-only snapshot published by the
//! [`SessionManager`](crate::SessionManager). It tracks:
//! - WHO is logged in, if anyone ([`SessionState`])
//! - WHETHER a stored credential is still being checked (`reconciling`)
//! - WHICH attempt produced it (`generation`)

use ocop_protocol::{Credential, Principal, Role};

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The authentication state of the client.
///
/// ```text
///   Anonymous ──login()──→ Authenticating ──ok──→ Authenticated
///       ↑                        │
///       │                       err
///       │                        ▼
///       └──── clear_error() ── Errored
///
///   logout() from any state ──→ Anonymous
/// ```
///
/// `Authenticated` carries the principal and the credential together, so
/// "principal without credential" can't be expressed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nobody is logged in.
    #[default]
    Anonymous,

    /// A login request is in flight.
    Authenticating,

    /// Logged in. The credential is the one that obtained or validated the
    /// principal.
    Authenticated {
        principal: Principal,
        credential: Credential,
    },

    /// The last login attempt failed. `reason` is ready to show the user.
    Errored { reason: String },
}

impl SessionState {
    /// Returns `true` for [`SessionState::Authenticated`].
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// The logged-in principal, if any.
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Authenticated { principal, .. } => Some(principal),
            _ => None,
        }
    }

    /// The live credential, if any.
    pub fn credential(&self) -> Option<&Credential> {
        match self {
            Self::Authenticated { credential, .. } => Some(credential),
            _ => None,
        }
    }

    /// The login error to display, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Errored { reason } => Some(reason),
            _ => None,
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => write!(f, "Anonymous"),
            Self::Authenticating => write!(f, "Authenticating"),
            Self::Authenticated { .. } => write!(f, "Authenticated"),
            Self::Errored { .. } => write!(f, "Errored"),
        }
    }
}

// ---------------------------------------------------------------------------
// Access
// ---------------------------------------------------------------------------

/// What a protected screen should do right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Don't decide yet: a stored credential is being checked, or a login
    /// is in flight. Render a spinner, not a login prompt.
    Pending,

    /// Show the screen.
    Granted,

    /// Send the user to the login screen.
    Denied,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A snapshot of the client session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub(crate) state: SessionState,
    pub(crate) reconciling: bool,
    pub(crate) generation: u64,
}

impl Session {
    /// The authentication state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// `true` while a stored credential exists that hasn't been checked
    /// against the server yet. While this is set, an `Anonymous` state
    /// means "don't know yet", not "logged out".
    pub fn is_reconciling(&self) -> bool {
        self.reconciling
    }

    /// Counter of session-changing attempts. Bumped by every login,
    /// reconciliation and logout.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Shorthand for `self.state().principal()`.
    pub fn principal(&self) -> Option<&Principal> {
        self.state.principal()
    }

    /// Decides access for a protected screen.
    ///
    /// `required` is the role the screen needs (admin surfaces pass
    /// `Some(Role::Admin)`); `None` means any logged-in principal.
    pub fn access(&self, required: Option<Role>) -> Access {
        match &self.state {
            SessionState::Authenticated { principal, .. } => match required {
                Some(role) if principal.role != role => Access::Denied,
                _ => Access::Granted,
            },
            SessionState::Authenticating => Access::Pending,
            _ if self.reconciling => Access::Pending,
            SessionState::Anonymous | SessionState::Errored { .. } => {
                Access::Denied
            }
        }
    }
}
