//! Client session management for OCOP.
//!
//! This crate owns the client's answer to "who is the current user, and is
//! that belief still valid?":
//!
//! 1. **Authentication** — talking to the backend through the
//!    [`AuthGateway`] trait
//! 2. **Persistence** — keeping the credential across restarts via a
//!    [`CredentialStore`]
//! 3. **Lifecycle** — the [`SessionManager`] state machine: reconcile at
//!    startup, log in, log out, clear errors
//!
//! # How it fits in the stack
//!
//! ```text
//! UI surfaces (above)  ← observe Session snapshots, call the four operations
//!     ↕
//! Session Layer (this crate)  ← state machine + credential persistence
//!     ↕
//! Protocol Layer (below)  ← Principal, Credential, AuthFailure
//! ```

#![allow(async_fn_in_trait)]

mod auth;
mod error;
mod manager;
mod session;
mod store;

pub use auth::AuthGateway;
pub use error::{SessionError, StoreError};
pub use manager::SessionManager;
pub use session::{Access, Session, SessionState};
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
