//! The session manager: the client's single source of truth for who is
//! logged in.
//!
//! It is responsible for:
//! - Reconciling a stored credential with the server at startup
//! - Logging in and persisting the resulting credential
//! - Logging out and forgetting the credential
//! - Publishing every change as a [`Session`] snapshot
//!
//! # Concurrency note
//!
//! All four operations take `&self`, so a UI can call `logout()` while a
//! `login()` is still awaiting the gateway. Nothing is cancelled. Instead,
//! every session-changing operation bumps a generation counter, and an
//! async operation only applies its result if the generation is still the
//! one it started with. The check and the write (state and store) happen
//! together inside the `watch` channel's lock, so a late response can't
//! slip in between a `logout()` clearing the store and resetting the state.

use ocop_protocol::{Credential, LoginGrant, Principal};
use tokio::sync::watch;

use crate::{
    AuthGateway, CredentialStore, Session, SessionError, SessionState,
};

/// Owns the session state machine for one client process.
///
/// Construct one per process and share it (by reference or `Arc`) with
/// every screen. Tests construct their own with fake collaborators.
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ check_auth() ──→ [Authenticated] ──→ logout() ──→ [Anonymous]
///               │                                                 │
///               ▼ (no/invalid credential)                         ▼
///          [Anonymous] ──→ login() ──→ [Authenticated | Errored]
///                                                  │
///                                   clear_error() ─┘──→ [Anonymous]
/// ```
pub struct SessionManager<G, S> {
    gateway: G,
    store: S,
    session: watch::Sender<Session>,
}

impl<G, S> SessionManager<G, S>
where
    G: AuthGateway,
    S: CredentialStore,
{
    /// Creates a manager in the `Anonymous` state.
    ///
    /// The store is peeked once: if it holds a credential, the snapshot
    /// starts with `reconciling` set, so protected screens wait for
    /// [`check_auth`](Self::check_auth) instead of showing a login prompt.
    pub fn new(gateway: G, store: S) -> Self {
        let reconciling = match store.get() {
            Ok(stored) => stored.is_some(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored credential");
                false
            }
        };

        let (session, _) = watch::channel(Session {
            state: SessionState::Anonymous,
            reconciling,
            generation: 0,
        });

        Self {
            gateway,
            store,
            session,
        }
    }

    // =====================================================================
    // Readers
    // =====================================================================

    /// Returns a copy of the current snapshot.
    pub fn snapshot(&self) -> Session {
        self.session.borrow().clone()
    }

    /// Returns a receiver that is notified on every session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    /// Returns a copy of the current state.
    pub fn state(&self) -> SessionState {
        self.session.borrow().state.clone()
    }

    /// See [`Session::is_reconciling`].
    pub fn is_reconciling(&self) -> bool {
        self.session.borrow().reconciling
    }

    /// The logged-in principal, if any.
    pub fn principal(&self) -> Option<Principal> {
        self.session.borrow().state.principal().cloned()
    }

    /// The live credential, if any. Attach it to outgoing requests.
    pub fn credential(&self) -> Option<Credential> {
        self.session.borrow().state.credential().cloned()
    }

    /// The gateway this manager authenticates through.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// The store this manager persists credentials to.
    pub fn store(&self) -> &S {
        &self.store
    }

    // =====================================================================
    // Operations
    // =====================================================================

    /// Restores a session from the stored credential, if there is one.
    ///
    /// - No stored credential → `Anonymous`, without touching the network.
    /// - Credential accepted → `Authenticated`.
    /// - Credential rejected, or the gateway failed in any way → the store
    ///   is cleared and the state is `Anonymous`.
    ///
    /// Never fails: a stale credential is routine. Returns the state after
    /// reconciliation (or the current state, if a newer operation
    /// superseded this one).
    pub async fn check_auth(&self) -> SessionState {
        let ticket = self.begin(|s| s.reconciling = true);

        let stored = match self.store.get() {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored credential");
                None
            }
        };

        let Some(credential) = stored else {
            self.settle(ticket, |s| {
                s.state = SessionState::Anonymous;
                s.reconciling = false;
            });
            tracing::debug!("no stored credential, session is anonymous");
            return self.state();
        };

        match self.gateway.who_am_i(&credential).await {
            Ok(principal) => {
                let email = principal.email.clone();
                let applied = self.settle(ticket, |s| {
                    s.state = SessionState::Authenticated {
                        principal,
                        credential,
                    };
                    s.reconciling = false;
                });
                if applied {
                    tracing::info!(%email, "session restored");
                } else {
                    tracing::debug!("stale reconciliation result discarded");
                }
            }
            Err(failure) => {
                let applied = self.settle(ticket, |s| {
                    self.clear_store();
                    s.state = SessionState::Anonymous;
                    s.reconciling = false;
                });
                if applied {
                    tracing::info!(
                        kind = ?failure.kind,
                        "stored credential rejected, session is anonymous"
                    );
                } else {
                    tracing::debug!("stale reconciliation failure discarded");
                }
            }
        }

        self.state()
    }

    /// Logs in with an identifier/secret pair.
    ///
    /// Moves to `Authenticating`, then to `Authenticated` (credential
    /// persisted) or `Errored` (store untouched). The outcome is also
    /// returned so a caller can react right away.
    ///
    /// # Errors
    /// - [`SessionError::InvalidCredentials`], [`SessionError::NetworkFailure`],
    ///   [`SessionError::ServerError`] — the gateway failed
    /// - [`SessionError::Storage`] — the credential could not be persisted
    /// - [`SessionError::Superseded`] — a newer login, reconciliation or
    ///   logout happened while this one was in flight; nothing was applied
    pub async fn login(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<Principal, SessionError> {
        let ticket = self.begin(|s| {
            s.state = SessionState::Authenticating;
            s.reconciling = false;
        });
        tracing::debug!(identifier, "login requested");

        let grant = match self.gateway.login(identifier, secret).await {
            Ok(grant) => grant,
            Err(failure) => {
                let err = SessionError::from(failure);
                let reason = err.reason();
                if self.settle(ticket, |s| {
                    s.state = SessionState::Errored { reason };
                }) {
                    tracing::info!(kind = ?err.kind(), "login failed");
                } else {
                    tracing::debug!("stale login failure discarded");
                }
                return Err(err);
            }
        };

        let LoginGrant {
            principal,
            credential,
        } = grant;
        let mut outcome = Err(SessionError::Superseded);

        self.session.send_if_modified(|s| {
            if s.generation != ticket {
                return false;
            }
            match self.store.set(&credential) {
                Ok(()) => {
                    s.state = SessionState::Authenticated {
                        principal: principal.clone(),
                        credential,
                    };
                    outcome = Ok(principal);
                }
                Err(e) => {
                    // Don't leave an older credential behind a failed
                    // login: the next start would reconcile the wrong user.
                    self.clear_store();
                    let err = SessionError::from(e);
                    s.state = SessionState::Errored { reason: err.reason() };
                    outcome = Err(err);
                }
            }
            true
        });

        match &outcome {
            Ok(principal) => tracing::info!(
                email = %principal.email,
                role = %principal.role,
                "login succeeded"
            ),
            Err(SessionError::Superseded) => {
                tracing::debug!("stale login grant discarded");
            }
            Err(e) => tracing::warn!(error = %e, "login could not be completed"),
        }

        outcome
    }

    /// Logs out: clears the store and moves to `Anonymous`.
    ///
    /// Synchronous and unconditional. Any in-flight login or
    /// reconciliation is superseded and its result will be discarded.
    pub fn logout(&self) {
        self.session.send_modify(|s| {
            s.generation += 1;
            self.clear_store();
            s.state = SessionState::Anonymous;
            s.reconciling = false;
        });
        tracing::info!("logged out");
    }

    /// Dismisses a login error: `Errored` → `Anonymous`. No-op otherwise.
    pub fn clear_error(&self) {
        self.session.send_if_modified(|s| {
            if matches!(s.state, SessionState::Errored { .. }) {
                s.state = SessionState::Anonymous;
                true
            } else {
                false
            }
        });
    }

    // =====================================================================
    // Internals
    // =====================================================================

    /// Starts a session-changing operation. Returns its generation ticket.
    fn begin(&self, update: impl FnOnce(&mut Session)) -> u64 {
        let mut ticket = 0;
        self.session.send_modify(|s| {
            s.generation += 1;
            ticket = s.generation;
            update(s);
        });
        ticket
    }

    /// Applies `update` only if no newer operation has started since
    /// `ticket` was issued. Returns whether it was applied.
    fn settle(&self, ticket: u64, update: impl FnOnce(&mut Session)) -> bool {
        self.session.send_if_modified(|s| {
            if s.generation != ticket {
                return false;
            }
            update(s);
            true
        })
    }

    fn clear_store(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "could not clear stored credential");
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
