//! The seam between the session layer and the backend.
//!
//! The session manager doesn't know about HTTP, URLs or JSON. It needs two
//! operations and a tagged answer from each. The HTTP implementation lives
//! in the transport crate; tests plug in fakes.

use ocop_protocol::{AuthFailure, Credential, LoginGrant, Principal};

/// Authenticates identifier/secret pairs and validates stored credentials.
///
/// # Trait bounds
///
/// - `Send + Sync + 'static` → the gateway lives inside the
///   [`SessionManager`](crate::SessionManager) for the whole client process
///   and may be used from any Tokio task.
///
/// # Example
///
/// ```rust
/// use ocop_protocol::{AuthFailure, Credential, LoginGrant, Principal, Role};
/// use ocop_session::AuthGateway;
///
/// /// Lets exactly one account in. Only for local development.
/// struct DevGateway;
///
/// impl AuthGateway for DevGateway {
///     async fn login(
///         &self,
///         identifier: &str,
///         secret: &str,
///     ) -> Result<LoginGrant, AuthFailure> {
///         if identifier == "admin@ocop.vn" && secret == "admin123" {
///             Ok(LoginGrant {
///                 principal: Principal::new(identifier, Role::Admin),
///                 credential: Credential::new("dev-token"),
///             })
///         } else {
///             Err(AuthFailure::invalid_credentials(Some("Invalid password".into())))
///         }
///     }
///
///     async fn who_am_i(
///         &self,
///         credential: &Credential,
///     ) -> Result<Principal, AuthFailure> {
///         match credential.as_str() {
///             "dev-token" => Ok(Principal::new("admin@ocop.vn", Role::Admin)),
///             _ => Err(AuthFailure::invalid_credentials(None)),
///         }
///     }
/// }
/// ```
pub trait AuthGateway: Send + Sync + 'static {
    /// Exchanges an identifier/secret pair for a principal and credential.
    ///
    /// # Returns
    /// - `Ok(LoginGrant)` — both the principal and the credential
    /// - `Err(AuthFailure)` — tagged with the failure kind and the server's
    ///   message, if any
    fn login(
        &self,
        identifier: &str,
        secret: &str,
    ) -> impl std::future::Future<Output = Result<LoginGrant, AuthFailure>> + Send;

    /// Asks the backend who the given credential belongs to.
    ///
    /// Used during reconciliation. Any `Err` is treated as "this credential
    /// is no longer good".
    fn who_am_i(
        &self,
        credential: &Credential,
    ) -> impl std::future::Future<Output = Result<Principal, AuthFailure>> + Send;
}
