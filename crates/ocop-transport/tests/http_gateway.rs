//! Integration tests for the HTTP gateway.
//!
//! These tests spin up a real HTTP server (axum on `127.0.0.1:0`) that
//! imitates the backend's auth routes, and point the gateway at it. That
//! way the status-code and envelope mapping is checked over an actual
//! socket, not against hand-built response objects.

#[cfg(feature = "http")]
mod http {
    use std::time::Duration;

    use axum::Router;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::Json;
    use ocop_protocol::{Credential, FailureKind};
    use ocop_session::{
        AuthGateway, CredentialStore, MemoryCredentialStore, SessionManager,
        SessionState,
    };
    use ocop_transport::{HttpGateway, TransportError};
    use serde_json::{Value, json};

    /// Serves `router` on a random port and returns the API base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = listener.local_addr().expect("should have address");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("server should run");
        });
        format!("http://{addr}/api")
    }

    /// The backend's login route: one known account.
    async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if body["email"] == "admin@ocop.vn" && body["password"] == "admin123" {
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "data": {
                        "user": { "_id": "1", "email": "admin@ocop.vn", "role": "admin" },
                        "token": "T1"
                    }
                })),
            )
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "message": "Invalid password" })),
            )
        }
    }

    /// The backend's "me" route: accepts only `Bearer T1`.
    async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            == Some("Bearer T1");
        if authorized {
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "data": { "user": { "email": "admin@ocop.vn", "role": "admin" } }
                })),
            )
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "message": "Token expired" })),
            )
        }
    }

    fn backend() -> Router {
        Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/me", get(me))
    }

    // =====================================================================
    // login
    // =====================================================================

    #[tokio::test]
    async fn test_login_valid_account_returns_grant() {
        let base = serve(backend()).await;
        let gateway = HttpGateway::new(&base).unwrap();

        let grant = gateway
            .login("admin@ocop.vn", "admin123")
            .await
            .expect("should succeed");

        assert_eq!(grant.principal.email, "admin@ocop.vn");
        assert_eq!(grant.principal.id.as_deref(), Some("1"));
        assert!(grant.principal.is_admin());
        assert_eq!(grant.credential.as_str(), "T1");
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_invalid_credentials() {
        let base = serve(backend()).await;
        let gateway = HttpGateway::new(&base).unwrap();

        let failure = gateway.login("admin@ocop.vn", "nope").await.unwrap_err();

        assert_eq!(failure.kind, FailureKind::InvalidCredentials);
        assert_eq!(failure.reason(), "Invalid password");
    }

    #[tokio::test]
    async fn test_login_success_false_with_200_is_invalid_credentials() {
        // Some routes reject with a 200 and `success: false`.
        let router = Router::new().route(
            "/api/auth/login",
            post(|| async {
                Json(json!({ "success": false, "message": "Account locked" }))
            }),
        );
        let base = serve(router).await;
        let gateway = HttpGateway::new(&base).unwrap();

        let failure = gateway.login("a@b.vn", "x").await.unwrap_err();

        assert_eq!(failure.kind, FailureKind::InvalidCredentials);
        assert_eq!(failure.reason(), "Account locked");
    }

    #[tokio::test]
    async fn test_login_server_error_page_is_server_error() {
        let router = Router::new().route(
            "/api/auth/login",
            post(|| async {
                (StatusCode::BAD_GATEWAY, "<html>502 Bad Gateway</html>")
            }),
        );
        let base = serve(router).await;
        let gateway = HttpGateway::new(&base).unwrap();

        let failure = gateway.login("a@b.vn", "x").await.unwrap_err();

        assert_eq!(failure.kind, FailureKind::ServerError);
        assert_eq!(failure.reason(), "Login failed");
    }

    #[tokio::test]
    async fn test_login_500_envelope_keeps_message() {
        let router = Router::new().route(
            "/api/auth/login",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "success": false, "message": "Database unavailable" })),
                )
            }),
        );
        let base = serve(router).await;
        let gateway = HttpGateway::new(&base).unwrap();

        let failure = gateway.login("a@b.vn", "x").await.unwrap_err();

        assert_eq!(failure.kind, FailureKind::ServerError);
        assert_eq!(failure.reason(), "Database unavailable");
    }

    #[tokio::test]
    async fn test_login_missing_success_flag_is_server_error() {
        let router = Router::new().route(
            "/api/auth/login",
            post(|| async { Json(json!({ "token": "T1" })) }),
        );
        let base = serve(router).await;
        let gateway = HttpGateway::new(&base).unwrap();

        let failure = gateway.login("a@b.vn", "x").await.unwrap_err();

        assert_eq!(failure.kind, FailureKind::ServerError);
    }

    #[tokio::test]
    async fn test_login_unreachable_backend_is_network_failure() {
        // Grab a free port, then release it so nothing is listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let gateway = HttpGateway::new(&format!("http://{addr}/api")).unwrap();

        let failure = gateway.login("a@b.vn", "x").await.unwrap_err();

        assert_eq!(failure.kind, FailureKind::NetworkFailure);
    }

    #[tokio::test]
    async fn test_login_slow_backend_times_out_as_network_failure() {
        let router = Router::new().route(
            "/api/auth/login",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({ "success": false }))
            }),
        );
        let base = serve(router).await;
        let gateway = HttpGateway::builder(&base)
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();

        let failure = gateway.login("a@b.vn", "x").await.unwrap_err();

        assert_eq!(failure.kind, FailureKind::NetworkFailure);
    }

    // =====================================================================
    // who_am_i
    // =====================================================================

    #[tokio::test]
    async fn test_who_am_i_sends_bearer_credential() {
        let base = serve(backend()).await;
        let gateway = HttpGateway::new(&base).unwrap();

        let principal = gateway
            .who_am_i(&Credential::new("T1"))
            .await
            .expect("should succeed");

        assert_eq!(principal.email, "admin@ocop.vn");
    }

    #[tokio::test]
    async fn test_who_am_i_expired_token_is_invalid_credentials() {
        let base = serve(backend()).await;
        let gateway = HttpGateway::new(&base).unwrap();

        let failure = gateway
            .who_am_i(&Credential::new("stale"))
            .await
            .unwrap_err();

        assert_eq!(failure.kind, FailureKind::InvalidCredentials);
        assert_eq!(failure.reason(), "Token expired");
    }

    #[tokio::test]
    async fn test_who_am_i_401_without_body_is_invalid_credentials() {
        let router = Router::new()
            .route("/api/auth/me", get(|| async { StatusCode::UNAUTHORIZED }));
        let base = serve(router).await;
        let gateway = HttpGateway::new(&base).unwrap();

        let failure = gateway
            .who_am_i(&Credential::new("T1"))
            .await
            .unwrap_err();

        assert_eq!(failure.kind, FailureKind::InvalidCredentials);
    }

    // =====================================================================
    // Construction
    // =====================================================================

    #[test]
    fn test_new_rejects_invalid_base_url() {
        assert!(matches!(
            HttpGateway::new("not a url"),
            Err(TransportError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_new_normalizes_trailing_slash() {
        let gateway = HttpGateway::new("http://localhost:5000/api/").unwrap();
        assert_eq!(gateway.base_url(), "http://localhost:5000/api");
    }

    // =====================================================================
    // Through the session manager
    // =====================================================================

    #[tokio::test]
    async fn test_session_manager_over_http_login_then_reconcile() {
        let base = serve(backend()).await;

        let mgr = SessionManager::new(
            HttpGateway::new(&base).unwrap(),
            MemoryCredentialStore::new(),
        );
        mgr.login("admin@ocop.vn", "admin123").await.unwrap();
        let token = mgr.store().get().unwrap().expect("credential persisted");

        // Next "process start": a fresh manager over a store holding the
        // same token reconciles without asking for the password.
        let restarted = SessionManager::new(
            HttpGateway::new(&base).unwrap(),
            MemoryCredentialStore::with_credential(token),
        );
        assert!(restarted.is_reconciling());
        let state = restarted.check_auth().await;

        assert!(state.is_authenticated());
        assert_eq!(
            restarted.principal().map(|p| p.email),
            Some("admin@ocop.vn".to_string())
        );
    }

    #[tokio::test]
    async fn test_session_manager_over_http_rejected_login_is_errored() {
        let base = serve(backend()).await;
        let mgr = SessionManager::new(
            HttpGateway::new(&base).unwrap(),
            MemoryCredentialStore::new(),
        );

        let _ = mgr.login("admin@ocop.vn", "wrong").await;

        assert_eq!(
            mgr.state(),
            SessionState::Errored {
                reason: "Invalid password".into()
            }
        );
    }
}
