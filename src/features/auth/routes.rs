use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;
use crate::features::auth::session::SessionSigner;

/// Shared state for auth routes: the identity service plus the session
/// cookie signer used to establish sessions on login.
#[derive(Clone)]
pub struct AuthState {
    pub service: Arc<AuthService>,
    pub sessions: Arc<SessionSigner>,
}

pub fn routes(service: Arc<AuthService>, sessions: Arc<SessionSigner>) -> Router {
    Router::new()
        .route("/api/users/register", post(handlers::register))
        .route("/api/users/login", post(handlers::login))
        .route("/api/users/logout", post(handlers::logout))
        .route("/api/users/me", get(handlers::me))
        .with_state(AuthState { service, sessions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SessionConfig;
    use crate::core::middleware::session_middleware;
    use crate::modules::store::MemoryCollection;
    use axum::http::StatusCode;
    use axum::middleware::from_fn_with_state;
    use axum_test::{TestServer, TestServerConfig};
    use serde_json::json;
    use std::time::Duration;

    // Full app wiring for these tests: session cookie decoded by the
    // middleware, identity gated by the extractor.
    fn test_server() -> TestServer {
        let service = Arc::new(AuthService::new(Arc::new(MemoryCollection::new())));
        let sessions = Arc::new(SessionSigner::new(&SessionConfig {
            secret: "router-test-secret".to_string(),
            ttl: Duration::from_secs(60),
        }));

        let app = routes(service, Arc::clone(&sessions))
            .layer(from_fn_with_state(sessions, session_middleware));

        let config = TestServerConfig {
            save_cookies: true,
            ..TestServerConfig::default()
        };
        TestServer::new_with_config(app, config).unwrap()
    }

    fn register_body(email: &str) -> serde_json::Value {
        json!({
            "name": "Ayu",
            "email": email,
            "password": "rahasia",
            "role": "creator",
        })
    }

    #[tokio::test]
    async fn register_login_me_round_trip() {
        let server = test_server();

        let created = server
            .post("/api/users/register")
            .json(&register_body("ayu@example.com"))
            .await;
        assert_eq!(created.status_code(), StatusCode::CREATED);

        let logged_in = server
            .post("/api/users/login")
            .json(&json!({"email": "ayu@example.com", "password": "rahasia"}))
            .await;
        assert_eq!(logged_in.status_code(), StatusCode::OK);

        // The saved cookie now authenticates subsequent requests
        let me = server.get("/api/users/me").await;
        assert_eq!(me.status_code(), StatusCode::OK);
        let body: serde_json::Value = me.json();
        assert_eq!(body["data"]["user_name"], "Ayu");
        assert_eq!(body["data"]["role"], "creator");
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized_not_redirected() {
        let server = test_server();

        server
            .post("/api/users/register")
            .json(&register_body("ayu@example.com"))
            .await;

        let response = server
            .post("/api/users/login")
            .json(&json!({"email": "ayu@example.com", "password": "salah"}))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn me_without_session_redirects_to_login() {
        let server = test_server();

        let response = server.get("/api/users/me").await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/login");
    }

    #[tokio::test]
    async fn logout_clears_the_session() {
        let server = test_server();

        server
            .post("/api/users/register")
            .json(&register_body("ayu@example.com"))
            .await;
        server
            .post("/api/users/login")
            .json(&json!({"email": "ayu@example.com", "password": "rahasia"}))
            .await;

        let logged_out = server.post("/api/users/logout").await;
        assert_eq!(logged_out.status_code(), StatusCode::OK);

        let me = server.get("/api/users/me").await;
        assert_eq!(me.status_code(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn register_rejects_malformed_email() {
        let server = test_server();

        let response = server
            .post("/api/users/register")
            .json(&register_body("not-an-email"))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }
}
