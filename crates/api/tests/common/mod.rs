#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use facility_api::auth::jwt::{generate_access_token, JwtConfig, TokenSubject};
use facility_api::config::{LogFormat, ServerConfig};
use facility_api::router::build_app_router;
use facility_api::state::AppState;
use facility_core::import::resource::ImportSettings;
use facility_core::rate_limit::LoginThrottle;
use facility_core::types::DbId;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// Fixture ids (see `fixtures/tenants.sql`).
pub const ACME: DbId = 1;
pub const ACME_HQ: DbId = 2;
pub const GLOBEX: DbId = 3;
pub const GLOBEX_HQ: DbId = 4;
pub const ACME_ADMIN: DbId = 1;
pub const ACME_TECH: DbId = 2;
pub const GLOBEX_ADMIN: DbId = 3;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: String::new(),
        db_max_connections: 5,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        import: ImportSettings::default(),
        login_throttle: LoginThrottle::default(),
        log_format: LogFormat::Pretty,
    }
}

/// Build the full application router (same middleware stack as `main.rs`).
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Access token for a fixture person, signed with the test secret.
pub fn token(people_id: DbId, role: &str, client_id: DbId, bu_id: Option<DbId>) -> String {
    generate_access_token(
        TokenSubject {
            people_id,
            role,
            client_id,
            bu_id,
        },
        &test_config().jwt,
    )
    .expect("token generation should succeed")
}

pub fn acme_admin() -> String {
    token(ACME_ADMIN, "admin", ACME, Some(ACME_HQ))
}

pub fn acme_user() -> String {
    token(ACME_TECH, "user", ACME, Some(ACME_HQ))
}

pub fn globex_admin() -> String {
    token(GLOBEX_ADMIN, "admin", GLOBEX, Some(GLOBEX_HQ))
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}
