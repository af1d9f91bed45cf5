//! Login, token enforcement and login throttling.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, get, get_auth, post_json, ACME, ACME_HQ};
use facility_api::auth::password::hash_password;
use facility_db::models::people::CreatePeople;
use facility_db::repositories::{PeopleRepo, RateLimitRepo};
use serde_json::json;
use sqlx::PgPool;

const PASSWORD: &str = "test_password_123!";

async fn create_person(pool: &PgPool, loginid: &str, is_admin: bool) -> i64 {
    let input = CreatePeople {
        peoplecode: loginid.replace(['@', '.'], "_"),
        peoplename: loginid.to_string(),
        loginid: loginid.to_string(),
        email: Some(format!("{loginid}.test")),
        password_hash: hash_password(PASSWORD).expect("hashing should succeed"),
        is_admin,
        client_id: ACME,
        bu_id: Some(ACME_HQ),
    };
    PeopleRepo::create(pool, &input)
        .await
        .expect("person creation should succeed")
        .id
}

fn login_body(loginid: &str, password: &str) -> serde_json::Value {
    json!({ "loginid": loginid, "password": password })
}

#[sqlx::test(migrations = "../../db/migrations", fixtures("tenants"))]
async fn test_login_success(pool: PgPool) {
    let id = create_person(&pool, "supervisor@acme", true).await;
    let app = common::build_test_app(pool);

    let response = post_json(app.clone(), "/api/v1/auth/login", login_body("supervisor@acme", PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert!(data["access_token"].is_string());
    assert_eq!(data["expires_in"], 15 * 60);
    assert_eq!(data["user"]["id"], id);
    assert_eq!(data["user"]["role"], "admin");
    assert_eq!(data["user"]["client_id"], ACME);
    assert!(data["user"].get("password_hash").is_none());

    // The issued token opens authenticated routes.
    let token = data["access_token"].as_str().unwrap();
    let response = get_auth(app, "/api/v1/imports", token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations", fixtures("tenants"))]
async fn test_login_wrong_password_is_recorded(pool: PgPool) {
    create_person(&pool, "tech2@acme", false).await;
    let app = common::build_test_app(pool.clone());

    let response = post_json(app, "/api/v1/auth/login", login_body("tech2@acme", "nope")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let window = RateLimitRepo::failures_since(&pool, "tech2@acme", "unknown", Utc::now() - Duration::minutes(15))
        .await
        .unwrap();
    assert_eq!(window.failures, 1);
}

#[sqlx::test(migrations = "../../db/migrations", fixtures("tenants"))]
async fn test_login_unknown_user_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/v1/auth/login", login_body("ghost", "whatever")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations", fixtures("tenants"))]
async fn test_login_empty_fields_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/v1/auth/login", login_body("", "")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations", fixtures("tenants"))]
async fn test_disabled_account_is_forbidden(pool: PgPool) {
    let id = create_person(&pool, "gone@acme", false).await;
    sqlx::query("UPDATE people SET enable = false WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/v1/auth/login", login_body("gone@acme", PASSWORD)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations", fixtures("tenants"))]
async fn test_repeated_failures_lock_the_login(pool: PgPool) {
    create_person(&pool, "victim@acme", false).await;
    let app = common::build_test_app(pool);

    for _ in 0..5 {
        let response = post_json(app.clone(), "/api/v1/auth/login", login_body("victim@acme", "bad")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Even the right password is refused while locked.
    let response = post_json(app, "/api/v1/auth/login", login_body("victim@acme", PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().get("retry-after").is_some());

    let json = body_json(response).await;
    assert_eq!(json["code"], "RATE_LIMITED");
    let retry = json["retry_after_secs"].as_i64().unwrap();
    assert!(retry > 0 && retry <= 15 * 60, "retry hint {retry} outside the window");
}

#[sqlx::test(migrations = "../../db/migrations", fixtures("tenants"))]
async fn test_failures_from_one_address_lock_other_usernames(pool: PgPool) {
    create_person(&pool, "real@acme", false).await;
    let app = common::build_test_app(pool);

    for n in 0..5 {
        let response = post_json(
            app.clone(),
            "/api/v1/auth/login",
            login_body(&format!("guess{n}@acme"), "bad"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // All requests above came without X-Forwarded-For, i.e. from "unknown".
    let response = post_json(app, "/api/v1/auth/login", login_body("real@acme", PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[sqlx::test(migrations = "../../db/migrations", fixtures("tenants"))]
async fn test_success_clears_earlier_failures(pool: PgPool) {
    create_person(&pool, "forgetful@acme", false).await;
    let app = common::build_test_app(pool.clone());

    for _ in 0..3 {
        post_json(app.clone(), "/api/v1/auth/login", login_body("forgetful@acme", "bad")).await;
    }
    let response = post_json(app, "/api/v1/auth/login", login_body("forgetful@acme", PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let window = RateLimitRepo::failures_since(
        &pool,
        "forgetful@acme",
        "nowhere",
        Utc::now() - Duration::minutes(15),
    )
    .await
    .unwrap();
    assert_eq!(window.failures, 0);
}

#[sqlx::test(migrations = "../../db/migrations", fixtures("tenants"))]
async fn test_missing_or_bad_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/imports").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app, "/api/v1/imports", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
