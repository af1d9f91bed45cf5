//! Handlers for the `/auth` resource.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use facility_core::error::CoreError;
use facility_core::rate_limit::{client_ip, ThrottleDecision};
use facility_core::roles::role_for;
use facility_db::models::people::PeopleResponse;
use facility_db::models::rate_limit::CreateRateLimitAttempt;
use facility_db::repositories::{PeopleRepo, RateLimitRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{generate_access_token, TokenSubject};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::handlers::validate_body;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 150))]
    pub loginid: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: PeopleResponse,
}

/// POST /api/v1/auth/login
///
/// Authenticate with login id + password. Failed attempts are counted per
/// login id and per client address; once the threshold is reached inside
/// the window the request is refused with 429 before credentials are checked.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<LoginResponse>>> {
    validate_body(&input)?;

    let ip_address = client_ip(
        headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok()),
    );
    let throttle = state.config.login_throttle;
    let now = Utc::now();

    // 1. Refuse early when the username or address is locked out.
    let window = RateLimitRepo::failures_since(
        &state.pool,
        &input.loginid,
        &ip_address,
        throttle.window_start(now),
    )
    .await?;
    if let ThrottleDecision::Locked { retry_after_secs } = throttle.check(window.into(), now) {
        tracing::warn!(
            loginid = %input.loginid,
            ip = %ip_address,
            failures = window.failures,
            "Login throttled",
        );
        return Err(AppError::Core(CoreError::RateLimited { retry_after_secs }));
    }

    // 2. Look up the person and verify the password.
    let person = PeopleRepo::find_by_loginid(&state.pool, &input.loginid).await?;
    let verified = match &person {
        Some(p) => verify_password(&input.password, &p.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?,
        None => false,
    };

    let attempt = |success| CreateRateLimitAttempt {
        username: input.loginid.clone(),
        ip_address: ip_address.clone(),
        success,
    };

    let person = match person {
        Some(p) if verified => p,
        _ => {
            RateLimitRepo::record(&state.pool, &attempt(false)).await?;
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid login id or password".into(),
            )));
        }
    };

    // 3. Disabled accounts count as failures too.
    if !person.enable {
        RateLimitRepo::record(&state.pool, &attempt(false)).await?;
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is disabled".into(),
        )));
    }

    // 4. Success: record it, forget earlier failures, prune expired rows.
    RateLimitRepo::record(&state.pool, &attempt(true)).await?;
    RateLimitRepo::clear_failures(&state.pool, &input.loginid).await?;
    let purged = RateLimitRepo::purge_before(&state.pool, throttle.window_start(now)).await?;
    if purged > 0 {
        tracing::debug!(purged, "Purged expired login attempts");
    }

    let role = role_for(person.is_admin);
    let access_token = generate_access_token(
        TokenSubject {
            people_id: person.id,
            role,
            client_id: person.client_id,
            bu_id: person.bu_id,
        },
        &state.config.jwt,
    )
    .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(people_id = person.id, client_id = person.client_id, role, "Login succeeded");

    Ok(Json(DataResponse {
        data: LoginResponse {
            access_token,
            expires_in: state.config.jwt.access_token_expiry_mins * 60,
            user: PeopleResponse::from(&person),
        },
    }))
}
