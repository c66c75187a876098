// SPDX-License-Identifier: Apache-2.0

use crate::http::{api_error_response, parse_body, store_failure};
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lumina_api::{ApiError, LoginDto, SignupDto};
use lumina_auth::{hash_password, verify_password};
use lumina_model::{Email, Role};
use serde_json::{json, Value};
use tracing::{error, info};

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ApiError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::missing_field(name)),
    }
}

pub(crate) async fn signup_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Response {
    let dto: SignupDto = match parse_body(body) {
        Ok(dto) => dto,
        Err(e) => return api_error_response(e),
    };
    let (name, email_raw, password) = match (
        required(&dto.name, "name"),
        required(&dto.email, "email"),
        required(&dto.password, "password"),
    ) {
        (Ok(n), Ok(e), Ok(p)) => (n.to_string(), e, p),
        (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => return api_error_response(e),
    };
    let email = match Email::parse(email_raw) {
        Ok(email) => email,
        Err(e) => return api_error_response(ApiError::validation(e.to_string())),
    };

    // Role is decided exactly once, here: the env-configured bootstrap
    // identity comes up admin, everyone else is a regular user.
    let role = if state.config.is_bootstrap_admin(&email) {
        Role::Admin
    } else {
        Role::User
    };

    let password_hash = match hash_password(password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("password hash failed: {e}");
            return api_error_response(ApiError::internal("failed to create user"));
        }
    };

    let user = match state
        .store
        .create_user(name, email, password_hash, role)
        .await
    {
        Ok(user) => user,
        Err(e) => return api_error_response(store_failure("failed to create user", e)),
    };

    let token = match state.tokens.issue(user.id, &user.email) {
        Ok(token) => token,
        Err(e) => {
            error!("token issue failed: {e}");
            return api_error_response(ApiError::internal("failed to create user"));
        }
    };
    info!(user = %user.id, role = %user.role, "account created");
    (
        StatusCode::CREATED,
        Json(json!({"token": token, "user": user.public()})),
    )
        .into_response()
}

pub(crate) async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Response {
    let dto: LoginDto = match parse_body(body) {
        Ok(dto) => dto,
        Err(e) => return api_error_response(e),
    };
    // Absent fields, unknown email, and a wrong password all collapse into
    // the same response; nothing leaks which one happened.
    let (Ok(email_raw), Ok(password)) = (
        required(&dto.email, "email"),
        required(&dto.password, "password"),
    ) else {
        return api_error_response(ApiError::invalid_credentials());
    };
    let Ok(email) = Email::parse(email_raw) else {
        return api_error_response(ApiError::invalid_credentials());
    };

    let user = match state.store.user_by_email(email).await {
        Ok(Some(user)) => user,
        Ok(None) => return api_error_response(ApiError::invalid_credentials()),
        Err(e) => return api_error_response(store_failure("login failed", e)),
    };
    match verify_password(password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => return api_error_response(ApiError::invalid_credentials()),
        Err(e) => {
            error!("stored hash unreadable for {}: {e}", user.id);
            return api_error_response(ApiError::internal("login failed"));
        }
    }

    match state.tokens.issue(user.id, &user.email) {
        Ok(token) => Json(json!({"token": token, "user": user.public()})).into_response(),
        Err(e) => {
            error!("token issue failed: {e}");
            api_error_response(ApiError::internal("login failed"))
        }
    }
}
