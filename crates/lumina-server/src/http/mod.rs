use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lumina_api::{map_error, ApiError};
use lumina_store::StoreError;
use serde_json::{json, Value};
use tracing::error;

pub(crate) mod auth;
pub(crate) mod books;
pub(crate) mod orders;
pub(crate) mod payments;
pub(crate) mod wishlist;

pub(crate) fn api_error_response(err: ApiError) -> Response {
    let status =
        StatusCode::from_u16(map_error(&err)).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({"error": err}))).into_response()
}

/// Body parsing through `Value` so every schema violation (missing, unknown,
/// or mistyped fields) surfaces through the API's own 400 shape.
pub(crate) fn parse_body<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body)
        .map_err(|e| ApiError::validation(format!("invalid request body: {e}")))
}

/// Catch-all conversion at the handler boundary: conflicts keep their
/// meaning, everything else degrades to a minimal 500 while the detail goes
/// to the log.
pub(crate) fn store_failure(context: &str, err: StoreError) -> ApiError {
    match err {
        StoreError::EmailTaken => ApiError::email_taken(),
        other => {
            error!("{context}: {other}");
            ApiError::internal(context)
        }
    }
}

pub(crate) async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
