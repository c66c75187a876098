// SPDX-License-Identifier: Apache-2.0

use crate::http::{api_error_response, parse_body};
use crate::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lumina_api::{ApiError, CreateIntentDto};
use lumina_payments::to_minor_units;
use serde_json::{json, Value};
use tracing::error;

/// Standalone intent creation for the storefront's checkout widget. The
/// returned secret is only usable client-side; settlement still goes through
/// the order confirm path.
pub(crate) async fn create_intent_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Response {
    let dto: CreateIntentDto = match parse_body(body) {
        Ok(dto) => dto,
        Err(e) => return api_error_response(e),
    };
    let Some(amount) = dto.amount else {
        return api_error_response(ApiError::missing_field("amount"));
    };
    if !amount.is_finite() || amount <= 0.0 {
        return api_error_response(ApiError::validation("amount must be a positive number"));
    }
    match state
        .payments
        .create_intent(to_minor_units(amount), &state.config.currency)
        .await
    {
        Ok(intent) => Json(json!({"clientSecret": intent.client_secret})).into_response(),
        Err(e) => {
            error!("payment intent creation failed: {e}");
            api_error_response(ApiError::internal("payment initialization failed"))
        }
    }
}
