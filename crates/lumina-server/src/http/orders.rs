// SPDX-License-Identifier: Apache-2.0

use crate::http::{api_error_response, parse_body, store_failure};
use crate::middleware::auth::AuthUser;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use lumina_api::{ApiError, OrderCreateDto};
use lumina_model::{LineItem, Order, OrderId, OrderStatus};
use lumina_payments::to_minor_units;
use serde_json::json;
use tracing::{error, info, warn};

fn order_with_secret(order: &Order, client_secret: Option<&str>) -> Response {
    let mut body = match serde_json::to_value(order) {
        Ok(value) => value,
        Err(e) => {
            error!("order serialization failed: {e}");
            return api_error_response(ApiError::internal("failed to create order"));
        }
    };
    if let (Some(obj), Some(secret)) = (body.as_object_mut(), client_secret) {
        obj.insert("client_secret".to_string(), json!(secret));
    }
    (StatusCode::CREATED, Json(body)).into_response()
}

/// Creates the order in `Pending` and opens its payment intent in the same
/// request. Any client-supplied status is ignored; the only path to `Paid`
/// is the server-side confirm.
pub(crate) async fn create_order_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let dto: OrderCreateDto = match parse_body(body) {
        Ok(dto) => dto,
        Err(e) => return api_error_response(e),
    };
    if let Some(status) = dto.status.as_deref() {
        if status != OrderStatus::Pending.as_str() {
            warn!("ignoring client-supplied order status {status:?}");
        }
    }
    if !dto.total.is_finite() || dto.total <= 0.0 {
        return api_error_response(ApiError::validation("total must be a positive amount"));
    }
    let items: Vec<LineItem> = dto
        .items
        .into_iter()
        .map(|item| LineItem {
            book: item.book,
            quantity: item.quantity,
            price: item.price,
            title: item.title,
            section: item.section,
        })
        .collect();

    let mut order = match state.store.create_order(auth.id, items, dto.total).await {
        Ok(order) => order,
        Err(e) => return api_error_response(store_failure("failed to create order", e)),
    };

    let intent = match state
        .payments
        .create_intent(to_minor_units(order.total), &state.config.currency)
        .await
    {
        Ok(intent) => intent,
        Err(e) => {
            error!("payment intent creation failed: {e}");
            return api_error_response(ApiError::internal("payment initialization failed"));
        }
    };
    if let Err(e) = state
        .store
        .set_payment_intent(order.id, intent.id.clone())
        .await
    {
        return api_error_response(store_failure("failed to create order", e));
    }
    order.payment_intent = Some(intent.id);
    info!(order = %order.id, total = order.total, "order created");
    order_with_secret(&order, Some(&intent.client_secret))
}

pub(crate) async fn my_orders_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Response {
    match state.store.orders_for_user(auth.id).await {
        Ok(orders) => Json(orders).into_response(),
        Err(e) => api_error_response(store_failure("failed to fetch orders", e)),
    }
}

/// Server-side settlement: re-fetches the intent from the processor and
/// transitions the order only on what the processor itself reports.
pub(crate) async fn confirm_order_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = OrderId::parse(&id) else {
        return api_error_response(ApiError::not_found("order"));
    };
    let order = match state.store.order_by_id(id).await {
        Ok(Some(order)) => order,
        Ok(None) => return api_error_response(ApiError::not_found("order")),
        Err(e) => return api_error_response(store_failure("failed to confirm order", e)),
    };
    // Orders are visible to their owner only; everyone else sees a miss.
    if order.user != auth.id {
        return api_error_response(ApiError::not_found("order"));
    }
    match order.status {
        OrderStatus::Paid => return Json(order).into_response(),
        OrderStatus::Failed => {
            return api_error_response(ApiError::payment_failed("order payment failed"))
        }
        OrderStatus::Pending => {}
    }
    let Some(intent_id) = order.payment_intent.clone() else {
        return api_error_response(ApiError::payment_failed("payment not initialized"));
    };

    let intent = match state.payments.fetch_intent(&intent_id).await {
        Ok(intent) => intent,
        Err(e) => {
            error!("payment status check failed: {e}");
            return api_error_response(ApiError::internal("payment status check failed"));
        }
    };

    if intent.status.is_succeeded() {
        match state
            .store
            .transition_order(id, OrderStatus::Pending, OrderStatus::Paid)
            .await
        {
            Ok(_) => {}
            Err(e) => return api_error_response(store_failure("failed to confirm order", e)),
        }
        info!(order = %id, "order paid");
        return reload_order(&state, id).await;
    }
    if intent.status.is_canceled() {
        if let Err(e) = state
            .store
            .transition_order(id, OrderStatus::Pending, OrderStatus::Failed)
            .await
        {
            return api_error_response(store_failure("failed to confirm order", e));
        }
        return api_error_response(ApiError::payment_failed("payment canceled"));
    }
    api_error_response(ApiError::payment_failed("payment not completed"))
}

async fn reload_order(state: &AppState, id: OrderId) -> Response {
    match state.store.order_by_id(id).await {
        Ok(Some(order)) => Json(order).into_response(),
        Ok(None) => api_error_response(ApiError::not_found("order")),
        Err(e) => api_error_response(store_failure("failed to confirm order", e)),
    }
}
