// SPDX-License-Identifier: Apache-2.0

use crate::http::api_error_response;
use crate::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use lumina_api::ApiError;
use lumina_model::{Role, UserId};
use tracing::error;

/// Verified identity pulled out of the bearer token, stored in request
/// extensions for handlers and the admin gate.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AuthUser {
    pub id: UserId,
}

/// Authenticated gate. Missing token and invalid token are distinct failures
/// with distinct statuses (401 vs 400), per the published surface.
pub(crate) async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));
    let Some(token) = token else {
        return api_error_response(ApiError::unauthenticated());
    };
    let claims = match state.tokens.verify(token) {
        Ok(claims) => claims,
        Err(_) => return api_error_response(ApiError::invalid_token()),
    };
    let Ok(id) = claims.user_id() else {
        return api_error_response(ApiError::invalid_token());
    };
    request.extensions_mut().insert(AuthUser { id });
    next.run(request).await
}

/// Admin gate. Assumes [`require_auth`] already ran and trusts its output;
/// the decision itself consults only the stored role.
pub(crate) async fn require_admin(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth) = request.extensions().get::<AuthUser>().cloned() else {
        return api_error_response(ApiError::unauthenticated());
    };
    match state.store.user_by_id(auth.id).await {
        Ok(Some(user)) if user.role == Role::Admin => next.run(request).await,
        Ok(_) => api_error_response(ApiError::forbidden("admin access required")),
        Err(e) => {
            error!("admin check failed: {e}");
            api_error_response(ApiError::internal("failed to check admin access"))
        }
    }
}
