// SPDX-License-Identifier: Apache-2.0

use crate::http::{api_error_response, store_failure};
use crate::middleware::auth::AuthUser;
use crate::AppState;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use lumina_api::ApiError;
use lumina_model::BookId;

/// Membership toggle: present removes, absent appends. Its own inverse when
/// applied twice. The book id is not required to reference a live book;
/// resolution drops dangling entries.
pub(crate) async fn toggle_wishlist_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(book_id): Path<String>,
) -> Response {
    let Ok(book_id) = BookId::parse(&book_id) else {
        return api_error_response(ApiError::not_found("book"));
    };
    match state.store.toggle_wishlist(auth.id, book_id).await {
        Ok(ids) => Json(ids).into_response(),
        Err(e) => api_error_response(store_failure("failed to update wishlist", e)),
    }
}

pub(crate) async fn list_wishlist_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Response {
    match state.store.wishlist_books(auth.id).await {
        Ok(books) => Json(books).into_response(),
        Err(e) => api_error_response(store_failure("failed to fetch wishlist", e)),
    }
}
