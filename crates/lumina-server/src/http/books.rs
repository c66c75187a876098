// SPDX-License-Identifier: Apache-2.0

use crate::http::{api_error_response, parse_body, store_failure};
use crate::middleware::auth::AuthUser;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use lumina_api::{parse_list_books_params, ApiError, BookCreateDto, BookUpdateDto, ReviewDto};
use lumina_model::{BookDraft, BookId, BookPatch};
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::info;

pub(crate) async fn list_books_handler(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let params = match parse_list_books_params(&query) {
        Ok(params) => params,
        Err(e) => return api_error_response(e),
    };
    match state.store.list_books(params.search, params.category).await {
        Ok(books) => Json(books).into_response(),
        Err(e) => api_error_response(store_failure("failed to fetch books", e)),
    }
}

pub(crate) async fn get_book_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = BookId::parse(&id) else {
        return api_error_response(ApiError::not_found("book"));
    };
    match state.store.book_by_id(id).await {
        Ok(Some(book)) => Json(book).into_response(),
        Ok(None) => api_error_response(ApiError::not_found("book")),
        Err(e) => api_error_response(store_failure("failed to fetch book", e)),
    }
}

pub(crate) async fn create_book_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Response {
    let dto: BookCreateDto = match parse_body(body) {
        Ok(dto) => dto,
        Err(e) => return api_error_response(e),
    };
    let draft = match BookDraft::new(
        dto.title,
        dto.author,
        dto.description,
        dto.price.unwrap_or(0.0),
        dto.category,
    ) {
        Ok(draft) => draft,
        Err(e) => return api_error_response(ApiError::validation(e.to_string())),
    };
    match state.store.insert_book(draft).await {
        Ok(book) => {
            info!(book = %book.id, "book created");
            (StatusCode::CREATED, Json(book)).into_response()
        }
        Err(e) => api_error_response(store_failure("failed to create book", e)),
    }
}

pub(crate) async fn update_book_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let Ok(id) = BookId::parse(&id) else {
        return api_error_response(ApiError::not_found("book"));
    };
    let dto: BookUpdateDto = match parse_body(body) {
        Ok(dto) => dto,
        Err(e) => return api_error_response(e),
    };
    let patch = BookPatch {
        title: dto.title,
        author: dto.author,
        description: dto.description,
        price: dto.price,
        category: dto.category,
    };
    if let Err(e) = patch.validate() {
        return api_error_response(ApiError::validation(e.to_string()));
    }
    match state.store.update_book(id, patch).await {
        Ok(Some(book)) => Json(book).into_response(),
        Ok(None) => api_error_response(ApiError::not_found("book")),
        Err(e) => api_error_response(store_failure("failed to update book", e)),
    }
}

pub(crate) async fn delete_book_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = BookId::parse(&id) else {
        return api_error_response(ApiError::not_found("book"));
    };
    match state.store.delete_book(id).await {
        // Deletion is idempotent: absent rows get the same confirmation.
        Ok(_) => Json(json!({"message": "Book deleted"})).into_response(),
        Err(e) => api_error_response(store_failure("failed to delete book", e)),
    }
}

pub(crate) async fn add_review_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let Ok(id) = BookId::parse(&id) else {
        return api_error_response(ApiError::not_found("book"));
    };
    let dto: ReviewDto = match parse_body(body) {
        Ok(dto) => dto,
        Err(e) => return api_error_response(e),
    };
    // The review captures the display name, not the account id, so the
    // poster must still exist at submission time.
    let reviewer = match state.store.user_by_id(auth.id).await {
        Ok(Some(user)) => user.name,
        Ok(None) => return api_error_response(ApiError::not_found("user")),
        Err(e) => return api_error_response(store_failure("failed to add review", e)),
    };
    match state
        .store
        .add_review(id, reviewer, dto.rating, dto.comment.unwrap_or_default())
        .await
    {
        Ok(Some(book)) => (StatusCode::CREATED, Json(book)).into_response(),
        Ok(None) => api_error_response(ApiError::not_found("book")),
        Err(e) => api_error_response(store_failure("failed to add review", e)),
    }
}
