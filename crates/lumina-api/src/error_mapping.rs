// SPDX-License-Identifier: Apache-2.0

use crate::{ApiError, ApiErrorCode};

/// Status for an error body. Missing-token and invalid-token deliberately map
/// to different statuses (401 vs 400), matching the published surface.
#[must_use]
pub fn map_error(error: &ApiError) -> u16 {
    match error.code {
        ApiErrorCode::ValidationFailed | ApiErrorCode::InvalidToken => 400,
        ApiErrorCode::Unauthenticated | ApiErrorCode::InvalidCredentials => 401,
        ApiErrorCode::PaymentFailed => 402,
        ApiErrorCode::Forbidden => 403,
        ApiErrorCode::NotFound => 404,
        ApiErrorCode::EmailTaken => 409,
        _ => 500,
    }
}
