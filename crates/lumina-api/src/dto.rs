// SPDX-License-Identifier: Apache-2.0

use lumina_model::BookId;
use serde::{Deserialize, Serialize};

/// Signup body. Lenient about extra fields; presence checks happen in the
/// handler so missing fields surface through the API's own 400 shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SignupDto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LoginDto {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Admin create payload. Strict: unknown or mistyped fields are rejected
/// before anything reaches storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookCreateDto {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Admin update payload; absent fields are left untouched. Strict like
/// [`BookCreateDto`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct BookUpdateDto {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewDto {
    pub rating: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemDto {
    pub book: BookId,
    pub quantity: i64,
    pub price: f64,
    pub title: String,
    #[serde(default)]
    pub section: Option<String>,
}

/// Order-create body. A client-supplied `status` is accepted for
/// compatibility and ignored; orders always start out Pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreateDto {
    pub items: Vec<LineItemDto>,
    pub total: f64,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CreateIntentDto {
    #[serde(default)]
    pub amount: Option<f64>,
}
