use crate::{BookId, OrderId, UserId, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Order lifecycle. Transitions happen in place and only ever server-side:
/// `Pending -> Paid` once the processor reports the intent succeeded,
/// `Pending -> Failed` once it reports the intent canceled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Paid,
    Failed,
}

impl OrderStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Failed => "Failed",
        }
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input {
            "Pending" => Ok(Self::Pending),
            "Paid" => Ok(Self::Paid),
            "Failed" => Ok(Self::Failed),
            other => Err(ValidationError(format!("unknown order status: {other}"))),
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A line item captured verbatim at order time. Title and price are copies,
/// not live references; later catalog edits do not rewrite past orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub book: BookId,
    pub quantity: i64,
    pub price: f64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user: UserId,
    pub items: Vec<LineItem>,
    pub total: f64,
    pub status: OrderStatus,
    /// Processor-side intent reference, set when the order is created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent: Option<String>,
    pub created_at: DateTime<Utc>,
}
