#![forbid(unsafe_code)]
//! Bridge to the external payment processor.
//!
//! Two backends implement [`PaymentGateway`]: the Stripe-wire
//! [`StripeGateway`] and an in-memory [`FakeGateway`] for tests and keyless
//! local runs. Every call is a single round trip with no retries and no
//! compensating actions; failures surface to the caller as [`PaymentError`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod fake;
mod stripe;

pub use fake::FakeGateway;
pub use stripe::{StripeGateway, DEFAULT_STRIPE_BASE_URL};

pub const CRATE_NAME: &str = "lumina-payments";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentError(pub String);

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PaymentError {}

/// Processor-side intent state, as reported by the processor. Anything this
/// crate does not model explicitly lands in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    Succeeded,
    Canceled,
    #[serde(untagged)]
    Other(String),
}

impl IntentStatus {
    #[must_use]
    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    #[must_use]
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}

/// The processor's representation of a pending charge. `client_secret` is
/// handed to the storefront for client-side confirmation; `status` is what
/// the server consults before marking anything paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub status: IntentStatus,
    /// Minor currency units.
    pub amount: i64,
    pub currency: String,
}

/// Conversion to minor currency units, rounding halves away from zero.
#[must_use]
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    fn gateway_tag(&self) -> &'static str;

    /// Creates an intent for `amount_minor` units of `currency`.
    async fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError>;

    /// Re-fetches an intent so its status can be checked server-side.
    async fn fetch_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError>;
}
