// SPDX-License-Identifier: Apache-2.0

use crate::{PaymentError, PaymentGateway, PaymentIntent};
use async_trait::async_trait;
use std::time::Duration;
use tracing::instrument;

pub const DEFAULT_STRIPE_BASE_URL: &str = "https://api.stripe.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Talks the Stripe payment-intents wire protocol: form-encoded writes,
/// bearer-key auth, JSON reads. The base URL is configurable so tests can
/// stand in a local fake processor.
pub struct StripeGateway {
    client: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl StripeGateway {
    #[must_use]
    pub fn new(secret_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        let base_url = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        }
    }

    async fn decode_intent(response: reqwest::Response) -> Result<PaymentIntent, PaymentError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError(format!(
                "processor returned {status}: {}",
                body.chars().take(256).collect::<String>()
            )));
        }
        response
            .json::<PaymentIntent>()
            .await
            .map_err(|e| PaymentError(format!("processor response decode failed: {e}")))
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    fn gateway_tag(&self) -> &'static str {
        "stripe"
    }

    #[instrument(skip(self))]
    async fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        let amount = amount_minor.to_string();
        let form = [
            ("amount", amount.as_str()),
            ("currency", currency),
            ("automatic_payment_methods[enabled]", "true"),
        ];
        let response = self
            .client
            .post(format!("{}/v1/payment_intents", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| PaymentError(format!("processor request failed: {e}")))?;
        Self::decode_intent(response).await
    }

    #[instrument(skip(self))]
    async fn fetch_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError> {
        let response = self
            .client
            .get(format!("{}/v1/payment_intents/{id}", self.base_url))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| PaymentError(format!("processor request failed: {e}")))?;
        Self::decode_intent(response).await
    }
}
