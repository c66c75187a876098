// SPDX-License-Identifier: Apache-2.0

use crate::{IntentStatus, PaymentError, PaymentGateway, PaymentIntent};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// In-memory processor double. Fresh intents start in
/// `requires_payment_method`; tests drive them to a terminal state with
/// [`FakeGateway::set_status`].
#[derive(Default)]
pub struct FakeGateway {
    intents: Mutex<HashMap<String, PaymentIntent>>,
    counter: AtomicU64,
}

impl FakeGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_status(&self, id: &str, status: IntentStatus) {
        if let Some(intent) = self.intents.lock().await.get_mut(id) {
            intent.status = status;
        }
    }

    pub async fn intent_count(&self) -> usize {
        self.intents.lock().await.len()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    fn gateway_tag(&self) -> &'static str {
        "fake"
    }

    async fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        if amount_minor <= 0 {
            return Err(PaymentError("amount must be positive".to_string()));
        }
        let seq = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let id = format!("pi_fake_{seq:08}");
        let intent = PaymentIntent {
            client_secret: format!("{id}_secret"),
            id: id.clone(),
            status: IntentStatus::RequiresPaymentMethod,
            amount: amount_minor,
            currency: currency.to_string(),
        };
        self.intents.lock().await.insert(id, intent.clone());
        Ok(intent)
    }

    async fn fetch_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError> {
        self.intents
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| PaymentError(format!("no such intent: {id}")))
    }
}
