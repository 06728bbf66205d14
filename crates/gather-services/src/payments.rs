//! Payment provider abstraction.
//!
//! The provider is behind a trait so the booking service can be exercised
//! without network access. `StripeProvider` talks to a Stripe-compatible
//! HTTP API; `MockPaymentProvider` is an in-memory stand-in used in tests
//! and in keyless development environments.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use serde::Deserialize;

use gather_core::AppError;

/// A provider-side payment authorization awaiting client confirmation.
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    pub provider_payment_id: String,
    /// Opaque secret the client uses to complete the payment.
    pub client_secret: String,
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a payment intent. `amount_cents` is in the currency's minor
    /// unit; `reference` ties the provider object back to our booking id.
    async fn create_payment_intent(
        &self,
        amount_cents: i64,
        currency: &str,
        reference: &str,
    ) -> Result<PaymentIntent, AppError>;

    /// Refund a previously captured payment in full.
    async fn refund_payment(&self, provider_payment_id: &str) -> Result<(), AppError>;
}

/// Stripe-compatible HTTP client.
pub struct StripeProvider {
    client: reqwest::Client,
    secret_key: String,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct StripeIntentResponse {
    id: String,
    client_secret: String,
}

impl StripeProvider {
    pub fn new(secret_key: String, api_base: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key,
            api_base,
        }
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    #[tracing::instrument(skip(self), fields(provider = "stripe"))]
    async fn create_payment_intent(
        &self,
        amount_cents: i64,
        currency: &str,
        reference: &str,
    ) -> Result<PaymentIntent, AppError> {
        let params = [
            ("amount", amount_cents.to_string()),
            ("currency", currency.to_lowercase()),
            ("metadata[booking_id]", reference.to_string()),
        ];
        let response = self
            .client
            .post(format!("{}/v1/payment_intents", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("intent request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::PaymentProvider(format!(
                "intent creation returned {}: {}",
                status, body
            )));
        }

        let intent: StripeIntentResponse = response
            .json()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("malformed intent response: {}", e)))?;

        Ok(PaymentIntent {
            provider_payment_id: intent.id,
            client_secret: intent.client_secret,
        })
    }

    #[tracing::instrument(skip(self), fields(provider = "stripe"))]
    async fn refund_payment(&self, provider_payment_id: &str) -> Result<(), AppError> {
        let params = [("payment_intent", provider_payment_id.to_string())];
        let response = self
            .client
            .post(format!("{}/v1/refunds", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("refund request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::PaymentProvider(format!(
                "refund returned {}: {}",
                status, body
            )));
        }
        Ok(())
    }
}

/// In-memory provider: every intent succeeds, refunds can be toggled to
/// fail to exercise the manual-intervention path.
#[derive(Default)]
pub struct MockPaymentProvider {
    counter: AtomicU64,
    fail_refunds: AtomicBool,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_refunds(&self, fail: bool) {
        self.fail_refunds.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_payment_intent(
        &self,
        _amount_cents: i64,
        _currency: &str,
        reference: &str,
    ) -> Result<PaymentIntent, AppError> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(PaymentIntent {
            provider_payment_id: format!("pi_mock_{}_{}", reference, n),
            client_secret: format!("secret_mock_{}", n),
        })
    }

    async fn refund_payment(&self, _provider_payment_id: &str) -> Result<(), AppError> {
        if self.fail_refunds.load(Ordering::SeqCst) {
            return Err(AppError::PaymentProvider("mock refund failure".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_intents_are_distinct_and_reference_booking() {
        let provider = MockPaymentProvider::new();
        let a = provider
            .create_payment_intent(2500, "usd", "booking_abc123")
            .await
            .unwrap();
        let b = provider
            .create_payment_intent(2500, "usd", "booking_abc123")
            .await
            .unwrap();
        assert!(a.provider_payment_id.contains("booking_abc123"));
        assert_ne!(a.provider_payment_id, b.provider_payment_id);
        assert_ne!(a.client_secret, b.client_secret);
    }

    #[tokio::test]
    async fn test_mock_refund_toggle() {
        let provider = MockPaymentProvider::new();
        assert!(provider.refund_payment("pi_mock_x").await.is_ok());

        provider.set_fail_refunds(true);
        let err = provider.refund_payment("pi_mock_x").await.unwrap_err();
        assert!(matches!(err, AppError::PaymentProvider(_)));

        provider.set_fail_refunds(false);
        assert!(provider.refund_payment("pi_mock_x").await.is_ok());
    }
}
