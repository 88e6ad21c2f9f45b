//! # Payment Provider Trait
//!
//! Seam between the HTTP layer and the external payment provider.
//! The provider owns every session and intent; this side only creates
//! them and relays what the provider reports.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │        PaymentProvider (trait)           │
//! │  ├── create_checkout_session()           │
//! │  ├── retrieve_checkout_session()         │
//! │  ├── create_payment_intent()             │
//! │  └── retrieve_payment_intent()           │
//! └──────────────────────────────────────────┘
//!                     ▲
//!            ┌────────┴────────┐
//!     ┌──────┴──────┐   ┌──────┴──────┐
//!     │StripeProvider│  │ test fakes  │
//!     └─────────────┘   └─────────────┘
//! ```

use crate::error::{PaymentError, PaymentResult};
use crate::order::{CheckoutSession, Order, PaymentIntent};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a checkout session rendered inside our own page.
    ///
    /// # Arguments
    /// * `order` - The order to check out
    /// * `return_url` - Where the provider sends the customer afterwards.
    ///   May contain the provider's `{CHECKOUT_SESSION_ID}` placeholder.
    async fn create_checkout_session(
        &self,
        order: &Order,
        return_url: &str,
    ) -> PaymentResult<CheckoutSession>;

    /// Fetch a checkout session, returned exactly as the provider reports it.
    async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> PaymentResult<serde_json::Value>;

    /// Create a payment intent for the order total with automatic payment
    /// method selection.
    async fn create_payment_intent(&self, order: &Order) -> PaymentResult<PaymentIntent>;

    /// Fetch a payment intent by id.
    async fn retrieve_payment_intent(&self, intent_id: &str) -> PaymentResult<PaymentIntent>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;

    /// Key the browser SDK is initialised with.
    fn publishable_key(&self) -> &str;
}

/// Type alias for a shared payment provider (dynamic dispatch)
pub type BoxedPaymentProvider = Arc<dyn PaymentProvider>;

/// Check that a provider object id is safe to place in a URL path.
pub fn validate_object_id<'a>(kind: &str, id: &'a str) -> PaymentResult<&'a str> {
    if id.is_empty() {
        return Err(PaymentError::InvalidRequest(format!("Missing {}", kind)));
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(PaymentError::InvalidRequest(format!(
            "Malformed {}: {:?}",
            kind, id
        )));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_object_id() {
        assert_eq!(
            validate_object_id("session_id", "cs_test_a1B2c3").unwrap(),
            "cs_test_a1B2c3"
        );
        assert!(validate_object_id("session_id", "").is_err());
        assert!(validate_object_id("session_id", "../v1/customers").is_err());
        assert!(validate_object_id("session_id", "cs_test?expand=x").is_err());
    }
}
