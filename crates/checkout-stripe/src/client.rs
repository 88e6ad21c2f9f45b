//! # Stripe Provider
//!
//! HTTP plumbing shared by the session and intent calls, and the
//! `PaymentProvider` implementation that ties them together.

use crate::config::StripeConfig;
use async_trait::async_trait;
use checkout_core::{
    CheckoutSession, Order, PaymentError, PaymentIntent, PaymentProvider, PaymentResult,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::error;

const PROVIDER: &str = "stripe";

/// Stripe payment provider
///
/// Talks to the Stripe REST API directly: form-encoded requests,
/// JSON responses, one pinned API version.
pub struct StripeProvider {
    config: StripeConfig,
    client: Client,
}

impl StripeProvider {
    /// Create a new Stripe provider
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// POST form params to an API path
    pub(crate) async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
        idempotency_key: &str,
    ) -> PaymentResult<T> {
        let request = self
            .client
            .post(self.config.endpoint(path))
            .header("Idempotency-Key", idempotency_key)
            .form(params);
        self.send(request).await
    }

    /// GET an API path
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> PaymentResult<T> {
        let request = self.client.get(self.config.endpoint(path));
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> PaymentResult<T> {
        let response = request
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            // Parse Stripe error
            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(PaymentError::ProviderError {
                    provider: PROVIDER.to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(PaymentError::ProviderError {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    async fn create_checkout_session(
        &self,
        order: &Order,
        return_url: &str,
    ) -> PaymentResult<CheckoutSession> {
        self.create_embedded_session(order, return_url).await
    }

    async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> PaymentResult<serde_json::Value> {
        self.retrieve_session(session_id).await
    }

    async fn create_payment_intent(&self, order: &Order) -> PaymentResult<PaymentIntent> {
        self.create_intent(order).await
    }

    async fn retrieve_payment_intent(&self, intent_id: &str) -> PaymentResult<PaymentIntent> {
        self.retrieve_intent(intent_id).await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn publishable_key(&self) -> &str {
        &self.config.publishable_key
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

/// Append `metadata[key]=value` pairs in a stable order
pub(crate) fn push_metadata(form_params: &mut Vec<(String, String)>, order: &Order) {
    form_params.push(("metadata[order_id]".to_string(), order.id.clone()));
    form_params.push((
        "metadata[order_created_at]".to_string(),
        order.created_at.to_rfc3339(),
    ));

    let mut keys: Vec<&String> = order.metadata.keys().collect();
    keys.sort();
    for key in keys {
        form_params.push((format!("metadata[{}]", key), order.metadata[key].clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(mock_server: &MockServer) -> StripeProvider {
        let config = StripeConfig::new("sk_test_abc123", "pk_test_xyz789")
            .with_api_base_url(mock_server.uri());
        StripeProvider::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_provider_error_message_is_surfaced() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/payment_intents/pi_missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {
                    "code": "resource_missing",
                    "message": "No such payment_intent: 'pi_missing'",
                    "param": "intent",
                    "type": "invalid_request_error"
                }
            })))
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server)
            .get_json::<serde_json::Value>("/v1/payment_intents/pi_missing")
            .await
            .unwrap_err();

        match err {
            PaymentError::ProviderError { provider, message } => {
                assert_eq!(provider, "stripe");
                assert_eq!(message, "No such payment_intent: 'pi_missing'");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/checkout/sessions/cs_test_1"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server)
            .get_json::<serde_json::Value>("/v1/checkout/sessions/cs_test_1")
            .await
            .unwrap_err();

        assert!(err.is_provider_rejection());
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[tokio::test]
    async fn test_network_error() {
        // Nothing listens on port 1
        let config = StripeConfig::new("sk_test_abc123", "pk_test_xyz789")
            .with_api_base_url("http://127.0.0.1:1");
        let provider = StripeProvider::new(config).unwrap();

        let err = provider
            .get_json::<serde_json::Value>("/v1/checkout/sessions/cs_test_1")
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::NetworkError(_)));
    }

    #[test]
    fn test_publishable_key_exposed() {
        let provider =
            StripeProvider::new(StripeConfig::new("sk_test_abc123", "pk_test_xyz789")).unwrap();
        assert_eq!(provider.publishable_key(), "pk_test_xyz789");
        assert_eq!(provider.provider_name(), "stripe");
    }
}
