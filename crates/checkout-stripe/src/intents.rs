//! # Stripe Payment Intents
//!
//! Payment Intents API with automatic payment methods. The intent's
//! client secret mounts the Payment Element in the browser.

use crate::client::{push_metadata, StripeProvider};
use checkout_core::{validate_object_id, Order, PaymentError, PaymentIntent, PaymentResult};
use tracing::{debug, info, instrument};

impl StripeProvider {
    /// Build form params for `POST /v1/payment_intents`
    fn intent_form(order: &Order) -> PaymentResult<Vec<(String, String)>> {
        let total = order.total().ok_or_else(|| PaymentError::InvalidPrice {
            message: "Order total overflows".to_string(),
        })?;

        let description = order
            .line_items
            .iter()
            .map(|item| format!("{} x {}", item.quantity, item.name))
            .collect::<Vec<_>>()
            .join(", ");

        let mut form_params: Vec<(String, String)> = vec![
            ("amount".to_string(), total.amount.to_string()),
            ("currency".to_string(), total.currency.as_str().to_string()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
            ("description".to_string(), description),
        ];
        push_metadata(&mut form_params, order);
        Ok(form_params)
    }

    /// Create a payment intent for the order total
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn create_intent(&self, order: &Order) -> PaymentResult<PaymentIntent> {
        if order.is_empty() {
            return Err(PaymentError::InvalidRequest("Order has no items".to_string()));
        }

        let form_params = Self::intent_form(order)?;
        let intent: PaymentIntent = self
            .post_form("/v1/payment_intents", &form_params, &order.idempotency_key)
            .await?;

        if intent.client_secret.is_none() {
            return Err(PaymentError::Serialization(format!(
                "Payment intent {} has no client_secret",
                intent.id
            )));
        }

        info!(
            "Created Stripe payment intent: id={}, amount={} {}",
            intent.id, intent.amount, intent.currency
        );
        Ok(intent)
    }

    /// Retrieve a payment intent by id
    #[instrument(skip(self))]
    pub async fn retrieve_intent(&self, intent_id: &str) -> PaymentResult<PaymentIntent> {
        let intent_id = validate_object_id("payment_intent", intent_id)?;
        let intent: PaymentIntent = self
            .get_json(&format!("/v1/payment_intents/{}", intent_id))
            .await?;

        debug!(
            "Retrieved Stripe payment intent: id={}, status={:?}",
            intent.id, intent.status
        );
        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StripeConfig;
    use checkout_core::{
        CatalogItem, CheckoutRequest, Currency, ItemCatalog, PaymentIntentStatus, Price,
    };
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(mock_server: &MockServer) -> StripeProvider {
        let config = StripeConfig::new("sk_test_abc123", "pk_test_xyz789")
            .with_api_base_url(mock_server.uri());
        StripeProvider::new(config).unwrap()
    }

    fn order(item_count: u32) -> Order {
        let catalog = ItemCatalog::new().with_item(CatalogItem::new(
            9,
            "Hoodie",
            Price::from_cents(4500, Currency::EUR),
        ));
        Order::from_request(
            &catalog,
            &CheckoutRequest {
                item_id: 9,
                item_count,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_intent_form_uses_catalog_total() {
        let form = StripeProvider::intent_form(&order(3)).unwrap();
        let get = |key: &str| {
            form.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("amount"), Some("13500"));
        assert_eq!(get("currency"), Some("eur"));
        assert_eq!(get("automatic_payment_methods[enabled]"), Some("true"));
        assert_eq!(get("description"), Some("3 x Hoodie"));
    }

    #[tokio::test]
    async fn test_create_intent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .and(header("authorization", "Bearer sk_test_abc123"))
            .and(body_string_contains("amount=9000"))
            .and(body_string_contains("currency=eur"))
            .and(body_string_contains("automatic_payment_methods%5Benabled%5D=true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pi_3Mt",
                "object": "payment_intent",
                "amount": 9000,
                "currency": "eur",
                "status": "requires_payment_method",
                "client_secret": "pi_3Mt_secret_YrK"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let intent = provider(&mock_server)
            .create_intent(&order(2))
            .await
            .unwrap();

        assert_eq!(intent.id, "pi_3Mt");
        assert_eq!(intent.client_secret.as_deref(), Some("pi_3Mt_secret_YrK"));
        assert_eq!(intent.status, PaymentIntentStatus::RequiresPaymentMethod);
        assert_eq!(intent.amount, 9000);
    }

    #[tokio::test]
    async fn test_create_intent_provider_rejection() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": "amount_too_small",
                    "message": "Amount must be at least €0.50 eur",
                    "type": "invalid_request_error"
                }
            })))
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server)
            .create_intent(&order(1))
            .await
            .unwrap_err();

        assert!(err.is_provider_rejection());
        assert!(err.to_string().contains("Amount must be at least"));
    }

    #[tokio::test]
    async fn test_retrieve_intent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/payment_intents/pi_3Mt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pi_3Mt",
                "amount": 4500,
                "currency": "eur",
                "status": "succeeded",
                "client_secret": "pi_3Mt_secret_YrK"
            })))
            .mount(&mock_server)
            .await;

        let intent = provider(&mock_server)
            .retrieve_intent("pi_3Mt")
            .await
            .unwrap();

        assert_eq!(intent.status, PaymentIntentStatus::Succeeded);
        assert_eq!(intent.amount, 4500);
    }
}
