//! # Stripe Checkout Sessions (embedded)
//!
//! Checkout Sessions API in `ui_mode=embedded`: the session's client
//! secret is handed to Stripe.js, which renders the checkout inside our
//! page and later redirects to the return URL.

use crate::client::{push_metadata, StripeProvider};
use checkout_core::{validate_object_id, CheckoutSession, Order, PaymentError, PaymentResult};
use serde::Deserialize;
use tracing::{debug, info, instrument};

impl StripeProvider {
    /// Build form params for `POST /v1/checkout/sessions`
    fn session_form(order: &Order, return_url: &str) -> Vec<(String, String)> {
        let mut form_params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("ui_mode".to_string(), "embedded".to_string()),
            ("return_url".to_string(), return_url.to_string()),
        ];

        for (i, item) in order.line_items.iter().enumerate() {
            form_params.push((
                format!("line_items[{}][price_data][currency]", i),
                item.unit_price.currency.as_str().to_string(),
            ));
            form_params.push((
                format!("line_items[{}][price_data][unit_amount]", i),
                item.unit_price.amount.to_string(),
            ));
            form_params.push((
                format!("line_items[{}][price_data][product_data][name]", i),
                item.name.clone(),
            ));
            if let Some(ref desc) = item.description {
                form_params.push((
                    format!("line_items[{}][price_data][product_data][description]", i),
                    desc.clone(),
                ));
            }
            form_params.push((
                format!("line_items[{}][quantity]", i),
                item.quantity.to_string(),
            ));
        }

        push_metadata(&mut form_params, order);
        form_params
    }

    /// Create an embedded checkout session for the order
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn create_embedded_session(
        &self,
        order: &Order,
        return_url: &str,
    ) -> PaymentResult<CheckoutSession> {
        if order.is_empty() {
            return Err(PaymentError::InvalidRequest("Order has no items".to_string()));
        }

        let form_params = Self::session_form(order, return_url);
        debug!(
            "Creating Stripe embedded checkout session: {} line items",
            order.line_items.len()
        );

        let session: StripeCheckoutSessionResponse = self
            .post_form("/v1/checkout/sessions", &form_params, &order.idempotency_key)
            .await?;

        let client_secret = session.client_secret.ok_or_else(|| {
            PaymentError::Serialization(format!(
                "Checkout session {} has no client_secret",
                session.id
            ))
        })?;

        info!(
            "Created Stripe checkout session: id={}, expires_at={:?}",
            session.id, session.expires_at
        );

        Ok(CheckoutSession {
            session_id: session.id,
            client_secret,
        })
    }

    /// Retrieve a checkout session, untouched
    #[instrument(skip(self))]
    pub async fn retrieve_session(&self, session_id: &str) -> PaymentResult<serde_json::Value> {
        let session_id = validate_object_id("session_id", session_id)?;
        let session: serde_json::Value = self
            .get_json(&format!("/v1/checkout/sessions/{}", session_id))
            .await?;

        debug!(
            "Retrieved Stripe checkout session: id={}, status={}",
            session_id,
            session.get("status").and_then(|s| s.as_str()).unwrap_or("?")
        );
        Ok(session)
    }
}

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    client_secret: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
}
