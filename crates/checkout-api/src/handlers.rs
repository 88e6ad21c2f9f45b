//! # Request Handlers
//!
//! Axum request handlers for pages and the checkout API.
//! Every failure is logged in full and answered with the same generic
//! `500 {"error": "Internal Server Error"}`.

use crate::pages::{PageContext, PageError, DEFAULT_PAGE};
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use checkout_core::{CheckoutRequest, Order, PaymentError, PaymentIntent};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Response to both checkout variants
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSecretResponse {
    pub client_secret: String,
}

/// Query for `GET /api/session_status`
#[derive(Debug, Deserialize)]
pub struct SessionStatusQuery {
    pub session_id: String,
}

/// Query for `GET /api/payment_status`
#[derive(Debug, Deserialize)]
pub struct PaymentStatusQuery {
    pub payment_intent: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn internal() -> Self {
        Self {
            error: "Internal Server Error".to_string(),
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn generic_500() -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::internal()),
    )
}

fn internal_error(context: &str, err: impl std::fmt::Display) -> ApiError {
    error!("{}: {}", context, err);
    generic_500()
}

fn payment_error_to_response(err: PaymentError) -> ApiError {
    if err.is_provider_rejection() {
        internal_error("Provider rejected request", err)
    } else {
        internal_error("Checkout failed", err)
    }
}

fn page_error_to_response(err: PageError) -> ApiError {
    if err.is_bad_request() {
        warn!("No such page: {}", err);
        generic_500()
    } else {
        internal_error("Failed to render page", err)
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "embedded-checkout",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// `GET /favicon.ico`: browsers ask for it on every page view
pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// `GET /`
pub async fn index_page(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    render_page(&state, DEFAULT_PAGE).await
}

/// `GET /{page}`
pub async fn named_page(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> Result<Html<String>, ApiError> {
    render_page(&state, &page).await
}

#[instrument(skip(state))]
async fn render_page(state: &AppState, page: &str) -> Result<Html<String>, ApiError> {
    let context = PageContext {
        stripe_publishable_key: state.provider.publishable_key(),
    };
    state
        .pages
        .render(page, &context)
        .await
        .map(Html)
        .map_err(page_error_to_response)
}

/// `GET /public/index.js`
pub async fn client_script(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let script = state
        .pages
        .client_script()
        .await
        .map_err(page_error_to_response)?;

    Ok(([(header::CONTENT_TYPE, "text/javascript")], script))
}

/// Build the order for a checkout request, pricing it from the catalog
fn build_order(
    state: &AppState,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Order, ApiError> {
    let Json(request) = payload.map_err(|e| internal_error("Malformed checkout request", e))?;

    let order = Order::from_request(&state.catalog, &request).map_err(payment_error_to_response)?;

    info!(
        "Checkout: item={}, count={}, total={}",
        request.item_id,
        request.item_count,
        order
            .total()
            .map(|t| t.display())
            .unwrap_or_else(|| "?".to_string())
    );
    Ok(order)
}

/// `POST /api/checkout`: embedded checkout session
#[instrument(skip(state, payload))]
pub async fn create_checkout(
    State(state): State<AppState>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<ClientSecretResponse>, ApiError> {
    let order = build_order(&state, payload)?;

    let session = state
        .provider
        .create_checkout_session(&order, &state.config.checkout_return_url())
        .await
        .map_err(payment_error_to_response)?;

    info!("Created checkout session: {}", session.session_id);

    Ok(Json(ClientSecretResponse {
        client_secret: session.client_secret,
    }))
}

/// `POST /api/payment_intent`: payment intent with automatic methods
#[instrument(skip(state, payload))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<ClientSecretResponse>, ApiError> {
    let order = build_order(&state, payload)?;

    let intent = state
        .provider
        .create_payment_intent(&order)
        .await
        .map_err(payment_error_to_response)?;

    info!("Created payment intent: {}", intent.id);

    let client_secret = intent
        .client_secret
        .ok_or_else(|| internal_error("Payment intent without client secret", &intent.id))?;

    Ok(Json(ClientSecretResponse { client_secret }))
}

/// `GET /api/session_status?session_id=...`: provider's session object as-is
#[instrument(skip(state, query))]
pub async fn session_status(
    State(state): State<AppState>,
    query: Result<Query<SessionStatusQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Query(query) = query.map_err(|e| internal_error("Malformed session status query", e))?;

    let session = state
        .provider
        .retrieve_checkout_session(&query.session_id)
        .await
        .map_err(payment_error_to_response)?;

    Ok(Json(session))
}

/// `GET /api/payment_status?payment_intent=...`
#[instrument(skip(state, query))]
pub async fn payment_status(
    State(state): State<AppState>,
    query: Result<Query<PaymentStatusQuery>, QueryRejection>,
) -> Result<Json<PaymentIntent>, ApiError> {
    let Query(query) = query.map_err(|e| internal_error("Malformed payment status query", e))?;

    let intent = state
        .provider
        .retrieve_payment_intent(&query.payment_intent)
        .await
        .map_err(payment_error_to_response)?;

    Ok(Json(intent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_is_generic() {
        let (status, Json(body)) = payment_error_to_response(PaymentError::ProviderError {
            provider: "stripe".into(),
            message: "Your card was declined".into(),
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Internal Server Error");

        let (status, _) = payment_error_to_response(PaymentError::ItemNotFound { item_id: 1 });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unknown_page_is_generic_500() {
        let (status, Json(body)) =
            page_error_to_response(PageError::InvalidName("favicon.ico".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Internal Server Error");
    }

    #[test]
    fn test_client_secret_wire_format() {
        let body = serde_json::to_value(ClientSecretResponse {
            client_secret: "pi_1_secret_2".into(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "clientSecret": "pi_1_secret_2" }));
    }
}
