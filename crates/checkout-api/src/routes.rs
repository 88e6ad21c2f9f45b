//! # Routes
//!
//! Axum router configuration for pages and the checkout API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Pages:
///   - GET /                 - Index page
///   - GET /{page}           - Named page (e.g. /success)
///   - GET /public/index.js  - Client script
///   - GET /favicon.ico      - 204, keeps browsers off /{page}
///
/// - API:
///   - POST /api/checkout        - Embedded checkout session → clientSecret
///   - POST /api/payment_intent  - Payment intent → clientSecret
///   - GET  /api/session_status  - Provider session object
///   - GET  /api/payment_status  - Payment intent status
///
/// - GET /health
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/checkout", post(handlers::create_checkout))
        .route("/payment_intent", post(handlers::create_payment_intent))
        .route("/session_status", get(handlers::session_status))
        .route("/payment_status", get(handlers::payment_status));

    Router::new()
        .route("/health", get(handlers::health))
        // Pages
        .route("/", get(handlers::index_page))
        .route("/{page}", get(handlers::named_page))
        .route("/favicon.ico", get(handlers::favicon))
        .route("/public/index.js", get(handlers::client_script))
        .nest("/api", api_routes)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
