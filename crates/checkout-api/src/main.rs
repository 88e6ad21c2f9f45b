//! # embedded-checkout
//!
//! Demo checkout server: renders the shop page and relays checkout
//! requests to Stripe.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export STRIPE_PUBLISHABLE_KEY=pk_test_...
//!
//! # Run the server
//! embedded-checkout
//! ```

use checkout_api::{routes, state::AppState};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Fails fast on missing Stripe keys
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    if state.catalog.is_empty() {
        warn!("Catalog is empty, every checkout will fail");
    } else {
        info!("Catalog items: {}", state.catalog.len());
    }
    info!("Payment provider: {}", state.provider.provider_name());
    info!("Public dir: {}", state.pages.public_dir().display());

    let app = routes::create_router(state);

    info!("embedded-checkout listening on http://{}", addr);

    if !is_prod {
        info!("Shop: http://{}/", addr);
        info!("Checkout: POST http://{}/api/payment_intent", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
