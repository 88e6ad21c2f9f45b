//! # checkout-stripe
//!
//! Stripe payment provider for embedded-checkout.
//!
//! Two ways to take a payment, both ending in a client secret that the
//! browser hands to Stripe.js:
//!
//! 1. **Embedded Checkout Sessions** (`sessions`)
//!    - Stripe renders the whole checkout inside our page
//!    - Status is read back through `GET /v1/checkout/sessions/{id}`
//!
//! 2. **Payment Intents** (`intents`)
//!    - Payment Element with automatic payment methods
//!    - Status is usually read client-side with the intent's client secret
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkout_stripe::{StripeConfig, StripeProvider};
//! use checkout_core::PaymentProvider;
//!
//! let provider = StripeProvider::new(StripeConfig::from_env()?)?;
//! let intent = provider.create_payment_intent(&order).await?;
//! ```

pub mod client;
pub mod config;
pub mod intents;
pub mod sessions;

// Re-exports
pub use client::StripeProvider;
pub use config::StripeConfig;
