//! # checkout-core
//!
//! Core types and traits for the embedded-checkout demo.
//!
//! This crate provides:
//! - `PaymentProvider` trait for the external payment provider
//! - `CatalogItem` and `ItemCatalog`, the trusted price source
//! - `CheckoutRequest`, `Order`, `CheckoutSession` and `PaymentIntent`
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use checkout_core::{CheckoutRequest, ItemCatalog, Order, PaymentProvider};
//!
//! let request = CheckoutRequest { item_id: 1, item_count: 2 };
//! let order = Order::from_request(&catalog, &request)?;
//!
//! let intent = provider.create_payment_intent(&order).await?;
//! // Hand intent.client_secret to the browser
//! ```

pub mod catalog;
pub mod error;
pub mod order;
pub mod provider;

pub use catalog::{CatalogItem, Currency, ItemCatalog, Price};
pub use error::{PaymentError, PaymentResult};
pub use order::{
    CheckoutRequest, CheckoutSession, LineItem, Order, PaymentIntent, PaymentIntentStatus,
};
pub use provider::{validate_object_id, BoxedPaymentProvider, PaymentProvider};
