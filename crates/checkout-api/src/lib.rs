//! # checkout-api
//!
//! HTTP layer for embedded-checkout.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - HTML pages with the publishable key injected, plus the client script
//! - Checkout endpoints that relay to the payment provider
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/`, `/{page}` | Rendered page |
//! | GET | `/public/index.js` | Client script |
//! | POST | `/api/checkout` | Embedded checkout session |
//! | POST | `/api/payment_intent` | Payment intent |
//! | GET | `/api/session_status` | Checkout session status |
//! | GET | `/api/payment_status` | Payment intent status |
//! | GET | `/health` | Health check |

pub mod handlers;
pub mod pages;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
