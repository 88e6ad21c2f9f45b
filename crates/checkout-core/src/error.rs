//! # Payment Error Types
//!
//! Typed errors for order building and provider calls.
//! All payment operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Item id not present in the catalog
    #[error("Item not found: {item_id}")]
    ItemNotFound { item_id: u64 },

    /// Amount could not be computed or is out of range
    #[error("Invalid price: {message}")]
    InvalidPrice { message: String },

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Returns true if the provider was reached and answered with an error
    pub fn is_provider_rejection(&self) -> bool {
        matches!(self, PaymentError::ProviderError { .. })
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
