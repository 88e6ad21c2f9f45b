//! # Order Types
//!
//! Checkout request, order, and provider-side session/intent views.

use crate::catalog::{CatalogItem, Currency, ItemCatalog, Price};
use crate::error::{PaymentError, PaymentResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Item selection posted by the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Catalog item id
    pub item_id: u64,
    /// Quantity, must be positive
    pub item_count: u32,
}

/// A line item in an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub item_id: u64,

    /// Item name (denormalized for the provider's product data)
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Unit price, always taken from the catalog
    pub unit_price: Price,

    pub quantity: u32,
}

impl LineItem {
    /// Create a line item from a catalog item
    pub fn from_catalog(item: &CatalogItem, quantity: u32) -> Self {
        Self {
            item_id: item.id,
            name: item.name.clone(),
            description: item.description.clone(),
            unit_price: item.price,
            quantity,
        }
    }

    /// Unit price times quantity, `None` on overflow
    pub fn total(&self) -> Option<Price> {
        self.unit_price.checked_times(self.quantity)
    }
}

/// An order to be checked out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID (generated)
    pub id: String,

    pub line_items: Vec<LineItem>,

    /// Currency (same for all items)
    pub currency: Currency,

    /// Idempotency key for the provider create call
    pub idempotency_key: String,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,

    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Create an empty order with generated ID
    pub fn new(currency: Currency) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            line_items: Vec::new(),
            currency,
            idempotency_key: Uuid::new_v4().to_string(),
            metadata: HashMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Build a single-item order, pricing it from the catalog.
    ///
    /// The request's `item_id` is only ever used as a lookup key.
    pub fn from_request(catalog: &ItemCatalog, request: &CheckoutRequest) -> PaymentResult<Self> {
        if request.item_count == 0 {
            return Err(PaymentError::InvalidRequest(
                "itemCount must be a positive integer".to_string(),
            ));
        }

        let item = catalog.get(request.item_id).ok_or(PaymentError::ItemNotFound {
            item_id: request.item_id,
        })?;

        if !item.active {
            return Err(PaymentError::InvalidRequest(format!(
                "Item is not available: {}",
                item.id
            )));
        }

        let line_item = LineItem::from_catalog(item, request.item_count);
        let total = line_item.total().ok_or_else(|| PaymentError::InvalidPrice {
            message: format!(
                "{} x {} overflows",
                line_item.unit_price.amount, line_item.quantity
            ),
        })?;
        if total.amount <= 0 {
            return Err(PaymentError::InvalidPrice {
                message: format!("Total must be positive, got {}", total.amount),
            });
        }

        let mut order = Order::new(item.price.currency);
        order
            .metadata
            .insert("item_id".to_string(), item.id.to_string());
        order.add_item(line_item);
        Ok(order)
    }

    /// Add a line item
    pub fn add_item(&mut self, item: LineItem) {
        self.line_items.push(item);
    }

    /// Order total, `None` on overflow
    pub fn total(&self) -> Option<Price> {
        self.line_items
            .iter()
            .try_fold(0i64, |acc, item| acc.checked_add(item.total()?.amount))
            .map(|amount| Price::from_cents(amount, self.currency))
    }

    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }
}

/// An embedded checkout session created by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID
    pub session_id: String,

    /// Secret the browser uses to mount the embedded checkout
    pub client_secret: String,
}

/// Lifecycle state of a payment intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Canceled,
    Succeeded,
    #[serde(other)]
    Unknown,
}

/// A payment intent as seen by this server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Provider's intent ID
    pub id: String,

    /// Secret the browser uses to mount the payment element
    #[serde(skip_serializing)]
    pub client_secret: Option<String>,

    pub status: PaymentIntentStatus,

    /// Amount in smallest currency unit
    pub amount: i64,

    /// Lowercase ISO currency code as reported by the provider
    pub currency: String,
}
