//! # Item Catalog
//!
//! Trusted price source for checkout requests.
//! Items are loaded from `config/items.toml`; the browser only ever sends
//! an item id, never a price.

use serde::{Deserialize, Serialize};

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    USD,
    EUR,
    GBP,
    JPY,
    CHF,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
            Currency::EUR => "eur",
            Currency::GBP => "gbp",
            Currency::JPY => "jpy",
            Currency::CHF => "chf",
        }
    }

    /// Number of decimal places (JPY has 0, the rest 2)
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }
}

/// Price with amount in smallest currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in smallest currency unit (cents for EUR)
    pub amount: i64,
    /// Currency
    pub currency: Currency,
}

impl Price {
    /// Create a price from smallest unit (cents)
    pub fn from_cents(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Multiply by a quantity, `None` on overflow
    pub fn checked_times(&self, quantity: u32) -> Option<Price> {
        self.amount
            .checked_mul(i64::from(quantity))
            .map(|amount| Price::from_cents(amount, self.currency))
    }

    /// Format for display (e.g., "€20.00")
    pub fn display(&self) -> String {
        let symbol = match self.currency {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
            Currency::CHF => "CHF ",
        };
        match self.currency.decimal_places() {
            0 => format!("{}{}", symbol, self.amount),
            _ => format!(
                "{}{}{}.{:02}",
                if self.amount < 0 { "-" } else { "" },
                symbol,
                self.amount.unsigned_abs() / 100,
                self.amount.unsigned_abs() % 100
            ),
        }
    }
}

/// An item that can be bought
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Numeric item id, as sent by the browser
    pub id: u64,

    /// Display name (sent to the provider as the product name)
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Unit price
    pub price: Price,

    /// Whether this item is available for purchase
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl CatalogItem {
    pub fn new(id: u64, name: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            price,
            active: true,
        }
    }
}

/// Item catalog (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemCatalog {
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

impl ItemCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Builder: add an item
    pub fn with_item(mut self, item: CatalogItem) -> Self {
        self.items.push(item);
        self
    }

    /// Find an item by id
    pub fn get(&self, id: u64) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
        [[items]]
        id = 1
        name = "T-shirt"
        description = "Organic cotton"
        price = { amount = 2000, currency = "eur" }

        [[items]]
        id = 2
        name = "Mug"
        price = { amount = 1250, currency = "eur" }
        active = false
    "#;

    #[test]
    fn test_catalog_from_toml() {
        let catalog = ItemCatalog::from_toml(CATALOG).unwrap();

        assert_eq!(catalog.len(), 2);
        assert!(!catalog.is_empty());
        let shirt = catalog.get(1).unwrap();
        assert_eq!(shirt.name, "T-shirt");
        assert_eq!(shirt.price, Price::from_cents(2000, Currency::EUR));
        assert!(shirt.active);
        assert!(!catalog.get(2).unwrap().active);
        assert!(catalog.get(3).is_none());
        assert_eq!(shirt.description.as_deref(), Some("Organic cotton"));
    }

    #[test]
    fn test_rejects_unknown_currency() {
        let bad = r#"
            [[items]]
            id = 1
            name = "T-shirt"
            price = { amount = 2000, currency = "xyz" }
        "#;
        assert!(ItemCatalog::from_toml(bad).is_err());
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::from_cents(2999, Currency::USD).display(), "$29.99");
        assert_eq!(Price::from_cents(1905, Currency::EUR).display(), "€19.05");
        assert_eq!(Price::from_cents(1000, Currency::JPY).display(), "¥1000");
    }

    #[test]
    fn test_checked_times() {
        let price = Price::from_cents(2000, Currency::EUR);
        assert_eq!(price.checked_times(3).unwrap().amount, 6000);
        assert!(Price::from_cents(i64::MAX, Currency::EUR)
            .checked_times(2)
            .is_none());
    }
}
