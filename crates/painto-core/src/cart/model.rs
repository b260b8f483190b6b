//! Cart domain models.
//!
//! Snapshots mirror what the commerce API returns. Nothing here computes
//! prices or totals; the remote cart is authoritative.

use serde::{Deserialize, Serialize};

/// A monetary amount as reported by the API.
///
/// `amount` is kept as the API's decimal string so that no rounding happens
/// on the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub amount: String,
    pub currency_code: String,
}

impl Money {
    pub fn new(amount: impl Into<String>, currency_code: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            currency_code: currency_code.into(),
        }
    }
}

/// One product-variant entry in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Line id issued by the API (used for update/remove).
    pub id: String,
    pub quantity: u32,
    pub variant_id: String,
    #[serde(default)]
    pub variant_title: Option<String>,
    /// Product title snapshot.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_alt: Option<String>,
    #[serde(default)]
    pub unit_price: Option<Money>,
}

/// Cart cost summary.
///
/// Some mutations return only the total, so both fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    #[serde(default)]
    pub subtotal: Option<Money>,
    #[serde(default)]
    pub total: Option<Money>,
}

/// Snapshot of a remote cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: String,
    #[serde(default)]
    pub checkout_url: Option<String>,
    pub total_quantity: u32,
    #[serde(default)]
    pub lines: Vec<CartLine>,
    #[serde(default)]
    pub cost: CartCost,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.total_quantity == 0
    }

    pub fn line(&self, line_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }

    pub fn line_for_variant(&self, variant_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.variant_id == variant_id)
    }
}

/// Input for a new or added line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    pub variant_id: String,
    pub quantity: u32,
}

impl CartLineInput {
    pub fn new(variant_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            variant_id: variant_id.into(),
            quantity,
        }
    }
}

/// Quantity change for an existing line. A quantity of `0` removes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineUpdate {
    pub line_id: String,
    pub quantity: u32,
}

/// Read-only product listing entry, enough to drive buy buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub handle: String,
    pub price: Money,
    /// Compare-at price, falling back to `price` when the API has none.
    pub compare_at_price: Money,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_alt: Option<String>,
    /// First variant, `None` when the product has no purchasable variant.
    #[serde(default)]
    pub variant_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, variant: &str, quantity: u32) -> CartLine {
        CartLine {
            id: id.into(),
            quantity,
            variant_id: variant.into(),
            variant_title: None,
            title: Some("Tile adhesive".into()),
            image_url: None,
            image_alt: None,
            unit_price: Some(Money::new("49.90", "ILS")),
        }
    }

    #[test]
    fn test_line_lookup() {
        let cart = Cart {
            id: "gid://shopify/Cart/1".into(),
            checkout_url: None,
            total_quantity: 3,
            lines: vec![line("l1", "v1", 1), line("l2", "v2", 2)],
            cost: CartCost::default(),
        };
        assert!(!cart.is_empty());
        assert_eq!(cart.line("l2").unwrap().quantity, 2);
        assert_eq!(cart.line_for_variant("v1").unwrap().id, "l1");
        assert!(cart.line("l3").is_none());
    }

    #[test]
    fn test_serializes_camel_case() {
        let cart = Cart {
            id: "c".into(),
            checkout_url: Some("https://shop/checkout".into()),
            total_quantity: 0,
            lines: vec![],
            cost: CartCost::default(),
        };
        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json["checkoutUrl"], "https://shop/checkout");
        assert_eq!(json["totalQuantity"], 0);
    }
}
