use crate::utils::error::{CartError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

pub type ProductId = u64;

/// Product record as served by the catalog. Everything except the id is opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// One product entry in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub amount: u32,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl LineItem {
    /// A fresh line item holding one unit of `product`.
    pub fn from_product(product: Product) -> Self {
        let mut attributes = product.attributes;
        attributes.remove("amount");
        Self {
            id: product.id,
            amount: 1,
            attributes,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.get("title").and_then(|v| v.as_str())
    }

    /// Unit price read from the opaque `price` attribute.
    pub fn price(&self) -> Option<Decimal> {
        match self.attributes.get("price")? {
            serde_json::Value::Number(n) => Decimal::from_str(&n.to_string())
                .or_else(|_| Decimal::from_scientific(&n.to_string()))
                .ok(),
            serde_json::Value::String(s) => Decimal::from_str(s.trim()).ok(),
            _ => None,
        }
    }

    pub fn subtotal(&self) -> Option<Decimal> {
        self.price().map(|price| price * Decimal::from(self.amount))
    }
}

/// Units currently available for a product. The service may report a
/// negative amount (oversold); that is treated as nothing available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    #[serde(default)]
    pub id: Option<ProductId>,
    pub amount: i64,
}

/// Ordered collection of line items, unique by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart, rejecting duplicate ids and zero amounts.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.amount == 0 {
                return Err(CartError::MalformedSnapshot {
                    message: format!("product {} has amount 0", item.id),
                });
            }
            if !seen.insert(item.id) {
                return Err(CartError::MalformedSnapshot {
                    message: format!("product {} appears more than once", item.id),
                });
            }
        }
        Ok(Self { items })
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    pub fn amount_of(&self, id: ProductId) -> Option<u32> {
        self.get(id).map(|item| item.amount)
    }

    /// Per-product amounts, for listings that show how many of each are in the cart.
    pub fn amounts(&self) -> HashMap<ProductId, u32> {
        self.items.iter().map(|item| (item.id, item.amount)).collect()
    }

    pub fn total_units(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    pub fn line_subtotal(&self, id: ProductId) -> Option<Decimal> {
        self.get(id).and_then(LineItem::subtotal)
    }

    /// Sum of all priced line items. Items without a usable price are skipped.
    pub fn total(&self) -> Decimal {
        self.items.iter().filter_map(LineItem::subtotal).sum()
    }

    pub(crate) fn with_appended(&self, item: LineItem) -> Result<Self> {
        if self.contains(item.id) {
            return Err(CartError::AlreadyInCart {
                product_id: item.id,
            });
        }
        let mut items = self.items.clone();
        items.push(item);
        Ok(Self { items })
    }

    pub(crate) fn without(&self, id: ProductId) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|item| item.id != id)
                .cloned()
                .collect(),
        }
    }

    pub(crate) fn with_amount(&self, id: ProductId, amount: u32) -> Self {
        Self {
            items: self
                .items
                .iter()
                .map(|item| {
                    let mut item = item.clone();
                    if item.id == id {
                        item.amount = amount;
                    }
                    item
                })
                .collect(),
        }
    }

    /// Serializes the cart as the JSON array stored in the snapshot slot.
    pub fn to_snapshot(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.items)?)
    }

    /// Parses and validates a stored snapshot.
    pub fn from_snapshot(raw: &str) -> Result<Self> {
        let items: Vec<LineItem> =
            serde_json::from_str(raw).map_err(|e| CartError::MalformedSnapshot {
                message: e.to_string(),
            })?;
        Self::from_items(items)
    }
}

/// User-facing texts handed to the notifier when an operation fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeMessages {
    pub add_failed: String,
    pub remove_failed: String,
    pub out_of_stock: String,
    pub update_failed: String,
}

impl Default for NoticeMessages {
    fn default() -> Self {
        Self {
            add_failed: "product add failed".to_string(),
            remove_failed: "product removal failed".to_string(),
            out_of_stock: "insufficient stock".to_string(),
            update_failed: "quantity update failed".to_string(),
        }
    }
}

pub fn format_price(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}
