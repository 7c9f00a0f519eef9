//! Caller-supplied cart lines.

use serde::{Deserialize, Serialize};

use crate::ItemId;
use crate::error::PriceError;
use crate::item::Item;

/// One requested line of a cart, and the shape a priced order line takes.
///
/// On the way in, `quantity` and `price` are whatever the caller sent; they
/// are overwritten from inventory before an order is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub price: i64,
}

impl CartLine {
    pub fn new(
        item_id: impl Into<ItemId>,
        name: impl Into<String>,
        quantity: u32,
        price: i64,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.into(),
            quantity,
            price,
        }
    }

    /// A line that only references an item.
    pub fn reference(item_id: impl Into<ItemId>) -> Self {
        Self::new(item_id, "", 0, 0)
    }

    /// Returns this line with quantity and price taken from `item`.
    ///
    /// The caller's name is kept.
    pub fn priced(self, item: &Item) -> Result<Self, PriceError> {
        let price = item.unit_price()?;
        Ok(Self {
            quantity: item.quantity,
            price,
            ..self
        })
    }
}

/// A cart as posted to the order service: `{"product": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(rename = "product", default)]
    pub lines: Vec<CartLine>,
}

impl Cart {
    pub fn new(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }
}
