//! Authoritative inventory record.

use serde::{Deserialize, Serialize};

use crate::ItemId;
use crate::error::PriceError;

/// A stocked item as held by the inventory directory.
///
/// `price` is kept exactly as inventory stores it, which may include a
/// trailing currency label such as `"5 руб."`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "item_id")]
    pub id: ItemId,
    pub name: String,
    pub quantity: u32,
    pub price: String,
}

impl Item {
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        quantity: u32,
        price: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity,
            price: price.into(),
        }
    }

    /// The whole-number unit price encoded in `price`.
    pub fn unit_price(&self) -> Result<i64, PriceError> {
        parse_price(&self.price)
    }
}

/// Reads a whole amount from an inventory price string.
///
/// Leading digits (optionally followed by a zero fraction such as `.00`) form
/// the amount; anything after them is treated as a currency label and ignored.
/// A label that itself contains digits (`"1 500 руб."`, `"1,500"`) is
/// rejected rather than read as a shorter amount.
pub fn parse_price(raw: &str) -> Result<i64, PriceError> {
    let trimmed = raw.trim();
    let numeric_len = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (numeric, label) = trimmed.split_at(numeric_len);

    if label.chars().any(|c| c.is_ascii_digit()) {
        return Err(PriceError::Malformed {
            raw: raw.to_string(),
        });
    }

    let (whole, fraction) = match numeric.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (numeric, None),
    };

    if whole.is_empty() {
        return Err(PriceError::Missing {
            raw: raw.to_string(),
        });
    }

    if let Some(fraction) = fraction {
        if fraction.contains('.') {
            return Err(PriceError::Malformed {
                raw: raw.to_string(),
            });
        }
        if fraction.chars().any(|c| c != '0') {
            return Err(PriceError::NotWhole {
                raw: raw.to_string(),
            });
        }
    }

    whole.parse::<i64>().map_err(|_| PriceError::OutOfRange {
        raw: raw.to_string(),
    })
}
