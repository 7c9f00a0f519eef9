//! Priced order record and its stored document layout.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::OrderId;
use crate::order::CartLine;
use crate::timestamp;

/// A persisted, priced purchase.
///
/// Serialized for callers as `{"id", "data", "product"}` with `data` in the
/// day-first timestamp layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(rename = "data", with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "product")]
    pub lines: Vec<CartLine>,
}

impl Order {
    /// Creates an order stamped with the current time at second resolution.
    pub fn new(id: OrderId, lines: Vec<CartLine>) -> Self {
        Self::with_timestamp(id, Utc::now().trunc_subsecs(0), lines)
    }

    pub fn with_timestamp(id: OrderId, created_at: DateTime<Utc>, lines: Vec<CartLine>) -> Self {
        Self {
            id,
            created_at,
            lines,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of `quantity * price` over all lines.
    pub fn total(&self) -> i64 {
        self.lines
            .iter()
            .map(|line| i64::from(line.quantity) * line.price)
            .sum()
    }

    pub fn to_document(&self) -> OrderDocument {
        OrderDocument::from(self)
    }
}

/// Stored document shape: `{"_id", "data", "product"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDocument {
    #[serde(rename = "_id")]
    pub id: OrderId,
    pub data: String,
    pub product: Vec<CartLine>,
}

impl From<&Order> for OrderDocument {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            data: timestamp::format(&order.created_at),
            product: order.lines.clone(),
        }
    }
}

impl TryFrom<OrderDocument> for Order {
    type Error = chrono::ParseError;

    fn try_from(doc: OrderDocument) -> Result<Self, Self::Error> {
        let created_at = timestamp::parse(&doc.data)?;
        Ok(Order::with_timestamp(doc.id, created_at, doc.product))
    }
}
