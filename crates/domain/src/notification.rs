//! Notification events emitted by order confirmation lookups.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::OrderId;
use crate::timestamp;

/// Outcome reported by a confirmation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    #[serde(rename = "Order found")]
    OrderFound,
    #[serde(rename = "Order not found")]
    OrderNotFound,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::OrderFound => write!(f, "Order found"),
            NotificationKind::OrderNotFound => write!(f, "Order not found"),
        }
    }
}

/// Write-once notification appended to the durable log.
///
/// Wire layout: `{"typemes", "description", "data"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    #[serde(rename = "typemes")]
    pub kind: NotificationKind,
    pub description: String,
    #[serde(rename = "data", with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl NotificationEvent {
    pub fn new(kind: NotificationKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            timestamp: Utc::now().trunc_subsecs(0),
        }
    }

    /// `"Order <id> exists"`.
    pub fn order_found(order_id: &OrderId) -> Self {
        Self::new(
            NotificationKind::OrderFound,
            format!("Order {order_id} exists"),
        )
    }

    /// `"Order <id> does not exist"`.
    pub fn order_not_found(order_id: &OrderId) -> Self {
        Self::new(
            NotificationKind::OrderNotFound,
            format!("Order {order_id} does not exist"),
        )
    }
}
