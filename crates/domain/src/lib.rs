//! Domain types for the order-processing pipeline.
//!
//! This crate provides:
//! - `Item`, the authoritative inventory record and its price parsing
//! - `CartLine` and `Cart`, the caller-supplied order request
//! - `Order` and its persisted `OrderDocument` layout
//! - `NotificationEvent`, emitted when an order is looked up for confirmation

pub mod error;
pub mod item;
pub mod notification;
pub mod order;
pub mod timestamp;

pub use common::{ItemId, OrderId};
pub use error::PriceError;
pub use item::{Item, parse_price};
pub use notification::{NotificationEvent, NotificationKind};
pub use order::{Cart, CartLine, Order, OrderDocument};
