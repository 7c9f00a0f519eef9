//! Identifier types shared by the order, inventory and notification services.

mod types;

pub use types::{ItemId, OrderId};
