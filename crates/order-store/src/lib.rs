//! Order document store.
//!
//! Orders are stored as whole documents keyed by their id. Inserts are a
//! single atomic write; the only in-place mutation is a full replacement of
//! an order's lines.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use common::OrderId;
pub use error::{OrderStoreError, Result};
pub use memory::InMemoryOrderStore;
pub use postgres::PostgresOrderStore;
pub use store::{OrderStore, OrderStoreExt};
