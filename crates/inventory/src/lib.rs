//! Inventory directory and RPC gateway.
//!
//! The directory is the authoritative `item id -> quantity, price` store and
//! can be used directly. Remote callers go through the RPC gateway: a typed
//! JSON request/response protocol with one HTTP route per method, served by
//! [`server::router`] and consumed by [`RpcInventoryClient`].

pub mod client;
pub mod directory;
pub mod error;
pub mod gateway;
pub mod postgres;
pub mod rpc;
pub mod server;

pub use client::RpcInventoryClient;
pub use directory::{InMemoryDirectory, InventoryDirectory};
pub use error::{DirectoryError, GatewayError};
pub use gateway::{InMemoryInventoryGateway, InventoryGateway, LocalInventoryGateway};
pub use postgres::PostgresDirectory;
