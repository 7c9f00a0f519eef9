//! Order orchestration.
//!
//! [`OrderOrchestrator`] turns a cart into a persisted, priced order without
//! a distributed transaction:
//! 1. Look up every cart line in inventory, in cart order
//! 2. Overwrite each line's quantity and price with the inventory values
//! 3. Write the whole order to the order store in one insert
//!
//! Inventory lookups are read-only, so the single insert is the only durable
//! write and a failure at any earlier point leaves nothing to compensate.
//! Confirmation lookups additionally hand a notification event to the
//! publisher without waiting for its delivery.

pub mod config;
pub mod error;
pub mod orchestrator;

pub use config::{LookupMode, OrchestratorConfig};
pub use error::{OrchestratorError, Result};
pub use orchestrator::{Confirmation, OrderOrchestrator};
