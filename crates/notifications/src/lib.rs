//! Notification publishing for the order service.
//!
//! Publishing is a bounded hand-off: [`EventPublisher::publish`] serializes
//! the event and enqueues it, and only reports enqueue failures. A separate
//! [`DeliveryWorker`] task drains the queue in FIFO order and appends each
//! payload to an [`EventLog`], retrying transient failures without the
//! publisher ever seeing them.

pub mod error;
pub mod log;
pub mod postgres;
pub mod publisher;
pub mod worker;

pub use error::{DeliveryError, PublishError};
pub use log::{EventLog, InMemoryEventLog};
pub use postgres::PostgresEventLog;
pub use publisher::{ChannelPublisher, EventPublisher, InMemoryPublisher};
pub use worker::{DeliveryConfig, DeliveryWorker};
