//! Notification error types.

use thiserror::Error;

/// Failure to hand an event to the delivery queue.
///
/// Never reports delivery outcomes.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The event could not be serialized for transport.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The queue is at capacity.
    #[error("Notification queue is full")]
    ChannelFull,

    /// The delivery worker has stopped.
    #[error("Notification queue is closed")]
    Closed,

    /// The publisher refused the event.
    #[error("Publish rejected: {0}")]
    Rejected(String),
}

/// Failure to append a payload to the durable log.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The log could not be reached.
    #[error("Event log unavailable: {0}")]
    Unavailable(String),

    /// The payload is not valid JSON.
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl DeliveryError {
    /// Whether retrying the same payload can succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            DeliveryError::Unavailable(_) => true,
            DeliveryError::InvalidPayload(_) => false,
            DeliveryError::Database(e) => !matches!(e, sqlx::Error::Database(_)),
        }
    }
}
