//! Durable log that notification payloads are delivered to.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use domain::NotificationEvent;

use crate::error::DeliveryError;

/// Append-only sink for serialized notifications.
///
/// Payloads are stored verbatim, in the order they are appended.
#[async_trait]
pub trait EventLog: Send + Sync {
    async fn append(&self, payload: &[u8]) -> Result<(), DeliveryError>;
}

#[async_trait]
impl<T: EventLog + ?Sized> EventLog for Arc<T> {
    async fn append(&self, payload: &[u8]) -> Result<(), DeliveryError> {
        (**self).append(payload).await
    }
}

#[derive(Debug, Default)]
struct LogState {
    payloads: Vec<Vec<u8>>,
    failures_remaining: u32,
    latency: Option<Duration>,
}

/// In-memory event log for testing.
///
/// Can be told to fail a number of upcoming appends or to delay each one.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventLog {
    state: Arc<Mutex<LogState>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the next `count` appends with `Unavailable`.
    pub fn fail_next(&self, count: u32) {
        self.state().failures_remaining = count;
    }

    /// Delays every append by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.state().latency = latency;
    }

    /// Raw payloads, in append order.
    pub fn payloads(&self) -> Vec<Vec<u8>> {
        self.state().payloads.clone()
    }

    pub fn len(&self) -> usize {
        self.state().payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Payloads decoded back into events; undecodable payloads are skipped.
    pub fn events(&self) -> Vec<NotificationEvent> {
        self.state()
            .payloads
            .iter()
            .filter_map(|p| serde_json::from_slice(p).ok())
            .collect()
    }

    fn state(&self) -> MutexGuard<'_, LogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl EventLog for InMemoryEventLog {
    async fn append(&self, payload: &[u8]) -> Result<(), DeliveryError> {
        let latency = self.state().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state();
        if state.failures_remaining > 0 {
            state.failures_remaining -= 1;
            return Err(DeliveryError::Unavailable("broker not reachable".to_string()));
        }
        state.payloads.push(payload.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::OrderId;

    #[tokio::test]
    async fn test_append_keeps_order() {
        let log = InMemoryEventLog::new();
        log.append(b"{\"n\":1}").await.unwrap();
        log.append(b"{\"n\":2}").await.unwrap();

        assert_eq!(
            log.payloads(),
            vec![b"{\"n\":1}".to_vec(), b"{\"n\":2}".to_vec()]
        );
    }

    #[tokio::test]
    async fn test_fail_next() {
        let log = InMemoryEventLog::new();
        log.fail_next(2);

        assert!(log.append(b"{}").await.is_err());
        assert!(log.append(b"{}").await.is_err());
        assert!(log.append(b"{}").await.is_ok());
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn test_events_decodes_payloads() {
        let log = InMemoryEventLog::new();
        let event = NotificationEvent::order_found(&OrderId::new("abc"));
        log.append(&serde_json::to_vec(&event).unwrap())
            .await
            .unwrap();
        log.append(b"not json").await.unwrap();

        assert_eq!(log.events(), vec![event]);
        assert_eq!(log.len(), 2);
    }
}
