//! Event publisher trait and implementations.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use domain::NotificationEvent;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::PublishError;
use crate::log::EventLog;
use crate::worker::{DeliveryConfig, DeliveryWorker};

/// Fire-and-forget hand-off of notification events.
///
/// `publish` returns as soon as the event is enqueued. An error means the
/// event was never enqueued; delivery failures are not reported here.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: &NotificationEvent) -> Result<(), PublishError>;
}

impl<T: EventPublisher + ?Sized> EventPublisher for Arc<T> {
    fn publish(&self, event: &NotificationEvent) -> Result<(), PublishError> {
        (**self).publish(event)
    }
}

/// Publisher backed by a bounded FIFO queue and a [`DeliveryWorker`].
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    tx: mpsc::Sender<Vec<u8>>,
}

impl ChannelPublisher {
    /// Creates a publisher and the worker that drains it. The worker must be
    /// run (usually via `tokio::spawn(worker.run())`) for events to be delivered.
    pub fn channel<L: EventLog>(log: L, config: DeliveryConfig) -> (Self, DeliveryWorker<L>) {
        let (tx, rx) = mpsc::channel(config.capacity.max(1));
        (Self { tx }, DeliveryWorker::new(rx, log, config))
    }

    /// Creates a publisher and spawns its delivery worker on the current runtime.
    pub fn spawn<L: EventLog + 'static>(
        log: L,
        config: DeliveryConfig,
    ) -> (Self, JoinHandle<()>) {
        let (publisher, worker) = Self::channel(log, config);
        let handle = tokio::spawn(worker.run());
        (publisher, handle)
    }
}

impl EventPublisher for ChannelPublisher {
    fn publish(&self, event: &NotificationEvent) -> Result<(), PublishError> {
        let payload = serde_json::to_vec(event)?;
        self.tx.try_send(payload).map_err(|e| {
            metrics::counter!("notifications_enqueue_failed_total").increment(1);
            match e {
                mpsc::error::TrySendError::Full(_) => PublishError::ChannelFull,
                mpsc::error::TrySendError::Closed(_) => PublishError::Closed,
            }
        })?;
        metrics::counter!("notifications_enqueued_total").increment(1);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct PublisherState {
    published: Vec<NotificationEvent>,
    fail_on_publish: bool,
}

/// In-memory publisher for testing.
///
/// Records every accepted event; can be configured to reject publishes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPublisher {
    state: Arc<Mutex<PublisherState>>,
}

impl InMemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the publisher to reject every subsequent publish.
    pub fn set_fail_on_publish(&self, fail: bool) {
        self.state().fail_on_publish = fail;
    }

    /// Accepted events, in publish order.
    pub fn published(&self) -> Vec<NotificationEvent> {
        self.state().published.clone()
    }

    pub fn published_count(&self) -> usize {
        self.state().published.len()
    }

    fn state(&self) -> MutexGuard<'_, PublisherState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventPublisher for InMemoryPublisher {
    fn publish(&self, event: &NotificationEvent) -> Result<(), PublishError> {
        let mut state = self.state();
        if state.fail_on_publish {
            return Err(PublishError::Rejected("publisher offline".to_string()));
        }
        state.published.push(event.clone());
        Ok(())
    }
}
