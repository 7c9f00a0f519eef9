//! Background task delivering queued notifications to the event log.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::log::EventLog;

/// Queue and retry settings for notification delivery.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Maximum number of payloads waiting for delivery.
    pub capacity: usize,
    /// Attempts per payload before it is dropped.
    pub max_attempts: u32,
    /// Delay after the first failed attempt; doubles on each retry.
    pub base_backoff: Duration,
    /// Upper bound on the delay between attempts.
    pub max_backoff: Duration,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            max_attempts: 5,
            base_backoff: Duration::from_millis(50),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl DeliveryConfig {
    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Drains the notification queue into an [`EventLog`].
///
/// Payloads are delivered one at a time in enqueue order. The worker stops
/// once every publisher handle has been dropped and the queue is empty.
pub struct DeliveryWorker<L> {
    rx: mpsc::Receiver<Vec<u8>>,
    log: L,
    config: DeliveryConfig,
}

impl<L: EventLog> DeliveryWorker<L> {
    pub(crate) fn new(rx: mpsc::Receiver<Vec<u8>>, log: L, config: DeliveryConfig) -> Self {
        Self { rx, log, config }
    }

    /// Runs until the queue closes.
    pub async fn run(mut self) {
        tracing::debug!("notification delivery worker started");
        while let Some(payload) = self.rx.recv().await {
            self.deliver(&payload).await;
        }
        tracing::info!("notification queue closed, delivery worker stopped");
    }

    async fn deliver(&self, payload: &[u8]) {
        let mut attempt = 1;
        loop {
            match self.log.append(payload).await {
                Ok(()) => {
                    metrics::counter!("notifications_delivered_total").increment(1);
                    return;
                }
                Err(e) if e.is_transient() && attempt < self.config.max_attempts => {
                    let backoff = self.config.backoff_for(attempt);
                    tracing::warn!(
                        attempt,
                        error = %e,
                        backoff_ms = backoff.as_millis() as u64,
                        "notification delivery failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => {
                    metrics::counter!("notifications_dropped_total").increment(1);
                    tracing::error!(attempts = attempt, error = %e, "notification dropped");
                    return;
                }
            }
        }
    }
}
