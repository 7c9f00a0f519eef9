//! PostgreSQL-backed notification log.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::DeliveryError;
use crate::log::EventLog;

/// Appends each payload as one row of the `notifications` table.
#[derive(Clone)]
pub struct PostgresEventLog {
    pool: PgPool,
}

impl PostgresEventLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventLog for PostgresEventLog {
    async fn append(&self, payload: &[u8]) -> Result<(), DeliveryError> {
        let payload: serde_json::Value = serde_json::from_slice(payload)?;

        sqlx::query("INSERT INTO notifications (payload) VALUES ($1)")
            .bind(payload)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                    DeliveryError::Unavailable(e.to_string())
                }
                other => DeliveryError::Database(other),
            })?;

        Ok(())
    }
}
