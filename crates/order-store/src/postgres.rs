use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{CartLine, Order, OrderDocument};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{OrderId, OrderStoreError, Result, store::OrderStore};

/// SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL-backed order store.
///
/// Each order is one row holding the whole `OrderDocument` as JSONB, so an
/// insert is a single-statement atomic write.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let id: String = row.try_get("id")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;
        let document: serde_json::Value = row.try_get("document")?;

        let document: OrderDocument =
            serde_json::from_value(document).map_err(|e| OrderStoreError::CorruptDocument {
                id: id.clone(),
                reason: e.to_string(),
            })?;
        if document.id.as_str() != id {
            return Err(OrderStoreError::CorruptDocument {
                reason: format!("document carries id {}", document.id),
                id,
            });
        }

        Ok(Order::with_timestamp(
            document.id,
            created_at,
            document.product,
        ))
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    #[tracing::instrument(skip(self, order), fields(order_id = %order.id))]
    async fn insert(&self, order: &Order) -> Result<()> {
        let document = serde_json::to_value(order.to_document())?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, created_at, document)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(order.id.as_str())
        .bind(order.created_at)
        .bind(document)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
            {
                return OrderStoreError::Duplicate(order.id.clone());
            }
            classify(e)
        })?;

        metrics::counter!("order_store_inserts_total").increment(1);
        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>> {
        let row = sqlx::query(
            r#"
            SELECT id, created_at, document
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?;

        row.map(Self::row_to_order).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query(
            r#"
            SELECT id, created_at, document
            FROM orders
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    #[tracing::instrument(skip(self, lines), fields(line_count = lines.len()))]
    async fn replace_lines(&self, id: &OrderId, lines: Vec<CartLine>) -> Result<u64> {
        let product = serde_json::to_value(&lines)?;

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET document = jsonb_set(document, '{product}', $2)
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .bind(product)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: &OrderId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        Ok(result.rows_affected())
    }
}

/// Connection-level failures become `Unavailable`; everything else stays a
/// database error.
fn classify(e: sqlx::Error) -> OrderStoreError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            OrderStoreError::Unavailable(e.to_string())
        }
        other => OrderStoreError::Database(other),
    }
}
