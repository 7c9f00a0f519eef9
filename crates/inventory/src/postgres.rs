//! PostgreSQL-backed inventory directory.

use async_trait::async_trait;
use common::ItemId;
use domain::Item;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::directory::{InventoryDirectory, validate};
use crate::error::DirectoryError;

/// SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PostgresDirectory {
    pool: PgPool,
}

impl PostgresDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<(), DirectoryError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_item(row: PgRow) -> Result<Item, DirectoryError> {
        let quantity: i32 = row.try_get("quantity")?;
        Ok(Item {
            id: ItemId::new(row.try_get::<String, _>("id")?),
            name: row.try_get("naming")?,
            quantity: u32::try_from(quantity)
                .map_err(|_| DirectoryError::Invalid(format!("negative quantity {quantity}")))?,
            price: row.try_get("price")?,
        })
    }
}

fn quantity_param(item: &Item) -> Result<i32, DirectoryError> {
    i32::try_from(item.quantity)
        .map_err(|_| DirectoryError::Invalid(format!("quantity {} too large", item.quantity)))
}

#[async_trait]
impl InventoryDirectory for PostgresDirectory {
    async fn get(&self, id: &ItemId) -> Result<Option<Item>, DirectoryError> {
        let row = sqlx::query("SELECT id, naming, quantity, price FROM inventory WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_item).transpose()
    }

    async fn list(&self) -> Result<Vec<Item>, DirectoryError> {
        let rows = sqlx::query("SELECT id, naming, quantity, price FROM inventory ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_item).collect()
    }

    #[tracing::instrument(skip(self, item), fields(item_id = %item.id))]
    async fn insert(&self, item: Item) -> Result<(), DirectoryError> {
        validate(&item)?;
        let quantity = quantity_param(&item)?;

        sqlx::query("INSERT INTO inventory (id, naming, quantity, price) VALUES ($1, $2, $3, $4)")
            .bind(item.id.as_str())
            .bind(&item.name)
            .bind(quantity)
            .bind(&item.price)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
                {
                    return DirectoryError::AlreadyExists(item.id.clone());
                }
                DirectoryError::Database(e)
            })?;

        Ok(())
    }

    #[tracing::instrument(skip(self, item), fields(item_id = %item.id))]
    async fn update(&self, item: Item) -> Result<(), DirectoryError> {
        validate(&item)?;
        let quantity = quantity_param(&item)?;

        let result = sqlx::query(
            "UPDATE inventory SET naming = $2, quantity = $3, price = $4 WHERE id = $1",
        )
        .bind(item.id.as_str())
        .bind(&item.name)
        .bind(quantity)
        .bind(&item.price)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DirectoryError::NotFound(item.id));
        }
        Ok(())
    }

    async fn delete(&self, id: &ItemId) -> Result<u64, DirectoryError> {
        let result = sqlx::query("DELETE FROM inventory WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
