//! Collaborator selection and wiring.

use std::sync::Arc;

use inventory::{
    GatewayError, InMemoryDirectory, InventoryGateway, LocalInventoryGateway, PostgresDirectory,
    RpcInventoryClient,
};
use notifications::{
    ChannelPublisher, EventLog, EventPublisher, InMemoryEventLog, PostgresEventLog,
};
use order_store::{InMemoryOrderStore, OrderStore, OrderStoreError, PostgresOrderStore};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::routes::orders::AppState;

/// Errors that prevent the service from starting.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Could not connect to the database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Could not prepare the order store: {0}")]
    OrderStore(#[from] OrderStoreError),

    #[error("Could not set up the inventory client: {0}")]
    Inventory(#[from] GatewayError),
}

/// Wired application state plus the notification delivery task.
///
/// Dropping `state` (and every router holding it) closes the notification
/// queue; `delivery` then finishes once the queue is drained.
pub struct Services {
    pub state: Arc<AppState>,
    pub delivery: JoinHandle<()>,
}

/// Connects to PostgreSQL and applies migrations.
pub async fn connect(database_url: &str, config: &Config) -> Result<PgPool, BootstrapError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(config.store_timeout)
        .connect(database_url)
        .await?;
    PostgresOrderStore::new(pool.clone()).run_migrations().await?;
    Ok(pool)
}

/// Builds every collaborator the configuration asks for.
///
/// With `DATABASE_URL` set, orders, inventory and notifications live in
/// PostgreSQL; otherwise in memory. With `INVENTORY_RPC_URL` set, inventory
/// is reached over RPC instead of in-process.
pub async fn build_services(config: &Config) -> Result<Services, BootstrapError> {
    let pool = match &config.database_url {
        Some(url) => Some(connect(url, config).await?),
        None => {
            tracing::warn!("DATABASE_URL not set, orders and notifications are kept in memory");
            None
        }
    };

    let store: Arc<dyn OrderStore> = match &pool {
        Some(pool) => Arc::new(PostgresOrderStore::new(pool.clone())),
        None => Arc::new(InMemoryOrderStore::new()),
    };

    let inventory: Arc<dyn InventoryGateway> = match (&config.inventory_rpc_url, &pool) {
        (Some(url), _) => {
            tracing::info!(%url, "using remote inventory service");
            Arc::new(RpcInventoryClient::new(url.as_str(), config.rpc_timeout)?)
        }
        (None, Some(pool)) => Arc::new(LocalInventoryGateway::new(PostgresDirectory::new(
            pool.clone(),
        ))),
        (None, None) => {
            tracing::warn!("inventory is in-process and empty; every order will miss its items");
            Arc::new(LocalInventoryGateway::new(InMemoryDirectory::new()))
        }
    };

    let log: Arc<dyn EventLog> = match &pool {
        Some(pool) => Arc::new(PostgresEventLog::new(pool.clone())),
        None => Arc::new(InMemoryEventLog::new()),
    };
    let (publisher, delivery) = ChannelPublisher::spawn(log, config.delivery_config());
    let publisher: Arc<dyn EventPublisher> = Arc::new(publisher);

    let state = Arc::new(AppState::new(
        store,
        inventory,
        publisher,
        config.orchestrator_config(),
    ));
    Ok(Services { state, delivery })
}
