//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency. Every test
//! works on freshly generated order ids, so they can run in parallel.
//!
//! ```bash
//! cargo test -p order-store --test postgres_integration
//! ```

use std::sync::Arc;

use domain::{CartLine, Order};
use order_store::{OrderId, OrderStore, OrderStoreError, OrderStoreExt, PostgresOrderStore};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let pool = sqlx::PgPool::connect(&connection_string).await.unwrap();
            PostgresOrderStore::new(pool.clone())
                .run_migrations()
                .await
                .unwrap();
            pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

async fn get_test_store() -> PostgresOrderStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    PostgresOrderStore::new(pool)
}

fn create_test_order() -> Order {
    Order::new(
        OrderId::generate(),
        vec![
            CartLine::new("A1", "Widget", 10, 5),
            CartLine::new("B2", "Gadget", 1, 250),
        ],
    )
}

#[tokio::test]
async fn test_insert_and_find_order() {
    let store = get_test_store().await;
    let order = create_test_order();

    store.insert(&order).await.unwrap();

    let found = store.find_by_id(&order.id).await.unwrap().unwrap();
    assert_eq!(found, order);
}

#[tokio::test]
async fn test_find_missing_order() {
    let store = get_test_store().await;
    let found = store.find_by_id(&OrderId::generate()).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_duplicate_insert_fails_distinctly() {
    let store = get_test_store().await;
    let order = create_test_order();
    store.insert(&order).await.unwrap();

    let mut retry = order.clone();
    retry.lines.truncate(1);
    let result = store.insert(&retry).await;

    assert!(matches!(result, Err(OrderStoreError::Duplicate(ref id)) if id == &order.id));
    let stored = store.find_by_id(&order.id).await.unwrap().unwrap();
    assert_eq!(stored.lines.len(), 2);
}

#[tokio::test]
async fn test_document_is_stored_in_document_layout() {
    let store = get_test_store().await;
    let order = create_test_order();
    store.insert(&order).await.unwrap();

    let document: serde_json::Value =
        sqlx::query_scalar("SELECT document FROM orders WHERE id = $1")
            .bind(order.id.as_str())
            .fetch_one(store.pool())
            .await
            .unwrap();

    assert_eq!(document["_id"], order.id.as_str());
    assert_eq!(document["product"][0]["item_id"], "A1");
    assert_eq!(document["product"][1]["price"], 250);
    assert!(document["data"].is_string());
}

#[tokio::test]
async fn test_replace_lines_overwrites_product() {
    let store = get_test_store().await;
    let order = create_test_order();
    store.insert(&order).await.unwrap();

    let replacement = vec![CartLine::new("C3", "Gizmo", 4, 7)];
    let changed = store
        .replace_lines(&order.id, replacement.clone())
        .await
        .unwrap();
    assert_eq!(changed, 1);

    let stored = store.find_by_id(&order.id).await.unwrap().unwrap();
    assert_eq!(stored.lines, replacement);
}

#[tokio::test]
async fn test_replace_lines_on_missing_order_changes_nothing() {
    let store = get_test_store().await;
    let id = OrderId::generate();

    let changed = store
        .replace_lines(&id, vec![CartLine::new("C3", "Gizmo", 4, 7)])
        .await
        .unwrap();

    assert_eq!(changed, 0);
    assert!(!store.exists(&id).await.unwrap());
}

#[tokio::test]
async fn test_delete_reports_count() {
    let store = get_test_store().await;
    let order = create_test_order();
    store.insert(&order).await.unwrap();

    assert_eq!(store.delete(&order.id).await.unwrap(), 1);
    assert_eq!(store.delete(&order.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_find_all_includes_inserted_orders() {
    let store = get_test_store().await;
    let first = create_test_order();
    let second = create_test_order();
    store.insert(&first).await.unwrap();
    store.insert(&second).await.unwrap();

    let all = store.find_all().await.unwrap();
    assert!(all.iter().any(|o| o.id == first.id));
    assert!(all.iter().any(|o| o.id == second.id));
}
