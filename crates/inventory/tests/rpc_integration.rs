//! Client/server tests for the inventory RPC gateway over a real loopback socket.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::routing::post;
use domain::{Item, ItemId};
use inventory::rpc::GET_ITEM_PATH;
use inventory::{
    GatewayError, InMemoryDirectory, InventoryDirectory, InventoryGateway, RpcInventoryClient,
    server,
};

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn setup() -> (RpcInventoryClient, InMemoryDirectory) {
    let directory = InMemoryDirectory::with_items([
        Item::new("A1", "Widget", 10, "5"),
        Item::new("B2", "Gadget", 2, "30 руб."),
    ]);
    let addr = serve(server::router(directory.clone())).await;
    let client = RpcInventoryClient::new(format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    (client, directory)
}

#[tokio::test]
async fn test_get_item_returns_authoritative_record() {
    let (client, _) = setup().await;

    let item = client.get_item(&ItemId::new("B2")).await.unwrap();

    assert_eq!(item, Item::new("B2", "Gadget", 2, "30 руб."));
}

#[tokio::test]
async fn test_get_missing_item_is_typed_not_found() {
    let (client, _) = setup().await;

    let result = client.get_item(&ItemId::new("Z9")).await;

    assert_eq!(result, Err(GatewayError::NotFound(ItemId::new("Z9"))));
}

#[tokio::test]
async fn test_create_duplicate_is_typed_already_exists() {
    let (client, directory) = setup().await;

    let result = client.create(Item::new("A1", "Again", 1, "1")).await;

    assert_eq!(result, Err(GatewayError::AlreadyExists(ItemId::new("A1"))));
    let stored = directory.get(&ItemId::new("A1")).await.unwrap().unwrap();
    assert_eq!(stored.name, "Widget");
}

#[tokio::test]
async fn test_mutations_reach_the_directory() {
    let (client, directory) = setup().await;

    client
        .create(Item::new("C3", "Gizmo", 7, "12"))
        .await
        .unwrap();
    client
        .update(Item::new("A1", "Widget", 0, "6"))
        .await
        .unwrap();
    client.delete(&ItemId::new("B2")).await.unwrap();

    assert_eq!(directory.item_count().await, 2);
    let a1 = directory.get(&ItemId::new("A1")).await.unwrap().unwrap();
    assert_eq!(a1.quantity, 0);
    assert_eq!(a1.price, "6");
    assert!(directory.get(&ItemId::new("C3")).await.unwrap().is_some());
}

#[tokio::test]
async fn test_update_and_delete_missing_are_not_found() {
    let (client, _) = setup().await;

    assert_eq!(
        client.update(Item::new("Z9", "Ghost", 1, "1")).await,
        Err(GatewayError::NotFound(ItemId::new("Z9")))
    );
    assert_eq!(
        client.delete(&ItemId::new("Z9")).await,
        Err(GatewayError::NotFound(ItemId::new("Z9")))
    );
}

#[tokio::test]
async fn test_blank_id_is_invalid_argument() {
    let (client, _) = setup().await;

    let result = client.create(Item::new("", "Nameless", 1, "1")).await;

    assert!(matches!(result, Err(GatewayError::InvalidArgument(_))));
}

#[tokio::test]
async fn test_slow_server_hits_deadline() {
    let app = Router::new().route(
        GET_ITEM_PATH,
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "late"
        }),
    );
    let addr = serve(app).await;
    let client =
        RpcInventoryClient::new(format!("http://{addr}"), Duration::from_millis(100)).unwrap();

    let started = std::time::Instant::now();
    let result = client.get_item(&ItemId::new("A1")).await;

    assert!(matches!(result, Err(GatewayError::Unavailable(_))));
    assert!(started.elapsed() < Duration::from_secs(2));
}
