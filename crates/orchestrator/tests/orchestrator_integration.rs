//! Integration tests for order orchestration.

use std::time::{Duration, Instant};

use common::{ItemId, OrderId};
use domain::{Cart, CartLine, Item, NotificationKind};
use inventory::{InMemoryInventoryGateway, InventoryGateway};
use notifications::{ChannelPublisher, DeliveryConfig, InMemoryEventLog, InMemoryPublisher};
use order_store::{InMemoryOrderStore, OrderStore};
use orchestrator::{LookupMode, OrchestratorConfig, OrchestratorError, OrderOrchestrator};

type TestOrchestrator =
    OrderOrchestrator<InMemoryOrderStore, InMemoryInventoryGateway, InMemoryPublisher>;

struct TestHarness {
    orchestrator: TestOrchestrator,
    store: InMemoryOrderStore,
    inventory: InMemoryInventoryGateway,
    publisher: InMemoryPublisher,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_config(OrchestratorConfig::default())
    }

    fn with_config(config: OrchestratorConfig) -> Self {
        let store = InMemoryOrderStore::new();
        let inventory = InMemoryInventoryGateway::with_items([
            Item::new("A1", "Notebook", 10, "5"),
            Item::new("B2", "Pencil", 40, "12 руб."),
            Item::new("C3", "Eraser", 7, "3.00"),
            Item::new("D4", "Ruler", 1, "250 руб."),
        ]);
        let publisher = InMemoryPublisher::new();
        let orchestrator = OrderOrchestrator::with_config(
            store.clone(),
            inventory.clone(),
            publisher.clone(),
            config,
        );

        Self {
            orchestrator,
            store,
            inventory,
            publisher,
        }
    }

    fn cart(ids: &[&str]) -> Cart {
        Cart::new(ids.iter().map(|id| CartLine::new(*id, "", 1, 0)).collect())
    }
}

#[tokio::test]
async fn test_single_line_takes_inventory_values() {
    let h = TestHarness::new();

    let order = h
        .orchestrator
        .create_order(Cart::new(vec![CartLine::new("A1", "", 1, 0)]))
        .await
        .unwrap();

    assert_eq!(order.lines, vec![CartLine::new("A1", "", 10, 5)]);
}

#[tokio::test]
async fn test_lines_keep_cart_order_and_inventory_values() {
    let h = TestHarness::new();

    let order = h
        .orchestrator
        .create_order(TestHarness::cart(&["D4", "A1", "C3", "B2", "A1"]))
        .await
        .unwrap();

    let priced: Vec<(&str, u32, i64)> = order
        .lines
        .iter()
        .map(|l| (l.item_id.as_str(), l.quantity, l.price))
        .collect();
    assert_eq!(
        priced,
        vec![
            ("D4", 1, 250),
            ("A1", 10, 5),
            ("C3", 7, 3),
            ("B2", 40, 12),
            ("A1", 10, 5),
        ]
    );
    assert_eq!(order.total(), 250 + 50 + 21 + 480 + 50);

    let stored = h.store.find_by_id(&order.id).await.unwrap().unwrap();
    assert_eq!(stored, order);
}

#[tokio::test]
async fn test_concurrent_lookups_keep_cart_order() {
    let h = TestHarness::with_config(OrchestratorConfig {
        lookup_mode: LookupMode::Concurrent,
        ..OrchestratorConfig::default()
    });

    let order = h
        .orchestrator
        .create_order(TestHarness::cart(&["C3", "B2", "D4", "A1"]))
        .await
        .unwrap();

    let ids: Vec<&str> = order.lines.iter().map(|l| l.item_id.as_str()).collect();
    assert_eq!(ids, vec!["C3", "B2", "D4", "A1"]);
    assert_eq!(h.inventory.lookup_count(), 4);
}

#[tokio::test]
async fn test_unknown_item_at_any_position_persists_nothing() {
    for position in 0..3 {
        let h = TestHarness::new();
        let mut ids = vec!["A1", "B2"];
        ids.insert(position, "ZZ");
        let order_id = OrderId::generate();

        let err = h
            .orchestrator
            .create_order_with_id(order_id.clone(), TestHarness::cart(&ids))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            OrchestratorError::ItemNotFound {
                order_id: order_id.clone(),
                item_id: ItemId::new("ZZ"),
            }
        );
        assert_eq!(h.store.order_count().await, 0);
        let confirmation = h.orchestrator.locate_order(&order_id).await.unwrap();
        assert!(!confirmation.is_found());
    }
}

#[tokio::test]
async fn test_concurrent_mode_persists_nothing_on_failure() {
    let h = TestHarness::with_config(OrchestratorConfig {
        lookup_mode: LookupMode::Concurrent,
        ..OrchestratorConfig::default()
    });

    let err = h
        .orchestrator
        .create_order(TestHarness::cart(&["A1", "ZZ", "B2"]))
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestratorError::ItemNotFound { .. }));
    assert_eq!(h.store.order_count().await, 0);
}

#[tokio::test]
async fn test_locate_emits_exactly_one_event_per_call() {
    let h = TestHarness::new();
    let order = h
        .orchestrator
        .create_order(TestHarness::cart(&["A1"]))
        .await
        .unwrap();

    let found = h.orchestrator.locate_order(&order.id).await.unwrap();
    assert_eq!(found.event.kind, NotificationKind::OrderFound);
    assert_eq!(h.publisher.published_count(), 1);

    let missing_id = OrderId::generate();
    let missing = h.orchestrator.locate_order(&missing_id).await.unwrap();
    assert_eq!(missing.event.kind, NotificationKind::OrderNotFound);
    assert_eq!(
        missing.into_order().unwrap_err(),
        OrchestratorError::ResourceNotFound(missing_id)
    );

    let kinds: Vec<NotificationKind> = h.publisher.published().iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![NotificationKind::OrderFound, NotificationKind::OrderNotFound]
    );
}

#[tokio::test]
async fn test_replace_lines_discards_old_lines() {
    let h = TestHarness::new();
    let order = h
        .orchestrator
        .create_order(TestHarness::cart(&["A1", "B2", "C3"]))
        .await
        .unwrap();

    let replacement = vec![CartLine::new("D4", "Ruler", 3, 250)];
    h.orchestrator
        .replace_lines(&order.id, replacement.clone())
        .await
        .unwrap();

    let stored = h.orchestrator.get_order(&order.id).await.unwrap();
    assert_eq!(stored.lines, replacement);
    assert_eq!(stored.created_at, order.created_at);
}

#[tokio::test]
async fn test_replace_lines_on_missing_id_leaves_store_untouched() {
    let h = TestHarness::new();
    let existing = h
        .orchestrator
        .create_order(TestHarness::cart(&["A1"]))
        .await
        .unwrap();

    let missing = OrderId::generate();
    let err = h
        .orchestrator
        .replace_lines(&missing, vec![CartLine::new("B2", "", 1, 1)])
        .await
        .unwrap_err();

    assert_eq!(err, OrchestratorError::ResourceNotFound(missing));
    assert_eq!(h.orchestrator.list_orders().await.unwrap(), vec![existing]);
}

#[tokio::test]
async fn test_retry_after_outage_creates_one_order() {
    let h = TestHarness::new();
    let order_id = OrderId::generate();
    let cart = TestHarness::cart(&["A1", "B2"]);

    h.inventory.set_unavailable_for(Some(ItemId::new("B2")));
    let err = h
        .orchestrator
        .create_order_with_id(order_id.clone(), cart.clone())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OrchestratorError::UpstreamUnavailable { ref order_id, .. } if order_id.as_str().len() == 24
    ));
    assert_eq!(h.store.order_count().await, 0);

    h.inventory.set_unavailable_for(None);
    let order = h
        .orchestrator
        .create_order_with_id(order_id.clone(), cart.clone())
        .await
        .unwrap();
    assert_eq!(order.id, order_id);

    // A retry whose first attempt actually landed.
    let err = h
        .orchestrator
        .create_order_with_id(order_id.clone(), cart)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        OrchestratorError::AlreadyExists {
            order_id: order_id.clone()
        }
    );
    assert_eq!(h.store.order_count().await, 1);
}

#[tokio::test]
async fn test_slow_inventory_hits_rpc_deadline() {
    let h = TestHarness::with_config(OrchestratorConfig {
        rpc_timeout: Duration::from_millis(50),
        ..OrchestratorConfig::default()
    });
    h.inventory.set_latency(Some(Duration::from_millis(500)));

    let started = Instant::now();
    let err = h
        .orchestrator
        .create_order(TestHarness::cart(&["A1", "B2"]))
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestratorError::UpstreamUnavailable { .. }));
    assert!(started.elapsed() < Duration::from_millis(400));
    assert_eq!(h.inventory.lookup_count(), 1);
    assert_eq!(h.store.order_count().await, 0);
}

#[tokio::test]
async fn test_slow_store_hits_store_deadline() {
    let h = TestHarness::with_config(OrchestratorConfig {
        store_timeout: Duration::from_millis(50),
        ..OrchestratorConfig::default()
    });
    h.store.set_latency(Some(Duration::from_millis(500)));

    let err = h
        .orchestrator
        .create_order(TestHarness::cart(&["A1"]))
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestratorError::StorageUnavailable(_)));
}

#[tokio::test]
async fn test_dropped_request_stops_remaining_lookups() {
    let h = TestHarness::new();
    h.inventory.set_latency(Some(Duration::from_millis(100)));

    let outcome = tokio::time::timeout(
        Duration::from_millis(30),
        h.orchestrator
            .create_order(TestHarness::cart(&["A1", "B2", "C3"])),
    )
    .await;
    assert!(outcome.is_err());

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(h.inventory.lookup_count(), 1);
    assert_eq!(h.store.order_count().await, 0);
}

#[tokio::test]
async fn test_slow_event_log_does_not_delay_locate() {
    let store = InMemoryOrderStore::new();
    let inventory = InMemoryInventoryGateway::with_items([Item::new("A1", "Notebook", 10, "5")]);
    let log = InMemoryEventLog::new();
    log.set_latency(Some(Duration::from_secs(2)));
    let (publisher, _worker) = ChannelPublisher::spawn(log.clone(), DeliveryConfig::default());
    let orchestrator = OrderOrchestrator::new(store, inventory, publisher);

    let order = orchestrator
        .create_order(TestHarness::cart(&["A1"]))
        .await
        .unwrap();

    let started = Instant::now();
    for _ in 0..5 {
        let confirmation = orchestrator.locate_order(&order.id).await.unwrap();
        assert!(confirmation.enqueued);
    }
    assert!(started.elapsed() < Duration::from_millis(500));
    assert!(log.is_empty());
}

#[tokio::test]
async fn test_items_added_later_are_visible() {
    let h = TestHarness::new();
    h.inventory
        .create(Item::new("E5", "Stapler", 2, "99 руб."))
        .await
        .unwrap();

    let order = h
        .orchestrator
        .create_order(TestHarness::cart(&["E5"]))
        .await
        .unwrap();

    assert_eq!(order.lines[0].price, 99);
    assert_eq!(order.lines[0].quantity, 2);
}
