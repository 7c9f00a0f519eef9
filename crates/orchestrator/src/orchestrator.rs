//! Order orchestrator.

use std::future::Future;
use std::time::{Duration, Instant};

use common::{ItemId, OrderId};
use domain::{Cart, CartLine, NotificationEvent, Order};
use futures_util::future::try_join_all;
use inventory::{GatewayError, InventoryGateway};
use notifications::EventPublisher;
use order_store::OrderStore;

use crate::config::{LookupMode, OrchestratorConfig};
use crate::error::{OrchestratorError, Result};

/// Outcome of a confirmation lookup.
///
/// `event` is the notification that was produced for the lookup; `enqueued`
/// tells whether the publisher accepted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub order_id: OrderId,
    pub order: Option<Order>,
    pub event: NotificationEvent,
    pub enqueued: bool,
}

impl Confirmation {
    pub fn is_found(&self) -> bool {
        self.order.is_some()
    }

    /// The located order, or `ResourceNotFound`.
    pub fn into_order(self) -> Result<Order> {
        self.order
            .ok_or(OrchestratorError::ResourceNotFound(self.order_id))
    }
}

/// Coordinates inventory, the order store and the notification publisher.
///
/// Holds no per-request state; one instance serves concurrent requests.
pub struct OrderOrchestrator<S, G, P>
where
    S: OrderStore,
    G: InventoryGateway,
    P: EventPublisher,
{
    store: S,
    inventory: G,
    publisher: P,
    config: OrchestratorConfig,
}

impl<S, G, P> OrderOrchestrator<S, G, P>
where
    S: OrderStore,
    G: InventoryGateway,
    P: EventPublisher,
{
    /// Creates an orchestrator with default deadlines.
    pub fn new(store: S, inventory: G, publisher: P) -> Self {
        Self::with_config(store, inventory, publisher, OrchestratorConfig::default())
    }

    pub fn with_config(store: S, inventory: G, publisher: P, config: OrchestratorConfig) -> Self {
        Self {
            store,
            inventory,
            publisher,
            config,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Prices `cart` against inventory and persists it under a fresh id.
    pub async fn create_order(&self, cart: Cart) -> Result<Order> {
        validate_cart(&cart)?;
        self.create_order_with_id(OrderId::generate(), cart).await
    }

    /// Prices `cart` against inventory and persists it under `order_id`.
    ///
    /// Every line is looked up before anything is written; the order is then
    /// stored in a single insert. Any lookup failure aborts creation with
    /// nothing persisted. Dropping the returned future before it completes
    /// cancels the outstanding lookups and skips the write.
    ///
    /// Retrying with the same id after a failure whose outcome is unknown is
    /// safe: a write that did land is reported as `AlreadyExists`.
    #[tracing::instrument(skip(self, cart), fields(order_id = %order_id, lines = cart.lines.len()))]
    pub async fn create_order_with_id(&self, order_id: OrderId, cart: Cart) -> Result<Order> {
        let started = Instant::now();
        let result = self.price_and_store(order_id, cart).await;

        metrics::histogram!("order_creation_duration_seconds")
            .record(started.elapsed().as_secs_f64());
        match &result {
            Ok(order) => {
                metrics::counter!("orders_created_total").increment(1);
                tracing::info!(total = order.total(), "order created");
            }
            Err(e) => {
                metrics::counter!("order_creation_failed_total", "reason" => failure_label(e))
                    .increment(1);
                tracing::warn!(error = %e, "order creation failed");
            }
        }
        result
    }

    async fn price_and_store(&self, order_id: OrderId, cart: Cart) -> Result<Order> {
        validate_cart(&cart)?;

        let lines = match self.config.lookup_mode {
            LookupMode::Sequential => {
                let mut priced = Vec::with_capacity(cart.lines.len());
                for line in cart.lines {
                    priced.push(self.price_line(&order_id, line).await?);
                }
                priced
            }
            LookupMode::Concurrent => {
                try_join_all(
                    cart.lines
                        .into_iter()
                        .map(|line| self.price_line(&order_id, line)),
                )
                .await?
            }
        };

        let order = Order::new(order_id, lines);
        self.with_store_deadline(self.store.insert(&order)).await?;
        Ok(order)
    }

    /// Replaces the line's quantity and price with the inventory record.
    async fn price_line(&self, order_id: &OrderId, line: CartLine) -> Result<CartLine> {
        let lookup = self.inventory.get_item(&line.item_id);
        let item = match tokio::time::timeout(self.config.rpc_timeout, lookup).await {
            Ok(Ok(item)) => item,
            Ok(Err(e)) => {
                metrics::counter!("inventory_lookups_total", "outcome" => "error").increment(1);
                return Err(lookup_error(order_id, &line.item_id, e));
            }
            Err(_) => {
                metrics::counter!("inventory_lookups_total", "outcome" => "timeout").increment(1);
                return Err(OrchestratorError::UpstreamUnavailable {
                    order_id: order_id.clone(),
                    reason: format!(
                        "lookup of item {} exceeded {}",
                        line.item_id,
                        describe(self.config.rpc_timeout)
                    ),
                });
            }
        };
        metrics::counter!("inventory_lookups_total", "outcome" => "found").increment(1);

        let item_id = line.item_id.clone();
        line.priced(&item)
            .map_err(|e| OrchestratorError::MalformedItem {
                order_id: order_id.clone(),
                item_id,
                reason: e.to_string(),
            })
    }

    /// Looks an order up for confirmation and publishes the matching
    /// notification.
    ///
    /// Exactly one event is handed to the publisher per call that reaches the
    /// store: "Order found" or "Order not found". The handoff never waits for
    /// delivery, and a rejected handoff is logged without failing the call.
    /// When the store itself fails, no event is produced.
    #[tracing::instrument(skip(self), fields(order_id = %order_id))]
    pub async fn locate_order(&self, order_id: &OrderId) -> Result<Confirmation> {
        let order = self
            .with_store_deadline(self.store.find_by_id(order_id))
            .await?;

        let (event, outcome) = match &order {
            Some(_) => (NotificationEvent::order_found(order_id), "found"),
            None => (NotificationEvent::order_not_found(order_id), "not_found"),
        };
        metrics::counter!("order_lookups_total", "outcome" => outcome).increment(1);

        let enqueued = match self.publisher.publish(&event) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, kind = %event.kind, "notification not enqueued");
                false
            }
        };

        Ok(Confirmation {
            order_id: order_id.clone(),
            order,
            event,
            enqueued,
        })
    }

    /// Reads an order without producing a notification.
    #[tracing::instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: &OrderId) -> Result<Order> {
        self.with_store_deadline(self.store.find_by_id(order_id))
            .await?
            .ok_or_else(|| OrchestratorError::ResourceNotFound(order_id.clone()))
    }

    /// All stored orders, oldest first.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        self.with_store_deadline(self.store.find_all()).await
    }

    /// Overwrites the whole line sequence of an existing order.
    ///
    /// Lines are stored as given, without re-pricing. Fails with
    /// `ResourceNotFound` when no order has this id; never creates one.
    #[tracing::instrument(skip(self, lines), fields(order_id = %order_id, lines = lines.len()))]
    pub async fn replace_lines(&self, order_id: &OrderId, lines: Vec<CartLine>) -> Result<()> {
        if let Some(line) = lines.iter().find(|line| line.item_id.is_blank()) {
            return Err(OrchestratorError::InvalidInput(format!(
                "line item id {:?} is blank",
                line.item_id.as_str()
            )));
        }

        let changed = self
            .with_store_deadline(self.store.replace_lines(order_id, lines))
            .await?;
        if changed == 0 {
            return Err(OrchestratorError::ResourceNotFound(order_id.clone()));
        }
        metrics::counter!("orders_updated_total").increment(1);
        tracing::info!("order lines replaced");
        Ok(())
    }

    /// Removes an order.
    #[tracing::instrument(skip(self), fields(order_id = %order_id))]
    pub async fn delete_order(&self, order_id: &OrderId) -> Result<()> {
        let removed = self
            .with_store_deadline(self.store.delete(order_id))
            .await?;
        if removed == 0 {
            return Err(OrchestratorError::ResourceNotFound(order_id.clone()));
        }
        metrics::counter!("orders_deleted_total").increment(1);
        tracing::info!("order deleted");
        Ok(())
    }

    async fn with_store_deadline<T, F>(&self, call: F) -> Result<T>
    where
        F: Future<Output = order_store::Result<T>>,
    {
        match tokio::time::timeout(self.config.store_timeout, call).await {
            Ok(result) => result.map_err(OrchestratorError::from),
            Err(_) => {
                metrics::counter!("order_store_timeouts_total").increment(1);
                Err(OrchestratorError::StorageUnavailable(format!(
                    "order store did not answer within {}",
                    describe(self.config.store_timeout)
                )))
            }
        }
    }
}

fn validate_cart(cart: &Cart) -> Result<()> {
    if cart.is_empty() {
        return Err(OrchestratorError::InvalidInput(
            "cart has no lines".to_string(),
        ));
    }
    if let Some(position) = cart.lines.iter().position(|l| l.item_id.is_blank()) {
        return Err(OrchestratorError::InvalidInput(format!(
            "line {position} has a blank item id"
        )));
    }
    Ok(())
}

fn lookup_error(order_id: &OrderId, item_id: &ItemId, err: GatewayError) -> OrchestratorError {
    match err {
        GatewayError::NotFound(_) => OrchestratorError::ItemNotFound {
            order_id: order_id.clone(),
            item_id: item_id.clone(),
        },
        GatewayError::InvalidArgument(reason) => OrchestratorError::MalformedItem {
            order_id: order_id.clone(),
            item_id: item_id.clone(),
            reason,
        },
        other => OrchestratorError::UpstreamUnavailable {
            order_id: order_id.clone(),
            reason: other.to_string(),
        },
    }
}

fn failure_label(err: &OrchestratorError) -> &'static str {
    match err {
        OrchestratorError::InvalidInput(_) => "invalid_input",
        OrchestratorError::ItemNotFound { .. } => "item_not_found",
        OrchestratorError::UpstreamUnavailable { .. } => "upstream_unavailable",
        OrchestratorError::MalformedItem { .. } => "malformed_item",
        OrchestratorError::AlreadyExists { .. } => "already_exists",
        OrchestratorError::ResourceNotFound(_) => "not_found",
        OrchestratorError::StorageUnavailable(_) => "storage_unavailable",
    }
}

fn describe(deadline: Duration) -> String {
    format!("{}ms", deadline.as_millis())
}
