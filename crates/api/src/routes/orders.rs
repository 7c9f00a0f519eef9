//! Order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use common::OrderId;
use domain::{Cart, CartLine, Order};
use inventory::InventoryGateway;
use notifications::EventPublisher;
use orchestrator::{OrchestratorConfig, OrderOrchestrator};
use order_store::OrderStore;

use crate::error::ApiError;

/// Orchestrator over runtime-selected collaborators.
pub type AppOrchestrator =
    OrderOrchestrator<Arc<dyn OrderStore>, Arc<dyn InventoryGateway>, Arc<dyn EventPublisher>>;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub orchestrator: AppOrchestrator,
}

impl AppState {
    pub fn new(
        store: Arc<dyn OrderStore>,
        inventory: Arc<dyn InventoryGateway>,
        publisher: Arc<dyn EventPublisher>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            orchestrator: OrderOrchestrator::with_config(store, inventory, publisher, config),
        }
    }
}

type SharedState = State<Arc<AppState>>;

/// Header carrying a caller-chosen order id for retryable creation.
pub const IDEMPOTENCY_KEY: &str = "idempotency-key";

/// POST /orders: price a cart against inventory and store it.
///
/// With an `Idempotency-Key` header the order is stored under that id, so a
/// retry after a failed attempt cannot create a second order.
#[tracing::instrument(skip(state, headers, body))]
pub async fn create(
    State(state): SharedState,
    headers: HeaderMap,
    body: Result<Json<Cart>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let Json(cart) = body?;
    let order = match idempotency_key(&headers)? {
        Some(order_id) => {
            state
                .orchestrator
                .create_order_with_id(order_id, cart)
                .await?
        }
        None => state.orchestrator.create_order(cart).await?,
    };
    Ok((StatusCode::CREATED, Json(order)))
}

fn idempotency_key(headers: &HeaderMap) -> Result<Option<OrderId>, ApiError> {
    let Some(value) = headers.get(IDEMPOTENCY_KEY) else {
        return Ok(None);
    };
    let key = value.to_str().map(str::trim).map_err(|_| {
        ApiError::BadRequest("Idempotency-Key must be visible ASCII".to_string())
    })?;
    if key.is_empty() {
        return Err(ApiError::BadRequest(
            "Idempotency-Key must not be blank".to_string(),
        ));
    }
    Ok(Some(OrderId::new(key)))
}

/// GET /orders: every stored order.
#[tracing::instrument(skip(state))]
pub async fn list(State(state): SharedState) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.orchestrator.list_orders().await?))
}

/// GET /orders/{id}: read an order without notifying.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): SharedState,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order = state.orchestrator.get_order(&OrderId::new(id)).await?;
    Ok(Json(order))
}

/// PUT /orders/{id}: replace the order's lines with the given array.
#[tracing::instrument(skip(state, body))]
pub async fn replace_lines(
    State(state): SharedState,
    Path(id): Path<String>,
    body: Result<Json<Vec<CartLine>>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(lines) = body?;
    state
        .orchestrator
        .replace_lines(&OrderId::new(id), lines)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /orders/{id}
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): SharedState,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.orchestrator.delete_order(&OrderId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /orders/{id}/confirm: look the order up and emit a notification
/// for the outcome.
#[tracing::instrument(skip(state))]
pub async fn confirm(
    State(state): SharedState,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let confirmation = state.orchestrator.locate_order(&OrderId::new(id)).await?;
    Ok(Json(confirmation.into_order()?))
}
