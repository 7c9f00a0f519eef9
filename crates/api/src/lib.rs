//! HTTP order service with observability.
//!
//! Provides REST endpoints that create, read, confirm, update and delete
//! orders through the [`orchestrator`] crate, with structured logging
//! (tracing) and Prometheus metrics.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use inventory::{InMemoryInventoryGateway, InventoryGateway};
use metrics_exporter_prometheus::PrometheusHandle;
use notifications::{EventPublisher, InMemoryPublisher};
use orchestrator::OrchestratorConfig;
use order_store::{InMemoryOrderStore, OrderStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/orders",
            post(routes::orders::create).get(routes::orders::list),
        )
        .route(
            "/orders/{id}",
            get(routes::orders::get)
                .put(routes::orders::replace_lines)
                .delete(routes::orders::delete),
        )
        .route("/orders/{id}/confirm", post(routes::orders::confirm))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// In-memory collaborators behind a default state, for tests and local runs.
#[derive(Clone, Default)]
pub struct InMemoryBackends {
    pub store: InMemoryOrderStore,
    pub inventory: InMemoryInventoryGateway,
    pub publisher: InMemoryPublisher,
}

/// Creates application state over fresh in-memory collaborators.
pub fn create_default_state() -> (Arc<AppState>, InMemoryBackends) {
    create_state_with(InMemoryBackends::default(), OrchestratorConfig::default())
}

/// Creates application state over the given in-memory collaborators.
pub fn create_state_with(
    backends: InMemoryBackends,
    config: OrchestratorConfig,
) -> (Arc<AppState>, InMemoryBackends) {
    let store: Arc<dyn OrderStore> = Arc::new(backends.store.clone());
    let inventory: Arc<dyn InventoryGateway> = Arc::new(backends.inventory.clone());
    let publisher: Arc<dyn EventPublisher> = Arc::new(backends.publisher.clone());
    let state = Arc::new(AppState::new(store, inventory, publisher, config));
    (state, backends)
}
