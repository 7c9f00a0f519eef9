//! Server side of the inventory RPC gateway.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::directory::InventoryDirectory;
use crate::error::GatewayError;
use crate::gateway::{InventoryGateway, LocalInventoryGateway};
use crate::rpc::{
    CREATE_PATH, DELETE_PATH, GET_ITEM_PATH, IdRequest, ItemReply, ItemRequest, RpcStatus,
    StatusReply, UPDATE_PATH,
};

type SharedGateway<D> = Arc<LocalInventoryGateway<D>>;

/// Builds the RPC router serving `directory`.
pub fn router<D: InventoryDirectory + 'static>(directory: D) -> Router {
    let gateway: SharedGateway<D> = Arc::new(LocalInventoryGateway::new(directory));

    Router::new()
        .route(GET_ITEM_PATH, post(get_item::<D>))
        .route(CREATE_PATH, post(create::<D>))
        .route(UPDATE_PATH, post(update::<D>))
        .route(DELETE_PATH, post(delete::<D>))
        .with_state(gateway)
        .layer(TraceLayer::new_for_http())
}

/// Error half of every handler: status from the code, `RpcStatus` body.
pub struct RpcFailure(GatewayError);

impl IntoResponse for RpcFailure {
    fn into_response(self) -> Response {
        let status = RpcStatus::from(&self.0);
        if matches!(self.0, GatewayError::Internal(_) | GatewayError::Unavailable(_)) {
            tracing::error!(error = %self.0, "inventory rpc failed");
        }
        (status.code.http_status(), Json(status)).into_response()
    }
}

impl From<GatewayError> for RpcFailure {
    fn from(err: GatewayError) -> Self {
        RpcFailure(err)
    }
}

#[tracing::instrument(skip(gateway, req), fields(item_id = %req.id))]
async fn get_item<D: InventoryDirectory + 'static>(
    State(gateway): State<SharedGateway<D>>,
    Json(req): Json<IdRequest>,
) -> Result<Json<ItemReply>, RpcFailure> {
    metrics::counter!("inventory_rpc_requests_total", "method" => "GetItem").increment(1);
    match gateway.get_item(&req.id).await {
        Ok(item) => {
            tracing::info!("item sent");
            Ok(Json(ItemReply { item: item.into() }))
        }
        Err(e) => {
            tracing::info!(error = %e, "item lookup failed");
            Err(e.into())
        }
    }
}

#[tracing::instrument(skip(gateway, req), fields(item_id = %req.item.id))]
async fn create<D: InventoryDirectory + 'static>(
    State(gateway): State<SharedGateway<D>>,
    Json(req): Json<ItemRequest>,
) -> Result<Json<StatusReply>, RpcFailure> {
    metrics::counter!("inventory_rpc_requests_total", "method" => "Create").increment(1);
    gateway.create(req.item.into()).await?;
    tracing::info!("item created");
    Ok(Json(StatusReply::ok("success created")))
}

#[tracing::instrument(skip(gateway, req), fields(item_id = %req.item.id))]
async fn update<D: InventoryDirectory + 'static>(
    State(gateway): State<SharedGateway<D>>,
    Json(req): Json<ItemRequest>,
) -> Result<Json<StatusReply>, RpcFailure> {
    metrics::counter!("inventory_rpc_requests_total", "method" => "Update").increment(1);
    gateway.update(req.item.into()).await?;
    tracing::info!("item updated");
    Ok(Json(StatusReply::ok("success updated")))
}

#[tracing::instrument(skip(gateway, req), fields(item_id = %req.id))]
async fn delete<D: InventoryDirectory + 'static>(
    State(gateway): State<SharedGateway<D>>,
    Json(req): Json<IdRequest>,
) -> Result<Json<StatusReply>, RpcFailure> {
    metrics::counter!("inventory_rpc_requests_total", "method" => "Delete").increment(1);
    gateway.delete(&req.id).await?;
    tracing::info!("item deleted");
    Ok(Json(StatusReply::ok("success deleted")))
}
