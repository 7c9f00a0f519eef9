//! Client side of the inventory RPC gateway.

use std::time::Duration;

use async_trait::async_trait;
use common::ItemId;
use domain::Item;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::GatewayError;
use crate::gateway::InventoryGateway;
use crate::rpc::{
    CREATE_PATH, DELETE_PATH, GET_ITEM_PATH, IdRequest, ItemReply, ItemRequest, RpcStatus,
    StatusReply, UPDATE_PATH,
};

/// Talks to a remote inventory service over the RPC protocol.
///
/// Every request carries the configured deadline; a request that cannot
/// complete in time, or cannot reach the server at all, surfaces as
/// `GatewayError::Unavailable`.
#[derive(Debug, Clone)]
pub struct RpcInventoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl RpcInventoryClient {
    /// Creates a client for the service at `base_url` (e.g. `http://inventory:50051`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Internal(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn call<Req, Reply>(
        &self,
        path: &str,
        subject: &ItemId,
        request: &Req,
    ) -> Result<Reply, GatewayError>
    where
        Req: Serialize + Sync,
        Reply: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            return response.json::<Reply>().await.map_err(transport_error);
        }

        let body = response.bytes().await.map_err(transport_error)?;
        match serde_json::from_slice::<RpcStatus>(&body) {
            Ok(rpc_status) => Err(rpc_status.into_gateway_error(subject)),
            Err(_) if status.is_client_error() => Err(GatewayError::InvalidArgument(format!(
                "inventory rejected request with {status}"
            ))),
            Err(_) => Err(GatewayError::Unavailable(format!(
                "inventory answered {status}"
            ))),
        }
    }
}

fn transport_error(err: reqwest::Error) -> GatewayError {
    GatewayError::Unavailable(err.to_string())
}

#[async_trait]
impl InventoryGateway for RpcInventoryClient {
    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn get_item(&self, id: &ItemId) -> Result<Item, GatewayError> {
        let reply: ItemReply = self
            .call(GET_ITEM_PATH, id, &IdRequest { id: id.clone() })
            .await?;
        Ok(reply.item.into())
    }

    #[tracing::instrument(skip(self, item), fields(item_id = %item.id))]
    async fn create(&self, item: Item) -> Result<(), GatewayError> {
        let id = item.id.clone();
        let _: StatusReply = self
            .call(CREATE_PATH, &id, &ItemRequest { item: item.into() })
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, item), fields(item_id = %item.id))]
    async fn update(&self, item: Item) -> Result<(), GatewayError> {
        let id = item.id.clone();
        let _: StatusReply = self
            .call(UPDATE_PATH, &id, &ItemRequest { item: item.into() })
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: &ItemId) -> Result<(), GatewayError> {
        let _: StatusReply = self
            .call(DELETE_PATH, id, &IdRequest { id: id.clone() })
            .await?;
        Ok(())
    }
}
