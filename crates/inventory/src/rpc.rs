//! Wire types for the inventory RPC protocol.
//!
//! Each method is a JSON `POST` to its own path. A successful call answers
//! `200` with the method's reply type; a failed call answers with a non-2xx
//! status and an [`RpcStatus`] body.

use axum::http::StatusCode;
use common::ItemId;
use domain::Item;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

pub const GET_ITEM_PATH: &str = "/rpc/inventory.v1.Inventory/GetItem";
pub const CREATE_PATH: &str = "/rpc/inventory.v1.Inventory/Create";
pub const UPDATE_PATH: &str = "/rpc/inventory.v1.Inventory/Update";
pub const DELETE_PATH: &str = "/rpc/inventory.v1.Inventory/Delete";

/// Request carrying only an item key (`GetItem`, `Delete`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRequest {
    pub id: ItemId,
}

/// Item as it travels on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMessage {
    pub id: ItemId,
    pub name: String,
    pub quantity: u32,
    pub price: String,
}

impl From<Item> for ItemMessage {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

impl From<ItemMessage> for Item {
    fn from(msg: ItemMessage) -> Self {
        Item {
            id: msg.id,
            name: msg.name,
            quantity: msg.quantity,
            price: msg.price,
        }
    }
}

/// Request carrying a full item (`Create`, `Update`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRequest {
    pub item: ItemMessage,
}

/// Reply to `GetItem`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReply {
    pub item: ItemMessage,
}

/// Reply to the mutating methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReply {
    pub flag: bool,
    pub message: String,
}

impl StatusReply {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            flag: true,
            message: message.into(),
        }
    }
}

/// Typed failure code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RpcCode {
    NotFound,
    AlreadyExists,
    InvalidArgument,
    Internal,
}

impl RpcCode {
    pub fn http_status(self) -> StatusCode {
        match self {
            RpcCode::NotFound => StatusCode::NOT_FOUND,
            RpcCode::AlreadyExists => StatusCode::CONFLICT,
            RpcCode::InvalidArgument => StatusCode::BAD_REQUEST,
            RpcCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Body of every failed call.
///
/// `id` names the item the failure concerns, when there is one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcStatus {
    pub code: RpcCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
}

impl RpcStatus {
    /// Converts a received status into the caller-side error.
    pub fn into_gateway_error(self, requested: &ItemId) -> GatewayError {
        let id = self.id.unwrap_or_else(|| requested.clone());
        match self.code {
            RpcCode::NotFound => GatewayError::NotFound(id),
            RpcCode::AlreadyExists => GatewayError::AlreadyExists(id),
            RpcCode::InvalidArgument => GatewayError::InvalidArgument(self.message),
            RpcCode::Internal => GatewayError::Internal(self.message),
        }
    }
}

impl From<&GatewayError> for RpcStatus {
    fn from(err: &GatewayError) -> Self {
        let (code, id) = match err {
            GatewayError::NotFound(id) => (RpcCode::NotFound, Some(id.clone())),
            GatewayError::AlreadyExists(id) => (RpcCode::AlreadyExists, Some(id.clone())),
            GatewayError::InvalidArgument(_) => (RpcCode::InvalidArgument, None),
            GatewayError::Unavailable(_) | GatewayError::Internal(_) => (RpcCode::Internal, None),
        };
        Self {
            code,
            message: err.to_string(),
            id,
        }
    }
}
