//! Application configuration loaded from environment variables.

use std::time::Duration;

use notifications::DeliveryConfig;
use orchestrator::OrchestratorConfig;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: order service port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `DATABASE_URL`: PostgreSQL connection string; in-memory stores when unset
/// - `INVENTORY_RPC_URL`: remote inventory service; in-process inventory when unset
/// - `RPC_TIMEOUT_MS`: deadline per inventory call (default: `1000`)
/// - `STORE_TIMEOUT_MS`: deadline per order store call (default: `5000`)
/// - `NOTIFY_QUEUE_CAPACITY`: pending notification limit (default: `1024`)
/// - `INVENTORY_PORT`: port of the inventory RPC server (default: `50051`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub inventory_rpc_url: Option<String>,
    pub rpc_timeout: Duration,
    pub store_timeout: Duration,
    pub notify_queue_capacity: usize,
    pub inventory_port: u16,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// Unparseable numbers and empty strings fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let number = |key: &str| text(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            host: text("HOST").unwrap_or(defaults.host),
            port: number("PORT")
                .and_then(|p| u16::try_from(p).ok())
                .unwrap_or(defaults.port),
            log_level: text("RUST_LOG").unwrap_or(defaults.log_level),
            database_url: text("DATABASE_URL"),
            inventory_rpc_url: text("INVENTORY_RPC_URL"),
            rpc_timeout: number("RPC_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.rpc_timeout),
            store_timeout: number("STORE_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.store_timeout),
            notify_queue_capacity: number("NOTIFY_QUEUE_CAPACITY")
                .and_then(|c| usize::try_from(c).ok())
                .filter(|c| *c > 0)
                .unwrap_or(defaults.notify_queue_capacity),
            inventory_port: number("INVENTORY_PORT")
                .and_then(|p| u16::try_from(p).ok())
                .unwrap_or(defaults.inventory_port),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the `"host:port"` bind address of the inventory RPC server.
    pub fn inventory_addr(&self) -> String {
        format!("{}:{}", self.host, self.inventory_port)
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            rpc_timeout: self.rpc_timeout,
            store_timeout: self.store_timeout,
            ..OrchestratorConfig::default()
        }
    }

    pub fn delivery_config(&self) -> DeliveryConfig {
        DeliveryConfig {
            capacity: self.notify_queue_capacity,
            ..DeliveryConfig::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            database_url: None,
            inventory_rpc_url: None,
            rpc_timeout: Duration::from_secs(1),
            store_timeout: Duration::from_secs(5),
            notify_queue_capacity: 1024,
            inventory_port: 50051,
        }
    }
}
