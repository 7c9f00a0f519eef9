//! Orchestrator deadlines and lookup strategy.

use std::time::Duration;

/// How cart lines are resolved against inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupMode {
    /// One lookup at a time, in cart order. Stops at the first failure.
    #[default]
    Sequential,
    /// All lookups in flight at once. The first failure aborts the rest;
    /// results are still assembled in cart order.
    Concurrent,
}

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Deadline for each individual inventory call.
    pub rpc_timeout: Duration,
    /// Deadline for each order store call.
    pub store_timeout: Duration,
    pub lookup_mode: LookupMode,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            rpc_timeout: Duration::from_secs(1),
            store_timeout: Duration::from_secs(5),
            lookup_mode: LookupMode::Sequential,
        }
    }
}
