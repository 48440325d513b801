//! Application state for the attendance reconciliation API.

use std::sync::Arc;

use crate::config::{ConfigLoader, EngineConfig};

/// Shared application state.
///
/// Holds the engine configuration, shared read-only with every handler and
/// every reconciliation worker.
#[derive(Clone)]
pub struct AppState {
    config: Arc<EngineConfig>,
    workers: usize,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    ///
    /// Batches are spread across one worker per available CPU.
    pub fn new(loader: ConfigLoader) -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::with_workers(loader, workers)
    }

    /// Creates a new application state with an explicit worker count.
    pub fn with_workers(loader: ConfigLoader, workers: usize) -> Self {
        Self::from_config(loader.into_config(), workers)
    }

    /// Creates a new application state from an already-built configuration.
    pub fn from_config(config: EngineConfig, workers: usize) -> Self {
        Self {
            config: Arc::new(config),
            workers: workers.max(1),
        }
    }

    /// Returns the shared engine configuration.
    pub fn config(&self) -> &Arc<EngineConfig> {
        &self.config
    }

    /// Returns the number of reconciliation workers per request.
    pub fn workers(&self) -> usize {
        self.workers
    }
}
