//! Application state for the HTTP server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::orchestrator::Orchestrator;

/// Shared application state
///
/// Read-only after startup; all per-document state lives in the vector store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RagConfig,
    orchestrator: Orchestrator,
}

impl AppState {
    /// Build providers from configuration
    pub fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing application state...");
        let orchestrator = Orchestrator::from_config(&config)?;
        Ok(Self::with_orchestrator(config, orchestrator))
    }

    /// Use an already wired orchestrator
    pub fn with_orchestrator(config: RagConfig, orchestrator: Orchestrator) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                orchestrator,
            }),
        }
    }

    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.inner.orchestrator
    }
}
