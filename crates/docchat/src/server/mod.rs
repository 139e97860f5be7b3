//! HTTP server for the orchestrator

pub mod routes;
pub mod state;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::RagConfig;
use crate::error::{Error, Result};
use state::AppState;

/// Orchestrator HTTP server
pub struct RagServer {
    config: RagConfig,
    state: AppState,
}

impl RagServer {
    /// Create a server with providers built from `config`
    pub fn new(config: RagConfig) -> Result<Self> {
        config.validate()?;
        let state = AppState::new(config.clone())?;
        Ok(Self { config, state })
    }

    /// Create a server around prepared state
    pub fn with_state(state: AppState) -> Result<Self> {
        state.config().validate()?;
        Ok(Self {
            config: state.config().clone(),
            state,
        })
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Start the server; also runs the collection sweeper when a TTL is set
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let sweeper = self.config.vector_db.collection_ttl().map(|ttl| {
            let interval = std::time::Duration::from_secs(self.config.vector_db.sweep_interval_secs);
            tracing::info!(
                "Collections expire after {}s (checked every {}s)",
                ttl.as_secs(),
                interval.as_secs()
            );
            self.state
                .orchestrator()
                .collections()
                .spawn_sweeper(ttl, interval)
        });

        let router = self.router();

        tracing::info!("Starting server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        let served = axum::serve(listener, router)
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)));

        if let Some(handle) = sweeper {
            handle.abort();
        }
        served
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Router over the given state; used by the server and by tests
pub fn build_router(state: AppState) -> Router {
    let config = state.config().clone();

    let router = Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness))
        .nest("/api", routes::api_routes(config.server.max_upload_size))
        .merge(routes::legacy_routes(config.server.max_upload_size))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.server.enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    }
}

/// Liveness endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness endpoint: 200 only when every upstream answers
async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let health = state.orchestrator().health().await;
    let status = if health.all_up() {
        StatusCode::OK
    } else {
        tracing::warn!("Readiness check failed: {:?}", health);
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "ready": health.all_up(),
            "providers": health,
        })),
    )
}
