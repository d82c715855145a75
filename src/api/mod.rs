//! REST API over a completed dispatch run.
//!
//! Endpoints:
//! - `GET /dispatch` — per-step results with optional hour range filtering
//! - `GET /summary` — dispatch parameters and aggregate figures
//! - `POST /allocate` — allocate an arbitrary demand series on demand

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::dispatch::summary::DispatchSummary;
use crate::dispatch::types::{DispatchConfig, DispatchResult};
use crate::runner::RunOutput;

pub use types::{AllocateRequest, ErrorResponse, StepRecord, SummaryResponse};

/// Immutable application state shared across all request handlers.
///
/// Built once after the run completes and wrapped in `Arc`; nothing is
/// mutated afterwards, so no locks are needed.
pub struct AppState {
    /// Dispatch parameters used for the run (and the default for `/allocate`).
    pub config: DispatchConfig,
    /// Aggregate figures for the run.
    pub summary: DispatchSummary,
    /// Per-step results.
    pub result: DispatchResult,
    /// State-of-charge trace aligned with `result`.
    pub soc: Vec<f64>,
    /// Upper bound on `/allocate` request length.
    pub max_steps: Option<usize>,
}

impl AppState {
    pub fn from_run(run: RunOutput, max_steps: Option<usize>) -> Self {
        Self {
            config: run.config,
            summary: run.summary,
            result: run.result,
            soc: run.soc,
            max_steps,
        }
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/dispatch", get(handlers::get_dispatch))
        .route("/summary", get(handlers::get_summary))
        .route("/allocate", post(handlers::post_allocate))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on http://{addr}");
    axum::serve(listener, app).await
}
