//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::debug;

use super::AppState;
use super::types::{AllocateRequest, ErrorResponse, RangeQuery, StepRecord, SummaryResponse};
use crate::dispatch::{allocate, allocate_bounded};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

/// Returns dispatch steps, optionally filtered by hour range.
///
/// `GET /dispatch` → 200 + `Vec<StepRecord>` JSON
/// `GET /dispatch?from=N&to=M` → steps with `N <= hour <= M`, in run order
/// `GET /dispatch?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_dispatch(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<StepRecord>>, ApiError> {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err(error(
            StatusCode::BAD_REQUEST,
            format!("`from` ({from}) must be <= `to` ({to})"),
        ));
    }

    let records = state
        .result
        .iter()
        .enumerate()
        .filter(|(_, s)| (from..=to).contains(&s.hour))
        .map(|(i, s)| StepRecord::new(s, state.soc.get(i).copied()))
        .collect();

    Ok(Json(records))
}

/// `GET /summary` → 200 + `SummaryResponse` JSON
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    Json(SummaryResponse {
        config: state.config,
        summary: state.summary.clone(),
    })
}

/// Allocates the posted demand series.
///
/// `POST /allocate` → 200 + steps JSON, or 422 + `ErrorResponse` when the
/// configuration or series is rejected.
pub async fn post_allocate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AllocateRequest>,
) -> impl IntoResponse {
    let config = req.config.unwrap_or(state.config);
    debug!(steps = req.demand.len(), "allocate request");

    let outcome = match state.max_steps {
        Some(max) => allocate_bounded(&req.demand, &config, max),
        None => allocate(&req.demand, &config),
    };

    outcome
        .map(Json)
        .map_err(|e| error(StatusCode::UNPROCESSABLE_ENTITY, e))
}
