// crates/server/src/routes/run.rs
//! Submission endpoint: validate, create the job, hand off to the runner.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

use radfetch_core::RunRequest;

use crate::error::{ApiError, ApiResult};
use crate::jobs::{runner, JobId};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct RunResponse {
    pub job_id: JobId,
}

/// POST /api/run - Submit a report run.
///
/// Validation happens before any job is created; a rejected submission
/// leaks no state. On success the background run is spawned and the
/// handler returns the job id immediately.
pub async fn run_report(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RunRequest>,
) -> ApiResult<Json<RunResponse>> {
    request.validate().map_err(ApiError::Validation)?;

    let job_id = state.jobs.create(&state.workflow, request.debug)?;
    tracing::info!(job_id = %job_id, debug = request.debug, "report job accepted");

    runner::spawn(Arc::clone(&state), job_id.clone(), request);
    Ok(Json(RunResponse { job_id }))
}

/// Build the submission router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/run", post(run_report))
}
