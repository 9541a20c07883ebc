// crates/server/src/routes/status.rs
//! Polling endpoint: project the live job's state into the wire document.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::error::ApiResult;
use crate::jobs::JobStatus;
use crate::state::AppState;

/// GET /api/status/{job_id} - Current status snapshot for one job.
///
/// Never blocks beyond the time to read in-memory state. Unknown or
/// superseded ids return 404.
pub async fn job_status(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobStatus>> {
    Ok(Json(state.jobs.status(&job_id)?))
}

/// Build the status router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/status/{job_id}", get(job_status))
}
