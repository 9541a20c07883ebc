// crates/server/src/routes/download.rs
//! Download endpoint: stream the finished report as an attachment.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio_util::io::ReaderStream;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/download/{job_id} - Stream the report file for a completed job.
///
/// Succeeds only once the job is `download_ready`; serving is a read-only
/// hand-off and never mutates or deletes the artifact.
pub async fn download_report(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> ApiResult<Response> {
    let (path, file_name) = state.jobs.artifact(&job_id)?;

    let file = tokio::fs::File::open(&path).await.map_err(|e| {
        tracing::error!(job_id = %job_id, path = %path.display(), error = %e, "report file missing");
        ApiError::ArtifactMissing
    })?;

    tracing::info!(job_id = %job_id, file_name = %file_name, "serving report download");
    let body = Body::from_stream(ReaderStream::new(file));
    let headers = [
        (header::CONTENT_TYPE, "application/vnd.ms-excel".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ),
    ];
    Ok((headers, body).into_response())
}

/// Build the download router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/download/{job_id}", get(download_report))
}
