// crates/server/src/routes/mod.rs
//! API route handlers for the radfetch server.

pub mod download;
pub mod health;
pub mod run;
pub mod status;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined API router with all routes under /api prefix.
///
/// Routes:
/// - GET  /api/health - Health check
/// - POST /api/run - Submit a report run, returns the job id
/// - GET  /api/status/{job_id} - Poll the job's status document
/// - GET  /api/download/{job_id} - Download the finished report
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router())
        .nest("/api", run::router())
        .nest("/api", status::router())
        .nest("/api", download::router())
        .with_state(state)
}
