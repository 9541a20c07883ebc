// crates/server/src/lib.rs
//! radfetch server library.
//!
//! Axum-based HTTP surface for the report automation service: submit a run,
//! poll its status document, download the finished report. All shared
//! mutability lives behind the single-slot `JobRegistry`; the browser
//! automation itself sits behind the `StepExecutor` trait from
//! `radfetch-core`.

pub mod error;
pub mod executor;
pub mod jobs;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use executor::SimulatedExecutor;
pub use routes::api_routes;
pub use state::AppState;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Create the Axum application with all routes and middleware.
///
/// This sets up:
/// - API routes (health, run, status, download)
/// - CORS for development (allows any origin)
/// - Request tracing
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api_routes(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Like `create_app`, additionally serving the UI bundle from `static_dir`
/// for any non-API path.
pub fn create_app_with_static(state: Arc<AppState>, static_dir: Option<PathBuf>) -> Router {
    let app = create_app(state);
    match static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app,
    }
}

// ============================================================================
// Integration Tests
// ============================================================================
