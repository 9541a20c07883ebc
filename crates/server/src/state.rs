// crates/server/src/state.rs
//! Application state for the Axum server.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use radfetch_core::{StepExecutor, Workflow};

use crate::jobs::JobRegistry;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// Single-slot registry holding the live job.
    pub jobs: JobRegistry,
    /// The fixed step sequence every job runs.
    pub workflow: Workflow,
    /// The automation collaborator performing the actual page work.
    pub executor: Arc<dyn StepExecutor>,
    /// Where finished report files are saved.
    pub downloads_dir: PathBuf,
    /// Where executors write failure diagnostics and debug traces.
    pub artifacts_dir: PathBuf,
}

impl AppState {
    /// Create a new application state wrapped in an Arc for sharing.
    pub fn new(
        workflow: Workflow,
        executor: Arc<dyn StepExecutor>,
        downloads_dir: PathBuf,
        artifacts_dir: PathBuf,
    ) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            jobs: JobRegistry::new(),
            workflow,
            executor,
            downloads_dir,
            artifacts_dir,
        })
    }

    /// Get the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use radfetch_core::{
        report_workflow, RunContext, StepFailure, StepOutput, StepSpec,
    };

    struct Noop;

    #[async_trait]
    impl StepExecutor for Noop {
        async fn run_step(
            &self,
            _step: &StepSpec,
            _ctx: &RunContext,
        ) -> Result<StepOutput, StepFailure> {
            Ok(StepOutput::advanced())
        }
    }

    #[tokio::test]
    async fn test_app_state_new() {
        let state = AppState::new(
            report_workflow(),
            Arc::new(Noop),
            PathBuf::from("downloads"),
            PathBuf::from("artifacts"),
        );
        assert!(state.uptime_secs() < 5);
        assert_eq!(state.workflow.len(), 15);
    }
}
