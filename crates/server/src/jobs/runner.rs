// crates/server/src/jobs/runner.rs
//! Background driver for one report run.
//!
//! Walks the workflow on a spawned task, delegating each step to the
//! executor and recording transitions through the registry. The executor
//! awaits happen with no job lock held; only the transitions themselves
//! are critical sections. Executor failures are captured as job state,
//! never propagated across the task boundary.

use std::sync::Arc;

use radfetch_core::{RunContext, RunRequest, StepOutput};

use crate::state::AppState;

use super::job::JobId;

/// Spawn the background run for a freshly created job and return
/// immediately. The submission handler never blocks on completion.
pub fn spawn(state: Arc<AppState>, job_id: JobId, request: RunRequest) {
    tokio::spawn(async move {
        run(state, job_id, request).await;
    });
}

async fn run(state: Arc<AppState>, job_id: JobId, request: RunRequest) {
    let ctx = RunContext {
        job_id: job_id.clone(),
        workflow: state.workflow.clone(),
        request,
        downloads_dir: state.downloads_dir.clone(),
        artifacts_dir: state.artifacts_dir.clone(),
    };

    let mut artifact = None;
    for step in state.workflow.steps() {
        if let Err(e) = state.jobs.begin_step(&job_id, step.id) {
            // Superseded or corrupted job; nothing left to report to.
            tracing::error!(job_id = %job_id, step_id = step.id, error = %e, "cannot begin step");
            return;
        }
        tracing::debug!(job_id = %job_id, step_id = step.id, label = step.label, "step started");

        match state.executor.run_step(step, &ctx).await {
            Ok(StepOutput { artifact: produced }) => {
                if let Some(a) = produced {
                    tracing::info!(
                        job_id = %job_id,
                        file_name = %a.file_name,
                        "step produced report artifact"
                    );
                    artifact = Some(a);
                }
                if let Err(e) = state.jobs.finish_step(&job_id, step.id) {
                    tracing::error!(job_id = %job_id, step_id = step.id, error = %e, "cannot finish step");
                    return;
                }
            }
            Err(failure) => {
                // Diagnostic references are best-effort notes; logging them
                // must never block the failure from being recorded.
                for d in &failure.diagnostics {
                    tracing::warn!(
                        job_id = %job_id,
                        step_id = step.id,
                        name = %d.name,
                        path = %d.path.display(),
                        "step failure diagnostic captured"
                    );
                }
                tracing::warn!(job_id = %job_id, step_id = step.id, error = %failure.message, "step failed");
                if let Err(e) = state.jobs.fail(&job_id, &failure.message) {
                    tracing::error!(job_id = %job_id, error = %e, "cannot record failure");
                }
                return;
            }
        }
    }

    match artifact {
        Some(a) => {
            if let Err(e) = state.jobs.complete(&job_id, a.path, a.file_name) {
                tracing::error!(job_id = %job_id, error = %e, "cannot record completion");
            } else {
                tracing::info!(job_id = %job_id, "report run complete");
            }
        }
        None => {
            let message = "Run finished without producing a report file.";
            tracing::error!(job_id = %job_id, message);
            if let Err(e) = state.jobs.fail(&job_id, message) {
                tracing::error!(job_id = %job_id, error = %e, "cannot record failure");
            }
        }
    }
}
