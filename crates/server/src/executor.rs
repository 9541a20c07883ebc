// crates/server/src/executor.rs
//! Simulated step executor for local development and demos.
//!
//! The production browser driver is an external collaborator implementing
//! `StepExecutor`; this stand-in paces through the workflow with short
//! sleeps and writes a stub spreadsheet on the final step so the full
//! submit → poll → download loop can be exercised without a browser.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;

use radfetch_core::{
    ReportArtifact, RunContext, StepExecutor, StepFailure, StepOutput, StepSpec,
};

/// Stub spreadsheet content; enough for the download path to stream bytes.
const STUB_REPORT: &[u8] = b"radfetch simulated report\n";

pub struct SimulatedExecutor {
    step_delay: Duration,
}

impl SimulatedExecutor {
    pub fn new(step_delay: Duration) -> Self {
        Self { step_delay }
    }
}

#[async_trait]
impl StepExecutor for SimulatedExecutor {
    async fn run_step(&self, step: &StepSpec, ctx: &RunContext) -> Result<StepOutput, StepFailure> {
        tokio::time::sleep(self.step_delay).await;

        let is_last = ctx.workflow.last().map(|s| s.id) == Some(step.id);
        if !is_last {
            return Ok(StepOutput::advanced());
        }

        if ctx.request.debug {
            // Debug trace is best-effort; its failure never fails the run.
            let trace = ctx.artifacts_dir.join(format!("trace_{}.log", ctx.job_id));
            if let Err(e) = write_file(&trace, b"simulated trace\n").await {
                tracing::debug!(path = %trace.display(), error = %e, "could not write debug trace");
            }
        }

        let file_name = report_file_name(
            &ctx.request.start_date,
            &ctx.request.end_date,
            &Local::now().format("%Y%m%d_%H%M%S").to_string(),
        );
        let path = ctx.downloads_dir.join(&file_name);
        write_file(&path, STUB_REPORT)
            .await
            .map_err(|e| StepFailure::new(format!("Saving report file failed: {e}")))?;

        Ok(StepOutput::with_artifact(ReportArtifact { file_name, path }))
    }
}

async fn write_file(path: &std::path::Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await
}

/// Display name of the produced report, matching the portal tool's naming:
/// date slashes become dashes, suffixed with a second-resolution timestamp.
fn report_file_name(start_date: &str, end_date: &str, timestamp: &str) -> String {
    let start = start_date.replace('/', "-");
    let end = end_date.replace('/', "-");
    format!("medvet_radiologist_report_{start}_{end}_{timestamp}.xls")
}

#[cfg(test)]
mod tests {
    use super::*;
    use radfetch_core::{RunRequest, StepSpec, Workflow};
    use std::sync::Arc;

    #[test]
    fn test_report_file_name() {
        assert_eq!(
            report_file_name("01/01/2024", "01/31/2024", "20240201_120000"),
            "medvet_radiologist_report_01-01-2024_01-31-2024_20240201_120000.xls"
        );
    }

    fn ctx(dir: &std::path::Path, debug: bool) -> RunContext {
        RunContext {
            job_id: "testjob".to_string(),
            workflow: Workflow::new(vec![
                StepSpec { id: 1, label: "first" },
                StepSpec { id: 2, label: "last" },
            ]),
            request: RunRequest {
                username: "u".to_string(),
                password: "p".to_string(),
                start_date: "2024-01-01".to_string(),
                end_date: "2024-01-31".to_string(),
                debug,
            },
            downloads_dir: dir.join("downloads"),
            artifacts_dir: dir.join("artifacts"),
        }
    }

    #[tokio::test]
    async fn test_intermediate_step_yields_no_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        let executor = SimulatedExecutor::new(Duration::ZERO);
        let ctx = ctx(tmp.path(), false);
        let output = executor
            .run_step(&StepSpec { id: 1, label: "first" }, &ctx)
            .await
            .unwrap();
        assert!(output.artifact.is_none());
    }

    #[tokio::test]
    async fn test_final_step_writes_stub_report() {
        let tmp = tempfile::tempdir().unwrap();
        let executor = SimulatedExecutor::new(Duration::ZERO);
        let ctx = ctx(tmp.path(), false);
        let output = executor
            .run_step(&StepSpec { id: 2, label: "last" }, &ctx)
            .await
            .unwrap();

        let artifact = output.artifact.expect("final step produces artifact");
        assert!(artifact.file_name.starts_with("medvet_radiologist_report_"));
        assert!(artifact.file_name.ends_with(".xls"));
        let bytes = std::fs::read(&artifact.path).unwrap();
        assert_eq!(bytes, STUB_REPORT);
    }

    #[tokio::test]
    async fn test_debug_run_writes_trace() {
        let tmp = tempfile::tempdir().unwrap();
        let executor = SimulatedExecutor::new(Duration::ZERO);
        let ctx = ctx(tmp.path(), true);
        executor
            .run_step(&StepSpec { id: 2, label: "last" }, &ctx)
            .await
            .unwrap();
        assert!(tmp.path().join("artifacts").join("trace_testjob.log").exists());
    }

    #[tokio::test]
    async fn test_usable_as_trait_object() {
        let executor: Arc<dyn StepExecutor> = Arc::new(SimulatedExecutor::new(Duration::ZERO));
        let tmp = tempfile::tempdir().unwrap();
        let ctx = ctx(tmp.path(), false);
        assert!(executor
            .run_step(&StepSpec { id: 1, label: "first" }, &ctx)
            .await
            .is_ok());
    }
}
