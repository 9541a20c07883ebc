// crates/core/src/executor.rs
//! The boundary behind which all page interaction lives.
//!
//! The orchestration core has zero knowledge of how a step is performed:
//! it hands the executor one step at a time and records the reported
//! outcome. This keeps the browser driver substitutable — production uses
//! a real driver, tests use a scripted fake, local development can use the
//! server's simulated executor.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::request::RunRequest;
use crate::workflow::{StepSpec, Workflow};

/// Everything an executor may need for one run, fixed at job creation.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Identifier of the owning job, used to name diagnostic captures.
    pub job_id: String,
    /// The workflow being executed (lets an executor recognize its final step).
    pub workflow: Workflow,
    /// The validated submission parameters, including the `debug` flag.
    pub request: RunRequest,
    /// Where the finished report file is saved.
    pub downloads_dir: PathBuf,
    /// Where failure screenshots, page dumps, and debug traces are written.
    pub artifacts_dir: PathBuf,
}

/// The file a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    /// Display name offered to the browser at download time.
    pub file_name: String,
    /// On-disk location; never exposed to the UI.
    pub path: PathBuf,
}

/// Result of one successfully executed step.
#[derive(Debug, Clone, Default)]
pub struct StepOutput {
    /// Set by the step that saves the report file; `None` for all others.
    pub artifact: Option<ReportArtifact>,
}

impl StepOutput {
    /// The step completed and the run moves on.
    pub fn advanced() -> Self {
        Self::default()
    }

    /// The step completed and produced the run's artifact.
    pub fn with_artifact(artifact: ReportArtifact) -> Self {
        Self { artifact: Some(artifact) }
    }
}

/// A named diagnostic capture produced on failure (screenshot, page dump,
/// debug trace). The core only logs the reference; content is the
/// executor's business.
#[derive(Debug, Clone)]
pub struct DiagnosticRef {
    pub name: String,
    pub path: PathBuf,
}

/// A failed step. The message is recorded verbatim as the job's error;
/// diagnostics are best-effort and never block error reporting.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct StepFailure {
    pub message: String,
    pub diagnostics: Vec<DiagnosticRef>,
}

impl StepFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), diagnostics: Vec::new() }
    }

    pub fn with_diagnostic(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.diagnostics.push(DiagnosticRef { name: name.into(), path: path.into() });
        self
    }
}

/// Performs one unit of automation work and reports the outcome.
///
/// Implementations may block for arbitrary real time (network and browser
/// I/O); the caller guarantees no job lock is held across `run_step`.
#[async_trait]
pub trait StepExecutor: Send + Sync {
    async fn run_step(&self, step: &StepSpec, ctx: &RunContext)
        -> Result<StepOutput, StepFailure>;
}
