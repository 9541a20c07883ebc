// crates/server/src/jobs/job.rs
//! Per-step state machine for one report run.
//!
//! Steps move `pending → active → {done | error}` and never revert. At most
//! one step is active at a time, and once the job is terminal (`done`) every
//! further transition is rejected, so a late executor callback can never
//! disturb a finished run.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use radfetch_core::{StepId, Workflow};

/// Opaque job identifier (uuid4 hex), unique for the process lifetime.
pub type JobId = String;

/// State of a single workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
#[serde(rename_all = "lowercase")]
pub enum StepState {
    Pending,
    Active,
    Done,
    Error,
}

/// One workflow step plus its live state.
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub id: StepId,
    pub label: &'static str,
    pub state: StepState,
}

/// Rejected step transitions. These indicate a misbehaving executor or a
/// callback arriving after the run ended; the job's state is left untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobError {
    #[error("job already reached a terminal state")]
    Terminal,

    #[error("unknown step id {0}")]
    UnknownStep(StepId),

    #[error("step {0} cannot start while step {1} is active")]
    StepAlreadyActive(StepId, StepId),

    #[error("step {0} is not pending")]
    NotPending(StepId),

    #[error("step {0} is not active")]
    NotActive(StepId),

    #[error("job still has unfinished steps")]
    StepsUnfinished,
}

/// Mutable state of one report run. All access is serialized by the
/// registry's lock; methods here are short critical sections only.
#[derive(Debug)]
pub struct Job {
    pub(crate) id: JobId,
    pub(crate) steps: Vec<StepRecord>,
    pub(crate) current_step_id: Option<StepId>,
    pub(crate) percent: u8,
    pub(crate) done: bool,
    pub(crate) error: Option<String>,
    pub(crate) download_ready: bool,
    pub(crate) file_name: Option<String>,
    pub(crate) artifact_path: Option<PathBuf>,
    pub(crate) debug: bool,
}

impl Job {
    pub fn new(id: JobId, workflow: &Workflow, debug: bool) -> Self {
        let steps = workflow
            .steps()
            .iter()
            .map(|s| StepRecord { id: s.id, label: s.label, state: StepState::Pending })
            .collect();
        Self {
            id,
            steps,
            current_step_id: None,
            percent: 0,
            done: false,
            error: None,
            download_ready: false,
            file_name: None,
            artifact_path: None,
            debug,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Whether verbose diagnostic capture was requested at creation.
    pub fn debug(&self) -> bool {
        self.debug
    }

    fn step_mut(&mut self, id: StepId) -> Result<&mut StepRecord, JobError> {
        self.steps
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(JobError::UnknownStep(id))
    }

    /// `pending → active`. Rejected while another step is active or after
    /// the job went terminal.
    pub fn begin_step(&mut self, id: StepId) -> Result<(), JobError> {
        if self.done {
            return Err(JobError::Terminal);
        }
        if let Some(active) = self.steps.iter().find(|s| s.state == StepState::Active) {
            return Err(JobError::StepAlreadyActive(id, active.id));
        }
        let step = self.step_mut(id)?;
        if step.state != StepState::Pending {
            return Err(JobError::NotPending(id));
        }
        step.state = StepState::Active;
        self.current_step_id = Some(id);
        Ok(())
    }

    /// `active → done`, advancing `percent` by the step's equal share.
    ///
    /// 100 is reserved for a job that completed with an artifact, so the
    /// step-derived value is capped at 99 until `complete` runs.
    pub fn finish_step(&mut self, id: StepId) -> Result<(), JobError> {
        if self.done {
            return Err(JobError::Terminal);
        }
        let total = self.steps.len();
        let step = self.step_mut(id)?;
        if step.state != StepState::Active {
            return Err(JobError::NotActive(id));
        }
        step.state = StepState::Done;
        let completed = self.steps.iter().filter(|s| s.state == StepState::Done).count();
        let pct = ((completed * 100) / total.max(1)) as u8;
        self.percent = self.percent.max(pct.min(99));
        Ok(())
    }

    /// Terminal failure. Marks the active step `error` (or the most recently
    /// begun step if the failure arrived between steps); later steps stay
    /// `pending` so the UI shows exactly where the run stopped.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), JobError> {
        if self.done {
            return Err(JobError::Terminal);
        }
        if let Some(active) = self.steps.iter_mut().find(|s| s.state == StepState::Active) {
            active.state = StepState::Error;
        } else if let Some(id) = self.current_step_id {
            if let Some(step) = self.steps.iter_mut().find(|s| s.id == id) {
                if step.state == StepState::Pending {
                    step.state = StepState::Error;
                }
            }
        }
        self.done = true;
        self.error = Some(message.into());
        Ok(())
    }

    /// Terminal success: every step is done and an artifact exists.
    pub fn complete(&mut self, artifact_path: PathBuf, file_name: String) -> Result<(), JobError> {
        if self.done {
            return Err(JobError::Terminal);
        }
        if self.steps.iter().any(|s| s.state != StepState::Done) {
            return Err(JobError::StepsUnfinished);
        }
        self.done = true;
        self.percent = 100;
        self.download_ready = true;
        self.file_name = Some(file_name);
        self.artifact_path = Some(artifact_path);
        Ok(())
    }
}
