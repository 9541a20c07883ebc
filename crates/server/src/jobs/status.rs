// crates/server/src/jobs/status.rs
//! Pure projection of a job's internal state onto the polling contract.
//!
//! The projector recomputes the wire document from current state on every
//! call — there is no cached view to go stale. It never mutates the job.

use serde::Serialize;

use radfetch_core::StepId;

use super::job::{Job, StepState};

/// One step as rendered to the UI checklist.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct StepStatus {
    pub id: StepId,
    pub label: String,
    pub state: StepState,
}

/// The externally visible status document, polled once per second by the UI.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct JobStatus {
    pub percent: u8,
    pub current_step_id: Option<StepId>,
    pub steps: Vec<StepStatus>,
    pub done: bool,
    pub error: Option<String>,
    pub download_ready: bool,
    pub file_name: Option<String>,
}

/// Derive the status document from a job snapshot.
///
/// If more than one step is ever marked active (a state-machine bug), the
/// first in step order wins and the rest render as pending, so the UI never
/// sees an ambiguous checklist.
pub fn project(job: &Job) -> JobStatus {
    let mut first_active: Option<StepId> = None;
    let steps = job
        .steps
        .iter()
        .map(|s| {
            let state = if s.state == StepState::Active {
                if first_active.is_some() {
                    StepState::Pending
                } else {
                    first_active = Some(s.id);
                    StepState::Active
                }
            } else {
                s.state
            };
            StepStatus { id: s.id, label: s.label.to_string(), state }
        })
        .collect();

    JobStatus {
        percent: job.percent,
        current_step_id: first_active.or(job.current_step_id),
        steps,
        done: job.done,
        error: job.error.clone(),
        download_ready: job.download_ready,
        file_name: job.file_name.clone(),
    }
}
