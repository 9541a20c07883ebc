// crates/server/src/jobs/registry.rs
//! Single-slot job registry.
//!
//! Exactly one job is live per process. The slot holds the most recent job
//! behind one mutex; every mutation and every status read goes through that
//! lock, so a reader can never observe a torn update (percent advanced but
//! the step state not yet). A finished job stays readable until the next
//! submission replaces it, at which point its id reads as not-found.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;
use uuid::Uuid;

use radfetch_core::{StepId, Workflow};

use super::job::{Job, JobError, JobId};
use super::status::{project, JobStatus};

/// Registry-level failures surfaced to the HTTP layer.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("a report job is already running")]
    AlreadyRunning,

    #[error("job not found: {0}")]
    NotFound(JobId),

    #[error("report file is not ready")]
    NotReady,

    #[error(transparent)]
    Job(#[from] JobError),
}

/// Process-wide holder of the one live (or most recently finished) job.
pub struct JobRegistry {
    slot: Mutex<Option<Job>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self { slot: Mutex::new(None) }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Job>> {
        match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("job slot lock poisoned; recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Create a new job with all steps pending.
    ///
    /// Fails with `AlreadyRunning` while the slot holds a non-terminal job.
    /// A finished job is superseded: its id becomes unreachable.
    pub fn create(&self, workflow: &Workflow, debug: bool) -> Result<JobId, RegistryError> {
        let mut slot = self.slot();
        if let Some(job) = slot.as_ref() {
            if !job.is_done() {
                return Err(RegistryError::AlreadyRunning);
            }
        }
        let id = Uuid::new_v4().simple().to_string();
        *slot = Some(Job::new(id.clone(), workflow, debug));
        Ok(id)
    }

    fn with_job<T>(
        &self,
        job_id: &str,
        f: impl FnOnce(&mut Job) -> Result<T, RegistryError>,
    ) -> Result<T, RegistryError> {
        let mut slot = self.slot();
        match slot.as_mut() {
            Some(job) if job.id() == job_id => f(job),
            _ => Err(RegistryError::NotFound(job_id.to_string())),
        }
    }

    pub fn begin_step(&self, job_id: &str, step_id: StepId) -> Result<(), RegistryError> {
        self.with_job(job_id, |job| Ok(job.begin_step(step_id)?))
    }

    pub fn finish_step(&self, job_id: &str, step_id: StepId) -> Result<(), RegistryError> {
        self.with_job(job_id, |job| Ok(job.finish_step(step_id)?))
    }

    /// Record a terminal failure with the executor's verbatim message.
    pub fn fail(&self, job_id: &str, message: &str) -> Result<(), RegistryError> {
        self.with_job(job_id, |job| Ok(job.fail(message)?))
    }

    /// Record terminal success and the artifact hand-off.
    pub fn complete(
        &self,
        job_id: &str,
        artifact_path: PathBuf,
        file_name: String,
    ) -> Result<(), RegistryError> {
        self.with_job(job_id, |job| Ok(job.complete(artifact_path, file_name)?))
    }

    /// Project the externally visible status document for one job.
    pub fn status(&self, job_id: &str) -> Result<JobStatus, RegistryError> {
        self.with_job(job_id, |job| Ok(project(job)))
    }

    /// Read-only hand-off of the artifact for download serving.
    pub fn artifact(&self, job_id: &str) -> Result<(PathBuf, String), RegistryError> {
        self.with_job(job_id, |job| {
            if !job.download_ready {
                return Err(RegistryError::NotReady);
            }
            match (&job.artifact_path, &job.file_name) {
                (Some(path), Some(name)) => Ok((path.clone(), name.clone())),
                _ => Err(RegistryError::NotReady),
            }
        })
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::job::StepState;
    use radfetch_core::{StepSpec, Workflow};

    fn workflow() -> Workflow {
        Workflow::new(vec![
            StepSpec { id: 1, label: "first" },
            StepSpec { id: 2, label: "second" },
        ])
    }

    fn finish(registry: &JobRegistry, id: &str) {
        for step in 1..=2 {
            registry.begin_step(id, step).unwrap();
            registry.finish_step(id, step).unwrap();
        }
        registry
            .complete(id, PathBuf::from("/tmp/r.xls"), "r.xls".to_string())
            .unwrap();
    }

    #[test]
    fn test_create_returns_fresh_pending_job() {
        let registry = JobRegistry::new();
        let id = registry.create(&workflow(), false).unwrap();
        let status = registry.status(&id).unwrap();
        assert_eq!(status.percent, 0);
        assert!(!status.done);
        assert!(status.steps.iter().all(|s| s.state == StepState::Pending));
    }

    #[test]
    fn test_second_create_rejected_while_live() {
        let registry = JobRegistry::new();
        let first = registry.create(&workflow(), false).unwrap();
        registry.begin_step(&first, 1).unwrap();

        assert!(matches!(
            registry.create(&workflow(), false),
            Err(RegistryError::AlreadyRunning)
        ));
        // The live job is unaffected by the rejected submission.
        let status = registry.status(&first).unwrap();
        assert_eq!(status.steps[0].state, StepState::Active);
    }

    #[test]
    fn test_create_supersedes_finished_job() {
        let registry = JobRegistry::new();
        let first = registry.create(&workflow(), false).unwrap();
        finish(&registry, &first);

        let second = registry.create(&workflow(), false).unwrap();
        assert_ne!(first, second);
        assert!(matches!(
            registry.status(&first),
            Err(RegistryError::NotFound(_))
        ));
        assert!(registry.status(&second).is_ok());
    }

    #[test]
    fn test_create_supersedes_failed_job() {
        let registry = JobRegistry::new();
        let first = registry.create(&workflow(), false).unwrap();
        registry.begin_step(&first, 1).unwrap();
        registry.fail(&first, "boom").unwrap();

        assert!(registry.create(&workflow(), false).is_ok());
    }

    #[test]
    fn test_unknown_id_not_found() {
        let registry = JobRegistry::new();
        assert!(matches!(
            registry.status("nope"),
            Err(RegistryError::NotFound(_))
        ));
        assert!(matches!(
            registry.begin_step("nope", 1),
            Err(RegistryError::NotFound(_))
        ));
        assert!(matches!(
            registry.artifact("nope"),
            Err(RegistryError::NotFound(_))
        ));
    }

    #[test]
    fn test_artifact_not_ready_before_completion() {
        let registry = JobRegistry::new();
        let id = registry.create(&workflow(), false).unwrap();
        assert!(matches!(registry.artifact(&id), Err(RegistryError::NotReady)));

        registry.begin_step(&id, 1).unwrap();
        registry.fail(&id, "boom").unwrap();
        // A failed job never becomes downloadable.
        assert!(matches!(registry.artifact(&id), Err(RegistryError::NotReady)));
    }

    #[test]
    fn test_artifact_after_completion() {
        let registry = JobRegistry::new();
        let id = registry.create(&workflow(), false).unwrap();
        finish(&registry, &id);

        let (path, name) = registry.artifact(&id).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/r.xls"));
        assert_eq!(name, "r.xls");
    }

    #[test]
    fn test_step_errors_pass_through() {
        let registry = JobRegistry::new();
        let id = registry.create(&workflow(), false).unwrap();
        assert!(matches!(
            registry.finish_step(&id, 1),
            Err(RegistryError::Job(JobError::NotActive(1)))
        ));
    }

    #[test]
    fn test_uuid_hex_job_ids() {
        let registry = JobRegistry::new();
        let id = registry.create(&workflow(), false).unwrap();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
