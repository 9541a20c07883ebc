// crates/server/src/jobs/mod.rs
//! Job orchestration for the report automation workflow.
//!
//! - `Job` — per-step state machine and aggregate progress for one run
//! - `JobRegistry` — single-slot, lock-guarded holder of the live job
//! - `status::project` — pure derivation of the polled status document
//! - `runner` — background task driving the step executor

pub mod job;
pub mod registry;
pub mod runner;
pub mod status;

pub use job::{Job, JobError, JobId, StepState};
pub use registry::{JobRegistry, RegistryError};
pub use status::{project, JobStatus, StepStatus};
