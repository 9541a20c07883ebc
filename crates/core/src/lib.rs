// crates/core/src/lib.rs
//! Domain core for the radfetch report automation service.
//!
//! Defines what a report run *is* — the fixed workflow of steps, the
//! submission request and its validation rules, and the `StepExecutor`
//! boundary behind which all browser interaction lives. The server crate
//! owns the job state machine and HTTP surface on top of these types.

pub mod executor;
pub mod request;
pub mod workflow;

pub use executor::*;
pub use request::*;
pub use workflow::*;
