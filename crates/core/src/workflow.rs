// crates/core/src/workflow.rs
//! The ordered step sequence a report run walks through.
//!
//! The workflow is fixed per deployment and per job: steps are defined
//! before execution starts, and their ids are order-significant.

/// Identifier of a single workflow step, unique within a workflow.
pub type StepId = u32;

/// Static definition of one workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSpec {
    pub id: StepId,
    pub label: &'static str,
}

/// An ordered, fixed sequence of steps.
///
/// Ids must be strictly increasing; the job state machine relies on this
/// to attribute progress deterministically.
#[derive(Debug, Clone)]
pub struct Workflow {
    steps: Vec<StepSpec>,
}

impl Workflow {
    pub fn new(steps: Vec<StepSpec>) -> Self {
        debug_assert!(
            steps.windows(2).all(|w| w[0].id < w[1].id),
            "workflow step ids must be strictly increasing"
        );
        Self { steps }
    }

    pub fn steps(&self) -> &[StepSpec] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The final step, if the workflow has any steps at all.
    pub fn last(&self) -> Option<&StepSpec> {
        self.steps.last()
    }

    pub fn contains(&self, id: StepId) -> bool {
        self.steps.iter().any(|s| s.id == id)
    }
}

/// The production workflow for fetching the radiologist productivity report
/// from the portal.
pub fn report_workflow() -> Workflow {
    Workflow::new(vec![
        StepSpec { id: 1, label: "Validating input" },
        StepSpec { id: 2, label: "Launching browser" },
        StepSpec { id: 3, label: "Opening login page" },
        StepSpec { id: 4, label: "Logging in" },
        StepSpec { id: 5, label: "Opening Analytics" },
        StepSpec { id: 6, label: "Opening Reports" },
        StepSpec { id: 7, label: "Selecting Physician Productivity Report" },
        StepSpec { id: 8, label: "Selecting Radiologist Report" },
        StepSpec { id: 9, label: "Setting date parameters" },
        StepSpec { id: 10, label: "Setting radiologist = Current User" },
        StepSpec { id: 11, label: "Creating report" },
        StepSpec { id: 12, label: "Waiting for generated report link" },
        StepSpec { id: 13, label: "Downloading .xls" },
        StepSpec { id: 14, label: "Saving file" },
        StepSpec { id: 15, label: "Done" },
    ])
}
