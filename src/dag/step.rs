// src/dag/step.rs

//! Input step records for the scheduler.

/// Canonical step identifier type used throughout the crate.
pub type StepId = String;

/// A unit of work: a unique id plus the steps it unblocks on completion.
///
/// The `next` list points *downstream*: listing `"b"` in `a.next` means
/// `b` may not start until `a` has completed successfully. Steps are
/// immutable once handed to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub id: StepId,
    pub next: Vec<StepId>,
}

impl Step {
    pub fn new(id: impl Into<StepId>, next: impl IntoIterator<Item = impl Into<StepId>>) -> Self {
        Self {
            id: id.into(),
            next: next.into_iter().map(Into::into).collect(),
        }
    }

    /// A step with no successors.
    pub fn leaf(id: impl Into<StepId>) -> Self {
        Self {
            id: id.into(),
            next: Vec::new(),
        }
    }
}
