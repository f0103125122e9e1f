// src/exec/backend.rs

//! Pluggable step executor abstraction.
//!
//! The scheduler needs exactly one capability from the outside world:
//! given a step id, perform the work and report success or failure. What
//! the work is, how long it takes, and what counts as failure are all up
//! to the implementation.
//!
//! - [`CommandExecutor`](super::command::CommandExecutor) is the
//!   production implementation, running one shell command per step.
//! - Tests inject deterministic executors that never touch a real
//!   process (see the `tickdag-test-utils` crate).

use std::future::Future;
use std::pin::Pin;

use crate::dag::StepId;

/// Result of executing a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Success,
    /// Failure with an exit code; `-1` for spawn-level failures.
    Failed(i32),
}

impl StepOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, StepOutcome::Success)
    }
}

/// Trait abstracting how a dispatched step performs its work.
///
/// The future resolves once the step has either succeeded or failed; a
/// step-level problem is always reported as [`StepOutcome::Failed`],
/// never as a panic or an error the scheduler would have to interpret.
pub trait StepExecutor: Send + Sync {
    fn execute(&self, step: StepId) -> Pin<Box<dyn Future<Output = StepOutcome> + Send + '_>>;
}
