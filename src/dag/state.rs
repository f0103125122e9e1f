// src/dag/state.rs

//! Per-step execution state and the final workflow state.

use std::collections::HashMap;

use serde::Serialize;

use crate::dag::step::StepId;

/// Logical clock value.
///
/// One tick corresponds to one batch of concurrently dispatched steps;
/// it expresses relative ordering, not wall-clock time.
pub type Tick = u64;

/// Execution state of a single step.
///
/// Transitions are strictly `Waiting -> Running -> Completed | Failed`,
/// never backward. A step blocked forever by an upstream failure simply
/// stays `Waiting` in the final state and carries no clock values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(
    tag = "status",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum StepState {
    Waiting,
    Running { start_clock: Tick },
    Completed { start_clock: Tick, finished_clock: Tick },
    Failed { start_clock: Tick, finished_clock: Tick },
}

impl StepState {
    pub fn status(&self) -> StepStatus {
        match self {
            StepState::Waiting => StepStatus::Waiting,
            StepState::Running { .. } => StepStatus::Running,
            StepState::Completed { .. } => StepStatus::Completed,
            StepState::Failed { .. } => StepStatus::Failed,
        }
    }

    /// Tick at which the step was dispatched, if it ever ran.
    pub fn start_clock(&self) -> Option<Tick> {
        match *self {
            StepState::Waiting => None,
            StepState::Running { start_clock }
            | StepState::Completed { start_clock, .. }
            | StepState::Failed { start_clock, .. } => Some(start_clock),
        }
    }

    /// Tick at which the step settled, if it reached a terminal outcome.
    pub fn finished_clock(&self) -> Option<Tick> {
        match *self {
            StepState::Waiting | StepState::Running { .. } => None,
            StepState::Completed { finished_clock, .. }
            | StepState::Failed { finished_clock, .. } => Some(finished_clock),
        }
    }
}

/// Status discriminant of a [`StepState`], without the clock payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepStatus {
    Waiting,
    Running,
    Completed,
    Failed,
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StepStatus::Waiting => "WAITING",
            StepStatus::Running => "RUNNING",
            StepStatus::Completed => "COMPLETED",
            StepStatus::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// Final (or in-progress) state of every declared step, keyed by id.
///
/// Every declared step has exactly one entry at all times; the scheduler
/// creates all entries as `Waiting` before the first tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WorkflowState {
    steps: HashMap<StepId, StepState>,
}

impl WorkflowState {
    /// Initialise every given step id as `Waiting`.
    pub(crate) fn with_waiting(ids: impl IntoIterator<Item = StepId>) -> Self {
        Self {
            steps: ids.into_iter().map(|id| (id, StepState::Waiting)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&StepState> {
        self.steps.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StepId, &StepState)> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of steps currently in the given status.
    pub fn count(&self, status: StepStatus) -> usize {
        self.steps.values().filter(|s| s.status() == status).count()
    }

    /// True when every declared step completed successfully.
    pub fn all_completed(&self) -> bool {
        self.steps
            .values()
            .all(|s| s.status() == StepStatus::Completed)
    }

    pub(crate) fn mark_running(&mut self, id: &str, start_clock: Tick) {
        if let Some(state) = self.steps.get_mut(id) {
            debug_assert_eq!(*state, StepState::Waiting);
            *state = StepState::Running { start_clock };
        }
    }

    pub(crate) fn mark_completed(&mut self, id: &str, start_clock: Tick, finished_clock: Tick) {
        if let Some(state) = self.steps.get_mut(id) {
            debug_assert!(matches!(state, StepState::Running { .. }));
            *state = StepState::Completed {
                start_clock,
                finished_clock,
            };
        }
    }

    pub(crate) fn mark_failed(&mut self, id: &str, start_clock: Tick, finished_clock: Tick) {
        if let Some(state) = self.steps.get_mut(id) {
            debug_assert!(matches!(state, StepState::Running { .. }));
            *state = StepState::Failed {
                start_clock,
                finished_clock,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialised_state_uses_clock_field_spelling() {
        let state = StepState::Completed {
            start_clock: 0,
            finished_clock: 1,
        };
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "COMPLETED",
                "startClock": 0,
                "finishedClock": 1,
            })
        );

        let waiting = serde_json::to_value(StepState::Waiting).unwrap();
        assert_eq!(waiting, serde_json::json!({ "status": "WAITING" }));
    }

    #[test]
    fn counts_and_success_predicate() {
        let mut state = WorkflowState::with_waiting(["a".to_string(), "b".to_string()]);
        assert_eq!(state.count(StepStatus::Waiting), 2);
        assert!(!state.all_completed());

        state.mark_running("a", 0);
        state.mark_completed("a", 0, 1);
        state.mark_running("b", 1);
        state.mark_failed("b", 1, 2);

        assert_eq!(state.count(StepStatus::Completed), 1);
        assert_eq!(state.count(StepStatus::Failed), 1);
        assert!(!state.all_completed());
    }
}
