//! Cross-cutting assertions over a final workflow state.

use tickdag::dag::{Step, StepState, WorkflowState};

/// Assert the structural invariants every finished workflow must satisfy:
///
/// - every declared step has exactly one state entry
/// - no step is left `RUNNING`
/// - completed/failed steps carry `finished > start` clock values
///   (waiting steps carry none, by construction of the state type)
/// - for every completed step, each of its dependencies completed no
///   later than the step started
pub fn assert_workflow_consistency(steps: &[Step], state: &WorkflowState) {
    assert_eq!(
        state.len(),
        steps.len(),
        "every declared step must have exactly one state entry"
    );
    for step in steps {
        assert!(
            state.get(&step.id).is_some(),
            "missing state for step '{}'",
            step.id
        );
    }

    for (id, st) in state.iter() {
        match st {
            StepState::Running { .. } => panic!("step '{id}' left RUNNING in final state"),
            StepState::Completed {
                start_clock,
                finished_clock,
            }
            | StepState::Failed {
                start_clock,
                finished_clock,
            } => {
                assert!(
                    finished_clock > start_clock,
                    "step '{id}' finished at {finished_clock} but started at {start_clock}"
                );
            }
            StepState::Waiting => {}
        }
    }

    // Dependency law: a step can only have completed if everything that
    // lists it in `next` completed first.
    for step in steps {
        let Some(StepState::Completed { start_clock, .. }) = state.get(&step.id) else {
            continue;
        };

        for dep in steps {
            if !dep.next.contains(&step.id) {
                continue;
            }
            match state.get(&dep.id) {
                Some(StepState::Completed { finished_clock, .. }) => {
                    assert!(
                        finished_clock <= start_clock,
                        "step '{}' started at {start_clock} before dependency '{}' finished at {finished_clock}",
                        step.id,
                        dep.id
                    );
                }
                other => panic!(
                    "step '{}' completed but its dependency '{}' ended as {other:?}",
                    step.id, dep.id
                ),
            }
        }
    }
}
