// tests/property_scheduler.rs

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use tickdag::dag::{Step, StepStatus, WorkflowState, execute_workflow};
use tickdag_test_utils::consistency::assert_workflow_consistency;
use tickdag_test_utils::fake_executor::FakeExecutor;

// Strategy to generate a valid DAG: acyclic by construction, because a
// step may only list higher-indexed steps in `next`. Roughly half the
// steps are named with the failing `fail_` prefix so runs exercise
// blocking as well as completion.
fn dag_strategy(max_steps: usize) -> impl Strategy<Value = Vec<Step>> {
    (1..=max_steps).prop_flat_map(|n| {
        let edges = proptest::collection::vec(proptest::collection::vec(any::<usize>(), 0..4), n);
        let fails = proptest::collection::vec(any::<bool>(), n);

        (edges, fails).prop_map(move |(edges, fails)| {
            let id = |i: usize| {
                if fails[i] {
                    format!("fail_{i}")
                } else {
                    format!("step_{i}")
                }
            };

            (0..n)
                .map(|i| {
                    let mut next = Vec::new();
                    let mut seen = HashSet::new();
                    let span = n - i - 1;
                    for raw in &edges[i] {
                        if span == 0 {
                            break;
                        }
                        let target = i + 1 + raw % span;
                        if seen.insert(target) {
                            next.push(id(target));
                        }
                    }
                    Step { id: id(i), next }
                })
                .collect::<Vec<Step>>()
        })
    })
}

/// All transitive successors of the given step.
fn descendants(steps: &[Step], root: &str) -> HashSet<String> {
    let by_id: HashMap<&str, &Step> = steps.iter().map(|s| (s.id.as_str(), s)).collect();

    let mut out = HashSet::new();
    let mut stack: Vec<&str> = by_id[root].next.iter().map(|s| s.as_str()).collect();
    while let Some(id) = stack.pop() {
        if out.insert(id.to_string()) {
            if let Some(step) = by_id.get(id) {
                stack.extend(step.next.iter().map(|s| s.as_str()));
            }
        }
    }
    out
}

async fn run_once(steps: Vec<Step>) -> WorkflowState {
    let executed = Arc::new(Mutex::new(Vec::new()));
    execute_workflow(steps, Arc::new(FakeExecutor::new(executed)))
        .await
        .expect("generated workflows are structurally valid")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_dags_satisfy_scheduler_invariants(steps in dag_strategy(8)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("tokio runtime");

        let state = rt.block_on(run_once(steps.clone()));
        assert_workflow_consistency(&steps, &state);

        // Anything downstream of a failed step must still be waiting.
        for step in &steps {
            if state.get(&step.id).map(|s| s.status()) == Some(StepStatus::Failed) {
                for blocked in descendants(&steps, &step.id) {
                    prop_assert_eq!(
                        state.get(&blocked).map(|s| s.status()),
                        Some(StepStatus::Waiting),
                        "step {} has failed ancestor {} but is not blocked",
                        blocked,
                        step.id
                    );
                }
            }
        }

        // Identical input and outcomes give an identical final state.
        let rerun = rt.block_on(run_once(steps.clone()));
        prop_assert_eq!(state, rerun);
    }
}
