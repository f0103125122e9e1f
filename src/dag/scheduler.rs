// src/dag/scheduler.rs

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::dag::graph::StepGraph;
use crate::dag::ready::ReadyQueue;
use crate::dag::state::{StepStatus, Tick, WorkflowState};
use crate::dag::step::Step;
use crate::errors::{Result, TickdagError};
use crate::exec::{StepExecutor, StepOutcome};

/// Tick-based scheduler for one workflow run.
///
/// Owns all scheduling state for the duration of a single run: the
/// successor/in-degree maps, the workflow state, and the logical clock.
/// Nothing here is shared with concurrently executing steps; they only
/// ever receive their own step id.
///
/// The loop per tick:
/// 1. record the tick's start clock, then advance the clock
/// 2. drain the entire ready queue into a batch
/// 3. mark every batch member `Running` and dispatch all of them
///    concurrently to the executor
/// 4. wait for the whole batch to settle (success *and* failure; no
///    short-circuit on first failure)
/// 5. record terminal states; successful steps decrement their
///    successors' in-degrees, queueing any that reach zero for the next
///    tick. Failed steps decrement nothing, so their dependents stay
///    `Waiting` forever.
///
/// The run ends when a drain produces an empty batch.
#[derive(Debug)]
pub struct TickScheduler {
    steps: Vec<Step>,
    graph: StepGraph,
    state: WorkflowState,
    clock: Tick,
}

impl TickScheduler {
    /// Validate the step list and build the dependency maps.
    ///
    /// Structural anomalies (duplicate ids, self-references, successors
    /// never declared as steps) are rejected here, before any scheduling
    /// begins; they are the only errors this module ever returns.
    pub fn new(steps: Vec<Step>) -> Result<Self> {
        validate_steps(&steps)?;

        let graph = StepGraph::from_steps(&steps);
        let state = WorkflowState::with_waiting(steps.iter().map(|s| s.id.clone()));

        Ok(Self {
            steps,
            graph,
            state,
            clock: 0,
        })
    }

    /// Drive the workflow to completion and return the final state of
    /// every declared step.
    pub async fn run(mut self, executor: Arc<dyn StepExecutor>) -> WorkflowState {
        info!(steps = self.steps.len(), "workflow run started");

        let mut ready = ReadyQueue::seeded(&self.steps, &self.graph);
        while !ready.is_empty() {
            self.run_tick(&mut ready, &executor).await;
        }

        info!(
            ticks = self.clock,
            completed = self.state.count(StepStatus::Completed),
            failed = self.state.count(StepStatus::Failed),
            blocked = self.state.count(StepStatus::Waiting),
            "workflow run finished"
        );

        self.state
    }

    async fn run_tick(&mut self, ready: &mut ReadyQueue, executor: &Arc<dyn StepExecutor>) {
        let start_clock = self.clock;
        self.clock += 1;

        let batch = ready.drain_batch();
        debug!(tick = start_clock, batch = ?batch, "dispatching tick batch");

        let mut handles = Vec::with_capacity(batch.len());
        for id in &batch {
            self.state.mark_running(id, start_clock);

            let exec = Arc::clone(executor);
            let step_id = id.clone();
            handles.push(tokio::spawn(async move { exec.execute(step_id).await }));
        }

        // Join barrier: every batch member must settle before the tick can
        // close, even when some finish much earlier than others.
        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            // A panicking executor counts as a failed step, not a crashed run.
            outcomes.push(handle.await.unwrap_or(StepOutcome::Failed(-1)));
        }

        let finished_clock = self.clock;
        for (id, outcome) in batch.iter().zip(outcomes) {
            match outcome {
                StepOutcome::Success => {
                    self.state.mark_completed(id, start_clock, finished_clock);
                    debug!(step = %id, tick = start_clock, "step completed");
                    self.unblock_successors(id, ready);
                }
                StepOutcome::Failed(code) => {
                    self.state.mark_failed(id, start_clock, finished_clock);
                    warn!(
                        step = %id,
                        tick = start_clock,
                        exit_code = code,
                        "step failed; dependents stay blocked"
                    );
                }
            }
        }
    }

    /// Decrement in-degrees of the completed step's successors, queueing
    /// any that become ready for the next tick.
    fn unblock_successors(&mut self, id: &str, ready: &mut ReadyQueue) {
        // Clone the successor list so we can mutate in-degrees while iterating.
        let successors = self.graph.successors_of(id).to_vec();

        for succ in successors {
            if let Some(remaining) = self.graph.decrement_indegree(&succ) {
                if remaining == 0 {
                    debug!(step = %succ, "dependencies satisfied; queueing for next tick");
                    ready.push(succ);
                }
            }
        }
    }
}

/// Execute a workflow to completion with the given executor.
///
/// This is the single library entry point: an ordered step list in, the
/// final per-step state out. The only error it returns is a structural
/// validation failure; individual step failures are reported through the
/// workflow state, never as an `Err`.
pub async fn execute_workflow(
    steps: Vec<Step>,
    executor: Arc<dyn StepExecutor>,
) -> Result<WorkflowState> {
    Ok(TickScheduler::new(steps)?.run(executor).await)
}

/// Structural validation of an input step list.
///
/// The graph builder itself is total, so anything that would leave the
/// scheduler holding a step it cannot run is rejected up front:
/// duplicate ids, steps listing themselves in `next`, and successors
/// never declared as steps. A pure sink must therefore be declared as a
/// real step with an empty `next` list.
pub fn validate_steps(steps: &[Step]) -> Result<()> {
    let mut declared: HashSet<&str> = HashSet::with_capacity(steps.len());
    for step in steps {
        if !declared.insert(step.id.as_str()) {
            return Err(TickdagError::DuplicateStep(step.id.clone()));
        }
    }

    for step in steps {
        for succ in &step.next {
            if *succ == step.id {
                return Err(TickdagError::InvalidWorkflow(format!(
                    "step '{}' lists itself in `next`",
                    step.id
                )));
            }
            if !declared.contains(succ.as_str()) {
                return Err(TickdagError::UnknownSuccessor {
                    step: step.id.clone(),
                    successor: succ.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_step_ids() {
        let steps = vec![Step::leaf("a"), Step::leaf("a")];
        let err = validate_steps(&steps).unwrap_err();
        assert!(matches!(err, TickdagError::DuplicateStep(id) if id == "a"));
    }

    #[test]
    fn rejects_undeclared_successors() {
        let steps = vec![Step::new("a", ["ghost"])];
        let err = validate_steps(&steps).unwrap_err();
        match err {
            TickdagError::UnknownSuccessor { step, successor } => {
                assert_eq!(step, "a");
                assert_eq!(successor, "ghost");
            }
            other => panic!("expected UnknownSuccessor, got {other:?}"),
        }
    }

    #[test]
    fn rejects_self_reference() {
        let steps = vec![Step::new("a", ["a"])];
        assert!(matches!(
            validate_steps(&steps).unwrap_err(),
            TickdagError::InvalidWorkflow(_)
        ));
    }

    #[test]
    fn empty_step_list_is_valid() {
        assert!(validate_steps(&[]).is_ok());
    }
}
