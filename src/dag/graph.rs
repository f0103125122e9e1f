// src/dag/graph.rs

//! Successor and in-degree map construction for a step list.

use std::collections::HashMap;

use crate::dag::step::{Step, StepId};

/// Dependency bookkeeping derived from the flat step list.
///
/// `successors` maps each declared step to the steps it unblocks and is
/// read-only during execution. `indegree` counts not-yet-satisfied
/// dependencies per step and is decremented by the scheduler as upstream
/// steps complete; a step becomes eligible to run exactly when its count
/// reaches zero.
#[derive(Debug, Clone)]
pub struct StepGraph {
    successors: HashMap<StepId, Vec<StepId>>,
    indegree: HashMap<StepId, usize>,
}

impl StepGraph {
    /// Build both maps in a single pass over the declared steps.
    ///
    /// Purely structural: an empty step list produces empty maps, and a
    /// successor id that was never declared still gets an in-degree entry.
    /// Callers that want to reject undeclared successors validate before
    /// building (see [`validate_steps`](crate::dag::validate_steps)).
    pub fn from_steps(steps: &[Step]) -> Self {
        let mut successors = HashMap::with_capacity(steps.len());
        let mut indegree: HashMap<StepId, usize> = HashMap::with_capacity(steps.len());

        for step in steps {
            successors.insert(step.id.clone(), step.next.clone());
            indegree.entry(step.id.clone()).or_insert(0);
            for succ in &step.next {
                *indegree.entry(succ.clone()).or_insert(0) += 1;
            }
        }

        Self {
            successors,
            indegree,
        }
    }

    /// Steps unblocked by the given step, in declaration order.
    pub fn successors_of(&self, id: &str) -> &[StepId] {
        self.successors
            .get(id)
            .map(|s| s.as_slice())
            .unwrap_or(&[])
    }

    /// Current count of unsatisfied dependencies for the given step.
    pub fn indegree_of(&self, id: &str) -> Option<usize> {
        self.indegree.get(id).copied()
    }

    /// Decrement the step's in-degree and return the new count.
    ///
    /// Only positive entries are decremented; returns `None` for unknown
    /// ids and for entries already at zero.
    pub(crate) fn decrement_indegree(&mut self, id: &str) -> Option<usize> {
        let count = self.indegree.get_mut(id)?;
        if *count == 0 {
            return None;
        }
        *count -= 1;
        Some(*count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_step_list_builds_empty_maps() {
        let graph = StepGraph::from_steps(&[]);
        assert_eq!(graph.indegree_of("anything"), None);
        assert!(graph.successors_of("anything").is_empty());
    }

    #[test]
    fn indegree_counts_incoming_edges() {
        let steps = vec![
            Step::new("a", ["c"]),
            Step::new("b", ["c"]),
            Step::leaf("c"),
        ];
        let graph = StepGraph::from_steps(&steps);

        assert_eq!(graph.indegree_of("a"), Some(0));
        assert_eq!(graph.indegree_of("b"), Some(0));
        assert_eq!(graph.indegree_of("c"), Some(2));
        assert_eq!(graph.successors_of("a"), ["c".to_string()]);
        assert!(graph.successors_of("c").is_empty());
    }

    #[test]
    fn undeclared_successor_still_gets_an_entry() {
        let steps = vec![Step::new("a", ["ghost"])];
        let graph = StepGraph::from_steps(&steps);
        assert_eq!(graph.indegree_of("ghost"), Some(1));
    }

    #[test]
    fn decrement_stops_at_zero() {
        let steps = vec![Step::new("a", ["b"]), Step::leaf("b")];
        let mut graph = StepGraph::from_steps(&steps);

        assert_eq!(graph.decrement_indegree("b"), Some(0));
        assert_eq!(graph.decrement_indegree("b"), None);
        assert_eq!(graph.decrement_indegree("missing"), None);
    }
}
