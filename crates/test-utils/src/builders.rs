#![allow(dead_code)]

use tickdag::dag::Step;

/// Builder for step lists to simplify test setup.
pub struct WorkflowBuilder {
    steps: Vec<Step>,
}

impl WorkflowBuilder {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Add a step with the given successors.
    pub fn step(mut self, id: &str, next: &[&str]) -> Self {
        self.steps.push(Step::new(id, next.iter().copied()));
        self
    }

    /// Add a step with no successors.
    pub fn leaf(mut self, id: &str) -> Self {
        self.steps.push(Step::leaf(id));
        self
    }

    pub fn build(self) -> Vec<Step> {
        self.steps
    }
}

impl Default for WorkflowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A linear chain `ids[0] -> ids[1] -> ... -> ids[n-1]`.
pub fn chain(ids: &[&str]) -> Vec<Step> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| match ids.get(i + 1) {
            Some(next) => Step::new(*id, [*next]),
            None => Step::leaf(*id),
        })
        .collect()
}
