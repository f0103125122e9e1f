// src/config/model.rs

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::dag::{Step, StepId};

/// Top-level workflow definition as read from a TOML file.
///
/// ```toml
/// [step.build]
/// cmd = "cargo build"
/// next = ["test", "lint"]
///
/// [step.test]
/// cmd = "cargo test"
///
/// [step.lint]
/// cmd = "cargo clippy"
/// ```
///
/// `next` points downstream: `test` and `lint` only become eligible to
/// run once `build` has completed successfully.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWorkflowFile {
    /// All steps from `[step.<name>]`, keyed by step id.
    #[serde(default)]
    pub step: BTreeMap<StepId, StepConfig>,
}

/// `[step.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StepConfig {
    /// The shell command to execute for this step.
    pub cmd: String,

    /// Ids of the steps this one unblocks on successful completion.
    #[serde(default)]
    pub next: Vec<StepId>,
}

/// A validated workflow definition.
///
/// Constructed via `TryFrom<RawWorkflowFile>` (see `validate.rs`), so
/// holders can rely on successor references resolving and the step DAG
/// being acyclic.
#[derive(Debug, Clone)]
pub struct WorkflowFile {
    step: BTreeMap<StepId, StepConfig>,
}

impl WorkflowFile {
    pub(crate) fn new_unchecked(step: BTreeMap<StepId, StepConfig>) -> Self {
        Self { step }
    }

    pub fn steps(&self) -> impl Iterator<Item = (&StepId, &StepConfig)> {
        self.step.iter()
    }

    pub fn len(&self) -> usize {
        self.step.len()
    }

    pub fn is_empty(&self) -> bool {
        self.step.is_empty()
    }

    /// Flatten into the scheduler's input step list, in id order.
    pub fn to_steps(&self) -> Vec<Step> {
        self.step
            .iter()
            .map(|(id, cfg)| Step::new(id.clone(), cfg.next.iter().cloned()))
            .collect()
    }

    /// Step id to command map for the command executor.
    pub fn commands(&self) -> HashMap<StepId, String> {
        self.step
            .iter()
            .map(|(id, cfg)| (id.clone(), cfg.cmd.clone()))
            .collect()
    }
}
