// src/config/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{RawWorkflowFile, WorkflowFile};
use crate::errors::{Result, TickdagError};

impl TryFrom<RawWorkflowFile> for WorkflowFile {
    type Error = TickdagError;

    fn try_from(raw: RawWorkflowFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_workflow(&raw)?;
        Ok(WorkflowFile::new_unchecked(raw.step))
    }
}

fn validate_raw_workflow(raw: &RawWorkflowFile) -> Result<()> {
    validate_commands(raw)?;
    validate_successors(raw)?;
    validate_dag(raw)?;
    Ok(())
}

fn validate_commands(raw: &RawWorkflowFile) -> Result<()> {
    for (id, step) in raw.step.iter() {
        if step.cmd.trim().is_empty() {
            return Err(TickdagError::InvalidWorkflow(format!(
                "step '{id}' has an empty `cmd`"
            )));
        }
    }
    Ok(())
}

fn validate_successors(raw: &RawWorkflowFile) -> Result<()> {
    for (id, step) in raw.step.iter() {
        for succ in step.next.iter() {
            if succ == id {
                return Err(TickdagError::InvalidWorkflow(format!(
                    "step '{id}' lists itself in `next`"
                )));
            }
            if !raw.step.contains_key(succ) {
                return Err(TickdagError::UnknownSuccessor {
                    step: id.clone(),
                    successor: succ.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Reject cyclic workflows before scheduling begins.
///
/// The scheduler itself would terminate on a cycle (the steps involved
/// simply never become ready and end up reported as waiting), but for a
/// workflow file that is always an authoring mistake, so it is caught
/// here with a named step instead.
fn validate_dag(raw: &RawWorkflowFile) -> Result<()> {
    // Edge direction: step -> successor.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for id in raw.step.keys() {
        graph.add_node(id.as_str());
    }

    for (id, step) in raw.step.iter() {
        for succ in step.next.iter() {
            graph.add_edge(id.as_str(), succ.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(TickdagError::DagCycle(format!(
                "cycle detected in step DAG involving step '{node}'"
            )))
        }
    }
}
