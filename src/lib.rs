// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod exec;
pub mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::WorkflowFile;
use crate::dag::{StepGraph, StepState, StepStatus, WorkflowState};
use crate::exec::CommandExecutor;

pub use crate::dag::{Step, StepId, Tick, execute_workflow};
pub use crate::exec::{StepExecutor, StepOutcome};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - workflow file loading + validation
/// - the command executor
/// - the tick scheduler
/// - the final per-step report
pub async fn run(args: CliArgs) -> Result<()> {
    let workflow_path = PathBuf::from(&args.workflow);
    let workflow = load_and_validate(&workflow_path)?;

    if args.dry_run {
        print_dry_run(&workflow);
        return Ok(());
    }

    let steps = workflow.to_steps();
    let executor = Arc::new(CommandExecutor::new(workflow.commands()));

    let state = dag::execute_workflow(steps, executor).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print_report(&state);
    }

    let failed = state.count(StepStatus::Failed);
    let blocked = state.count(StepStatus::Waiting);
    if !state.all_completed() {
        bail!("{failed} step(s) failed, {blocked} blocked");
    }

    Ok(())
}

/// Compute workflow roots (steps no other step lists in `next`).
fn root_steps(workflow: &WorkflowFile) -> Vec<StepId> {
    let steps = workflow.to_steps();
    let graph = StepGraph::from_steps(&steps);
    steps
        .iter()
        .filter(|s| graph.indegree_of(&s.id) == Some(0))
        .map(|s| s.id.clone())
        .collect()
}

/// Simple dry-run output: print steps, successors and commands.
fn print_dry_run(workflow: &WorkflowFile) {
    println!("tickdag dry-run");
    println!();

    println!("steps ({}):", workflow.len());
    for (id, step) in workflow.steps() {
        println!("  - {id}");
        println!("      cmd: {}", step.cmd);
        if !step.next.is_empty() {
            println!("      next: {:?}", step.next);
        }
    }

    println!();
    println!("roots: {:?}", root_steps(workflow));

    debug!("dry-run complete (no execution)");
}

/// Render the final per-step report, ordered by start tick then id so
/// the timeline reads top to bottom.
fn print_report(state: &WorkflowState) {
    let mut rows: Vec<(&StepId, &StepState)> = state.iter().collect();
    rows.sort_by_key(|(id, st)| (st.start_clock().unwrap_or(Tick::MAX), (*id).clone()));

    println!("{:<24} {:<10} {:>5} {:>8}", "step", "status", "start", "finished");
    for (id, st) in rows {
        let start = clock_cell(st.start_clock());
        let finished = clock_cell(st.finished_clock());
        println!("{:<24} {:<10} {:>5} {:>8}", id, st.status(), start, finished);
    }
}

fn clock_cell(clock: Option<Tick>) -> String {
    match clock {
        Some(c) => c.to_string(),
        None => "-".to_string(),
    }
}
