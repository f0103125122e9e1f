// src/config/mod.rs

//! Workflow file loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a workflow file from disk (`loader.rs`).
//! - Validate successor references and acyclicity (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_workflow_path, load_and_validate, load_from_path};
pub use model::{RawWorkflowFile, StepConfig, WorkflowFile};
