// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{RawWorkflowFile, WorkflowFile};
use crate::errors::Result;

/// Load a workflow file from a given path and return the raw
/// `RawWorkflowFile`.
///
/// This only performs TOML deserialization; it does **not** perform
/// semantic validation (successor references, acyclicity). Use
/// [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawWorkflowFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let workflow: RawWorkflowFile = toml::from_str(&contents)?;

    Ok(workflow)
}

/// Load a workflow file from path and run validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Checks for:
///   - empty commands,
///   - unknown or self-referencing `next` entries,
///   - cycles in the step DAG.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<WorkflowFile> {
    let raw = load_from_path(&path)?;
    let workflow = WorkflowFile::try_from(raw)?;
    Ok(workflow)
}

/// Helper to resolve a default workflow path.
///
/// Currently this just returns `Tickdag.toml` in the current working
/// directory.
pub fn default_workflow_path() -> PathBuf {
    PathBuf::from("Tickdag.toml")
}
