// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TickdagError {
    #[error("Workflow definition error: {0}")]
    InvalidWorkflow(String),

    #[error("step '{step}' lists undeclared step '{successor}' in `next`")]
    UnknownSuccessor { step: String, successor: String },

    #[error("duplicate step id '{0}'")]
    DuplicateStep(String),

    #[error("Cycle detected in step DAG: {0}")]
    DagCycle(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TickdagError>;
