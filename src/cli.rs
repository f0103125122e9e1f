// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `tickdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tickdag",
    version,
    about = "Execute a DAG of steps and report per-step status and timing.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the workflow file (TOML).
    ///
    /// Default: `Tickdag.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Tickdag.toml")]
    pub workflow: String,

    /// Parse + validate, print the DAG, but don't execute any commands.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the final workflow state as JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TICKDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
