// src/exec/command.rs

//! Shell-command step executor.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::dag::StepId;
use crate::exec::backend::{StepExecutor, StepOutcome};

/// Production executor: each step id maps to a shell command taken from
/// the workflow file.
///
/// A spawn failure or a non-zero exit is reported as a failed step; it
/// never surfaces as a scheduler error.
pub struct CommandExecutor {
    commands: HashMap<StepId, String>,
}

impl CommandExecutor {
    pub fn new(commands: HashMap<StepId, String>) -> Self {
        Self { commands }
    }

    async fn run_command(&self, step: &str) -> StepOutcome {
        let Some(cmd) = self.commands.get(step) else {
            // Workflow validation guarantees a command per declared step; a
            // miss here means the executor was wired to the wrong workflow.
            warn!(step = %step, "no command configured for step");
            return StepOutcome::Failed(-1);
        };

        info!(step = %step, cmd = %cmd, "starting step process");

        let mut command = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(cmd);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(cmd);
            c
        };

        command
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(err) => {
                warn!(step = %step, error = %err, "failed to spawn step process");
                return StepOutcome::Failed(-1);
            }
        };

        // Drain both pipes so the child never blocks on a full buffer.
        if let Some(stdout) = child.stdout.take() {
            spawn_pipe_logger(step.to_string(), "stdout", stdout);
        }
        if let Some(stderr) = child.stderr.take() {
            spawn_pipe_logger(step.to_string(), "stderr", stderr);
        }

        match child.wait().await {
            Ok(status) if status.success() => {
                info!(step = %step, "step process exited successfully");
                StepOutcome::Success
            }
            Ok(status) => {
                let code = status.code().unwrap_or(-1);
                warn!(step = %step, exit_code = code, "step process failed");
                StepOutcome::Failed(code)
            }
            Err(err) => {
                warn!(step = %step, error = %err, "failed waiting for step process");
                StepOutcome::Failed(-1)
            }
        }
    }
}

impl StepExecutor for CommandExecutor {
    fn execute(&self, step: StepId) -> Pin<Box<dyn Future<Output = StepOutcome> + Send + '_>> {
        Box::pin(async move { self.run_command(&step).await })
    }
}

fn spawn_pipe_logger<R>(step: String, stream: &'static str, pipe: R)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(pipe).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            debug!(step = %step, stream, "{}", line);
        }
    });
}
