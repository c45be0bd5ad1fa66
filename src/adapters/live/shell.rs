//! Live shell executor attached to the terminal.

use std::process::{Command, Stdio};

use crate::ports::shell::{ShellExecutor, ShellOutput};

/// Runs commands through `sh -c` with the runner's own stdin, stdout and
/// stderr, so tasks can prompt and their output appears as it is written.
/// Nothing is captured.
pub struct LiveShellExecutor;

impl ShellExecutor for LiveShellExecutor {
    fn run(&self, command: &str) -> Result<ShellOutput, Box<dyn std::error::Error + Send + Sync>> {
        tracing::debug!(command, "spawning shell command");
        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        // Killed by a signal: no code to forward.
        let exit_code = status.code().unwrap_or(-1);
        tracing::debug!(command, exit_code, "shell command finished");
        Ok(ShellOutput { exit_code, stdout: String::new(), stderr: String::new() })
    }
}
