//! First-run scaffolding of a stub provider file.

use crate::context::RunContext;
use crate::error::RunnerError;
use crate::ports::console::Style;
use crate::task::{ExitSignal, Invocation, TaskDescriptor, TaskFault, TaskProvider};

/// Conventional provider file looked up in the working directory.
pub const PROVIDER_FILE: &str = "Droverfile.yaml";

/// Provider name expected inside [`PROVIDER_FILE`].
pub const PROVIDER_NAME: &str = "Droverfile";

/// Contents written by `init` and the first-run prompt.
#[must_use]
pub fn stub() -> String {
    format!(
        "# Console commands configuration for the drover task runner.\n\
         #\n\
         # Every entry under `tasks` becomes a subcommand, for example:\n\
         #\n\
         #   - name: hello\n\
         #     summary: Say hello\n\
         #     args:\n\
         #       - name: who\n\
         #         default: world\n\
         #     run: echo Hello, {{{{who}}}}\n\
         {PROVIDER_NAME}:\n  tasks: []\n"
    )
}

/// Writes the stub provider file into the context root.
///
/// Returns `false` without writing when the file already exists.
///
/// # Errors
///
/// Returns [`RunnerError::Write`] when the file cannot be written.
pub fn write_stub(ctx: &RunContext) -> Result<bool, RunnerError> {
    let path = ctx.root().join(PROVIDER_FILE);
    if ctx.fs.exists(&path) {
        return Ok(false);
    }
    ctx.fs
        .write(&path, &stub())
        .map_err(|e| RunnerError::Write { path: path.clone(), message: e.to_string() })?;
    tracing::info!(path = %path.display(), "stub provider written");
    ctx.console.writeln(&format!("{PROVIDER_FILE} created"), Style::Success);
    Ok(true)
}

/// Offers to create the stub provider file and acts on the answer.
///
/// # Errors
///
/// Returns an error when the console cannot be read or the file cannot be
/// written.
pub fn offer(ctx: &RunContext) -> Result<(), RunnerError> {
    ctx.console.writeln(
        &format!("  {PROVIDER_FILE} nor .drover.yaml were found in this dir"),
        Style::Comment,
    );
    let answer = ctx
        .console
        .ask(&format!("  Should I create {PROVIDER_FILE} here? (y/n)  \n"))
        .map_err(|e| RunnerError::Console(e.to_string()))?;
    if answer.trim().eq_ignore_ascii_case("y") {
        write_stub(ctx)?;
    }
    Ok(())
}

/// Provider exposing only the built-in `init` task.
///
/// Used as the fallback application when a provider file fails to define
/// its provider.
pub struct InitProvider;

impl TaskProvider for InitProvider {
    fn name(&self) -> &str {
        "drover"
    }

    fn tasks(&self) -> Vec<TaskDescriptor> {
        vec![TaskDescriptor::new("init").summary(&format!("Create {PROVIDER_FILE} here"))]
    }

    fn invoke(&self, _call: &Invocation, ctx: &RunContext) -> Result<ExitSignal, TaskFault> {
        match write_stub(ctx) {
            Ok(true) => Ok(ExitSignal::Success(true)),
            Ok(false) => {
                ctx.warn(&format!("{PROVIDER_FILE} already exists"));
                Ok(ExitSignal::Success(false))
            }
            Err(err) => Err(TaskFault::new(err.to_string())),
        }
    }
}
