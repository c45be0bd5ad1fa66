//! Core library entry for the `drover` task runner.
//!
//! A [`TaskProvider`] lists its tasks as [`TaskDescriptor`]s; the runner
//! turns each one into a subcommand, parses the process arguments against
//! it and maps the task's [`ExitSignal`] to an exit status.

pub mod adapters;
pub mod bootstrap;
pub mod cli;
pub mod command;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod ports;
pub mod report;
pub mod script;
pub mod task;

pub use bootstrap::Runner;
pub use context::{DiagnosticLevel, RunContext};
pub use error::RunnerError;
pub use task::{
    ExitSignal, Invocation, OptionsSpec, Outcome, ParamKind, TaskDescriptor, TaskFault,
    TaskProvider, Value,
};

/// Run the CLI against the current directory with the provided arguments.
///
/// Returns the exit status the process should terminate with.
pub fn run<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    match RunContext::live() {
        Ok(ctx) => Runner::new(ctx).run(args),
        Err(err) => {
            eprintln!("could not determine the working directory: {err}");
            1
        }
    }
}
