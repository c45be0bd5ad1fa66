//! The provider seam: where tasks come from and how they are called.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::Location;

use super::descriptor::TaskDescriptor;
use super::outcome::ExitSignal;
use super::value::Value;
use crate::context::RunContext;

/// Arguments for one task call, in the order the task declared them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    task: String,
    args: Vec<Value>,
    options: BTreeMap<String, Value>,
}

impl Invocation {
    /// Creates an invocation of `task`.
    #[must_use]
    pub fn new(task: &str, args: Vec<Value>, options: BTreeMap<String, Value>) -> Self {
        Self { task: task.to_string(), args, options }
    }

    /// The task being called.
    #[must_use]
    pub fn task(&self) -> &str {
        &self.task
    }

    /// Positional values.
    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Positional value at `index`, or `Null` past the end.
    #[must_use]
    pub fn arg(&self, index: usize) -> &Value {
        self.args.get(index).unwrap_or(&Value::Null)
    }

    /// Option values keyed by long name. Empty when the task has no options.
    #[must_use]
    pub fn options(&self) -> &BTreeMap<String, Value> {
        &self.options
    }

    /// Value of the option `long`, or `Null` if undeclared.
    #[must_use]
    pub fn option(&self, long: &str) -> &Value {
        self.options.get(long).unwrap_or(&Value::Null)
    }
}

/// An unrecoverable failure raised by a task.
///
/// Faults are never handled by the dispatcher; they travel up to the
/// shutdown reporter, which prints the message with the source location.
#[derive(Debug, Clone)]
pub struct TaskFault {
    message: String,
    location: &'static Location<'static>,
}

impl TaskFault {
    /// Creates a fault located at the caller.
    #[must_use]
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), location: Location::caller() }
    }

    /// The fault message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Where the fault was raised.
    #[must_use]
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

impl fmt::Display for TaskFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for TaskFault {}

/// A source of tasks.
///
/// Implementors list their tasks as descriptors and execute them by
/// name. The runner never inspects the implementing type itself.
pub trait TaskProvider {
    /// Provider name, used in diagnostics.
    fn name(&self) -> &str;

    /// Task descriptors in the order they should be listed.
    fn tasks(&self) -> Vec<TaskDescriptor>;

    /// Runs the task named by `call`.
    ///
    /// # Errors
    ///
    /// Returns a [`TaskFault`] when the task fails in a way that should
    /// abort the process rather than produce an exit status.
    fn invoke(&self, call: &Invocation, ctx: &RunContext) -> Result<ExitSignal, TaskFault>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_read_as_null() {
        let call = Invocation::new("build", vec![Value::from("a")], BTreeMap::new());

        assert_eq!(call.arg(0), &Value::from("a"));
        assert_eq!(call.arg(5), &Value::Null);
        assert_eq!(call.option("release"), &Value::Null);
    }

    #[test]
    fn fault_records_caller_location() {
        let fault = TaskFault::new("disk full");
        assert_eq!(fault.message(), "disk full");
        assert!(fault.location().file().ends_with("provider.rs"));
        assert_eq!(fault.to_string(), "disk full");
    }
}
