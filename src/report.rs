//! Shutdown reporting for faults that escape a task.

use std::panic::Location;

use crate::error::RunnerError;
use crate::ports::console::{Console, Style};

/// Formats a fault message with its source location.
#[must_use]
pub fn render_fault(message: &str, file: &str, line: u32) -> String {
    format!("ERROR: {message} \nin {file}:{line}\n")
}

/// Prints a run-ending error to the console.
///
/// Task faults are shown with the location they were raised at; every
/// other error is shown as a single line.
pub fn report(err: &RunnerError, console: &dyn Console) {
    match err {
        RunnerError::Fault(fault) => {
            let location = fault.location();
            console.writeln(
                &render_fault(fault.message(), location.file(), location.line()),
                Style::Error,
            );
        }
        other => console.writeln(&other.to_string(), Style::Error),
    }
}

/// Installs a panic hook that reports panics the same way as task faults.
///
/// The process still unwinds afterwards; the binary maps that to a
/// failure status.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let payload = info.payload();
        let message = payload
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "task panicked".to_string());
        let (file, line) = info
            .location()
            .map_or(("<unknown>", 0), |loc: &Location<'_>| (loc.file(), loc.line()));
        tracing::debug!(%message, file, line, "panic reached the shutdown reporter");
        eprint!("{}", console::style(render_fault(&message, file, line)).red());
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::ScriptedConsole;
    use crate::task::TaskFault;

    #[test]
    fn fault_report_includes_location() {
        let console = ScriptedConsole::new();
        let fault = TaskFault::new("deploy key rejected");
        let line = fault.location().line();

        report(&RunnerError::Fault(fault), &console);

        let out = console.written_with(Style::Error);
        assert!(out.starts_with("ERROR: deploy key rejected \nin "));
        assert!(out.contains(&format!("report.rs:{line}")));
    }

    #[test]
    fn other_errors_are_single_lines() {
        let console = ScriptedConsole::new();
        let err = RunnerError::UnresolvedReference {
            settings: ".drover.yaml".into(),
            file: "tasks/missing.yaml".into(),
        };

        report(&err, &console);

        assert_eq!(console.transcript(), ".drover.yaml: tasks/missing.yaml could not be found\n");
    }
}
