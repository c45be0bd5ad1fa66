//! Command registry and invocation dispatch.

use std::collections::BTreeMap;

use clap::error::ErrorKind;

use crate::cli::{self, GlobalArgs};
use crate::command::{self, CommandDefinition, ParsedInput, PassThroughBuffer};
use crate::context::{DiagnosticLevel, RunContext};
use crate::error::RunnerError;
use crate::ports::console::Style;
use crate::task::{ExitSignal, Invocation, TaskProvider, Value};

struct Registered {
    definition: CommandDefinition,
    provider: usize,
}

/// Holds the registered providers and their synthesized commands, and
/// runs exactly one of them per process.
#[derive(Default)]
pub struct Dispatcher {
    providers: Vec<Box<dyn TaskProvider>>,
    commands: Vec<Registered>,
}

impl Dispatcher {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every task of `provider`, applying per-task default
    /// overrides. A task whose name is already registered replaces the
    /// earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::InvalidTask`] if any task cannot be turned into
    /// a command; nothing from the provider is registered in that case.
    pub fn register(
        &mut self,
        provider: Box<dyn TaskProvider>,
        overrides: &BTreeMap<String, BTreeMap<String, Value>>,
    ) -> Result<usize, RunnerError> {
        let mut definitions: Vec<CommandDefinition> = Vec::new();
        for mut task in provider.tasks() {
            if let Some(defaults) = overrides.get(task.name()) {
                for name in task.apply_defaults(defaults) {
                    tracing::warn!(task = task.name(), name, "default override matches nothing");
                }
            }
            let definition = CommandDefinition::build(&task).map_err(|source| {
                RunnerError::InvalidTask { provider: provider.name().to_string(), source }
            })?;
            if definitions.iter().any(|d| d.name == definition.name) {
                return Err(RunnerError::InvalidTask {
                    provider: provider.name().to_string(),
                    source: command::DefinitionError::DuplicateTask(definition.name),
                });
            }
            definitions.push(definition);
        }

        let index = self.providers.len();
        let count = definitions.len();
        tracing::debug!(provider = provider.name(), count, "registering tasks");
        self.providers.push(provider);
        for definition in definitions {
            let existing = self.commands.iter().position(|c| c.definition.name == definition.name);
            if let Some(pos) = existing {
                tracing::warn!(task = %definition.name, "task replaces an earlier one");
                self.commands.remove(pos);
            }
            self.commands.push(Registered { definition, provider: index });
        }
        Ok(count)
    }

    /// Number of registered commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` when no commands are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Definitions of the registered commands, in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.commands.iter().map(|c| &c.definition)
    }

    /// The application command with every registered task attached.
    #[must_use]
    pub fn app(&self) -> clap::Command {
        self.definitions().fold(cli::app(), |app, def| app.subcommand(command::to_clap(def)))
    }

    /// Parses `argv` (already split at `--`), invokes the selected task and
    /// returns the forced exit status, if any.
    ///
    /// Usage errors and help requests are written to the console and
    /// reported through clap's exit status.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Fault`] when the task raises a fault.
    pub fn run(
        &self,
        argv: Vec<String>,
        pass_through: Option<PassThroughBuffer>,
        ctx: &RunContext,
    ) -> Result<Option<i32>, RunnerError> {
        let matches = match self.app().try_get_matches_from(argv) {
            Ok(matches) => matches,
            // A bare invocation lists the tasks like `--help` does.
            Err(err) if err.kind() == ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                ctx.console.write(&err.render().to_string(), Style::Plain);
                return Ok(Some(0));
            }
            Err(err) => {
                let style = if err.use_stderr() { Style::Error } else { Style::Plain };
                ctx.console.write(&err.render().to_string(), style);
                return Ok(Some(err.exit_code()));
            }
        };
        if GlobalArgs::from_matches(&matches).quiet {
            ctx.set_diagnostics(DiagnosticLevel::Silent);
        }

        let Some((name, sub_matches)) = matches.subcommand() else {
            return Ok(None);
        };
        let Some(registered) = self.commands.iter().find(|c| c.definition.name == name) else {
            return Ok(None);
        };

        let parsed = ParsedInput::from_matches(&registered.definition, sub_matches);
        let call = assemble(&registered.definition, parsed, pass_through);
        let provider = &self.providers[registered.provider];
        tracing::info!(task = call.task(), provider = provider.name(), "invoking task");

        let signal = provider.invoke(&call, ctx)?;
        if let ExitSignal::Outcome(outcome) = &signal {
            if let Some(message) = outcome.message() {
                let style = if outcome.exit_code() == 0 { Style::Success } else { Style::Error };
                ctx.console.writeln(message, style);
            }
        }
        let status = signal.exit_status();
        tracing::debug!(task = call.task(), ?status, "task finished");
        Ok(status)
    }
}

/// Orders the call arguments for a task.
///
/// Positionals come first in declared order. A pass-through buffer
/// replaces the last positional, or becomes the only one when the task
/// declares none. Options are always attached.
#[must_use]
pub fn assemble(
    def: &CommandDefinition,
    parsed: ParsedInput,
    pass_through: Option<PassThroughBuffer>,
) -> Invocation {
    let mut args = parsed.positionals;
    if let Some(buffer) = pass_through {
        let raw = Value::Raw(buffer.into_string());
        match args.last_mut() {
            Some(last) => *last = raw,
            None => args.push(raw),
        }
    }
    Invocation::new(&def.name, args, parsed.options)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::adapters::memory::{MemoryFileSystem, ScriptedConsole, ScriptedShell};
    use crate::task::{Outcome, TaskDescriptor, TaskFault};

    /// Records every call and answers with a fixed signal per task.
    struct Recorder {
        calls: Rc<RefCell<Vec<Invocation>>>,
    }

    impl TaskProvider for Recorder {
        fn name(&self) -> &str {
            "Recorder"
        }

        fn tasks(&self) -> Vec<TaskDescriptor> {
            vec![
                TaskDescriptor::new("run").required("first", "").required("second", ""),
                TaskDescriptor::new("three"),
                TaskDescriptor::new("yes"),
                TaskDescriptor::new("no"),
                TaskDescriptor::new("seven"),
                TaskDescriptor::new("nothing").option("dry|d", "", false),
                TaskDescriptor::new("boom"),
            ]
        }

        fn invoke(&self, call: &Invocation, _ctx: &RunContext) -> Result<ExitSignal, TaskFault> {
            self.calls.borrow_mut().push(call.clone());
            Ok(match call.task() {
                "three" => ExitSignal::from(3),
                "yes" => ExitSignal::from(true),
                "no" => ExitSignal::from(false),
                "seven" => ExitSignal::from(Outcome::failure(7, "seven failed")),
                "boom" => return Err(TaskFault::new("boom")),
                _ => ExitSignal::None,
            })
        }
    }

    fn context(console: &ScriptedConsole) -> RunContext {
        RunContext::new(
            Box::new(MemoryFileSystem::new("/project")),
            Box::new(ScriptedShell::new()),
            Box::new(console.clone()),
            "/project",
        )
    }

    fn argv(list: &[&str]) -> Vec<String> {
        std::iter::once("drover").chain(list.iter().copied()).map(String::from).collect()
    }

    fn dispatcher() -> Dispatcher {
        let mut dispatcher = Dispatcher::new();
        dispatcher
            .register(Box::new(Recorder { calls: Rc::default() }), &BTreeMap::new())
            .unwrap();
        dispatcher
    }

    fn run(list: &[&str]) -> (Result<Option<i32>, RunnerError>, ScriptedConsole) {
        let console = ScriptedConsole::new();
        let ctx = context(&console);
        let (argv, pass) = command::split(argv(list));
        (dispatcher().run(argv, pass, &ctx), console)
    }

    #[test]
    fn exit_statuses_follow_the_signal() {
        assert_eq!(run(&["three"]).0.unwrap(), Some(3));
        assert_eq!(run(&["yes"]).0.unwrap(), Some(0));
        assert_eq!(run(&["no"]).0.unwrap(), Some(1));
        assert_eq!(run(&["nothing"]).0.unwrap(), None);
    }

    #[test]
    fn outcome_message_is_printed() {
        let (status, console) = run(&["seven"]);
        assert_eq!(status.unwrap(), Some(7));
        assert_eq!(console.written_with(Style::Error), "seven failed\n");
    }

    #[test]
    fn faults_propagate() {
        let (status, _) = run(&["boom"]);
        assert!(matches!(status, Err(RunnerError::Fault(_))));
    }

    #[test]
    fn usage_errors_report_clap_status() {
        let (status, console) = run(&["run", "only-one"]);
        assert_eq!(status.unwrap(), Some(2));
        assert!(console.written_with(Style::Error).contains("SECOND"));

        let (status, _) = run(&["unknown"]);
        assert_eq!(status.unwrap(), Some(2));
    }

    #[test]
    fn help_goes_to_plain_output() {
        let (status, console) = run(&["--help"]);
        assert_eq!(status.unwrap(), Some(0));
        assert!(console.written_with(Style::Plain).contains("three"));
    }

    #[test]
    fn bare_invocation_lists_tasks_and_succeeds() {
        let (status, console) = run(&[]);
        assert_eq!(status.unwrap(), Some(0));
        assert!(console.written_with(Style::Plain).contains("seven"));
        assert!(console.written_with(Style::Error).is_empty());
    }

    #[test]
    fn pass_through_replaces_last_positional() {
        let def = CommandDefinition::build(
            &TaskDescriptor::new("run").required("first", "").required("second", ""),
        )
        .unwrap();
        let (argv, pass) = command::split(argv(&["run", "a", "b", "--", "c", "d"]));
        let matches = command::to_clap(&def).try_get_matches_from(&argv[1..]).unwrap();

        let call = assemble(&def, ParsedInput::from_matches(&def, &matches), pass);

        assert_eq!(call.args(), &[Value::from("a"), Value::Raw("c d".into())]);
        assert_eq!(call.arg(1).as_text(), Some("c d"));
        assert!(call.options().is_empty());
    }

    #[test]
    fn pass_through_without_positionals_is_appended() {
        let def = CommandDefinition::build(&TaskDescriptor::new("exec")).unwrap();
        let parsed = ParsedInput::default();

        let call = assemble(&def, parsed, command::split(argv(&["exec", "--", "ls"])).1);

        assert_eq!(call.args(), &[Value::Raw("ls".into())]);
    }

    #[test]
    fn options_mapping_is_always_attached() {
        let console = ScriptedConsole::new();
        let ctx = context(&console);
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = Dispatcher::new();
        dispatcher
            .register(Box::new(Recorder { calls: Rc::clone(&calls) }), &BTreeMap::new())
            .unwrap();

        dispatcher.run(argv(&["nothing", "-d"]), None, &ctx).unwrap();
        dispatcher.run(argv(&["yes"]), None, &ctx).unwrap();

        let calls = calls.borrow();
        assert_eq!(calls[0].option("dry"), &Value::Bool(true));
        assert!(calls[1].options().is_empty());
    }
}
