//! Bootstrap: from process start to one dispatched command.

pub mod scaffold;
pub mod settings;

use crate::command::{self, PassThroughBuffer};
use crate::context::{DiagnosticLevel, RunContext};
use crate::dispatch::Dispatcher;
use crate::error::RunnerError;
use crate::ports::console::Style;
use crate::report;
use crate::script::{LoadError, ScriptProvider};
use crate::task::TaskProvider;
use scaffold::{InitProvider, PROVIDER_FILE, PROVIDER_NAME};
use settings::{LoadEntry, Settings};

/// Wires settings, providers and the dispatcher together for one run.
pub struct Runner {
    ctx: RunContext,
    natives: Vec<Box<dyn TaskProvider>>,
}

impl Runner {
    /// Creates a runner over the given context.
    #[must_use]
    pub fn new(ctx: RunContext) -> Self {
        Self { ctx, natives: Vec::new() }
    }

    /// Adds a compiled-in provider, registered before any provider file.
    #[must_use]
    pub fn with_provider(mut self, provider: impl TaskProvider + 'static) -> Self {
        self.natives.push(Box::new(provider));
        self
    }

    /// The context this runner dispatches with.
    #[must_use]
    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    /// Runs one command and returns the process exit status.
    ///
    /// Errors are reported through the context console and map to 1.
    pub fn run<I, T>(&mut self, args: I) -> i32
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        match self.execute(args) {
            Ok(status) => status.unwrap_or(0),
            Err(err) => {
                tracing::debug!(error = %err, "run failed");
                report::report(&err, self.ctx.console.as_ref());
                1
            }
        }
    }

    /// Runs one command and returns the status the task forced, if any.
    ///
    /// `args` is the full process argument vector, program name first.
    ///
    /// # Errors
    ///
    /// Returns an error for unresolved or malformed settings and provider
    /// files, invalid task declarations, console failures during the
    /// first-run prompt, and task faults.
    pub fn execute<I, T>(&mut self, args: I) -> Result<Option<i32>, RunnerError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let settings = Settings::read(&self.ctx)?;
        if settings.quiet {
            self.ctx.set_diagnostics(DiagnosticLevel::Silent);
        }
        let (argv, pass_through) = command::split(args.into_iter().map(Into::into).collect());

        let mut load = settings.load.clone();
        let default_file = self.ctx.root().join(PROVIDER_FILE);
        if self.ctx.fs.exists(&default_file) {
            let path = self.ctx.fs.canonicalize(&default_file).unwrap_or(default_file);
            let entry = LoadEntry { provider: PROVIDER_NAME.to_string(), path };
            match load.iter_mut().find(|e| e.provider == PROVIDER_NAME) {
                Some(existing) => *existing = entry,
                None => load.push(entry),
            }
        }

        if load.is_empty() && self.natives.is_empty() {
            scaffold::offer(&self.ctx)?;
            return Ok(None);
        }

        let mut dispatcher = Dispatcher::new();
        for provider in std::mem::take(&mut self.natives) {
            dispatcher.register(provider, &settings.args)?;
        }
        for entry in &load {
            match ScriptProvider::load(&entry.provider, &entry.path, &self.ctx) {
                Ok(provider) => {
                    dispatcher.register(Box::new(provider), &settings.args)?;
                }
                Err(LoadError::NotDefined) => {
                    tracing::debug!(
                        provider = %entry.provider,
                        path = %entry.path.display(),
                        "provider missing from file"
                    );
                    self.ctx.console.writeln(
                        &format!("Provider {} was not loaded", entry.provider),
                        Style::Error,
                    );
                    return self.fallback(argv, pass_through);
                }
                Err(LoadError::Unreadable(message)) => {
                    return Err(RunnerError::Read { path: entry.path.clone(), message });
                }
                Err(LoadError::Invalid(message)) => {
                    return Err(RunnerError::Parse { path: entry.path.clone(), message });
                }
            }
        }

        if dispatcher.is_empty() {
            self.ctx.note(&format!(
                "No tasks are defined yet. Add entries under `tasks` in {PROVIDER_FILE}."
            ));
        }
        dispatcher.run(argv, pass_through, &self.ctx)
    }

    fn fallback(
        &self,
        argv: Vec<String>,
        pass_through: Option<PassThroughBuffer>,
    ) -> Result<Option<i32>, RunnerError> {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register(Box::new(InitProvider), &std::collections::BTreeMap::new())?;
        dispatcher.run(argv, pass_through, &self.ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{MemoryFileSystem, ScriptedConsole, ScriptedShell};
    use crate::task::{ExitSignal, Invocation, Outcome, TaskDescriptor, TaskFault};

    struct Fixed;

    impl TaskProvider for Fixed {
        fn name(&self) -> &str {
            "Fixed"
        }

        fn tasks(&self) -> Vec<TaskDescriptor> {
            vec![TaskDescriptor::new("seven"), TaskDescriptor::new("crash")]
        }

        fn invoke(&self, call: &Invocation, _ctx: &RunContext) -> Result<ExitSignal, TaskFault> {
            match call.task() {
                "seven" => Ok(Outcome::new(7).into()),
                _ => Err(TaskFault::new("native task crashed")),
            }
        }
    }

    struct Harness {
        fs: MemoryFileSystem,
        shell: ScriptedShell,
        console: ScriptedConsole,
    }

    impl Harness {
        fn new(fs: MemoryFileSystem) -> Self {
            Self { fs, shell: ScriptedShell::new(), console: ScriptedConsole::new() }
        }

        fn answering(mut self, answer: &str) -> Self {
            self.console = self.console.answering(answer);
            self
        }

        fn runner(&self) -> Runner {
            Runner::new(RunContext::new(
                Box::new(self.fs.clone()),
                Box::new(self.shell.clone()),
                Box::new(self.console.clone()),
                "/project",
            ))
        }

        fn run(&self, args: &[&str]) -> i32 {
            self.runner().run(std::iter::once("drover").chain(args.iter().copied()))
        }
    }

    const DROVERFILE: &str = "Droverfile:\n  tasks:\n    - name: hello\n      args:\n        - name: who\n          default: world\n      run: echo hello {{who}}\n";

    #[test]
    fn runs_a_task_from_the_default_file() {
        let harness = Harness::new(
            MemoryFileSystem::new("/project").with_file("Droverfile.yaml", DROVERFILE),
        );

        assert_eq!(harness.run(&["hello", "ada"]), 0);
        assert_eq!(harness.shell.commands(), vec!["echo hello ada"]);
    }

    #[test]
    fn settings_args_override_defaults() {
        let harness = Harness::new(
            MemoryFileSystem::new("/project")
                .with_file("Droverfile.yaml", DROVERFILE)
                .with_file(".drover.yaml", "args:\n  hello:\n    who: team\n"),
        );

        assert_eq!(harness.run(&["hello"]), 0);
        assert_eq!(harness.shell.commands(), vec!["echo hello team"]);
    }

    #[test]
    fn loads_additional_files_from_settings() {
        let harness = Harness::new(
            MemoryFileSystem::new("/project")
                .with_file(".drover.yaml", "load:\n  Ops: ops.yaml\n")
                .with_file("ops.yaml", "Ops:\n  tasks:\n    - name: ship\n      run: ./ship\n"),
        );

        assert_eq!(harness.run(&["ship"]), 0);
        assert_eq!(harness.shell.commands(), vec!["./ship"]);
    }

    #[test]
    fn unresolved_load_entry_fails_before_registration() {
        let harness = Harness::new(
            MemoryFileSystem::new("/project")
                .with_file("Droverfile.yaml", DROVERFILE)
                .with_file(".drover.yaml", "load:\n  Ops: missing.yaml\n"),
        );

        assert_eq!(harness.run(&["hello"]), 1);
        assert!(harness.shell.commands().is_empty());
        assert!(harness.console.written_with(Style::Error).contains("missing.yaml could not be found"));
    }

    #[test]
    fn empty_load_set_offers_scaffolding() {
        let harness = Harness::new(MemoryFileSystem::new("/project")).answering("y\n");

        assert_eq!(harness.run(&["hello"]), 0);
        assert_eq!(harness.fs.contents("Droverfile.yaml"), Some(scaffold::stub()));
        assert!(harness.shell.commands().is_empty());
    }

    #[test]
    fn declined_scaffolding_writes_nothing() {
        let harness = Harness::new(MemoryFileSystem::new("/project")).answering("no\n");

        assert_eq!(harness.run(&[]), 0);
        assert!(harness.fs.contents("Droverfile.yaml").is_none());
    }

    #[test]
    fn missing_provider_falls_back_to_init() {
        let fs = MemoryFileSystem::new("/project")
            .with_file(".drover.yaml", "load:\n  Ops: ops.yaml\n")
            .with_file("ops.yaml", "Other:\n  tasks: []\n");
        let harness = Harness::new(fs);

        assert_eq!(harness.run(&["init"]), 0);
        assert!(harness.console.written_with(Style::Error).contains("Provider Ops was not loaded"));
        assert_eq!(harness.fs.contents("Droverfile.yaml"), Some(scaffold::stub()));
    }

    #[test]
    fn fallback_application_only_knows_init() {
        let fs = MemoryFileSystem::new("/project")
            .with_file(".drover.yaml", "load:\n  Ops: ops.yaml\n")
            .with_file("ops.yaml", "Other:\n");
        let harness = Harness::new(fs);

        assert_eq!(harness.run(&["ship"]), 2);
    }

    #[test]
    fn malformed_provider_file_is_fatal() {
        let harness = Harness::new(
            MemoryFileSystem::new("/project").with_file("Droverfile.yaml", "Droverfile: [oops"),
        );

        assert_eq!(harness.run(&["hello"]), 1);
        assert!(harness.console.written_with(Style::Error).contains("failed to parse"));
    }

    #[test]
    fn native_providers_count_as_loaded() {
        let harness = Harness::new(MemoryFileSystem::new("/project"));
        let mut runner = harness.runner().with_provider(Fixed);

        assert_eq!(runner.execute(["drover", "seven"]).unwrap(), Some(7));
    }

    #[test]
    fn native_fault_is_reported_with_location() {
        let harness = Harness::new(MemoryFileSystem::new("/project"));
        let mut runner = harness.runner().with_provider(Fixed);

        assert_eq!(runner.run(["drover", "crash"]), 1);
        let out = harness.console.written_with(Style::Error);
        assert!(out.contains("ERROR: native task crashed"));
        assert!(out.contains("bootstrap/mod.rs:"));
    }

    #[test]
    fn quiet_settings_silence_progress_notes() {
        let harness = Harness::new(
            MemoryFileSystem::new("/project")
                .with_file("Droverfile.yaml", DROVERFILE)
                .with_file(".drover.yaml", "quiet: true\n"),
        );

        assert_eq!(harness.run(&["hello"]), 0);
        assert!(harness.console.written_with(Style::Comment).is_empty());
    }

    #[test]
    fn progress_notes_show_rendered_commands() {
        let harness = Harness::new(
            MemoryFileSystem::new("/project").with_file("Droverfile.yaml", DROVERFILE),
        );

        assert_eq!(harness.run(&["hello"]), 0);
        assert!(harness.console.written_with(Style::Comment).contains("echo hello world"));
    }
}
