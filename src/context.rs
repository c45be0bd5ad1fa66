//! Run context bundling the port trait objects and diagnostic level.

use std::cell::Cell;
use std::path::{Path, PathBuf};

use crate::ports::console::{Console, Style};
use crate::ports::filesystem::FileSystem;
use crate::ports::shell::ShellExecutor;

/// Whether non-fatal diagnostics reach the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticLevel {
    /// Warnings and progress notes are printed.
    #[default]
    Normal,
    /// Warnings and progress notes are swallowed.
    Silent,
}

/// Everything a single run needs from the outside world.
///
/// Passed explicitly to the dispatcher and to every task, so the runner
/// keeps no process-wide state of its own.
pub struct RunContext {
    /// Filesystem for settings, provider files and scaffolding.
    pub fs: Box<dyn FileSystem>,
    /// Shell executor for script tasks.
    pub shell: Box<dyn ShellExecutor>,
    /// Console for status output and prompts.
    pub console: Box<dyn Console>,
    root: PathBuf,
    diagnostics: Cell<DiagnosticLevel>,
}

impl RunContext {
    /// Creates a context from explicit adapters, rooted at `root`.
    #[must_use]
    pub fn new(
        fs: Box<dyn FileSystem>,
        shell: Box<dyn ShellExecutor>,
        console: Box<dyn Console>,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self { fs, shell, console, root: root.into(), diagnostics: Cell::default() }
    }

    /// Creates a live context rooted at the current working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined.
    pub fn live() -> std::io::Result<Self> {
        use crate::adapters::live::console::LiveConsole;
        use crate::adapters::live::filesystem::LiveFileSystem;
        use crate::adapters::live::shell::LiveShellExecutor;

        Ok(Self::new(
            Box::new(LiveFileSystem),
            Box::new(LiveShellExecutor),
            Box::new(LiveConsole),
            std::env::current_dir()?,
        ))
    }

    /// Directory that settings and provider files are looked up in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Current diagnostic level.
    #[must_use]
    pub fn diagnostics(&self) -> DiagnosticLevel {
        self.diagnostics.get()
    }

    /// Changes the diagnostic level for the rest of the run.
    pub fn set_diagnostics(&self, level: DiagnosticLevel) {
        self.diagnostics.set(level);
    }

    /// Reports a non-fatal warning.
    ///
    /// Returns `true` when the warning was swallowed because diagnostics
    /// are silenced, `false` when it was printed.
    pub fn warn(&self, message: &str) -> bool {
        if self.diagnostics() == DiagnosticLevel::Silent {
            tracing::debug!(message, "suppressed warning");
            return true;
        }
        self.console.writeln(message, Style::Warning);
        false
    }

    /// Prints a progress note unless diagnostics are silenced.
    pub fn note(&self, message: &str) {
        if self.diagnostics() == DiagnosticLevel::Normal {
            self.console.writeln(message, Style::Comment);
        }
    }
}
