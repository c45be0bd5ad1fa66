//! In-memory adapters for tests and embedding.
//!
//! These stand in for disk, shell and terminal so that bootstrap and
//! dispatch can be driven end to end without side effects.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::ports::console::{Console, Style};
use crate::ports::filesystem::FileSystem;
use crate::ports::shell::{ShellExecutor, ShellOutput};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Filesystem held in a map from absolute path to file contents.
///
/// Relative paths are resolved against a fixed working directory.
/// Clones share the same underlying files.
#[derive(Clone)]
pub struct MemoryFileSystem {
    cwd: PathBuf,
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl MemoryFileSystem {
    /// Creates an empty filesystem whose working directory is `cwd`.
    #[must_use]
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into(), files: Arc::new(Mutex::new(HashMap::new())) }
    }

    /// Adds a file, returning `self` for chaining.
    #[must_use]
    pub fn with_file(self, path: impl AsRef<Path>, contents: &str) -> Self {
        let resolved = self.resolve(path.as_ref());
        lock(&self.files).insert(resolved, contents.to_string());
        self
    }

    /// Returns the contents of a file, if present.
    #[must_use]
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        lock(&self.files).get(&self.resolve(path.as_ref())).cloned()
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.contents(path).ok_or_else(|| format!("File not found: {}", path.display()).into())
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        lock(&self.files).insert(self.resolve(path), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        lock(&self.files).contains_key(&self.resolve(path))
    }

    fn canonicalize(
        &self,
        path: &Path,
    ) -> Result<PathBuf, Box<dyn std::error::Error + Send + Sync>> {
        let resolved = self.resolve(path);
        if lock(&self.files).contains_key(&resolved) {
            Ok(resolved)
        } else {
            Err(format!("No such file: {}", path.display()).into())
        }
    }
}

/// Console that records everything written and replays prepared answers.
#[derive(Clone, Default)]
pub struct ScriptedConsole {
    output: Arc<Mutex<Vec<(Style, String)>>>,
    answers: Arc<Mutex<VecDeque<String>>>,
}

impl ScriptedConsole {
    /// Creates a console with no prepared answers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an answer for the next [`Console::ask`] call.
    #[must_use]
    pub fn answering(self, answer: &str) -> Self {
        lock(&self.answers).push_back(answer.to_string());
        self
    }

    /// All text written so far, concatenated without styling.
    #[must_use]
    pub fn transcript(&self) -> String {
        lock(&self.output).iter().map(|(_, text)| text.as_str()).collect()
    }

    /// Text written with the given style, concatenated.
    #[must_use]
    pub fn written_with(&self, style: Style) -> String {
        lock(&self.output)
            .iter()
            .filter(|(s, _)| *s == style)
            .map(|(_, text)| text.as_str())
            .collect()
    }
}

impl Console for ScriptedConsole {
    fn write(&self, text: &str, style: Style) {
        lock(&self.output).push((style, text.to_string()));
    }

    fn ask(&self, question: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.write(question, Style::Plain);
        lock(&self.answers).pop_front().ok_or_else(|| "no answer prepared".into())
    }
}

/// Shell that records commands and answers them from a queue of outputs.
///
/// When the queue is empty every command succeeds with no output.
#[derive(Clone, Default)]
pub struct ScriptedShell {
    commands: Arc<Mutex<Vec<String>>>,
    outputs: Arc<Mutex<VecDeque<ShellOutput>>>,
}

impl ScriptedShell {
    /// Creates a shell where every command succeeds silently.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the output returned for the next command.
    #[must_use]
    pub fn then(self, exit_code: i32, stdout: &str) -> Self {
        lock(&self.outputs).push_back(ShellOutput {
            exit_code,
            stdout: stdout.to_string(),
            stderr: String::new(),
        });
        self
    }

    /// Commands executed so far, in order.
    #[must_use]
    pub fn commands(&self) -> Vec<String> {
        lock(&self.commands).clone()
    }
}

impl ShellExecutor for ScriptedShell {
    fn run(&self, command: &str) -> Result<ShellOutput, Box<dyn std::error::Error + Send + Sync>> {
        lock(&self.commands).push(command.to_string());
        Ok(lock(&self.outputs).pop_front().unwrap_or(ShellOutput {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
        }))
    }
}
