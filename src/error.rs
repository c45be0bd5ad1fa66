//! Errors that abort a run.

use std::path::PathBuf;

use thiserror::Error;

use crate::command::DefinitionError;
use crate::task::TaskFault;

/// A failure that ends the run with a nonzero status.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The settings document names a file that does not exist.
    #[error("{}: {file} could not be found", settings.display())]
    UnresolvedReference {
        /// Settings document that named the file.
        settings: PathBuf,
        /// The file as written in the settings document.
        file: String,
    },
    /// A settings or provider file could not be read.
    #[error("failed to read {}: {message}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        message: String,
    },
    /// A settings or provider file is not valid.
    #[error("failed to parse {}: {message}", path.display())]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// What is wrong with it.
        message: String,
    },
    /// A file could not be written.
    #[error("failed to write {}: {message}", path.display())]
    Write {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        message: String,
    },
    /// A provider declared a task that cannot become a command.
    #[error("provider {provider}: {source}")]
    InvalidTask {
        /// Provider name.
        provider: String,
        /// The rule the task broke.
        #[source]
        source: DefinitionError,
    },
    /// The console could not be read.
    #[error("console error: {0}")]
    Console(String),
    /// A task raised a fault.
    #[error(transparent)]
    Fault(#[from] TaskFault),
}
