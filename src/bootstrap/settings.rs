//! The project-local settings document, `.drover.yaml`.
//!
//! ```yaml
//! load:
//!   Deploy: ops/deploy.yaml
//! args:
//!   test:
//!     jobs: 8
//! quiet: false
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::context::RunContext;
use crate::error::RunnerError;
use crate::task::Value;

/// File name of the settings document.
pub const SETTINGS_FILE: &str = ".drover.yaml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    load: serde_yaml::Mapping,
    args: BTreeMap<String, BTreeMap<String, serde_yaml::Value>>,
    quiet: bool,
}

/// A provider to load: its name and the file that defines it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadEntry {
    /// Provider name expected inside the file.
    pub provider: String,
    /// Path to the provider file.
    pub path: PathBuf,
}

/// Parsed settings.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Settings {
    /// Provider files to load, in document order.
    pub load: Vec<LoadEntry>,
    /// Default overrides, keyed by task then parameter or option name.
    pub args: BTreeMap<String, BTreeMap<String, Value>>,
    /// Start with diagnostics silenced.
    pub quiet: bool,
}

impl Settings {
    /// Parses a settings document. Paths are kept as written.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Parse`] when the document is malformed.
    pub fn parse(source: &str, path: &Path) -> Result<Self, RunnerError> {
        let parse_error =
            |message: String| RunnerError::Parse { path: path.to_path_buf(), message };
        let raw: RawSettings = serde_yaml::from_str::<Option<RawSettings>>(source)
            .map_err(|e| parse_error(e.to_string()))?
            .unwrap_or_default();

        let mut load = Vec::with_capacity(raw.load.len());
        for (name, file) in &raw.load {
            let (Some(provider), Some(file)) = (name.as_str(), file.as_str()) else {
                return Err(parse_error("load entries must map a provider name to a file".into()));
            };
            load.push(LoadEntry { provider: provider.to_string(), path: PathBuf::from(file) });
        }

        let mut args = BTreeMap::new();
        for (task, values) in raw.args {
            let mut converted = BTreeMap::new();
            for (name, node) in values {
                let value = Value::from_yaml(&node)
                    .map_err(|e| parse_error(format!("args.{task}.{name}: {e}")))?;
                converted.insert(name, value);
            }
            args.insert(task, converted);
        }

        Ok(Self { load, args, quiet: raw.quiet })
    }

    /// Reads the settings document in the context root, if there is one,
    /// and resolves every `load` entry to an absolute path.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::UnresolvedReference`] for the first `load`
    /// entry that does not exist, or a read/parse error for the document.
    pub fn read(ctx: &RunContext) -> Result<Self, RunnerError> {
        let path = ctx.root().join(SETTINGS_FILE);
        if !ctx.fs.exists(&path) {
            return Ok(Self::default());
        }
        let source = ctx
            .fs
            .read_to_string(&path)
            .map_err(|e| RunnerError::Read { path: path.clone(), message: e.to_string() })?;
        let mut settings = Self::parse(&source, &path)?;

        for entry in &mut settings.load {
            let resolved = ctx.fs.canonicalize(&ctx.root().join(&entry.path)).map_err(|_| {
                RunnerError::UnresolvedReference {
                    settings: PathBuf::from(SETTINGS_FILE),
                    file: entry.path.display().to_string(),
                }
            })?;
            entry.path = resolved;
        }
        tracing::debug!(load = settings.load.len(), "settings loaded");
        Ok(settings)
    }
}
