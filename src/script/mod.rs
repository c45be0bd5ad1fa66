//! Script providers: tasks declared in a YAML provider file and executed
//! as shell commands.
//!
//! A provider file maps provider names to their tasks:
//!
//! ```yaml
//! Droverfile:
//!   tasks:
//!     - name: test
//!       summary: Run the test suite
//!       args:
//!         - name: filter
//!           default: []
//!       options:
//!         release|r: false
//!       run: cargo test {{--release}} {{filter}}
//! ```
//!
//! An argument without a `default` key is required, a sequence default
//! makes it variadic, anything else makes it optional.

pub mod template;

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::context::RunContext;
use crate::ports::console::Style;
use crate::task::{
    ExitSignal, Invocation, OptionsSpec, Outcome, ParamKind, TaskDescriptor, TaskFault,
    TaskProvider, Value,
};
use template::Bindings;

/// Why a provider could not be loaded from a file.
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be read.
    Unreadable(String),
    /// The file is not valid YAML or does not match the provider format.
    Invalid(String),
    /// The file parsed but does not define the expected provider.
    NotDefined,
}

#[derive(Debug, Deserialize)]
struct ProviderDoc {
    #[serde(default)]
    tasks: Vec<TaskDoc>,
}

#[derive(Debug, Deserialize)]
struct TaskDoc {
    name: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    help: String,
    #[serde(default)]
    args: Vec<ArgDoc>,
    #[serde(default)]
    options: Option<serde_yaml::Mapping>,
    #[serde(default)]
    run: Commands,
}

#[derive(Debug, Deserialize)]
struct ArgDoc {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default, deserialize_with = "present")]
    default: Option<serde_yaml::Value>,
}

/// Distinguishes `default: ~` (present, null) from a missing key.
fn present<'de, D>(deserializer: D) -> Result<Option<serde_yaml::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_yaml::Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Commands {
    One(String),
    Many(Vec<String>),
}

impl Default for Commands {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl Commands {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(command) => vec![command],
            Self::Many(commands) => commands,
        }
    }
}

struct ScriptTask {
    descriptor: TaskDescriptor,
    commands: Vec<String>,
}

/// A provider whose tasks run shell commands.
pub struct ScriptProvider {
    name: String,
    tasks: Vec<ScriptTask>,
}

impl ScriptProvider {
    /// Parses the provider `name` out of a provider file's contents.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotDefined`] when the document has no entry for
    /// `name`, and [`LoadError::Invalid`] when the document or the entry is
    /// malformed.
    pub fn parse(name: &str, source: &str) -> Result<Self, LoadError> {
        let mut providers: HashMap<String, serde_yaml::Value> =
            serde_yaml::from_str::<Option<HashMap<String, serde_yaml::Value>>>(source)
                .map_err(|e| LoadError::Invalid(e.to_string()))?
                .unwrap_or_default();
        let body = providers.remove(name).ok_or(LoadError::NotDefined)?;
        let doc: ProviderDoc = if body.is_null() {
            ProviderDoc { tasks: Vec::new() }
        } else {
            serde_yaml::from_value(body)
                .map_err(|e| LoadError::Invalid(format!("provider {name}: {e}")))?
        };

        let tasks = doc.tasks.into_iter().map(convert_task).collect::<Result<Vec<_>, _>>()?;
        Ok(Self { name: name.to_string(), tasks })
    }

    /// Reads and parses the provider `name` from `path`.
    ///
    /// # Errors
    ///
    /// As [`ScriptProvider::parse`], plus [`LoadError::Unreadable`] when the
    /// file cannot be read.
    pub fn load(name: &str, path: &Path, ctx: &RunContext) -> Result<Self, LoadError> {
        let source = ctx
            .fs
            .read_to_string(path)
            .map_err(|e| LoadError::Unreadable(e.to_string()))?;
        tracing::debug!(provider = name, path = %path.display(), "loading provider file");
        Self::parse(name, &source)
    }
}

fn convert_task(doc: TaskDoc) -> Result<ScriptTask, LoadError> {
    let invalid = |what: &str, message: String| {
        LoadError::Invalid(format!("task {}: {what}: {message}", doc.name))
    };

    let mut descriptor = TaskDescriptor::new(&doc.name).summary(&doc.summary).help(&doc.help);
    for arg in &doc.args {
        let kind = match &arg.default {
            None => ParamKind::Required,
            Some(node) => match Value::from_yaml(node).map_err(|e| invalid(&arg.name, e))? {
                Value::List(items) => ParamKind::Variadic(items),
                value => ParamKind::Optional(value),
            },
        };
        descriptor = descriptor.param(&arg.name, &arg.description, kind);
    }

    if let Some(mapping) = &doc.options {
        let mut options = OptionsSpec::new();
        for (key, node) in mapping {
            let key = key
                .as_str()
                .ok_or_else(|| invalid("options", "option names must be strings".to_string()))?;
            let (default, description) = option_entry(node).map_err(|e| invalid(key, e))?;
            options.push(key, &description, default);
        }
        descriptor = descriptor.options(options);
    }

    Ok(ScriptTask { descriptor, commands: doc.run.into_vec() })
}

/// An option is either a bare default or `{default, description}`.
fn option_entry(node: &serde_yaml::Value) -> Result<(Value, String), String> {
    let serde_yaml::Value::Mapping(map) = node else {
        return Ok((Value::from_yaml(node)?, String::new()));
    };
    let default = map.get("default").map_or(Ok(Value::Null), Value::from_yaml)?;
    let description =
        map.get("description").and_then(serde_yaml::Value::as_str).unwrap_or_default();
    Ok((default, description.to_string()))
}

impl TaskProvider for ScriptProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn tasks(&self) -> Vec<TaskDescriptor> {
        self.tasks.iter().map(|t| t.descriptor.clone()).collect()
    }

    fn invoke(&self, call: &Invocation, ctx: &RunContext) -> Result<ExitSignal, TaskFault> {
        let task = self
            .tasks
            .iter()
            .find(|t| t.descriptor.name() == call.task())
            .ok_or_else(|| TaskFault::new(format!("{} has no task {}", self.name, call.task())))?;
        if task.commands.is_empty() {
            return Ok(ExitSignal::None);
        }

        let params = task.descriptor.params();
        for unbound in call.args().iter().skip(params.len()) {
            ctx.warn(&format!(
                "Task {} declares no arguments; ignoring `{unbound}`",
                task.descriptor.name()
            ));
        }

        let mut bindings = Bindings::default();
        for (param, value) in params.iter().zip(call.args()) {
            bindings.param(&param.name, value);
        }
        for (long, value) in call.options() {
            bindings.option(long, value);
        }

        for template in &task.commands {
            let command = template::render(template, &bindings)?;
            ctx.note(&format!(" ➜ {command}"));
            let output = ctx
                .shell
                .run(&command)
                .map_err(|e| TaskFault::new(format!("failed to run `{command}`: {e}")))?;
            if !output.stdout.is_empty() {
                ctx.console.write(&output.stdout, Style::Plain);
            }
            if !output.stderr.is_empty() {
                ctx.console.write(&output.stderr, Style::Warning);
            }
            if !output.success() {
                tracing::info!(command, exit_code = output.exit_code, "command failed");
                return Ok(ExitSignal::Outcome(Outcome::new(output.exit_code)));
            }
        }
        Ok(ExitSignal::Outcome(Outcome::success()))
    }
}
