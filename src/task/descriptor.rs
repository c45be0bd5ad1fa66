//! Task descriptors: the language-neutral shape of one task.

use std::collections::BTreeMap;

use super::value::Value;

/// How a positional parameter binds command-line tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// Must be supplied.
    Required,
    /// May be omitted, in which case the stored default is used.
    Optional(Value),
    /// Captures every remaining positional token. Only valid last.
    Variadic(Vec<String>),
}

/// One positional parameter of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    /// Parameter name, shown in usage output.
    pub name: String,
    /// Help text for the parameter.
    pub description: String,
    /// Binding behavior.
    pub kind: ParamKind,
}

/// One entry of a task's options parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntry {
    /// `long` or `long|s`.
    pub key: String,
    /// Help text for the option.
    pub description: String,
    /// Default value. A `Bool` default makes the option a value-less flag.
    pub default: Value,
}

/// The trailing options parameter of a task.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OptionsSpec {
    entries: Vec<OptionEntry>,
}

impl OptionsSpec {
    /// Creates an options parameter with no entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&mut self, key: &str, description: &str, default: impl Into<Value>) {
        self.entries.push(OptionEntry {
            key: key.to_string(),
            description: description.to_string(),
            default: default.into(),
        });
    }

    /// Entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[OptionEntry] {
        &self.entries
    }
}

/// Description of a single task: its name, help and parameter shape.
///
/// Built once per task when a provider is registered and never mutated
/// after the command definition is derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescriptor {
    name: String,
    summary: String,
    help: String,
    params: Vec<ParameterSpec>,
    options: Option<OptionsSpec>,
}

impl TaskDescriptor {
    /// Starts a descriptor for the task `name` with no parameters.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            summary: String::new(),
            help: String::new(),
            params: Vec::new(),
            options: None,
        }
    }

    /// Sets the one-line summary.
    #[must_use]
    pub fn summary(mut self, summary: &str) -> Self {
        self.summary = summary.to_string();
        self
    }

    /// Sets the long-form help text.
    #[must_use]
    pub fn help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }

    /// Appends a positional parameter.
    #[must_use]
    pub fn param(mut self, name: &str, description: &str, kind: ParamKind) -> Self {
        self.params.push(ParameterSpec {
            name: name.to_string(),
            description: description.to_string(),
            kind,
        });
        self
    }

    /// Appends a required positional parameter.
    #[must_use]
    pub fn required(self, name: &str, description: &str) -> Self {
        self.param(name, description, ParamKind::Required)
    }

    /// Appends an optional positional parameter with a default.
    #[must_use]
    pub fn optional(self, name: &str, description: &str, default: impl Into<Value>) -> Self {
        self.param(name, description, ParamKind::Optional(default.into()))
    }

    /// Appends a variadic positional parameter.
    #[must_use]
    pub fn variadic(self, name: &str, description: &str, defaults: &[&str]) -> Self {
        let defaults = defaults.iter().map(ToString::to_string).collect();
        self.param(name, description, ParamKind::Variadic(defaults))
    }

    /// Declares the options parameter, replacing any earlier one.
    #[must_use]
    pub fn options(mut self, options: OptionsSpec) -> Self {
        self.options = Some(options);
        self
    }

    /// Adds an option entry, declaring the options parameter if needed.
    #[must_use]
    pub fn option(mut self, key: &str, description: &str, default: impl Into<Value>) -> Self {
        self.options.get_or_insert_with(OptionsSpec::new).push(key, description, default);
        self
    }

    /// Task name, used as the subcommand name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line summary.
    #[must_use]
    pub fn summary_text(&self) -> &str {
        &self.summary
    }

    /// Long-form help text.
    #[must_use]
    pub fn help_text(&self) -> &str {
        &self.help
    }

    /// Positional parameters in declaration order.
    #[must_use]
    pub fn params(&self) -> &[ParameterSpec] {
        &self.params
    }

    /// The options parameter, if declared.
    #[must_use]
    pub fn options_spec(&self) -> Option<&OptionsSpec> {
        self.options.as_ref()
    }

    /// Overrides defaults of parameters and options by name.
    ///
    /// Optional parameters and non-flag options take any value, variadic
    /// parameters take a list and flags take a bool. Required parameters
    /// keep no default. Returns the names that matched nothing.
    pub fn apply_defaults(&mut self, overrides: &BTreeMap<String, Value>) -> Vec<String> {
        let mut unmatched = Vec::new();
        for (name, value) in overrides {
            if !self.override_param(name, value) && !self.override_option(name, value) {
                unmatched.push(name.clone());
            }
        }
        unmatched
    }

    fn override_param(&mut self, name: &str, value: &Value) -> bool {
        let Some(param) = self.params.iter_mut().find(|p| p.name == name) else {
            return false;
        };
        match (&mut param.kind, value) {
            (ParamKind::Optional(default), _) => *default = value.clone(),
            (ParamKind::Variadic(defaults), Value::List(items)) => defaults.clone_from(items),
            _ => return false,
        }
        true
    }

    fn override_option(&mut self, name: &str, value: &Value) -> bool {
        let Some(options) = self.options.as_mut() else {
            return false;
        };
        let Some(entry) = options.entries.iter_mut().find(|e| option_long(&e.key) == name) else {
            return false;
        };
        if matches!(entry.default, Value::Bool(_)) != matches!(value, Value::Bool(_)) {
            return false;
        }
        entry.default = value.clone();
        true
    }
}

fn option_long(key: &str) -> &str {
    key.split_once('|').map_or(key, |(long, _)| long)
}
