//! Command definitions: the CLI-facing projection of a task descriptor.

use std::collections::HashSet;

use thiserror::Error;

use crate::task::{ParamKind, TaskDescriptor, Value};

/// Names the runner claims for itself on every subcommand.
const RESERVED_LONG: &[&str] = &["help", "version", "quiet"];
const RESERVED_SHORT: &[char] = &['h', 'V', 'q'];

/// A descriptor that cannot be turned into a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// Task name is empty, contains whitespace, starts with `-` or is reserved.
    #[error("invalid task name {0:?}")]
    InvalidName(String),
    /// A provider declares two tasks with the same name.
    #[error("task {0:?} is declared twice")]
    DuplicateTask(String),
    /// Two parameters share a name.
    #[error("task {task}: duplicate parameter {param:?}")]
    DuplicateParam {
        /// Task name.
        task: String,
        /// Offending parameter.
        param: String,
    },
    /// A variadic parameter is followed by another parameter.
    #[error("task {task}: variadic parameter {param:?} must be the last parameter")]
    VariadicNotLast {
        /// Task name.
        task: String,
        /// Offending parameter.
        param: String,
    },
    /// A required parameter follows an optional or variadic one.
    #[error("task {task}: required parameter {param:?} follows an optional one")]
    RequiredAfterOptional {
        /// Task name.
        task: String,
        /// Offending parameter.
        param: String,
    },
    /// An option key is malformed or reserved.
    #[error("task {task}: invalid option {key:?}: {reason}")]
    InvalidOption {
        /// Task name.
        task: String,
        /// Offending `long|s` key.
        key: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// An option's long name and optional one-character shortcut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionName {
    /// Long name, used as `--long` and as the key in the options mapping.
    pub long: String,
    /// Shortcut, used as `-s`.
    pub short: Option<char>,
}

impl OptionName {
    /// Splits a `long` or `long|s` key.
    ///
    /// # Errors
    ///
    /// Returns the reason when the long name is empty or malformed, or the
    /// shortcut is not exactly one ASCII alphanumeric character.
    pub fn parse(key: &str) -> Result<Self, String> {
        let (long, short) = match key.split_once('|') {
            Some((long, short)) => (long, Some(short)),
            None => (key, None),
        };
        if long.is_empty() || long.starts_with('-') || long.contains(char::is_whitespace) {
            return Err("long name must be a non-empty word".to_string());
        }
        if RESERVED_LONG.contains(&long) {
            return Err(format!("--{long} is reserved"));
        }
        let short = match short {
            None => None,
            Some(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphanumeric() => {
                        if RESERVED_SHORT.contains(&c) {
                            return Err(format!("-{c} is reserved"));
                        }
                        Some(c)
                    }
                    _ => return Err("shortcut must be a single letter or digit".to_string()),
                }
            }
        };
        Ok(Self { long: long.to_string(), short })
    }
}

/// How a declared positional argument binds tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgMode {
    /// Mandatory single token.
    Required,
    /// Single token, falling back to the default.
    Optional {
        /// Value used when the token is absent.
        default: Value,
    },
    /// Zero or more tokens, falling back to the defaults when none are given.
    Variadic {
        /// Values used when no token is given.
        defaults: Vec<String>,
    },
}

/// A declared positional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgDecl {
    /// Argument name.
    pub name: String,
    /// Help text.
    pub description: String,
    /// Binding behavior.
    pub mode: ArgMode,
}

/// How a declared option consumes tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionMode {
    /// Takes no value; presence flips the default.
    Flag {
        /// Value when the flag is absent.
        default: bool,
    },
    /// Takes exactly one value.
    Value {
        /// Value when the option is absent.
        default: Value,
    },
    /// Takes one value per occurrence and collects them.
    Multi {
        /// Values when the option never occurs.
        defaults: Vec<String>,
    },
}

/// A declared option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDecl {
    /// Long name and shortcut.
    pub name: OptionName,
    /// Help text.
    pub description: String,
    /// Value behavior.
    pub mode: OptionMode,
}

/// A fully declared subcommand, built once per task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDefinition {
    /// Subcommand name.
    pub name: String,
    /// One-line summary.
    pub summary: String,
    /// Long-form help.
    pub help: String,
    /// Positional arguments in declaration order.
    pub args: Vec<ArgDecl>,
    /// Options in declaration order.
    pub options: Vec<OptionDecl>,
}

impl CommandDefinition {
    /// Builds the command for a task, checking the descriptor's invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] describing the first violated rule.
    pub fn build(task: &TaskDescriptor) -> Result<Self, DefinitionError> {
        let name = task.name();
        if name.is_empty()
            || name.starts_with('-')
            || name.contains(char::is_whitespace)
            || name == "help"
        {
            return Err(DefinitionError::InvalidName(name.to_string()));
        }

        let args = build_args(task)?;
        let options = build_options(task)?;

        Ok(Self {
            name: name.to_string(),
            summary: task.summary_text().to_string(),
            help: task.help_text().to_string(),
            args,
            options,
        })
    }
}

fn build_args(task: &TaskDescriptor) -> Result<Vec<ArgDecl>, DefinitionError> {
    let mut seen = HashSet::new();
    let mut optional_seen = false;
    let params = task.params();
    let mut args = Vec::with_capacity(params.len());

    for (index, param) in params.iter().enumerate() {
        if !seen.insert(param.name.as_str()) {
            return Err(DefinitionError::DuplicateParam {
                task: task.name().to_string(),
                param: param.name.clone(),
            });
        }
        let mode = match &param.kind {
            ParamKind::Required => {
                if optional_seen {
                    return Err(DefinitionError::RequiredAfterOptional {
                        task: task.name().to_string(),
                        param: param.name.clone(),
                    });
                }
                ArgMode::Required
            }
            ParamKind::Optional(default) => {
                optional_seen = true;
                ArgMode::Optional { default: default.clone() }
            }
            ParamKind::Variadic(defaults) => {
                if index + 1 != params.len() {
                    return Err(DefinitionError::VariadicNotLast {
                        task: task.name().to_string(),
                        param: param.name.clone(),
                    });
                }
                optional_seen = true;
                ArgMode::Variadic { defaults: defaults.clone() }
            }
        };
        args.push(ArgDecl {
            name: param.name.clone(),
            description: param.description.clone(),
            mode,
        });
    }
    Ok(args)
}

fn build_options(task: &TaskDescriptor) -> Result<Vec<OptionDecl>, DefinitionError> {
    let Some(spec) = task.options_spec() else {
        return Ok(Vec::new());
    };
    let invalid = |key: &str, reason: String| DefinitionError::InvalidOption {
        task: task.name().to_string(),
        key: key.to_string(),
        reason,
    };

    let mut longs = HashSet::new();
    let mut shorts = HashSet::new();
    let mut options = Vec::with_capacity(spec.entries().len());
    for entry in spec.entries() {
        let name = OptionName::parse(&entry.key).map_err(|reason| invalid(&entry.key, reason))?;
        if !longs.insert(name.long.clone()) {
            return Err(invalid(&entry.key, format!("--{} is declared twice", name.long)));
        }
        if let Some(short) = name.short {
            if !shorts.insert(short) {
                return Err(invalid(&entry.key, format!("-{short} is declared twice")));
            }
        }
        let mode = match &entry.default {
            Value::Bool(default) => OptionMode::Flag { default: *default },
            Value::List(defaults) => OptionMode::Multi { defaults: defaults.clone() },
            other => OptionMode::Value { default: other.clone() },
        };
        options.push(OptionDecl { name, description: entry.description.clone(), mode });
    }
    Ok(options)
}
