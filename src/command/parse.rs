//! Projection of command definitions onto `clap`, and reading back the
//! parsed values.

use std::collections::BTreeMap;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use super::definition::{ArgMode, CommandDefinition, OptionMode};
use crate::task::Value;

/// Positionals and options share clap's id namespace, so each gets a prefix.
fn arg_id(name: &str) -> String {
    format!("arg:{name}")
}

fn option_id(long: &str) -> String {
    format!("opt:{long}")
}

fn with_default(description: &str, default: &str) -> String {
    if default.is_empty() {
        description.to_string()
    } else if description.is_empty() {
        format!("[default: {default}]")
    } else {
        format!("{description} [default: {default}]")
    }
}

/// Builds the clap subcommand for a definition.
///
/// Defaults are applied when reading matches rather than declared to clap,
/// so that typed defaults (null, booleans) survive parsing.
#[must_use]
pub fn to_clap(def: &CommandDefinition) -> Command {
    let mut command = Command::new(def.name.clone());
    if !def.summary.is_empty() {
        command = command.about(def.summary.clone());
    }
    if !def.help.is_empty() {
        command = command.long_about(def.help.clone());
    }

    for decl in &def.args {
        let arg = Arg::new(arg_id(&decl.name))
            .value_name(decl.name.to_uppercase())
            .value_parser(value_parser!(String));
        let arg = match &decl.mode {
            ArgMode::Required => {
                arg.required(true).action(ArgAction::Set).help(decl.description.clone())
            }
            ArgMode::Optional { default } => arg
                .required(false)
                .action(ArgAction::Set)
                .help(with_default(&decl.description, &default.to_string())),
            ArgMode::Variadic { defaults } => arg
                .required(false)
                .num_args(0..)
                .action(ArgAction::Append)
                .help(with_default(&decl.description, &defaults.join(" "))),
        };
        command = command.arg(arg);
    }

    for decl in &def.options {
        let mut arg = Arg::new(option_id(&decl.name.long)).long(decl.name.long.clone());
        if let Some(short) = decl.name.short {
            arg = arg.short(short);
        }
        let arg = match &decl.mode {
            OptionMode::Flag { default: false } => {
                arg.action(ArgAction::SetTrue).help(decl.description.clone())
            }
            OptionMode::Flag { default: true } => arg
                .action(ArgAction::SetFalse)
                .help(with_default(&decl.description, "true")),
            OptionMode::Value { default } => arg
                .num_args(1)
                .action(ArgAction::Set)
                .value_parser(value_parser!(String))
                .help(with_default(&decl.description, &default.to_string())),
            OptionMode::Multi { defaults } => arg
                .num_args(1)
                .action(ArgAction::Append)
                .value_parser(value_parser!(String))
                .help(with_default(&decl.description, &defaults.join(" "))),
        };
        command = command.arg(arg);
    }

    command
}

/// Values produced by parsing one subcommand's arguments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedInput {
    /// Positional values in declaration order.
    pub positionals: Vec<Value>,
    /// Option values keyed by long name.
    pub options: BTreeMap<String, Value>,
}

impl ParsedInput {
    /// Reads the values for `def` out of its subcommand's matches,
    /// filling in declared defaults for anything absent.
    #[must_use]
    pub fn from_matches(def: &CommandDefinition, matches: &ArgMatches) -> Self {
        let positionals = def
            .args
            .iter()
            .map(|decl| {
                let id = arg_id(&decl.name);
                match &decl.mode {
                    ArgMode::Required => {
                        matches.get_one::<String>(&id).cloned().map_or(Value::Null, Value::Text)
                    }
                    ArgMode::Optional { default } => matches
                        .get_one::<String>(&id)
                        .cloned()
                        .map_or_else(|| default.clone(), Value::Text),
                    ArgMode::Variadic { defaults } => {
                        Value::List(collect_many(matches, &id).unwrap_or_else(|| defaults.clone()))
                    }
                }
            })
            .collect();

        let options = def
            .options
            .iter()
            .map(|decl| {
                let id = option_id(&decl.name.long);
                let value = match &decl.mode {
                    OptionMode::Flag { .. } => Value::Bool(matches.get_flag(&id)),
                    OptionMode::Value { default } => matches
                        .get_one::<String>(&id)
                        .cloned()
                        .map_or_else(|| default.clone(), Value::Text),
                    OptionMode::Multi { defaults } => {
                        Value::List(collect_many(matches, &id).unwrap_or_else(|| defaults.clone()))
                    }
                };
                (decl.name.long.clone(), value)
            })
            .collect();

        Self { positionals, options }
    }
}

fn collect_many(matches: &ArgMatches, id: &str) -> Option<Vec<String>> {
    let values: Vec<String> = matches.get_many::<String>(id)?.cloned().collect();
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}
