//! Placeholder rendering for script task commands.
//!
//! `{{name}}` inserts a parameter or option value, shell-quoted.
//! `{{--name}}` renders an option the way it would be typed on a
//! command line. Single braces are left alone so `${VAR}` still works.

use std::collections::BTreeMap;

use crate::task::{TaskFault, Value};

/// Values available to a command template.
#[derive(Debug, Default)]
pub struct Bindings<'a> {
    params: BTreeMap<&'a str, &'a Value>,
    options: BTreeMap<&'a str, &'a Value>,
}

impl<'a> Bindings<'a> {
    /// Binds a parameter value.
    pub fn param(&mut self, name: &'a str, value: &'a Value) {
        self.params.insert(name, value);
    }

    /// Binds an option value by long name.
    pub fn option(&mut self, long: &'a str, value: &'a Value) {
        self.options.insert(long, value);
    }
}

/// Renders `template`, replacing every placeholder.
///
/// # Errors
///
/// Returns a [`TaskFault`] for unterminated or unknown placeholders.
pub fn render(template: &str, bindings: &Bindings<'_>) -> Result<String, TaskFault> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            return Err(TaskFault::new(format!("unterminated placeholder in {template:?}")));
        };
        let name = after[..end].trim();
        out.push_str(&expand(name, bindings)?);
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

fn expand(name: &str, bindings: &Bindings<'_>) -> Result<String, TaskFault> {
    if let Some(long) = name.strip_prefix("--") {
        let value = bindings
            .options
            .get(long)
            .ok_or_else(|| TaskFault::new(format!("unknown option placeholder {{{{{name}}}}}")))?;
        return Ok(as_flag(long, value));
    }
    let value = bindings
        .params
        .get(name)
        .or_else(|| bindings.options.get(name))
        .ok_or_else(|| TaskFault::new(format!("unknown placeholder {{{{{name}}}}}")))?;
    Ok(quoted(value))
}

fn quoted(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Text(s) => shell_words::quote(s).into_owned(),
        Value::List(items) => shell_words::join(items),
        Value::Raw(s) => s.clone(),
    }
}

fn as_flag(long: &str, value: &Value) -> String {
    match value {
        Value::Bool(true) => format!("--{long}"),
        Value::Bool(false) | Value::Null => String::new(),
        Value::Text(s) => format!("--{long} {}", shell_words::quote(s)),
        Value::Raw(s) => format!("--{long} {s}"),
        Value::List(items) => items
            .iter()
            .map(|item| format!("--{long} {}", shell_words::quote(item)))
            .collect::<Vec<_>>()
            .join(" "),
    }
}
