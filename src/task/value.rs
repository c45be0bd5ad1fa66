//! Dynamic values exchanged between the command line and tasks.

use std::fmt;

/// A value bound to a task parameter or option.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    /// No value.
    #[default]
    Null,
    /// A boolean, used by flag options.
    Bool(bool),
    /// A single string token.
    Text(String),
    /// An ordered sequence of tokens, used by variadic parameters.
    List(Vec<String>),
    /// Verbatim command-line text captured after `--`.
    Raw(String),
}

impl Value {
    /// Returns the string for `Text` and `Raw` values.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Raw(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean for `Bool` values.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the items of a `List` value.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns `true` for `Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Converts a scalar or sequence YAML node.
    ///
    /// Numbers become text; nested sequences and mappings are rejected.
    ///
    /// # Errors
    ///
    /// Returns a description of the offending node when it cannot be
    /// represented.
    pub fn from_yaml(node: &serde_yaml::Value) -> Result<Self, String> {
        match node {
            serde_yaml::Value::Null => Ok(Self::Null),
            serde_yaml::Value::Bool(b) => Ok(Self::Bool(*b)),
            serde_yaml::Value::Sequence(items) => {
                items.iter().map(scalar_text).collect::<Result<Vec<_>, _>>().map(Self::List)
            }
            serde_yaml::Value::Tagged(tagged) => Self::from_yaml(&tagged.value),
            serde_yaml::Value::Mapping(_) => Err("mappings are not valid values".to_string()),
            other => scalar_text(other).map(Self::Text),
        }
    }
}

fn scalar_text(node: &serde_yaml::Value) -> Result<String, String> {
    match node {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Null => Ok(String::new()),
        _ => Err("nested collections are not valid values".to_string()),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) | Self::Raw(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(" ")),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}
