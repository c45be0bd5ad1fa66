//! Extraction of the raw argument group after a bare `--`.

/// Verbatim text of every argument after the first bare `--`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassThroughBuffer(String);

impl PassThroughBuffer {
    /// The joined text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the buffer, returning the joined text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

/// Splits `argv` at the first bare `--`.
///
/// Returns the arguments before the separator and, if a separator was
/// present, the remaining arguments joined with single spaces. The
/// separator itself is dropped. Without a separator `argv` is returned
/// unchanged.
#[must_use]
pub fn split(mut argv: Vec<String>) -> (Vec<String>, Option<PassThroughBuffer>) {
    let Some(pos) = argv.iter().position(|arg| arg == "--") else {
        return (argv, None);
    };
    let tail = argv.split_off(pos);
    let buffer = tail[1..].join(" ");
    (argv, Some(PassThroughBuffer(buffer)))
}
