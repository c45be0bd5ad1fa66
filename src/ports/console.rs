//! Console port for status output and the scaffolding prompt.

/// Visual treatment applied to a chunk of console text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Unstyled text.
    Plain,
    /// Secondary, explanatory text.
    Comment,
    /// Positive confirmation.
    Success,
    /// Non-fatal warning.
    Warning,
    /// Failure report.
    Error,
}

/// Writes styled text to the user and reads their answers.
///
/// The runner only talks to the console to report bootstrap and dispatch
/// status; tasks may use it for their own output.
pub trait Console {
    /// Writes a chunk of text without a trailing newline.
    fn write(&self, text: &str, style: Style);

    /// Writes a line of text.
    fn writeln(&self, text: &str, style: Style) {
        self.write(&format!("{text}\n"), style);
    }

    /// Prints `question` and blocks until the user answers with a line.
    ///
    /// # Errors
    ///
    /// Returns an error if standard input cannot be read.
    fn ask(&self, question: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}
