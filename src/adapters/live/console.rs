//! Live console writing to the terminal and reading from stdin.

use std::io::{BufRead, Write};

use console::style;

use crate::ports::console::{Console, Style};

/// Terminal console. Errors and warnings go to stderr, everything else to
/// stdout. Styling is dropped automatically when the stream is not a tty.
pub struct LiveConsole;

impl LiveConsole {
    fn paint(text: &str, kind: Style) -> String {
        match kind {
            Style::Plain => text.to_string(),
            Style::Comment => style(text).yellow().to_string(),
            Style::Success => style(text).green().to_string(),
            Style::Warning => style(text).yellow().bold().to_string(),
            Style::Error => style(text).white().on_red().to_string(),
        }
    }
}

impl Console for LiveConsole {
    fn write(&self, text: &str, kind: Style) {
        let painted = Self::paint(text, kind);
        // Broken pipes are not worth aborting a task over.
        if matches!(kind, Style::Error | Style::Warning) {
            let mut err = std::io::stderr().lock();
            let _ = err.write_all(painted.as_bytes());
            let _ = err.flush();
        } else {
            let mut out = std::io::stdout().lock();
            let _ = out.write_all(painted.as_bytes());
            let _ = out.flush();
        }
    }

    fn ask(&self, question: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.write(question, Style::Plain);
        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        Ok(answer)
    }
}
