//! What a task hands back, and how that becomes an exit status.

/// Structured task result carrying an explicit exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    exit_code: i32,
    message: Option<String>,
}

impl Outcome {
    /// An outcome with the given exit code and no message.
    #[must_use]
    pub fn new(exit_code: i32) -> Self {
        Self { exit_code, message: None }
    }

    /// A successful outcome.
    #[must_use]
    pub fn success() -> Self {
        Self::new(0)
    }

    /// A failed outcome with an explanation.
    #[must_use]
    pub fn failure(exit_code: i32, message: &str) -> Self {
        Self { exit_code, message: Some(message.to_string()) }
    }

    /// The exit code the process should terminate with.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Optional explanation attached to the outcome.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// The value a task returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitSignal {
    /// Exit with exactly this status.
    Code(i32),
    /// `true` exits 0, `false` exits 1.
    Success(bool),
    /// Exit with the outcome's exit code.
    Outcome(Outcome),
    /// No opinion; the run ends normally.
    None,
}

impl ExitSignal {
    /// Translates the signal into a forced exit status.
    ///
    /// `None` means the task did not ask for a specific status.
    #[must_use]
    pub fn exit_status(&self) -> Option<i32> {
        match self {
            Self::Code(code) => Some(*code),
            Self::Success(ok) => Some(if *ok { 0 } else { 1 }),
            Self::Outcome(outcome) => Some(outcome.exit_code()),
            Self::None => None,
        }
    }
}

impl From<i32> for ExitSignal {
    fn from(code: i32) -> Self {
        Self::Code(code)
    }
}

impl From<bool> for ExitSignal {
    fn from(ok: bool) -> Self {
        Self::Success(ok)
    }
}

impl From<Outcome> for ExitSignal {
    fn from(outcome: Outcome) -> Self {
        Self::Outcome(outcome)
    }
}

impl From<()> for ExitSignal {
    fn from((): ()) -> Self {
        Self::None
    }
}
