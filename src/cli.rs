//! Top-level CLI shell that synthesized task commands are attached to.

use clap::{ArgMatches, Args, Command, FromArgMatches};

/// Flags accepted by every command.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct GlobalArgs {
    /// Suppress warnings and progress notes.
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl GlobalArgs {
    /// Reads the global flags from top-level matches.
    #[must_use]
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self::from_arg_matches(matches).unwrap_or_default()
    }
}

/// The application command with no tasks attached yet.
#[must_use]
pub fn app() -> Command {
    // `augment_args` overwrites the about text with the struct's docs.
    GlobalArgs::augment_args(Command::new("drover"))
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run the tasks defined in a Droverfile")
        .subcommand_required(true)
        .arg_required_else_help(true)
}
