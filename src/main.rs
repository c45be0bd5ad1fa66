//! Binary entrypoint for the `drover` CLI.

use std::panic::{self, AssertUnwindSafe};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env("DROVER_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    drover::report::install_panic_hook();

    match panic::catch_unwind(AssertUnwindSafe(|| drover::run(std::env::args()))) {
        Ok(status) => exit_code(status),
        // The panic hook already printed the report.
        Err(_) => ExitCode::FAILURE,
    }
}

/// Truncates a status to the 0-255 range the OS reports.
fn exit_code(status: i32) -> ExitCode {
    u8::try_from(status.rem_euclid(256)).map_or(ExitCode::FAILURE, ExitCode::from)
}
