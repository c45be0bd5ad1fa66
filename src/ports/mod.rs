//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the runner core and the
//! outside world (disk, shell, terminal). Implementations live in
//! `src/adapters/`.

pub mod console;
pub mod filesystem;
pub mod shell;

pub use console::{Console, Style};
pub use filesystem::FileSystem;
pub use shell::{ShellExecutor, ShellOutput};
