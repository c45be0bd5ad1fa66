//! Task model: descriptors, values, results and the provider trait.

mod descriptor;
mod outcome;
mod provider;
mod value;

pub use descriptor::{OptionEntry, OptionsSpec, ParamKind, ParameterSpec, TaskDescriptor};
pub use outcome::{ExitSignal, Outcome};
pub use provider::{Invocation, TaskFault, TaskProvider};
pub use value::Value;
