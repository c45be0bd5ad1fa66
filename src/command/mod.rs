//! Command construction: descriptors to CLI definitions, clap projection
//! and pass-through splitting.

pub mod definition;
pub mod parse;
pub mod passthrough;

pub use definition::{
    ArgDecl, ArgMode, CommandDefinition, DefinitionError, OptionDecl, OptionMode, OptionName,
};
pub use parse::{to_clap, ParsedInput};
pub use passthrough::{split, PassThroughBuffer};
