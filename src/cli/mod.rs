// CLI module - Command line interface
pub mod args;
pub mod command_set;
pub mod commands;
pub mod output;

pub use args::{Args, Command};
pub use command_set::{CommandSet, Verb};
pub use commands::execute_command;
pub use output::{OutputFormat, OutputWriter};
