//! Command-line interface for modpin.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, CompletionsArgs, ListArgs, RangeArgs, ResolveArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
