//! Terminal output for the command-line surface.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for real terminals
//! - [`MockUI`] for tests
//! - [`ResolveProgress`], a progress bar for resolution runs
//!
//! Status messages go to stderr. Only [`UserInterface::output`] writes to
//! stdout, so the `key=value` lines printed by `resolve` stay parseable.
//!
//! # Example
//!
//! ```
//! use modpin::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.warning("no metadata found");
//! ui.output("generated_deps_count=0");
//! assert_eq!(ui.outputs(), &["generated_deps_count=0".to_string()]);
//! ```

pub mod mock;
pub mod output;
pub mod progress;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use output::OutputMode;
pub use progress::ResolveProgress;
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, ModpinTheme};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Write a machine-readable line to stdout. Shown in every mode.
    fn output(&mut self, line: &str);

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);
}
