//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion.

use super::{OutputMode, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    outputs: Vec<String>,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Get all captured stdout lines.
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured warnings.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Check if a message was shown, in any category except stdout.
    pub fn has_message(&self, needle: &str) -> bool {
        self.messages
            .iter()
            .chain(&self.successes)
            .chain(&self.warnings)
            .chain(&self.errors)
            .any(|m| m.contains(needle))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn output(&mut self, line: &str) {
        self.outputs.push(line.to_string());
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_by_category() {
        let mut ui = MockUI::new();
        ui.output("a=1");
        ui.message("hello");
        ui.success("done");
        ui.warning("careful");
        ui.error("broken");

        assert_eq!(ui.outputs(), &["a=1".to_string()]);
        assert_eq!(ui.messages(), &["hello".to_string()]);
        assert_eq!(ui.successes(), &["done".to_string()]);
        assert_eq!(ui.warnings(), &["careful".to_string()]);
        assert!(ui.has_message("broken"));
    }

    #[test]
    fn has_message_ignores_stdout() {
        let mut ui = MockUI::new();
        ui.output("only-stdout");
        ui.warning("missing alias for jei");
        assert!(ui.has_message("jei"));
        assert!(!ui.has_message("only-stdout"));
    }

    #[test]
    fn with_mode_sets_mode() {
        let ui = MockUI::with_mode(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }
}
