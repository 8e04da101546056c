//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{should_use_colors, ModpinTheme, OutputMode, UserInterface};

/// Terminal UI implementation.
///
/// Machine output goes to stdout, everything else to stderr.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: ModpinTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        Self::with_colors(mode, should_use_colors())
    }

    /// Create a terminal UI with colors forced on or off.
    pub fn with_colors(mode: OutputMode, colors: bool) -> Self {
        let theme = if colors {
            ModpinTheme::new()
        } else {
            ModpinTheme::plain()
        };

        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn output(&mut self, line: &str) {
        writeln!(self.out, "{}", line).ok();
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.err, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.err, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.err, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }
}
