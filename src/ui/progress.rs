//! Progress bar for resolution runs.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::catalog::Platform;
use crate::metadata::Dependency;
use crate::resolve::ResolveObserver;

/// An `indicatif` bar that advances as dependencies finish resolving.
///
/// Draws to stderr; hidden when stderr is not a terminal.
pub struct ResolveProgress {
    bar: ProgressBar,
}

impl ResolveProgress {
    /// Create a visible progress bar.
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.magenta} [{bar:24.magenta/dim}] {pos}/{len} {msg}")
                .expect("progress template must be valid")
                .progress_chars("█▓░"),
        );
        Self { bar }
    }

    /// Create a progress bar that never draws (quiet mode, tests).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Number of finished dependencies.
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Remove the bar from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ResolveProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolveObserver for ResolveProgress {
    fn resolution_started(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn dependency_started(&self, dependency: &Dependency, platform: Platform) {
        self.bar
            .set_message(format!("{} ({})", dependency.id, platform));
    }

    fn dependency_finished(&self, _dependency: &Dependency, _ok: bool) {
        self.bar.inc(1);
    }
}
