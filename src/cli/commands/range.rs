//! Range command implementation.
//!
//! The `modpin range` command shows how a range expression is parsed and
//! which versions satisfy it, without touching any catalog.

use crate::cli::args::RangeArgs;
use crate::constraint::VersionRange;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The range command implementation.
pub struct RangeCommand {
    args: RangeArgs,
}

impl RangeCommand {
    /// Create a new range command.
    pub fn new(args: RangeArgs) -> Self {
        Self { args }
    }
}

impl Command for RangeCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let range = VersionRange::parse(&self.args.range);
        ui.output(&format!("constraints: {}", range));

        let mut all_match = true;
        for version in &self.args.versions {
            let ok = range.matches(version);
            all_match &= ok;
            ui.output(&format!(
                "{}: {}",
                version,
                if ok { "satisfies" } else { "does not satisfy" }
            ));
        }

        if all_match {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}
