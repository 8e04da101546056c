//! List command implementation.
//!
//! The `modpin list` command shows the normalized required dependencies
//! found in the project's mod metadata. It never touches the network.

use std::path::{Path, PathBuf};

use crate::cli::args::ListArgs;
use crate::error::Result;
use crate::metadata::{extract_all, normalize};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    project_root: PathBuf,
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(project_root: &Path, args: ListArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let extraction = extract_all(&self.project_root)?;
        if extraction.is_missing_metadata() {
            ui.warning(&format!(
                "No mod metadata found under {}",
                self.project_root.display()
            ));
            return Ok(CommandResult::success());
        }

        for manifest in &extraction.manifests {
            ui.message(&format!("Reading {}", manifest.display()));
        }

        let deps = normalize(extraction.dependencies);
        let shown: Vec<_> = deps
            .iter()
            .filter(|d| !self.args.missing_aliases || d.aliases.count() == 0)
            .collect();

        for dep in &shown {
            ui.output(&dep.to_string());
        }
        ui.message(&format!("{} required dependencies", shown.len()));

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn fabric_project() -> TempDir {
        let temp = TempDir::new().unwrap();
        let resources = temp.path().join("src/main/resources");
        fs::create_dir_all(&resources).unwrap();
        fs::write(
            resources.join("fabric.mod.json"),
            r#"{
  "depends": {"minecraft": "1.20.1", "sodium": ">=0.5", "cloth-config": "*"},
  "custom": {"mc-publish": {"dependencies": ["sodium(required){modrinth:AANobbMI}"]}}
}"#,
        )
        .unwrap();
        temp
    }

    #[test]
    fn lists_sorted_dependencies() {
        let temp = fabric_project();
        let mut ui = MockUI::new();

        let result = ListCommand::new(temp.path(), ListArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert_eq!(
            ui.outputs(),
            &[
                "cloth-config *".to_string(),
                "sodium >=0.5 modrinth=AANobbMI".to_string()
            ]
        );
        let messages = ui.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("Reading "));
        assert!(messages[0].ends_with("fabric.mod.json"));
        assert_eq!(messages[1], "2 required dependencies");
    }

    #[test]
    fn missing_aliases_filter() {
        let temp = fabric_project();
        let mut ui = MockUI::new();

        ListCommand::new(
            temp.path(),
            ListArgs {
                missing_aliases: true,
            },
        )
        .execute(&mut ui)
        .unwrap();

        assert_eq!(ui.outputs(), &["cloth-config *".to_string()]);
    }

    #[test]
    fn empty_project_warns() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        let result = ListCommand::new(temp.path(), ListArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert!(ui.outputs().is_empty());
        assert!(ui.has_message("No mod metadata"));
    }
}
