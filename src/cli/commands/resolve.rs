//! Resolve command implementation.
//!
//! The `modpin resolve` command extracts required dependencies from the mod
//! metadata, pins each one on Modrinth or CurseForge, and writes the
//! dependencies document. On success it prints two `key=value` lines on
//! stdout for CI consumption:
//!
//! ```text
//! generated_deps_file=build/dependencies.yml
//! generated_deps_count=3
//! ```

use std::path::{Path, PathBuf};

use crate::cli::args::ResolveArgs;
use crate::config::{ConfigLoader, ModpinConfig};
use crate::error::Result;
use crate::metadata::{extract_all, normalize};
use crate::output::write_dependencies_file;
use crate::resolve::{ResolveOptions, Resolver, Target};
use crate::ui::{ResolveProgress, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The resolve command implementation.
pub struct ResolveCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: ResolveArgs,
    config_loader: ConfigLoader,
}

impl ResolveCommand {
    /// Create a new resolve command.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: ResolveArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
            config_loader: ConfigLoader::new(),
        }
    }

    /// Use a specific config loader instead of the process environment.
    pub fn with_config_loader(mut self, loader: ConfigLoader) -> Self {
        self.config_loader = loader;
        self
    }

    /// Where the document is written.
    pub fn out_path(&self) -> PathBuf {
        if self.args.out.is_absolute() {
            self.args.out.clone()
        } else {
            self.project_root.join(&self.args.out)
        }
    }

    fn target(&self) -> Target {
        Target::new(
            self.args.loader,
            self.args.minecraft_version.clone(),
            self.args.policy,
        )
    }

    /// Load config with command-line overrides applied before validation.
    fn load_config(&self) -> Result<ModpinConfig> {
        self.config_loader.load_with(
            &self.project_root,
            self.config_path.as_deref(),
            |config| {
                if let Some(agent) = &self.args.user_agent {
                    config.http.user_agent = agent.clone();
                }
                if let Some(workers) = self.args.workers {
                    config.resolve.workers = workers.into();
                }
                if self.args.no_fail_fast {
                    config.resolve.fail_fast = false;
                }
            },
        )
    }
}

impl Command for ResolveCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.load_config()?;
        let target = self.target();
        tracing::debug!("Resolving for {} in {}", target, self.project_root.display());

        let extraction = extract_all(&self.project_root)?;
        if extraction.is_missing_metadata() {
            tracing::warn!(
                "No Fabric, Forge/NeoForge or Quilt metadata under {}",
                self.project_root.display()
            );
            ui.warning("No mod metadata found; writing an empty dependency list");
        }
        let deps = normalize(extraction.dependencies);

        let resolver = Resolver::from_config(&config)?;
        let options = ResolveOptions {
            strict: self.args.strict,
            workers: config.resolve.workers,
            fail_fast: config.resolve.fail_fast,
        };

        let progress = if ui.output_mode().shows_progress() {
            ResolveProgress::new()
        } else {
            ResolveProgress::hidden()
        };
        let resolved = resolver.resolve_all(&deps, &target, &options, &progress);
        progress.finish();
        let resolved = resolved?;

        write_dependencies_file(&self.out_path(), &resolved)?;

        ui.output(&format!("generated_deps_file={}", self.args.out.display()));
        ui.output(&format!("generated_deps_count={}", resolved.len()));
        ui.success(&format!(
            "Pinned {} of {} required dependencies ({})",
            resolved.len(),
            deps.len(),
            target
        ));

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModpinError;
    use crate::resolve::{Loader, Policy};
    use crate::ui::{MockUI, OutputMode};
    use httpmock::prelude::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn args(out: &str, strict: bool) -> ResolveArgs {
        ResolveArgs {
            loader: Loader::Fabric,
            minecraft_version: "1.20.1".into(),
            policy: Policy::Max,
            out: PathBuf::from(out),
            strict,
            user_agent: None,
            workers: None,
            no_fail_fast: false,
        }
    }

    fn command(root: &Path, args: ResolveArgs) -> ResolveCommand {
        ResolveCommand::new(root, None, args).with_config_loader(ConfigLoader::with_env(|_| None))
    }

    fn write_fabric(root: &Path, manifest: &str) {
        fs::write(root.join("fabric.mod.json"), manifest).unwrap();
    }

    fn point_at(root: &Path, server: &MockServer) {
        fs::write(
            root.join(".modpin.yml"),
            format!(
                "catalogs:\n  modrinth:\n    api_url: {}\n  curseforge:\n    api_url: {}\nhttp:\n  retries: 0\n",
                server.base_url(),
                server.base_url()
            ),
        )
        .unwrap();
    }

    #[test]
    fn empty_project_writes_empty_document() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::with_mode(OutputMode::Quiet);

        let result = command(temp.path(), args("out/dependencies.yml", false))
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        let content = fs::read_to_string(temp.path().join("out/dependencies.yml")).unwrap();
        assert!(content.contains("runtime: []"));
        assert_eq!(
            ui.outputs(),
            &[
                "generated_deps_file=out/dependencies.yml".to_string(),
                "generated_deps_count=0".to_string()
            ]
        );
        assert_eq!(ui.warnings().len(), 1);
        assert!(ui.warnings()[0].contains("No mod metadata"));
    }

    #[test]
    fn strict_mode_fails_without_aliases() {
        let temp = TempDir::new().unwrap();
        write_fabric(temp.path(), r#"{"depends": {"foo": "*"}}"#);
        let mut ui = MockUI::new();

        let err = command(temp.path(), args("deps.yml", true))
            .execute(&mut ui)
            .unwrap_err();

        assert!(matches!(err, ModpinError::AliasMissing { .. }));
        assert!(!temp.path().join("deps.yml").exists());
    }

    #[test]
    fn permissive_mode_drops_dependencies_without_aliases() {
        let temp = TempDir::new().unwrap();
        write_fabric(temp.path(), r#"{"depends": {"foo": "*"}}"#);
        let mut ui = MockUI::new();

        command(temp.path(), args("deps.yml", false))
            .execute(&mut ui)
            .unwrap();

        let content = fs::read_to_string(temp.path().join("deps.yml")).unwrap();
        assert!(content.contains("runtime: []"));
        assert!(ui.outputs().contains(&"generated_deps_count=0".to_string()));
    }

    #[test]
    fn resolves_against_configured_catalog() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/project/AANobbMI/version")
                .query_param("loaders", r#"["fabric"]"#);
            then.status(200).json_body(json!([
                {"version_number": "0.5.3", "date_published": "2023-09-01T00:00:00Z"},
                {"version_number": "0.5.8", "date_published": "2024-02-01T00:00:00Z"}
            ]));
        });

        let temp = TempDir::new().unwrap();
        point_at(temp.path(), &server);
        write_fabric(
            temp.path(),
            r#"{
  "depends": {"sodium": ">=0.5"},
  "custom": {"mc-publish": {"dependencies": ["sodium{modrinth:AANobbMI}"]}}
}"#,
        );
        let mut ui = MockUI::new();

        command(temp.path(), args("deps.yml", true))
            .execute(&mut ui)
            .unwrap();

        mock.assert();
        let content = fs::read_to_string(temp.path().join("deps.yml")).unwrap();
        assert!(content.contains("modrinth_id: AANobbMI"));
        assert!(content.contains("default: 0.5.8"));
        assert!(ui.outputs().contains(&"generated_deps_count=1".to_string()));
        assert_eq!(
            ui.successes(),
            &["Pinned 1 of 1 required dependencies (loader=fabric mc=1.20.1 policy=max)".to_string()]
        );
        assert!(ui.warnings().is_empty());
    }

    #[test]
    fn resolution_failure_writes_nothing() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/project/AANobbMI/version");
            then.status(200).json_body(json!([]));
        });

        let temp = TempDir::new().unwrap();
        point_at(temp.path(), &server);
        write_fabric(
            temp.path(),
            r#"{
  "depends": {"sodium": "*"},
  "custom": {"mc-publish": {"dependencies": ["sodium{modrinth:AANobbMI}"]}}
}"#,
        );
        let mut ui = MockUI::new();

        let err = command(temp.path(), args("deps.yml", false))
            .execute(&mut ui)
            .unwrap_err();

        assert!(matches!(err, ModpinError::NoCandidates { .. }));
        assert!(!temp.path().join("deps.yml").exists());
        assert!(ui.outputs().is_empty());
    }

    #[test]
    fn cli_flags_override_config() {
        let temp = TempDir::new().unwrap();
        let mut resolve_args = args("deps.yml", false);
        resolve_args.workers = Some(7);
        resolve_args.user_agent = Some("ci-bot/2".into());
        resolve_args.no_fail_fast = true;

        let config = command(temp.path(), resolve_args).load_config().unwrap();
        assert_eq!(config.resolve.workers, 7);
        assert_eq!(config.http.user_agent, "ci-bot/2");
        assert!(!config.resolve.fail_fast);
    }

    #[test]
    fn blank_user_agent_flag_is_rejected() {
        let temp = TempDir::new().unwrap();
        let mut resolve_args = args("deps.yml", false);
        resolve_args.user_agent = Some(String::new());
        let mut ui = MockUI::new();

        let err = command(temp.path(), resolve_args)
            .execute(&mut ui)
            .unwrap_err();

        assert!(matches!(err, ModpinError::ConfigValidationError { .. }));
        assert!(err.to_string().contains("user_agent"));
        assert!(!temp.path().join("deps.yml").exists());
    }

    #[test]
    fn absolute_out_path_is_kept() {
        let temp = TempDir::new().unwrap();
        let abs = temp.path().join("elsewhere.yml");
        let cmd = command(Path::new("/project"), args(abs.to_str().unwrap(), false));
        assert_eq!(cmd.out_path(), abs);

        let rel = command(Path::new("/project"), args("build/deps.yml", false));
        assert_eq!(rel.out_path(), PathBuf::from("/project/build/deps.yml"));
    }
}
