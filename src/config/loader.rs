//! Configuration file discovery and loading.
//!
//! Layers, lowest to highest priority:
//! 1. Built-in defaults
//! 2. Project config (`<project_root>/.modpin.yml`), or an explicit `--config` file
//! 3. `MODPIN_*` environment variables
//!
//! Command-line flags are applied last, through [`ConfigLoader::load_with`].

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::ModpinConfig;
use crate::config::validator::validate;
use crate::error::{ModpinError, Result};

/// Project config file name.
pub const CONFIG_FILE_NAME: &str = ".modpin.yml";

/// Environment variables that override config values.
pub const ENV_MODRINTH_API_URL: &str = "MODPIN_MODRINTH_API_URL";
pub const ENV_CURSEFORGE_API_URL: &str = "MODPIN_CURSEFORGE_API_URL";
pub const ENV_USER_AGENT: &str = "MODPIN_USER_AGENT";
pub const ENV_WORKERS: &str = "MODPIN_WORKERS";
pub const ENV_TIMEOUT_SECS: &str = "MODPIN_TIMEOUT_SECS";
pub const ENV_RETRIES: &str = "MODPIN_RETRIES";

type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

/// Loads and layers configuration.
///
/// # Example
///
/// ```
/// use modpin::config::ConfigLoader;
/// use tempfile::TempDir;
/// use std::fs;
///
/// let temp = TempDir::new().unwrap();
/// fs::write(temp.path().join(".modpin.yml"), "resolve:\n  workers: 2\n").unwrap();
///
/// let config = ConfigLoader::with_env(|_| None).load(temp.path(), None).unwrap();
/// assert_eq!(config.resolve.workers, 2);
/// ```
pub struct ConfigLoader {
    env: EnvLookup,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::with_env(|key| std::env::var(key).ok())
    }
}

impl ConfigLoader {
    /// Loader that reads overrides from the process environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader that reads overrides through `lookup` instead of the process environment.
    pub fn with_env(lookup: impl Fn(&str) -> Option<String> + 'static) -> Self {
        Self {
            env: Box::new(lookup),
        }
    }

    /// Load the layered, validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` if `explicit` is given but doesn't exist.
    /// Returns `ConfigParseError` if a config file is invalid YAML.
    /// Returns `ConfigValidationError` for bad values, from a file or the environment.
    pub fn load(&self, project_root: &Path, explicit: Option<&Path>) -> Result<ModpinConfig> {
        self.load_with(project_root, explicit, |_| {})
    }

    /// Like [`ConfigLoader::load`], with `overrides` applied after the
    /// environment and before validation.
    pub fn load_with(
        &self,
        project_root: &Path,
        explicit: Option<&Path>,
        overrides: impl FnOnce(&mut ModpinConfig),
    ) -> Result<ModpinConfig> {
        let mut config = match explicit {
            Some(path) => load_config_file(path)?,
            None => {
                let path = project_root.join(CONFIG_FILE_NAME);
                if path.is_file() {
                    load_config_file(&path)?
                } else {
                    ModpinConfig::default()
                }
            }
        };

        self.apply_env(&mut config)?;
        overrides(&mut config);
        validate(&config)?;
        Ok(config)
    }

    fn apply_env(&self, config: &mut ModpinConfig) -> Result<()> {
        if let Some(url) = self.var(ENV_MODRINTH_API_URL) {
            config.catalogs.modrinth.api_url = url;
        }
        if let Some(url) = self.var(ENV_CURSEFORGE_API_URL) {
            config.catalogs.curseforge.api_url = url;
        }
        if let Some(agent) = self.var(ENV_USER_AGENT) {
            config.http.user_agent = agent;
        }
        if let Some(value) = self.var(ENV_WORKERS) {
            config.resolve.workers = parse_number(ENV_WORKERS, &value)?;
        }
        if let Some(value) = self.var(ENV_TIMEOUT_SECS) {
            config.http.timeout_secs = parse_number(ENV_TIMEOUT_SECS, &value)?;
        }
        if let Some(value) = self.var(ENV_RETRIES) {
            config.http.retries = parse_number(ENV_RETRIES, &value)?;
        }
        Ok(())
    }

    /// Non-blank value of an environment variable.
    fn var(&self, key: &str) -> Option<String> {
        (self.env)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| ModpinError::ConfigValidationError {
            message: format!("{} must be a non-negative integer; got '{}'", key, value),
        })
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<ModpinConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ModpinError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ModpinError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into ModpinConfig.
pub fn parse_config(content: &str, source_path: &Path) -> Result<ModpinConfig> {
    if content.trim().is_empty() {
        return Ok(ModpinConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| ModpinError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Path of the project config file, whether or not it exists.
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_FILE_NAME)
}
