//! Configuration loading and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and environment layering in [`loader`]
//! - Validation in [`validator`]
//!
//! # Configuration Sources
//!
//! modpin layers configuration in this order:
//! 1. Built-in defaults
//! 2. Project config (`.modpin.yml` in the project root), or `--config <FILE>`
//! 3. `MODPIN_*` environment variables
//! 4. Command-line flags

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{
    load_config_file, parse_config, project_config_path, ConfigLoader, CONFIG_FILE_NAME,
};
pub use schema::{
    CatalogsConfig, CurseForgeConfig, HttpConfig, ModpinConfig, ModrinthConfig, ResolveConfig,
};
pub use validator::{validate, validate_config, ValidationError};
