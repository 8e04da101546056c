//! Error types for modpin operations.
//!
//! This module defines [`ModpinError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `ModpinError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `ModpinError::Other`) for unexpected errors
//! - Every resolution error names the dependency and the loader/Minecraft
//!   version/policy it was resolved against
//!
//! Range parsing never produces an error: malformed range fragments are
//! dropped by [`crate::constraint::parse_token`], which loosens the range.

use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::Platform;
use crate::resolve::Target;

/// Core error type for modpin operations.
#[derive(Debug, Error)]
pub enum ModpinError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A mod metadata file exists but does not have the expected shape.
    #[error("Malformed mod metadata at {path}: {message}")]
    MalformedMetadata { path: PathBuf, message: String },

    /// A required dependency has neither a Modrinth nor a CurseForge alias.
    #[error(
        "Required dependency '{dependency}' has no mc-publish Modrinth/CurseForge alias in metadata ({target})"
    )]
    AliasMissing { dependency: String, target: Target },

    /// The catalog has candidates but none satisfy the declared range.
    #[error(
        "No {platform} candidates for {dependency} ({alias}) satisfy range '{range}' ({target})"
    )]
    UnsatisfiableRange {
        dependency: String,
        alias: String,
        range: String,
        platform: Platform,
        target: Target,
    },

    /// Nothing on the catalog matches the loader and Minecraft version.
    #[error("No {platform} files for {dependency} ({alias}) match {target}")]
    NoCandidates {
        dependency: String,
        alias: String,
        platform: Platform,
        target: Target,
    },

    /// Transport failure or unexpected response shape from a catalog.
    #[error("{platform} request for {dependency} failed ({target}): {message}")]
    CatalogProtocol {
        dependency: String,
        platform: Platform,
        target: Target,
        message: String,
    },

    /// CurseForge aliases must be numeric project ids that fit in a `u64`.
    #[error("CurseForge alias for dependency {dependency} {reason}; got '{alias}' ({target})")]
    UnsupportedAlias {
        dependency: String,
        alias: String,
        reason: &'static str,
        target: Target,
    },

    /// Several dependencies failed when running without fail-fast.
    #[error("{} dependencies failed to resolve:\n{}", .errors.len(), format_errors(.errors))]
    Multiple { errors: Vec<ModpinError> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn format_errors(errors: &[ModpinError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result type alias for modpin operations.
pub type Result<T> = std::result::Result<T, ModpinError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{Loader, Policy};

    fn target() -> Target {
        Target::new(Loader::Forge, "1.20.1", Policy::Max)
    }

    #[test]
    fn malformed_metadata_displays_path_and_message() {
        let err = ModpinError::MalformedMetadata {
            path: PathBuf::from("/mod/fabric.mod.json"),
            message: "expected value at line 1".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/mod/fabric.mod.json"));
        assert!(msg.contains("expected value"));
    }

    #[test]
    fn alias_missing_names_dependency_and_context() {
        let err = ModpinError::AliasMissing {
            dependency: "jei".into(),
            target: target(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'jei'"));
        assert!(msg.contains("loader=forge"));
        assert!(msg.contains("mc=1.20.1"));
        assert!(msg.contains("policy=max"));
    }

    #[test]
    fn unsatisfiable_range_displays_range_and_alias() {
        let err = ModpinError::UnsatisfiableRange {
            dependency: "sodium".into(),
            alias: "AANobbMI".into(),
            range: ">=9.0".into(),
            platform: Platform::Modrinth,
            target: target(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Modrinth"));
        assert!(msg.contains("sodium (AANobbMI)"));
        assert!(msg.contains("'>=9.0'"));
    }

    #[test]
    fn no_candidates_displays_platform() {
        let err = ModpinError::NoCandidates {
            dependency: "jei".into(),
            alias: "238222".into(),
            platform: Platform::CurseForge,
            target: target(),
        };
        let msg = err.to_string();
        assert!(msg.contains("CurseForge"));
        assert!(msg.contains("jei (238222)"));
    }

    #[test]
    fn unsupported_alias_displays_alias_and_context() {
        let err = ModpinError::UnsupportedAlias {
            dependency: "jei".into(),
            alias: "jei-slug".into(),
            reason: "must be a numeric project id",
            target: target(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'jei-slug'"));
        assert!(msg.contains("must be a numeric project id"));
        assert!(msg.contains("loader=forge mc=1.20.1 policy=max"));
    }

    #[test]
    fn multiple_lists_every_error() {
        let err = ModpinError::Multiple {
            errors: vec![
                ModpinError::UnsupportedAlias {
                    dependency: "a".into(),
                    alias: "x".into(),
                    reason: "must be a numeric project id",
                    target: target(),
                },
                ModpinError::AliasMissing {
                    dependency: "b".into(),
                    target: target(),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("2 dependencies failed"));
        assert!(msg.contains("  - CurseForge alias for dependency a"));
        assert!(msg.contains("  - Required dependency 'b'"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: ModpinError = io_err.into();
        assert!(matches!(err, ModpinError::Io(_)));
    }
}
