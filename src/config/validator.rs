//! Configuration validation rules.
//!
//! - Catalog API URLs must parse and be usable as a base
//! - At least one worker
//! - CurseForge page size within what the API accepts

use crate::config::schema::{parse_api_url, ModpinConfig};
use crate::error::{ModpinError, Result};

/// Largest `pageSize` the CurseForge files endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 10_000;

/// Validation error with the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted config path, e.g. `resolve.workers`
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

/// Validate a configuration and return all errors.
pub fn validate_config(config: &ModpinConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let urls = [
        ("catalogs.modrinth.api_url", &config.catalogs.modrinth.api_url),
        (
            "catalogs.curseforge.api_url",
            &config.catalogs.curseforge.api_url,
        ),
    ];
    for (field, value) in urls {
        if let Err(e) = parse_api_url(field, value) {
            let message = match e {
                ModpinError::ConfigValidationError { message } => message,
                other => other.to_string(),
            };
            errors.push(ValidationError {
                field: field.to_string(),
                message,
            });
        }
    }

    if config.resolve.workers == 0 {
        errors.push(ValidationError {
            field: "resolve.workers".to_string(),
            message: "resolve.workers must be at least 1".to_string(),
        });
    }

    let page_size = config.catalogs.curseforge.page_size;
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        errors.push(ValidationError {
            field: "catalogs.curseforge.page_size".to_string(),
            message: format!(
                "catalogs.curseforge.page_size must be between 1 and {}; got {}",
                MAX_PAGE_SIZE, page_size
            ),
        });
    }

    if config.http.user_agent.trim().is_empty() {
        errors.push(ValidationError {
            field: "http.user_agent".to_string(),
            message: "http.user_agent must not be empty".to_string(),
        });
    }

    errors
}

/// Validate, joining every error into one ModpinError.
pub fn validate(config: &ModpinConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(ModpinError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}
