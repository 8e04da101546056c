//! CurseForge resolution by file listing (best-effort).
//!
//! CurseForge files have no canonical version number. Files are filtered by
//! the `gameVersions` labels; the declared range is only enforced when it is a
//! single exact version, by requiring the version to appear in the file name
//! or display name. Any other range is not checked against CurseForge files.

use reqwest::Url;
use serde_json::Value;
use std::sync::Arc;

use super::{
    parse_timestamp, select, Artifact, Candidate, Catalog, JsonClient, Platform,
    ResolvedDependency,
};
use crate::constraint::VersionRange;
use crate::error::{ModpinError, Result};
use crate::metadata::Dependency;
use crate::resolve::Target;

/// CurseForge API mirror that needs no API key.
pub const DEFAULT_API_URL: &str = "https://api.curse.tools/v1/cf";

/// Number of most recent files fetched per project.
pub const DEFAULT_PAGE_SIZE: u32 = 200;

/// Resolves against `GET /mods/{id}/files`.
pub struct CurseForgeCatalog {
    api_url: Url,
    page_size: u32,
    client: Arc<JsonClient>,
}

impl CurseForgeCatalog {
    pub fn new(api_url: Url, client: Arc<JsonClient>) -> Self {
        Self {
            api_url,
            page_size: DEFAULT_PAGE_SIZE,
            client,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Build the file listing URL for a numeric project id.
    pub fn files_url(&self, project_id: u64) -> Url {
        let id = project_id.to_string();
        let mut url = self.api_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["mods", id.as_str(), "files"]);
        }
        url.query_pairs_mut()
            .append_pair("pageSize", &self.page_size.to_string());
        url
    }
}

/// Parse a CurseForge project id. The error is the reason the alias was
/// rejected.
fn numeric_project_id(alias: &str) -> std::result::Result<u64, &'static str> {
    if alias.is_empty() || !alias.bytes().all(|b| b.is_ascii_digit()) {
        return Err("must be a numeric project id");
    }
    alias
        .parse()
        .map_err(|_| "is too large for a CurseForge project id")
}

fn lists_label(file: &Value, label: &str) -> bool {
    file.as_array()
        .is_some_and(|labels| labels.iter().any(|l| l.as_str() == Some(label)))
}

fn text_field<'a>(file: &'a Value, key: &str) -> &'a str {
    file.get(key).and_then(Value::as_str).unwrap_or_default()
}

impl Catalog for CurseForgeCatalog {
    fn platform(&self) -> Platform {
        Platform::CurseForge
    }

    fn resolve(&self, dependency: &Dependency, target: &Target) -> Result<ResolvedDependency> {
        let alias = self.alias_of(dependency, target)?;
        let project_id =
            numeric_project_id(alias).map_err(|reason| ModpinError::UnsupportedAlias {
                dependency: dependency.id.clone(),
                alias: alias.to_string(),
                reason,
                target: target.clone(),
            })?;
        let protocol_error = |message: String| ModpinError::CatalogProtocol {
            dependency: dependency.id.clone(),
            platform: Platform::CurseForge,
            target: target.clone(),
            message,
        };

        let url = self.files_url(project_id);
        let payload = self
            .client
            .get_json(&url)
            .map_err(|e| protocol_error(format!("{:#}", e)))?;
        let Some(files) = payload.get("data").and_then(Value::as_array) else {
            return Err(protocol_error(format!(
                "unexpected CurseForge response for mod id {}: missing 'data' list",
                project_id
            )));
        };

        let label = target.loader.curseforge_label();
        let mut candidates: Vec<Candidate<&Value>> = files
            .iter()
            .filter(|file| {
                let versions = file.get("gameVersions").unwrap_or(&Value::Null);
                lists_label(versions, &target.minecraft_version) && lists_label(versions, label)
            })
            .map(|file| Candidate {
                label: text_field(file, "fileName").to_string(),
                published_at: parse_timestamp(file.get("fileDate").and_then(Value::as_str)),
                item: file,
            })
            .collect();
        tracing::debug!(
            "{}: {} of {} CurseForge files match {} {}",
            dependency.id,
            candidates.len(),
            files.len(),
            label,
            target.minecraft_version
        );

        if candidates.is_empty() {
            return Err(ModpinError::NoCandidates {
                dependency: dependency.id.clone(),
                alias: alias.to_string(),
                platform: Platform::CurseForge,
                target: target.clone(),
            });
        }

        let range = VersionRange::parse(&dependency.version_range);
        if let Some(needle) = range.exact_bound() {
            candidates.retain(|c| {
                text_field(c.item, "fileName").contains(needle)
                    || text_field(c.item, "displayName").contains(needle)
            });
            if candidates.is_empty() {
                return Err(ModpinError::UnsatisfiableRange {
                    dependency: dependency.id.clone(),
                    alias: alias.to_string(),
                    range: dependency.version_range.clone(),
                    platform: Platform::CurseForge,
                    target: target.clone(),
                });
            }
        } else if !range.is_any() {
            tracing::debug!(
                "{}: range '{}' is not enforced against CurseForge file names",
                dependency.id,
                dependency.version_range
            );
        }

        let chosen = select(candidates, target.policy).ok_or_else(|| {
            protocol_error("no CurseForge file left to select".to_string())
        })?;
        let file_id = chosen
            .item
            .get("id")
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                protocol_error(format!(
                    "CurseForge file entry missing numeric id for {}",
                    project_id
                ))
            })?;

        tracing::info!(
            "Pinned {} to CurseForge {} file {} ({})",
            dependency.id,
            project_id,
            file_id,
            chosen.label
        );
        Ok(ResolvedDependency {
            name: dependency.id.clone(),
            artifact: Artifact::CurseForge {
                project_id,
                file_id,
            },
        })
    }
}
