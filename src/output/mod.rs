//! The generated `dependencies.yml` document.
//!
//! ```yaml
//! version: "1.0"
//! settings:
//!   auto_resolve_latest: false
//! dependencies:
//!   runtime:
//!   - name: sodium
//!     identifiers:
//!       modrinth_id: AANobbMI
//!     version:
//!       default: 0.5.3
//!     source:
//!       type: modrinth
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::catalog::{Artifact, ResolvedDependency};
use crate::error::{ModpinError, Result};

/// Schema version written to every document.
pub const DOCUMENT_VERSION: &str = "1.0";

/// Root of the dependencies document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependenciesDocument {
    pub version: String,
    pub settings: DocumentSettings,
    pub dependencies: DependencyGroups,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSettings {
    /// Always false: every entry is pinned.
    pub auto_resolve_latest: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGroups {
    pub runtime: Vec<RuntimeEntry>,
}

/// One pinned runtime dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeEntry {
    pub name: String,
    pub identifiers: Identifiers,
    /// Only Modrinth pins carry a version; CurseForge pins are by file id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<PinnedVersion>,
    pub source: Source,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Identifiers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modrinth_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curseforge_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curseforge_file_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedVersion {
    pub default: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<&ResolvedDependency> for RuntimeEntry {
    fn from(resolved: &ResolvedDependency) -> Self {
        let (identifiers, version) = match &resolved.artifact {
            Artifact::Modrinth {
                project,
                version_number,
            } => (
                Identifiers {
                    modrinth_id: Some(project.clone()),
                    ..Identifiers::default()
                },
                Some(PinnedVersion {
                    default: version_number.clone(),
                }),
            ),
            Artifact::CurseForge {
                project_id,
                file_id,
            } => (
                Identifiers {
                    curseforge_id: Some(*project_id),
                    curseforge_file_id: Some(*file_id),
                    ..Identifiers::default()
                },
                None,
            ),
        };

        Self {
            name: resolved.name.clone(),
            identifiers,
            version,
            source: Source {
                kind: resolved.platform().as_str().to_string(),
            },
        }
    }
}

impl DependenciesDocument {
    /// Build the document for resolved dependencies, keeping their order.
    pub fn from_resolved(resolved: &[ResolvedDependency]) -> Self {
        Self {
            version: DOCUMENT_VERSION.to_string(),
            settings: DocumentSettings {
                auto_resolve_latest: false,
            },
            dependencies: DependencyGroups {
                runtime: resolved.iter().map(RuntimeEntry::from).collect(),
            },
        }
    }
}

/// Serialize the document for `resolved` to YAML.
pub fn render(resolved: &[ResolvedDependency]) -> Result<String> {
    serde_yaml::to_string(&DependenciesDocument::from_resolved(resolved))
        .map_err(|e| ModpinError::Other(anyhow::anyhow!("Failed to render dependencies: {}", e)))
}

/// Write the document to `path`, creating parent directories.
pub fn write_dependencies_file(path: &Path, resolved: &[ResolvedDependency]) -> Result<()> {
    let content = render(resolved)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    tracing::debug!("Wrote {} dependencies to {}", resolved.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn modrinth(name: &str, project: &str, version: &str) -> ResolvedDependency {
        ResolvedDependency {
            name: name.into(),
            artifact: Artifact::Modrinth {
                project: project.into(),
                version_number: version.into(),
            },
        }
    }

    fn curseforge(name: &str, project_id: u64, file_id: u64) -> ResolvedDependency {
        ResolvedDependency {
            name: name.into(),
            artifact: Artifact::CurseForge {
                project_id,
                file_id,
            },
        }
    }

    #[test]
    fn empty_document_has_empty_runtime_list() {
        let yaml = render(&[]).unwrap();
        assert!(yaml.contains("runtime: []"));
        assert!(yaml.contains("auto_resolve_latest: false"));
        assert!(yaml.contains("version: '1.0'") || yaml.contains("version: \"1.0\""));
    }

    #[test]
    fn modrinth_entry_shape() {
        let yaml = render(&[modrinth("sodium", "AANobbMI", "0.5.3")]).unwrap();
        let doc: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        let entry = &doc["dependencies"]["runtime"][0];

        assert_eq!(entry["name"].as_str(), Some("sodium"));
        assert_eq!(entry["identifiers"]["modrinth_id"].as_str(), Some("AANobbMI"));
        assert_eq!(entry["version"]["default"].as_str(), Some("0.5.3"));
        assert_eq!(entry["source"]["type"].as_str(), Some("modrinth"));
        assert!(entry["identifiers"].get("curseforge_id").is_none());
    }

    #[test]
    fn curseforge_entry_has_numeric_ids_and_no_version() {
        let yaml = render(&[curseforge("jei", 238222, 4712866)]).unwrap();
        let doc: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        let entry = &doc["dependencies"]["runtime"][0];

        assert_eq!(entry["identifiers"]["curseforge_id"].as_u64(), Some(238222));
        assert_eq!(entry["identifiers"]["curseforge_file_id"].as_u64(), Some(4712866));
        assert_eq!(entry["source"]["type"].as_str(), Some("curseforge"));
        assert!(entry.get("version").is_none());
    }

    #[test]
    fn order_is_preserved() {
        let resolved = vec![
            curseforge("architectury", 419699, 1),
            modrinth("cloth-config", "9s6osm5g", "11.1.106"),
        ];
        let doc = DependenciesDocument::from_resolved(&resolved);
        let names: Vec<_> = doc
            .dependencies
            .runtime
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["architectury", "cloth-config"]);
    }

    #[test]
    fn document_parses_back() {
        let resolved = vec![modrinth("sodium", "AANobbMI", "0.5.3"), curseforge("jei", 1, 2)];
        let yaml = render(&resolved).unwrap();
        let parsed: DependenciesDocument = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, DependenciesDocument::from_resolved(&resolved));
    }

    #[test]
    fn write_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("build").join("generated").join("dependencies.yml");

        write_dependencies_file(&path, &[modrinth("sodium", "AANobbMI", "0.5.3")]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("modrinth_id: AANobbMI"));
    }
}
