//! Quilt `quilt.mod.json` dependencies.

use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

use super::fabric::PublishSection;
use super::{malformed, AliasMap, Dependency, MetadataSource, ANY_VERSION};
use crate::error::Result;

const CANDIDATE_PATHS: &[&str] = &["src/main/resources/quilt.mod.json", "quilt.mod.json"];

/// Ids provided by the platform itself.
const PLATFORM_IDS: &[&str] = &["minecraft", "java", "quilt_loader"];

#[derive(Debug, Deserialize)]
struct QuiltModJson {
    depends: Option<Vec<DependsItem>>,
    quilt_loader: Option<QuiltLoader>,
    #[serde(rename = "mc-publish", default)]
    mc_publish: PublishSection,
}

#[derive(Debug, Deserialize)]
struct QuiltLoader {
    depends: Option<Vec<DependsItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DependsItem {
    Id(String),
    Entry {
        id: Option<String>,
        versions: Option<Value>,
        #[serde(default)]
        optional: bool,
    },
    Other(Value),
}

/// Reads the `depends` list and `mc-publish.dependencies`.
///
/// Entries are either a bare id or `{ "id", "versions", "optional" }`. The list
/// is taken from the top level, or from `quilt_loader.depends` when the top
/// level has none.
pub struct QuiltSource;

impl MetadataSource for QuiltSource {
    fn name(&self) -> &'static str {
        "quilt"
    }

    fn candidate_paths(&self) -> &'static [&'static str] {
        CANDIDATE_PATHS
    }

    fn parse(&self, path: &Path, content: &str) -> Result<Vec<Dependency>> {
        let manifest: QuiltModJson =
            serde_json::from_str(content).map_err(|e| malformed(path, e))?;
        let aliases = AliasMap::from_annotations(path, &manifest.mc_publish.dependencies)?;

        let items = manifest
            .depends
            .or_else(|| manifest.quilt_loader.and_then(|loader| loader.depends))
            .unwrap_or_default();

        let mut deps = Vec::new();
        for item in &items {
            let (id, range) = match item {
                DependsItem::Id(id) => (id.as_str(), ANY_VERSION),
                DependsItem::Entry {
                    id: Some(id),
                    versions,
                    optional: false,
                } => (
                    id.as_str(),
                    versions
                        .as_ref()
                        .and_then(Value::as_str)
                        .unwrap_or(ANY_VERSION),
                ),
                DependsItem::Entry { .. } | DependsItem::Other(_) => continue,
            };

            if id.is_empty() || PLATFORM_IDS.contains(&id) {
                continue;
            }
            deps.push(Dependency::new(id, range).with_aliases(aliases.aliases_for(id)));
        }

        Ok(deps)
    }
}
