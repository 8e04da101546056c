//! Fabric `fabric.mod.json` dependencies.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use super::{malformed, AliasMap, Dependency, MetadataSource, ANY_VERSION};
use crate::error::Result;

const CANDIDATE_PATHS: &[&str] = &["src/main/resources/fabric.mod.json", "fabric.mod.json"];

/// Ids provided by the platform itself.
const PLATFORM_IDS: &[&str] = &["minecraft", "java", "fabricloader"];

#[derive(Debug, Deserialize)]
struct FabricModJson {
    #[serde(default)]
    depends: BTreeMap<String, Value>,
    #[serde(default)]
    custom: FabricCustom,
}

#[derive(Debug, Default, Deserialize)]
struct FabricCustom {
    #[serde(rename = "mc-publish", default)]
    mc_publish: PublishSection,
}

/// The `mc-publish` object shared by Fabric and Quilt manifests.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PublishSection {
    #[serde(default)]
    pub(crate) dependencies: Vec<Value>,
}

/// Reads `depends` and `custom["mc-publish"].dependencies`.
///
/// Every entry of `depends` is required in Fabric. A range that is not a
/// string (Fabric also allows arrays of ranges) is treated as `*`.
pub struct FabricSource;

impl MetadataSource for FabricSource {
    fn name(&self) -> &'static str {
        "fabric"
    }

    fn candidate_paths(&self) -> &'static [&'static str] {
        CANDIDATE_PATHS
    }

    fn parse(&self, path: &Path, content: &str) -> Result<Vec<Dependency>> {
        let manifest: FabricModJson =
            serde_json::from_str(content).map_err(|e| malformed(path, e))?;
        let aliases = AliasMap::from_annotations(path, &manifest.custom.mc_publish.dependencies)?;

        let deps = manifest
            .depends
            .iter()
            .filter(|(id, _)| !PLATFORM_IDS.contains(&id.as_str()))
            .map(|(id, range)| {
                let range = range.as_str().unwrap_or(ANY_VERSION);
                Dependency::new(id.as_str(), range).with_aliases(aliases.aliases_for(id))
            })
            .collect();

        Ok(deps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parse(content: &str) -> Result<Vec<Dependency>> {
        FabricSource.parse(Path::new("fabric.mod.json"), content)
    }

    #[test]
    fn reads_depends_and_annotations() {
        let deps = parse(
            r#"{
                "schemaVersion": 1,
                "id": "examplemod",
                "depends": {
                    "fabricloader": ">=0.15.0",
                    "minecraft": "~1.20.1",
                    "java": ">=17",
                    "fabric-api": ">=0.92.0",
                    "cloth-config": "*"
                },
                "custom": {
                    "modmenu": {"badges": []},
                    "mc-publish": {
                        "dependencies": ["fabric-api(required){modrinth:P7dR8mSH}{curseforge:306612}"]
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(deps.len(), 2);
        let cloth = &deps[0];
        assert_eq!(cloth.id, "cloth-config");
        assert_eq!(cloth.version_range, "*");
        assert_eq!(cloth.aliases.count(), 0);

        let api = &deps[1];
        assert_eq!(api.id, "fabric-api");
        assert_eq!(api.version_range, ">=0.92.0");
        assert_eq!(api.aliases.modrinth.as_deref(), Some("P7dR8mSH"));
        assert_eq!(api.aliases.curseforge.as_deref(), Some("306612"));
    }

    #[test]
    fn non_string_range_is_any() {
        let deps = parse(r#"{"depends": {"sodium": [">=0.5", "<0.6"], "iris": ""}}"#).unwrap();
        assert_eq!(deps[0].id, "iris");
        assert_eq!(deps[0].version_range, "*");
        assert_eq!(deps[1].id, "sodium");
        assert_eq!(deps[1].version_range, "*");
    }

    #[test]
    fn missing_depends_is_empty() {
        assert!(parse(r#"{"id": "examplemod"}"#).unwrap().is_empty());
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = parse("{ not json").unwrap_err();
        assert!(matches!(
            err,
            crate::error::ModpinError::MalformedMetadata { .. }
        ));
    }

    #[test]
    fn depends_of_wrong_shape_is_malformed() {
        assert!(parse(r#"{"depends": ["fabric-api"]}"#).is_err());
    }

    #[test]
    fn extract_prefers_resources_path() {
        let temp = TempDir::new().unwrap();
        let resources = temp.path().join("src/main/resources");
        fs::create_dir_all(&resources).unwrap();
        fs::write(
            resources.join("fabric.mod.json"),
            r#"{"depends": {"from-resources": "*"}}"#,
        )
        .unwrap();
        fs::write(
            temp.path().join("fabric.mod.json"),
            r#"{"depends": {"from-root": "*"}}"#,
        )
        .unwrap();

        let deps = FabricSource.extract(temp.path()).unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].id, "from-resources");
    }

    #[test]
    fn extract_without_manifest_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(FabricSource.extract(temp.path()).unwrap().is_empty());
    }
}
