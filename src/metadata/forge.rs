//! Forge and NeoForge `mods.toml` dependencies.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::{malformed, Dependency, MetadataSource, PlatformAliases, ANY_VERSION};
use crate::error::Result;

const CANDIDATE_PATHS: &[&str] = &[
    "src/main/resources/META-INF/mods.toml",
    "src/main/resources/META-INF/neoforge.mods.toml",
    "META-INF/mods.toml",
    "mods.toml",
];

/// Ids provided by the platform itself.
const PLATFORM_IDS: &[&str] = &["minecraft", "forge", "neoforge"];

#[derive(Debug, Deserialize)]
struct ModsToml {
    #[serde(default)]
    mods: Vec<ModEntry>,
    #[serde(default)]
    dependencies: BTreeMap<String, Vec<DependencyEntry>>,
}

#[derive(Debug, Deserialize)]
struct ModEntry {
    #[serde(rename = "modId")]
    mod_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DependencyEntry {
    #[serde(rename = "modId")]
    mod_id: Option<String>,
    mandatory: Option<bool>,
    /// NeoForge replaces `mandatory` with `type = "required"`.
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(rename = "versionRange")]
    version_range: Option<String>,
    #[serde(rename = "mc-publish")]
    publish: Option<PublishTable>,
}

#[derive(Debug, Deserialize)]
struct PublishTable {
    modrinth: Option<String>,
    curseforge: Option<AliasValue>,
    #[serde(default)]
    ignore: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AliasValue {
    Text(String),
    Number(i64),
}

impl AliasValue {
    fn to_alias(&self) -> String {
        match self {
            Self::Text(text) => text.trim().to_string(),
            Self::Number(n) => n.to_string(),
        }
    }
}

impl DependencyEntry {
    fn is_required(&self) -> bool {
        self.mandatory == Some(true)
            || self
                .kind
                .as_deref()
                .is_some_and(|kind| kind.eq_ignore_ascii_case("required"))
    }

    fn aliases(&self) -> PlatformAliases {
        let mut aliases = PlatformAliases::default();
        if let Some(publish) = &self.publish {
            if let Some(modrinth) = &publish.modrinth {
                aliases.merge("modrinth", modrinth);
            }
            if let Some(curseforge) = &publish.curseforge {
                aliases.merge("curseforge", &curseforge.to_alias());
            }
        }
        aliases
    }
}

/// Reads `[[dependencies.<modId>]]` for the first declared mod.
///
/// Aliases come from a nested `mc-publish` table on each entry:
///
/// ```toml
/// [[dependencies.examplemod]]
/// modId = "jei"
/// mandatory = true
/// versionRange = "[15.2,)"
/// mc-publish = { curseforge = 238222, modrinth = "u6dRKJwZ" }
/// ```
pub struct ForgeSource;

impl MetadataSource for ForgeSource {
    fn name(&self) -> &'static str {
        "forge"
    }

    fn candidate_paths(&self) -> &'static [&'static str] {
        CANDIDATE_PATHS
    }

    fn parse(&self, path: &Path, content: &str) -> Result<Vec<Dependency>> {
        let manifest: ModsToml = toml::from_str(content).map_err(|e| malformed(path, e))?;

        let Some(owner) = manifest
            .mods
            .first()
            .and_then(|m| m.mod_id.as_deref())
            .filter(|id| !id.is_empty())
        else {
            tracing::debug!("{} declares no mods; no dependencies read", path.display());
            return Ok(Vec::new());
        };

        let Some(entries) = manifest.dependencies.get(owner) else {
            return Ok(Vec::new());
        };

        let mut deps = Vec::new();
        for entry in entries {
            let Some(id) = entry.mod_id.as_deref().filter(|id| !id.is_empty()) else {
                continue;
            };
            if PLATFORM_IDS.contains(&id) || !entry.is_required() {
                continue;
            }
            if entry.publish.as_ref().is_some_and(|p| p.ignore) {
                tracing::debug!("Skipping {}: marked ignore in mc-publish", id);
                continue;
            }

            let range = entry.version_range.as_deref().unwrap_or(ANY_VERSION);
            deps.push(Dependency::new(id, range).with_aliases(entry.aliases()));
        }

        Ok(deps)
    }
}
