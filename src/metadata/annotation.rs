//! mc-publish dependency annotations.
//!
//! Publishing setups annotate dependencies with catalog aliases using the
//! mc-publish string syntax:
//!
//! ```text
//! id@version(type){platform:alias}{platform2:alias2}#(ignore:github)
//! ```
//!
//! Only the id and the `{platform:alias}` groups are used here.

use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use super::{malformed, PlatformAliases};
use crate::error::Result;

/// Regex for the leading dependency id.
static ANNOTATION_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_\-.]+)").expect("ANNOTATION_ID must compile"));

/// Regex for one `{platform:alias}` group.
static ANNOTATION_ALIAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\s*([a-zA-Z0-9_-]+)\s*:\s*([^}]+?)\s*\}").expect("ANNOTATION_ALIAS must compile")
});

/// A parsed mc-publish dependency string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishAnnotation {
    pub id: String,
    /// `(platform, alias)` pairs in declaration order, platform lower-cased.
    pub aliases: Vec<(String, String)>,
}

/// Parse one mc-publish dependency string.
///
/// Returns `None` when the string does not start with a dependency id.
///
/// ```
/// use modpin::metadata::parse_publish_annotation;
///
/// let parsed = parse_publish_annotation("sodium@0.5(required){modrinth:AANobbMI}").unwrap();
/// assert_eq!(parsed.id, "sodium");
/// assert_eq!(parsed.aliases, vec![("modrinth".to_string(), "AANobbMI".to_string())]);
/// ```
pub fn parse_publish_annotation(value: &str) -> Option<PublishAnnotation> {
    let value = value.trim();
    let id = ANNOTATION_ID.captures(value)?.get(1)?.as_str().to_string();

    let aliases = ANNOTATION_ALIAS
        .captures_iter(value)
        .map(|caps| {
            (
                caps[1].trim().to_lowercase(),
                caps[2].trim().to_string(),
            )
        })
        .collect();

    Some(PublishAnnotation { id, aliases })
}

/// Aliases collected from a list of annotations, keyed by dependency id.
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    entries: BTreeMap<String, PlatformAliases>,
}

impl AliasMap {
    /// Build the map from a manifest's annotation list.
    ///
    /// Non-string list items are skipped. A string that does not start with a
    /// dependency id makes the manifest malformed.
    pub fn from_annotations(path: &Path, items: &[Value]) -> Result<Self> {
        let mut map = Self::default();
        for item in items {
            let Some(text) = item.as_str() else {
                continue;
            };
            let annotation = parse_publish_annotation(text).ok_or_else(|| {
                malformed(path, format!("invalid mc-publish dependency string '{}'", text))
            })?;
            map.insert(annotation);
        }
        Ok(map)
    }

    /// Merge an annotation; later aliases for the same platform win.
    pub fn insert(&mut self, annotation: PublishAnnotation) {
        if annotation.aliases.is_empty() {
            return;
        }
        let entry = self.entries.entry(annotation.id).or_default();
        for (platform, alias) in &annotation.aliases {
            entry.merge(platform, alias);
        }
    }

    /// Aliases for a dependency id, empty when none were annotated.
    pub fn aliases_for(&self, id: &str) -> PlatformAliases {
        self.entries.get(id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_full_syntax() {
        let parsed = parse_publish_annotation(
            "fabric-api@0.92.0(required){modrinth:P7dR8mSH}{curseforge:306612}#(ignore:github)",
        )
        .unwrap();
        assert_eq!(parsed.id, "fabric-api");
        assert_eq!(
            parsed.aliases,
            vec![
                ("modrinth".to_string(), "P7dR8mSH".to_string()),
                ("curseforge".to_string(), "306612".to_string()),
            ]
        );
    }

    #[test]
    fn bare_id_has_no_aliases() {
        let parsed = parse_publish_annotation("cloth-config").unwrap();
        assert_eq!(parsed.id, "cloth-config");
        assert!(parsed.aliases.is_empty());
    }

    #[test]
    fn platform_is_lowercased_and_whitespace_trimmed() {
        let parsed = parse_publish_annotation("  jei { CurseForge :  238222 } ").unwrap();
        assert_eq!(parsed.id, "jei");
        assert_eq!(
            parsed.aliases,
            vec![("curseforge".to_string(), "238222".to_string())]
        );
    }

    #[test]
    fn missing_id_is_rejected() {
        assert!(parse_publish_annotation("{modrinth:abc}").is_none());
        assert!(parse_publish_annotation("").is_none());
    }

    #[test]
    fn alias_map_merges_repeated_annotations() {
        let items = vec![
            json!("jei{modrinth:jei-old}"),
            json!(42),
            json!("jei{curseforge:238222}"),
            json!("jei{modrinth:u6dRKJwZ}"),
            json!("cloth-config"),
        ];
        let map = AliasMap::from_annotations(Path::new("fabric.mod.json"), &items).unwrap();

        let jei = map.aliases_for("jei");
        assert_eq!(jei.modrinth.as_deref(), Some("u6dRKJwZ"));
        assert_eq!(jei.curseforge.as_deref(), Some("238222"));
        assert_eq!(map.aliases_for("cloth-config"), PlatformAliases::default());
    }

    #[test]
    fn alias_map_rejects_invalid_strings() {
        let items = vec![json!("@1.0{modrinth:abc}")];
        let err = AliasMap::from_annotations(Path::new("quilt.mod.json"), &items).unwrap_err();
        assert!(err.to_string().contains("quilt.mod.json"));
        assert!(err.to_string().contains("@1.0"));
    }
}
