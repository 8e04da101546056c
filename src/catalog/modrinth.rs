//! Modrinth resolution by canonical `version_number`.

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

/// Public Modrinth API root.
pub const DEFAULT_API_URL: &str = "https://api.modrinth.com/v2";

/// Resolves against `GET /project/{alias}/version`.
///
/// The loader and Minecraft version are filtered server-side; the declared
/// range is checked locally against each `version_number`.
pub struct ModrinthCatalog {
    api_url: Url,
    client: Arc<JsonClient>,
}

impl ModrinthCatalog {
    pub fn new(api_url: Url, client: Arc<JsonClient>) -> Self {
        Self { api_url, client }
    }

    /// Build the version listing URL for a project alias.
    pub fn versions_url(&self, alias: &str, target: &Target) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["project", alias, "version"]);
        }
        url.query_pairs_mut()
            .append_pair("loaders", &json_list(target.loader.as_str()))
            .append_pair("game_versions", &json_list(&target.minecraft_version));
        url
    }
}

fn json_list(item: &str) -> String {
    Value::Array(vec![Value::String(item.to_string())]).to_string()
}

impl Catalog for ModrinthCatalog {
    fn platform(&self) -> Platform {
        Platform::Modrinth
    }

    fn resolve(&self, dependency: &Dependency, target: &Target) -> Result<ResolvedDependency> {
        let alias = self.alias_of(dependency, target)?;
        let protocol_error = |message: String| ModpinError::CatalogProtocol {
            dependency: dependency.id.clone(),
            platform: Platform::Modrinth,
            target: target.clone(),
            message,
        };

        let url = self.versions_url(alias, target);
        let payload = self
            .client
            .get_json(&url)
            .map_err(|e| protocol_error(format!("{:#}", e)))?;
        let Value::Array(versions) = payload else {
            return Err(protocol_error(format!(
                "unexpected Modrinth response for '{}': expected a list of versions",
                alias
            )));
        };

        let listed: Vec<Candidate<String>> = versions
            .iter()
            .filter_map(|version| {
                let number = version.get("version_number")?.as_str()?;
                if number.is_empty() {
                    return None;
                }
                Some(Candidate {
                    label: number.to_string(),
                    published_at: parse_timestamp(
                        version.get("date_published").and_then(Value::as_str),
                    ),
                    item: number.to_string(),
                })
            })
            .collect();

        if listed.is_empty() {
            return Err(ModpinError::NoCandidates {
                dependency: dependency.id.clone(),
                alias: alias.to_string(),
                platform: Platform::Modrinth,
                target: target.clone(),
            });
        }

        let range = VersionRange::parse(&dependency.version_range);
        let total = listed.len();
        let candidates: Vec<_> = listed
            .into_iter()
            .filter(|c| range.matches(&c.item))
            .collect();
        tracing::debug!(
            "{}: {} of {} Modrinth versions satisfy '{}'",
            dependency.id,
            candidates.len(),
            total,
            range
        );

        let chosen = select(candidates, target.policy).ok_or_else(|| {
            ModpinError::UnsatisfiableRange {
                dependency: dependency.id.clone(),
                alias: alias.to_string(),
                range: dependency.version_range.clone(),
                platform: Platform::Modrinth,
                target: target.clone(),
            }
        })?;

        tracing::info!("Pinned {} to Modrinth {} {}", dependency.id, alias, chosen.label);
        Ok(ResolvedDependency {
            name: dependency.id.clone(),
            artifact: Artifact::Modrinth {
                project: alias.to_string(),
                version_number: chosen.item,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::HttpSettings;
    use crate::metadata::PlatformAliases;
    use crate::resolve::{Loader, Policy};
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn catalog(server: &MockServer) -> ModrinthCatalog {
        let client = JsonClient::new(HttpSettings {
            retries: 0,
            timeout: Duration::from_secs(5),
            ..HttpSettings::default()
        })
        .unwrap();
        ModrinthCatalog::new(Url::parse(&server.base_url()).unwrap(), Arc::new(client))
    }

    fn sodium(range: &str) -> Dependency {
        let mut aliases = PlatformAliases::default();
        aliases.merge("modrinth", "AANobbMI");
        Dependency::new("sodium", range).with_aliases(aliases)
    }

    fn target(policy: Policy) -> Target {
        Target::new(Loader::Fabric, "1.20.1", policy)
    }

    fn mock_versions(server: &MockServer, body: Value) {
        server.mock(|when, then| {
            when.method(GET)
                .path("/project/AANobbMI/version")
                .query_param("loaders", r#"["fabric"]"#)
                .query_param("game_versions", r#"["1.20.1"]"#);
            then.status(200).json_body(body);
        });
    }

    fn two_versions() -> Value {
        json!([
            {"id": "b", "version_number": "1.1.0", "date_published": "2024-03-01T00:00:00Z"},
            {"id": "a", "version_number": "1.0.0", "date_published": "2024-01-01T00:00:00Z"}
        ])
    }

    fn pinned_version(resolved: &ResolvedDependency) -> &str {
        match &resolved.artifact {
            Artifact::Modrinth { version_number, .. } => version_number,
            other => panic!("unexpected artifact {:?}", other),
        }
    }

    #[test]
    fn versions_url_encodes_filters() {
        let server = MockServer::start();
        let url = catalog(&server).versions_url("my mod", &target(Policy::Max));
        assert!(url.path().ends_with("/project/my%20mod/version"));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("loaders".to_string(), r#"["fabric"]"#.to_string()),
                ("game_versions".to_string(), r#"["1.20.1"]"#.to_string()),
            ]
        );
    }

    #[test]
    fn versions_url_keeps_api_prefix() {
        let client = Arc::new(JsonClient::new(HttpSettings::default()).unwrap());
        let catalog = ModrinthCatalog::new(Url::parse(DEFAULT_API_URL).unwrap(), client);
        let url = catalog.versions_url("AANobbMI", &target(Policy::Max));
        assert_eq!(url.path(), "/v2/project/AANobbMI/version");
    }

    #[test]
    fn min_policy_picks_earliest() {
        let server = MockServer::start();
        mock_versions(&server, two_versions());

        let resolved = catalog(&server)
            .resolve(&sodium("*"), &target(Policy::Min))
            .unwrap();
        assert_eq!(pinned_version(&resolved), "1.0.0");
        assert_eq!(resolved.name, "sodium");
    }

    #[test]
    fn max_policy_picks_latest() {
        let server = MockServer::start();
        mock_versions(&server, two_versions());

        let resolved = catalog(&server)
            .resolve(&sodium("*"), &target(Policy::Max))
            .unwrap();
        assert_eq!(pinned_version(&resolved), "1.1.0");
        assert_eq!(
            resolved.artifact,
            Artifact::Modrinth {
                project: "AANobbMI".into(),
                version_number: "1.1.0".into()
            }
        );
    }

    #[test]
    fn range_filters_before_selection() {
        let server = MockServer::start();
        mock_versions(&server, two_versions());

        let resolved = catalog(&server)
            .resolve(&sodium("<1.1"), &target(Policy::Max))
            .unwrap();
        assert_eq!(pinned_version(&resolved), "1.0.0");
    }

    #[test]
    fn unsatisfiable_range_fails() {
        let server = MockServer::start();
        mock_versions(&server, two_versions());

        let err = catalog(&server)
            .resolve(&sodium(">=2.0"), &target(Policy::Max))
            .unwrap_err();
        assert!(matches!(err, ModpinError::UnsatisfiableRange { .. }));
        let msg = err.to_string();
        assert!(msg.contains("sodium (AANobbMI)"));
        assert!(msg.contains("loader=fabric mc=1.20.1"));
    }

    #[test]
    fn entries_without_version_number_are_skipped() {
        let server = MockServer::start();
        mock_versions(
            &server,
            json!([
                {"version_number": "", "date_published": "2024-05-01T00:00:00Z"},
                {"date_published": "2024-04-01T00:00:00Z"},
                "junk",
                {"version_number": "0.5.3", "date_published": "2023-01-01T00:00:00Z"}
            ]),
        );

        let resolved = catalog(&server)
            .resolve(&sodium("*"), &target(Policy::Max))
            .unwrap();
        assert_eq!(pinned_version(&resolved), "0.5.3");
    }

    #[test]
    fn empty_listing_is_no_candidates() {
        let server = MockServer::start();
        mock_versions(&server, json!([]));

        let err = catalog(&server)
            .resolve(&sodium("*"), &target(Policy::Max))
            .unwrap_err();
        assert!(matches!(err, ModpinError::NoCandidates { .. }));
    }

    #[test]
    fn non_list_response_is_protocol_error() {
        let server = MockServer::start();
        mock_versions(&server, json!({"error": "not_found"}));

        let err = catalog(&server)
            .resolve(&sodium("*"), &target(Policy::Max))
            .unwrap_err();
        assert!(matches!(err, ModpinError::CatalogProtocol { .. }));
    }

    #[test]
    fn http_failure_is_protocol_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/project/AANobbMI/version");
            then.status(404);
        });

        let err = catalog(&server)
            .resolve(&sodium("*"), &target(Policy::Max))
            .unwrap_err();
        assert!(matches!(err, ModpinError::CatalogProtocol { .. }));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn missing_alias_is_reported() {
        let server = MockServer::start();
        let err = catalog(&server)
            .resolve(&Dependency::new("sodium", "*"), &target(Policy::Max))
            .unwrap_err();
        assert!(matches!(err, ModpinError::AliasMissing { .. }));
    }
}
