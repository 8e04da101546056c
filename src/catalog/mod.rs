//! Distribution catalogs that dependencies are pinned against.
//!
//! Both catalogs follow the same shape (query, filter by loader and Minecraft
//! version, filter by range, select by policy) but differ in what a candidate
//! is:
//!
//! - [`ModrinthCatalog`] - versions carry a canonical `version_number`, so the
//!   declared range is enforced exactly.
//! - [`CurseForgeCatalog`] - files only carry a file name and display name, so
//!   only an exact-version range is enforced, by substring match.
//!
//! # Architecture
//!
//! - [`Catalog`] - the resolution capability, one implementation per catalog
//! - [`Candidate`] / [`select`] - shared policy-based selection
//! - [`http`] - blocking JSON transport with bounded retry

pub mod curseforge;
pub mod http;
pub mod modrinth;

pub use curseforge::CurseForgeCatalog;
pub use http::{HttpSettings, JsonClient};
pub use modrinth::ModrinthCatalog;

use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::error::{ModpinError, Result};
use crate::metadata::Dependency;
use crate::resolve::{Policy, Target};

/// A distribution catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    Modrinth,
    CurseForge,
}

impl Platform {
    /// Lower-case key used in annotations and the output document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Modrinth => "modrinth",
            Self::CurseForge => "curseforge",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Modrinth => "Modrinth",
            Self::CurseForge => "CurseForge",
        })
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "modrinth" => Ok(Self::Modrinth),
            "curseforge" => Ok(Self::CurseForge),
            _ => Err(format!("unknown platform: {}", s)),
        }
    }
}

/// The exact artifact a dependency was pinned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// A Modrinth project version.
    Modrinth {
        project: String,
        version_number: String,
    },
    /// A CurseForge project file.
    CurseForge { project_id: u64, file_id: u64 },
}

/// A dependency pinned to one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    /// The dependency's mod id.
    pub name: String,
    pub artifact: Artifact,
}

impl ResolvedDependency {
    /// Catalog that produced the pin.
    pub fn platform(&self) -> Platform {
        match self.artifact {
            Artifact::Modrinth { .. } => Platform::Modrinth,
            Artifact::CurseForge { .. } => Platform::CurseForge,
        }
    }
}

impl fmt::Display for ResolvedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.artifact {
            Artifact::Modrinth {
                project,
                version_number,
            } => write!(f, "{} -> modrinth {}@{}", self.name, project, version_number),
            Artifact::CurseForge {
                project_id,
                file_id,
            } => write!(f, "{} -> curseforge {}/{}", self.name, project_id, file_id),
        }
    }
}

/// Resolves a dependency to one artifact on a catalog.
pub trait Catalog: Send + Sync {
    /// The catalog this implementation talks to.
    fn platform(&self) -> Platform;

    /// Pin `dependency` for the target.
    ///
    /// Fails when the dependency has no alias for this catalog, the catalog
    /// cannot be queried, or no candidate is acceptable.
    fn resolve(&self, dependency: &Dependency, target: &Target) -> Result<ResolvedDependency>;

    /// The dependency's alias on this catalog.
    fn alias_of<'a>(&self, dependency: &'a Dependency, target: &Target) -> Result<&'a str> {
        dependency
            .aliases
            .get(self.platform())
            .ok_or_else(|| ModpinError::AliasMissing {
                dependency: dependency.id.clone(),
                target: target.clone(),
            })
    }
}

/// A catalog entry that passed the loader and Minecraft version filters.
#[derive(Debug, Clone)]
pub struct Candidate<T> {
    /// Version number or file name, for logging.
    pub label: String,
    pub published_at: DateTime<Utc>,
    pub item: T,
}

/// Pick the earliest (`min`) or latest (`max`) published candidate.
///
/// Sorting is stable, so among candidates published at the same instant
/// `min` keeps the first in input order and `max` the last.
pub fn select<T>(mut candidates: Vec<Candidate<T>>, policy: Policy) -> Option<Candidate<T>> {
    candidates.sort_by_key(|c| c.published_at);
    match policy {
        Policy::Min => candidates.into_iter().next(),
        Policy::Max => candidates.pop(),
    }
}

/// Parse a catalog timestamp.
///
/// Accepts RFC 3339 (`2024-01-05T10:00:00Z`, `+02:00` offsets) and naive
/// ISO-8601 timestamps, which are read as UTC. Anything else, including a
/// missing value, sorts first as [`DateTime::<Utc>::MIN_UTC`].
pub fn parse_timestamp(value: Option<&str>) -> DateTime<Utc> {
    let Some(value) = value.map(str::trim) else {
        return DateTime::<Utc>::MIN_UTC;
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return parsed.with_timezone(&Utc);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.and_utc();
    }

    tracing::debug!("Unparseable catalog timestamp '{}'", value);
    DateTime::<Utc>::MIN_UTC
}
