//! Required-dependency extraction from mod metadata.
//!
//! Each supported manifest format implements [`MetadataSource`]:
//!
//! - [`FabricSource`] - `fabric.mod.json`
//! - [`ForgeSource`] - `META-INF/mods.toml` (Forge and NeoForge)
//! - [`QuiltSource`] - `quilt.mod.json`
//!
//! Sources only report *required* dependencies. Optional entries and the
//! platform's own identifiers (Minecraft, Java, the loader) are skipped.
//! Catalog aliases come from mc-publish annotations (see [`annotation`]).
//!
//! [`extract_all`] runs every source and [`normalize`] merges the results
//! into one record per dependency id.

pub mod annotation;
pub mod fabric;
pub mod forge;
pub mod normalize;
pub mod quilt;

pub use annotation::{parse_publish_annotation, AliasMap, PublishAnnotation};
pub use fabric::FabricSource;
pub use forge::ForgeSource;
pub use normalize::normalize;
pub use quilt::QuiltSource;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::catalog::Platform;
use crate::error::{ModpinError, Result};

/// Range used when a manifest declares none.
pub const ANY_VERSION: &str = "*";

/// Identifiers of the game, the Java runtime and the loaders themselves.
///
/// These are never resolvable as catalog artifacts.
pub const HOST_IDS: &[&str] = &[
    "minecraft",
    "java",
    "fabricloader",
    "forge",
    "neoforge",
    "quilt_loader",
];

/// Catalog aliases declared for a dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformAliases {
    /// Modrinth project id or slug.
    pub modrinth: Option<String>,
    /// CurseForge project id.
    pub curseforge: Option<String>,
}

impl PlatformAliases {
    /// Number of aliases present.
    pub fn count(&self) -> usize {
        usize::from(self.modrinth.is_some()) + usize::from(self.curseforge.is_some())
    }

    /// Alias for the given platform.
    pub fn get(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::Modrinth => self.modrinth.as_deref(),
            Platform::CurseForge => self.curseforge.as_deref(),
        }
    }

    /// Set the alias for a platform key such as `modrinth`.
    ///
    /// Later calls for the same platform win. Unknown platform keys and blank
    /// aliases are ignored.
    pub fn merge(&mut self, platform: &str, alias: &str) {
        let alias = alias.trim();
        if alias.is_empty() {
            return;
        }
        match platform.parse::<Platform>() {
            Ok(Platform::Modrinth) => self.modrinth = Some(alias.to_string()),
            Ok(Platform::CurseForge) => self.curseforge = Some(alias.to_string()),
            Err(_) => {}
        }
    }
}

/// A required dependency as declared by a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Mod id of the dependency.
    pub id: String,
    /// Declared version range, `*` when none was declared.
    pub version_range: String,
    /// Catalog aliases.
    pub aliases: PlatformAliases,
}

impl Dependency {
    /// Create a dependency, normalizing a blank range to [`ANY_VERSION`].
    pub fn new(id: impl Into<String>, version_range: &str) -> Self {
        let range = version_range.trim();
        Self {
            id: id.into(),
            version_range: if range.is_empty() {
                ANY_VERSION.to_string()
            } else {
                range.to_string()
            },
            aliases: PlatformAliases::default(),
        }
    }

    pub fn with_aliases(mut self, aliases: PlatformAliases) -> Self {
        self.aliases = aliases;
        self
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.version_range)?;
        if let Some(alias) = &self.aliases.modrinth {
            write!(f, " modrinth={}", alias)?;
        }
        if let Some(alias) = &self.aliases.curseforge {
            write!(f, " curseforge={}", alias)?;
        }
        Ok(())
    }
}

/// A manifest format that declares dependencies.
pub trait MetadataSource {
    /// Short name of the format (for logging).
    fn name(&self) -> &'static str;

    /// Relative paths where the manifest may live, in lookup order.
    fn candidate_paths(&self) -> &'static [&'static str];

    /// Parse the manifest contents into required dependencies.
    fn parse(&self, path: &Path, content: &str) -> Result<Vec<Dependency>>;

    /// Find the manifest under the project root.
    fn locate(&self, project_root: &Path) -> Option<PathBuf> {
        find_first_existing(project_root, self.candidate_paths())
    }

    /// Locate, read and parse the manifest.
    ///
    /// A missing manifest yields an empty list.
    fn extract(&self, project_root: &Path) -> Result<Vec<Dependency>> {
        match self.locate(project_root) {
            Some(path) => self.read(&path),
            None => {
                tracing::debug!("No {} manifest under {}", self.name(), project_root.display());
                Ok(Vec::new())
            }
        }
    }

    /// Read and parse an already located manifest.
    fn read(&self, path: &Path) -> Result<Vec<Dependency>> {
        let content = std::fs::read_to_string(path).map_err(|e| malformed(path, e))?;
        let deps = self.parse(path, &content)?;
        tracing::debug!(
            "{} manifest {} declares {} required dependencies",
            self.name(),
            path.display(),
            deps.len()
        );
        Ok(deps)
    }
}

/// Dependencies found by all sources, before normalization.
#[derive(Debug, Default)]
pub struct Extraction {
    /// Concatenated source output in source order.
    pub dependencies: Vec<Dependency>,
    /// Manifests that were found.
    pub manifests: Vec<PathBuf>,
}

impl Extraction {
    /// Whether no manifest of any format was found.
    pub fn is_missing_metadata(&self) -> bool {
        self.manifests.is_empty()
    }
}

/// The built-in sources in extraction order.
pub fn sources() -> Vec<Box<dyn MetadataSource>> {
    vec![
        Box::new(FabricSource),
        Box::new(ForgeSource),
        Box::new(QuiltSource),
    ]
}

/// Run every source against the project root.
pub fn extract_all(project_root: &Path) -> Result<Extraction> {
    let mut extraction = Extraction::default();

    for source in sources() {
        let Some(path) = source.locate(project_root) else {
            tracing::debug!("No {} manifest under {}", source.name(), project_root.display());
            continue;
        };
        extraction.dependencies.extend(source.read(&path)?);
        extraction.manifests.push(path);
    }

    Ok(extraction)
}

/// Return the first candidate that exists as a file under the project root.
pub fn find_first_existing(project_root: &Path, candidates: &[&str]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|rel| project_root.join(rel))
        .find(|path| path.is_file())
}

pub(crate) fn malformed(path: &Path, message: impl fmt::Display) -> ModpinError {
    ModpinError::MalformedMetadata {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}
