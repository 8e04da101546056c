//! What dependencies are resolved against.

use clap::ValueEnum;
use std::fmt;

/// Mod loader the artifacts must run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Loader {
    Forge,
    #[value(name = "neoforge")]
    NeoForge,
    Fabric,
}

impl Loader {
    /// Identifier used by Modrinth's `loaders` filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forge => "forge",
            Self::NeoForge => "neoforge",
            Self::Fabric => "fabric",
        }
    }

    /// Label CurseForge lists in a file's `gameVersions`.
    pub fn curseforge_label(&self) -> &'static str {
        match self {
            Self::Forge => "Forge",
            Self::NeoForge => "NeoForge",
            Self::Fabric => "Fabric",
        }
    }
}

impl fmt::Display for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which acceptable candidate to pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Policy {
    /// The earliest published candidate.
    Min,
    /// The latest published candidate.
    Max,
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Min => "min",
            Self::Max => "max",
        })
    }
}

/// Loader, Minecraft version and policy for one resolution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub loader: Loader,
    pub minecraft_version: String,
    pub policy: Policy,
}

impl Target {
    pub fn new(loader: Loader, minecraft_version: impl Into<String>, policy: Policy) -> Self {
        Self {
            loader,
            minecraft_version: minecraft_version.into(),
            policy,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "loader={} mc={} policy={}",
            self.loader, self.minecraft_version, self.policy
        )
    }
}
