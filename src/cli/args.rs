//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::resolve::{Loader, Policy};

/// modpin - Pin a mod's required dependencies to Modrinth/CurseForge artifacts.
#[derive(Debug, Parser)]
#[command(name = "modpin")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the mod project root
    #[arg(short, long, global = true, default_value = ".")]
    pub project_root: PathBuf,

    /// Path to config file (overrides <project-root>/.modpin.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve required dependencies and write dependencies.yml
    Resolve(ResolveArgs),

    /// List required dependencies found in the mod metadata
    List(ListArgs),

    /// Check versions against a range expression
    Range(RangeArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `resolve` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ResolveArgs {
    /// Mod loader to resolve for
    #[arg(long, value_enum)]
    pub loader: Loader,

    /// Minecraft version to resolve for
    #[arg(long, visible_alias = "runtime-version", value_name = "VERSION")]
    pub minecraft_version: String,

    /// Pick the earliest (min) or latest (max) published match
    #[arg(long, value_enum)]
    pub policy: Policy,

    /// Output path, relative to the project root unless absolute
    #[arg(long, value_name = "PATH")]
    pub out: PathBuf,

    /// Fail if a required dependency has no Modrinth/CurseForge alias
    #[arg(long)]
    pub strict: bool,

    /// User-Agent sent to the catalog APIs
    #[arg(long, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Concurrent catalog lookups
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub workers: Option<u16>,

    /// Resolve every dependency and report all failures together
    #[arg(long)]
    pub no_fail_fast: bool,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Only show dependencies that have no catalog alias
    #[arg(long)]
    pub missing_aliases: bool,
}

/// Arguments for the `range` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RangeArgs {
    /// Range expression, e.g. "[1.0,2.0)" or ">=1.2 <2"
    pub range: String,

    /// Versions to check against the range
    pub versions: Vec<String>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
