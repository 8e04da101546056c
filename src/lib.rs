//! modpin - Pin a mod's required dependencies to concrete catalog artifacts.
//!
//! modpin reads the required dependencies a Minecraft mod declares in its
//! Fabric, Forge/NeoForge or Quilt metadata, resolves each one to exactly one
//! Modrinth version or CurseForge file for a loader, Minecraft version and
//! selection policy, and writes the result as a `dependencies.yml` document.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading and validation
//! - [`constraint`] - Version range parsing and satisfaction
//! - [`catalog`] - Modrinth and CurseForge resolvers
//! - [`error`] - Error types and result aliases
//! - [`metadata`] - Manifest extraction and normalization
//! - [`output`] - The generated dependencies document
//! - [`resolve`] - Routing and concurrent resolution
//! - [`ui`] - Terminal output and progress
//!
//! # Example
//!
//! ```
//! use modpin::constraint::VersionRange;
//!
//! let range = VersionRange::parse("[1.20,1.21)");
//! assert!(range.matches("1.20.4"));
//! assert!(!range.matches("1.21"));
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod constraint;
pub mod error;
pub mod metadata;
pub mod output;
pub mod resolve;
pub mod ui;

pub use error::{ModpinError, Result};
