//! Resolution orchestration.
//!
//! Each normalized dependency is routed to a catalog (Modrinth when it has a
//! Modrinth alias, otherwise CurseForge), then all routed dependencies are
//! resolved independently on a bounded worker pool. A run is all-or-nothing:
//! any failure means no resolved list is returned.
//!
//! # Example
//!
//! ```
//! use modpin::metadata::Dependency;
//! use modpin::resolve::{plan, Loader, Policy, Target};
//!
//! // Without aliases a dependency is dropped in permissive mode.
//! let target = Target::new(Loader::Forge, "1.20.1", Policy::Max);
//! let jobs = plan(&[Dependency::new("jei", "*")], false, &target).unwrap();
//! assert!(jobs.is_empty());
//! ```

pub mod pool;
pub mod target;

pub use target::{Loader, Policy, Target};

use std::sync::Arc;

use crate::catalog::{
    Catalog, CurseForgeCatalog, JsonClient, ModrinthCatalog, Platform, ResolvedDependency,
};
use crate::config::ModpinConfig;
use crate::error::{ModpinError, Result};
use crate::metadata::Dependency;

/// Run-wide resolution options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Fail when a dependency has no catalog alias instead of dropping it.
    pub strict: bool,
    /// Maximum number of concurrent catalog lookups.
    pub workers: usize,
    /// Stop scheduling lookups after the first failure.
    pub fail_fast: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            strict: false,
            workers: 4,
            fail_fast: true,
        }
    }
}

/// Which catalog a dependency is resolved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Modrinth,
    CurseForge,
}

impl Route {
    pub fn platform(&self) -> Platform {
        match self {
            Self::Modrinth => Platform::Modrinth,
            Self::CurseForge => Platform::CurseForge,
        }
    }
}

/// A dependency routed to a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub dependency: Dependency,
    pub route: Route,
}

/// Route every dependency to a catalog.
///
/// A dependency without aliases fails the run when `strict` is set and is
/// dropped otherwise. `target` is only used to give the strict-mode error its
/// context.
pub fn plan(deps: &[Dependency], strict: bool, target: &Target) -> Result<Vec<Job>> {
    let mut jobs = Vec::with_capacity(deps.len());

    for dep in deps {
        let route = if dep.aliases.modrinth.is_some() {
            Route::Modrinth
        } else if dep.aliases.curseforge.is_some() {
            Route::CurseForge
        } else if strict {
            return Err(ModpinError::AliasMissing {
                dependency: dep.id.clone(),
                target: target.clone(),
            });
        } else {
            tracing::warn!(
                "Skipping required dependency '{}': no Modrinth/CurseForge alias",
                dep.id
            );
            continue;
        };

        jobs.push(Job {
            dependency: dep.clone(),
            route,
        });
    }

    Ok(jobs)
}

/// Progress callbacks for a resolution run.
pub trait ResolveObserver: Sync {
    /// Called once before any lookup, with the number of routed jobs.
    fn resolution_started(&self, _total: usize) {}

    /// Called when a dependency's lookup starts.
    fn dependency_started(&self, _dependency: &Dependency, _platform: Platform) {}

    /// Called when a dependency's lookup ends.
    fn dependency_finished(&self, _dependency: &Dependency, _ok: bool) {}
}

/// Observer that ignores every event.
pub struct NoopObserver;

impl ResolveObserver for NoopObserver {}

/// Resolves dependencies against both catalogs.
pub struct Resolver {
    modrinth: Box<dyn Catalog>,
    curseforge: Box<dyn Catalog>,
}

impl Resolver {
    pub fn new(modrinth: Box<dyn Catalog>, curseforge: Box<dyn Catalog>) -> Self {
        Self {
            modrinth,
            curseforge,
        }
    }

    /// Build both catalogs from configuration, sharing one HTTP client.
    pub fn from_config(config: &ModpinConfig) -> Result<Self> {
        let client = Arc::new(JsonClient::new(config.http_settings())?);
        let modrinth = ModrinthCatalog::new(config.modrinth_url()?, Arc::clone(&client));
        let curseforge = CurseForgeCatalog::new(config.curseforge_url()?, client)
            .with_page_size(config.catalogs.curseforge.page_size);
        Ok(Self::new(Box::new(modrinth), Box::new(curseforge)))
    }

    fn catalog(&self, route: Route) -> &dyn Catalog {
        match route {
            Route::Modrinth => self.modrinth.as_ref(),
            Route::CurseForge => self.curseforge.as_ref(),
        }
    }

    /// Resolve one routed job.
    pub fn resolve_job(&self, job: &Job, target: &Target) -> Result<ResolvedDependency> {
        self.catalog(job.route).resolve(&job.dependency, target)
    }

    /// Resolve every dependency, in the order given.
    ///
    /// `deps` should already be normalized and sorted. Routing (and the
    /// strict-mode alias check) happens before any network traffic.
    pub fn resolve_all(
        &self,
        deps: &[Dependency],
        target: &Target,
        options: &ResolveOptions,
        observer: &dyn ResolveObserver,
    ) -> Result<Vec<ResolvedDependency>> {
        let jobs = plan(deps, options.strict, target)?;
        observer.resolution_started(jobs.len());
        tracing::debug!(
            "Resolving {} dependencies ({}) on {} workers",
            jobs.len(),
            target,
            options.workers
        );

        let slots = pool::run(&jobs, options.workers, options.fail_fast, |job| {
            observer.dependency_started(&job.dependency, job.route.platform());
            let result = self.resolve_job(job, target);
            observer.dependency_finished(&job.dependency, result.is_ok());
            result
        });

        let mut resolved = Vec::with_capacity(slots.len());
        let mut errors = Vec::new();
        for slot in slots.into_iter().flatten() {
            match slot {
                Ok(dep) => resolved.push(dep),
                Err(e) => errors.push(e),
            }
        }

        match errors.len() {
            0 => Ok(resolved),
            1 => Err(errors.remove(0)),
            _ if options.fail_fast => Err(errors.remove(0)),
            _ => Err(ModpinError::Multiple { errors }),
        }
    }
}
