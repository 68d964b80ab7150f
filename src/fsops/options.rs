//! Option types for the guarded move/copy wrappers.

use crate::error::{FilegateError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::time::Duration;

/// Default wait budget for guarded operations.
///
/// A short, fixed convenience budget: the wrappers exist to catch "a
/// writer is just finishing", not to wait out long-running producers.
/// Callers needing different guarantees override the guard options or
/// call the gate's poll operation directly.
pub const DEFAULT_GUARD_TIMEOUT: Duration = Duration::from_secs(10);

/// Default interval between probes for guarded operations.
pub const DEFAULT_GUARD_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Wait budget for the availability check in front of a guarded
/// operation.
#[derive(Debug, Clone)]
pub struct GuardOptions {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for GuardOptions {
    fn default() -> Self {
        GuardOptions {
            timeout: DEFAULT_GUARD_TIMEOUT,
            poll_interval: DEFAULT_GUARD_POLL_INTERVAL,
        }
    }
}

/// Include/exclude glob filters, matched against file names.
///
/// An empty include set matches everything; excludes always win.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl FilterSet {
    /// Compile filter patterns. Invalid globs are a usage error.
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        Ok(FilterSet {
            include: build_glob_set(include)?,
            exclude: build_glob_set(exclude)?,
        })
    }

    /// Whether a file with this name passes the filters.
    pub fn matches(&self, file_name: &str) -> bool {
        if let Some(exclude) = &self.exclude
            && exclude.is_match(file_name)
        {
            return false;
        }
        match &self.include {
            Some(include) => include.is_match(file_name),
            None => true,
        }
    }
}

fn build_glob_set(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| {
            FilegateError::UserError(format!("invalid glob pattern '{}': {}", pattern, e))
        })?;
        builder.add(glob);
    }
    let set = builder
        .build()
        .map_err(|e| FilegateError::UserError(format!("failed to compile glob patterns: {}", e)))?;
    Ok(Some(set))
}

/// Options for a guarded move.
#[derive(Debug, Clone, Default)]
pub struct MoveOptions {
    /// Overwrite an existing destination.
    pub force: bool,

    /// Name filters; a non-matching source is skipped without error.
    pub filters: FilterSet,

    /// Wait budget for the availability check.
    pub guard: GuardOptions,
}

/// Options for a guarded copy.
#[derive(Debug, Clone, Default)]
pub struct CopyOptions {
    /// Overwrite existing destination files.
    pub force: bool,

    /// Descend into a directory source. Required when the source is a
    /// directory; ignored for file sources.
    pub recursive: bool,

    /// Name filters, applied per file during a directory walk.
    pub filters: FilterSet,

    /// Wait budget for the availability check.
    pub guard: GuardOptions,
}
