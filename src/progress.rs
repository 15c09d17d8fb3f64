// src/progress.rs

//! Classification progress reporting
//!
//! The classifier never prints or logs on its own. Callers hand it a
//! `ProgressReporter` and decide what to do with each update. `NoProgress`
//! discards them; `LogProgress` forwards them to tracing.

use crate::classifier::AggregateInfo;
use tracing::{debug, info};

/// One package merged into the aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageStep<'a> {
    /// 1-based position among the binary packages
    pub index: usize,
    pub total: usize,
    pub name: &'a str,
    /// Number of payload entries offered to the rules
    pub payload: usize,
}

/// Receives updates while a package set is classified
pub trait ProgressReporter {
    /// A source package was dropped before classification
    fn source_skipped(&self, _name: &str) {}

    /// A binary package was scanned and merged
    fn package_classified(&self, step: PackageStep<'_>);

    /// Every package has been merged
    fn finished(&self, _info: &AggregateInfo) {}
}

/// Discards every update
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn package_classified(&self, _step: PackageStep<'_>) {}
}

/// Reports updates through tracing, tagged with the recipe name
#[derive(Debug)]
pub struct LogProgress {
    recipe: String,
}

impl LogProgress {
    pub fn new(recipe: impl Into<String>) -> Self {
        Self {
            recipe: recipe.into(),
        }
    }
}

impl ProgressReporter for LogProgress {
    fn source_skipped(&self, name: &str) {
        debug!("{}: skipping source package {}", self.recipe, name);
    }

    fn package_classified(&self, step: PackageStep<'_>) {
        info!(
            "{}: classified {} ({} entries) [{}/{}]",
            self.recipe, step.name, step.payload, step.index, step.total
        );
    }

    fn finished(&self, info: &AggregateInfo) {
        info!(
            "{}: {} package(s), {} app(s), {} service(s), {} config(s)",
            self.recipe,
            info.packages.len(),
            info.apps.len(),
            info.services.len(),
            info.configs.len()
        );
    }
}
