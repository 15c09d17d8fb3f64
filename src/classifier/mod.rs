// src/classifier/mod.rs

//! Payload classification
//!
//! Turns package records into a single `AggregateInfo` describing what the
//! package set installs. Source packages are ignored, and every remaining
//! package must target the same distribution. Each payload entry runs
//! through the registered rules; scriptlets are mined for users and groups.
//!
//! Classification is pure: it performs no I/O and reports progress only
//! through the `ProgressReporter` handed in by the caller.

pub mod info;
pub mod python;
pub mod rules;

pub use info::{AggregateInfo, GroupRecord, PythonModules, UserRecord};
pub use rules::{PackageFindings, PayloadRule, default_rules, shared_lib_glob};

use crate::error::{Error, Result};
use crate::packages::PackageRecord;
use crate::progress::{NoProgress, PackageStep, ProgressReporter};
use crate::scriptlet;

/// Applies classification rules to package records
pub struct PayloadClassifier {
    rules: Vec<Box<dyn PayloadRule>>,
}

impl Default for PayloadClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl PayloadClassifier {
    /// Classifier with the standard rule set
    pub fn new() -> Self {
        Self::with_rules(default_rules())
    }

    pub fn with_rules(rules: Vec<Box<dyn PayloadRule>>) -> Self {
        Self { rules }
    }

    /// Names of the registered rules in application order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Classify all binary packages into one aggregate
    pub fn classify(&self, records: &[PackageRecord]) -> Result<AggregateInfo> {
        self.classify_with_progress(records, &NoProgress)
    }

    /// Classify, reporting every merged package
    pub fn classify_with_progress(
        &self,
        records: &[PackageRecord],
        progress: &dyn ProgressReporter,
    ) -> Result<AggregateInfo> {
        let (sources, binary): (Vec<&PackageRecord>, Vec<&PackageRecord>) =
            records.iter().partition(|r| r.is_source);
        let dist = common_dist(&binary)?;

        for source in &sources {
            progress.source_skipped(&source.name);
        }

        let mut info = AggregateInfo {
            dist,
            ..AggregateInfo::default()
        };

        let total = binary.len();
        for (idx, record) in binary.into_iter().enumerate() {
            let findings = self.scan(record);
            merge(&mut info, record, findings);
            progress.package_classified(PackageStep {
                index: idx + 1,
                total,
                name: &record.name,
                payload: record.payload.len(),
            });
        }

        progress.finished(&info);
        Ok(info)
    }

    /// Run every rule over every payload entry of one package
    pub fn scan(&self, record: &PackageRecord) -> PackageFindings {
        let mut findings = PackageFindings::default();

        for entry in &record.payload {
            for rule in &self.rules {
                rule.apply(entry, &mut findings);
            }
        }

        findings
    }
}

/// Classify with the standard rule set
pub fn classify(records: &[PackageRecord]) -> Result<AggregateInfo> {
    PayloadClassifier::new().classify(records)
}

/// The single non-empty distribution tag of the set ("" if none)
fn common_dist(records: &[&PackageRecord]) -> Result<String> {
    let mut dist = String::new();

    for record in records {
        if record.dist.is_empty() {
            continue;
        }

        if dist.is_empty() {
            dist = record.dist.clone();
        } else if dist != record.dist {
            return Err(Error::MixedDistributionError {
                first: dist,
                second: record.dist.clone(),
            });
        }
    }

    Ok(dist)
}

/// Fold one package's findings into the aggregate
fn merge(info: &mut AggregateInfo, record: &PackageRecord, findings: PackageFindings) {
    info.packages.push(record.name.clone());
    info.apps.extend(findings.apps);
    info.configs.extend(findings.configs);
    info.completions.extend(findings.completions);
    info.shared_libs.extend(findings.shared_libs);
    info.static_libs.extend(findings.static_libs);
    info.headers.extend(findings.headers);
    info.pkg_configs.extend(findings.pkg_configs);
    info.services.extend(findings.services);
    info.wheels.extend(findings.wheels);

    for owner in findings.owners {
        info.users
            .entry(owner.clone())
            .or_insert_with(|| UserRecord::bare(owner));
    }

    for group in findings.owner_groups {
        info.groups
            .entry(group.clone())
            .or_insert_with(|| GroupRecord::bare(group));
    }

    for (version, found) in [(2, findings.python2), (3, findings.python3)] {
        let python = info.python_mut(version);
        python.dirs.extend(found.dirs);
        python.init_files.extend(found.init_files);
        python.modules.extend(found.modules);
    }

    info.normalize();

    if !record.scriptlets.is_empty() {
        scriptlet::extract_users(&record.scriptlets, &mut info.users);
        scriptlet::extract_groups(&record.scriptlets, &mut info.groups);
    }
}
