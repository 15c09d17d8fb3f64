// src/classifier/info.rs

//! Aggregated description of what a package set installs

use crate::packages::PayloadEntry;
use std::collections::{BTreeMap, BTreeSet};

/// A user seen as a file owner or created by a `useradd` scriptlet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserRecord {
    pub name: String,
    pub uid: Option<String>,
    pub gid: Option<String>,
    /// Supplementary groups (`-G`)
    pub groups: Option<String>,
    pub home: Option<String>,
    pub shell: Option<String>,
}

impl UserRecord {
    /// A record carrying only the name
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A group seen as a file owner or created by a `groupadd` scriptlet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupRecord {
    pub name: String,
    pub gid: Option<String>,
}

impl GroupRecord {
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gid: None,
        }
    }
}

/// Python artifacts for one interpreter major version
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PythonModules {
    /// Module directories below site-packages
    pub dirs: Vec<PayloadEntry>,
    /// `__init__.py` files below site-packages
    pub init_files: Vec<PayloadEntry>,
    /// Top-level module names
    pub modules: BTreeSet<String>,
}

impl PythonModules {
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Everything the classifier learned about a package set
///
/// Name lists are kept sorted; only `services` is also deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateInfo {
    /// Distribution tag shared by all packages (empty if unknown)
    pub dist: String,
    pub packages: Vec<String>,
    pub apps: Vec<String>,
    pub configs: Vec<PayloadEntry>,
    pub completions: Vec<String>,
    pub shared_libs: Vec<String>,
    pub static_libs: Vec<PayloadEntry>,
    pub headers: Vec<String>,
    pub pkg_configs: Vec<String>,
    pub services: Vec<String>,
    pub users: BTreeMap<String, UserRecord>,
    pub groups: BTreeMap<String, GroupRecord>,
    pub python2: PythonModules,
    pub python3: PythonModules,
    pub wheels: Vec<PayloadEntry>,
}

impl AggregateInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if any Python 2 or Python 3 module was found
    pub fn has_python_modules(&self) -> bool {
        !self.python2.is_empty() || !self.python3.is_empty()
    }

    /// Python artifacts for the given major version (2 or 3)
    pub fn python(&self, version: u8) -> &PythonModules {
        if version == 2 { &self.python2 } else { &self.python3 }
    }

    pub(crate) fn python_mut(&mut self, version: u8) -> &mut PythonModules {
        if version == 2 {
            &mut self.python2
        } else {
            &mut self.python3
        }
    }

    /// Restore ordering after a package was merged
    pub(crate) fn normalize(&mut self) {
        self.packages.sort();
        self.apps.sort();
        self.completions.sort();
        self.pkg_configs.sort();
        self.shared_libs.sort();
        self.headers.sort();
        self.services.sort();
        self.services.dedup();
    }
}
