// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use bop::{Error, PackageRecord, PayloadEntry, QueryService, Result};
use std::collections::HashMap;

/// Regular file owned by root
pub fn entry(path: &str, mode: u32) -> PayloadEntry {
    PayloadEntry::new(path, mode)
}

/// Directory owned by root
pub fn dir(path: &str) -> PayloadEntry {
    PayloadEntry {
        is_dir: true,
        ..PayloadEntry::new(path, 0o755)
    }
}

/// Binary package record
pub fn package(name: &str, dist: &str, payload: Vec<PayloadEntry>) -> PackageRecord {
    PackageRecord {
        name: name.to_string(),
        dist: dist.to_string(),
        payload,
        ..Default::default()
    }
}

/// Canned rpm output for one archive
#[derive(Debug, Clone, Default)]
pub struct FakePackage {
    pub info: String,
    pub dump: String,
    pub scripts: String,
}

impl FakePackage {
    pub fn new(name: &str, release: &str) -> Self {
        Self {
            info: format!("{} {} 0", name, release),
            ..Default::default()
        }
    }

    /// Append a `--dump` line for a regular file
    pub fn file(mut self, path: &str, mode: &str) -> Self {
        self.dump.push_str(&format!(
            "{} 1024 1600000000 {} {} root root 0 0 0 X\n",
            path,
            "ab".repeat(32),
            mode
        ));
        self
    }

    /// Append a `--dump` line for a directory
    pub fn directory(mut self, path: &str) -> Self {
        self.dump.push_str(&format!(
            "{} 4096 1600000000 {} 040755 root root 0 0 0 X\n",
            path,
            "0".repeat(64)
        ));
        self
    }

    pub fn scripts(mut self, scripts: &str) -> Self {
        self.scripts = scripts.to_string();
        self
    }
}

/// In-memory rpm stand-in keyed by archive path
#[derive(Debug, Default)]
pub struct FakeRpm {
    packages: HashMap<String, FakePackage>,
}

impl FakeRpm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, file: &str, package: FakePackage) -> Self {
        self.packages.insert(file.to_string(), package);
        self
    }
}

impl QueryService for FakeRpm {
    fn invoke(&self, args: &[&str]) -> Result<String> {
        let file = args.last().copied().unwrap_or_default();
        let package = self
            .packages
            .get(file)
            .ok_or_else(|| Error::QueryError(format!("package {} is not an rpm", file)))?;

        let output = if args.contains(&"--qf") {
            &package.info
        } else if args.contains(&"--dump") {
            &package.dump
        } else if args.contains(&"--scripts") {
            &package.scripts
        } else {
            return Ok(String::new());
        };

        Ok(output.clone())
    }
}
