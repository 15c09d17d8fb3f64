// src/packages/traits.rs

//! Common types and traits for package metadata

use crate::error::Result;
use std::fmt;

/// A file, directory or symlink contributed by a package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadEntry {
    /// Absolute installation path
    pub path: String,
    /// Owning user name
    pub user: String,
    /// Owning group name
    pub group: String,
    /// Permission bits (including setuid/setgid/sticky)
    pub mode: u32,
    /// Marked as %config in the package
    pub is_config: bool,
    pub is_dir: bool,
    pub is_link: bool,
}

impl PayloadEntry {
    /// Create a regular file entry owned by root
    pub fn new(path: impl Into<String>, mode: u32) -> Self {
        Self {
            path: path.into(),
            user: "root".to_string(),
            group: "root".to_string(),
            mode,
            ..Default::default()
        }
    }

    /// Last path component
    pub fn basename(&self) -> &str {
        basename(&self.path)
    }

    /// True if any of the user/group/other executable bits is set
    pub fn is_executable(&self) -> bool {
        self.mode & 0o111 != 0
    }
}

impl fmt::Display for PayloadEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |v: bool| if v { "Y" } else { "N" };
        let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };

        write!(
            f,
            "{{Path: {} | Mode: {:o} | User: {} | Group: {} | Config: {} | Dir: {} | Link: {}}}",
            self.path,
            self.mode,
            or_dash(&self.user),
            or_dash(&self.group),
            flag(self.is_config),
            flag(self.is_dir),
            flag(self.is_link),
        )
    }
}

/// Metadata read from a single package archive
#[derive(Debug, Clone, Default)]
pub struct PackageRecord {
    pub name: String,
    /// Distribution tag parsed from the release (e.g. "el7")
    pub dist: String,
    /// Raw install/uninstall scriptlet text
    pub scriptlets: String,
    pub payload: Vec<PayloadEntry>,
    /// True for source packages, which never contribute to a recipe
    pub is_source: bool,
}

impl fmt::Display for PackageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{Name: {} | Dist: {} | Payload: {} | Scriptlets: {}}}",
            self.name,
            self.dist,
            self.payload.len(),
            self.scriptlets.len()
        )
    }
}

/// Synchronous access to a package query tool
///
/// `invoke` runs the tool with the given arguments and returns its captured
/// stdout. Any spawn failure or non-zero exit must be reported as an error.
pub trait QueryService {
    fn invoke(&self, args: &[&str]) -> Result<String>;
}

impl<T: QueryService + ?Sized> QueryService for &T {
    fn invoke(&self, args: &[&str]) -> Result<String> {
        (**self).invoke(args)
    }
}

/// Last component of a slash-separated path
pub(crate) fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}
