// src/packages/mod.rs

//! Package metadata access
//!
//! Records describing what a package installs, and the reader that fills
//! them from RPM archives through the `rpm` query tool.

pub mod rpm_query;
pub mod traits;

pub use rpm_query::{RpmCommand, RpmReader};
pub use traits::{PackageRecord, PayloadEntry, QueryService};
