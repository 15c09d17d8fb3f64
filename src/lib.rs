// src/lib.rs

//! Bop: bibop recipe generator
//!
//! Reads metadata from one or more RPM packages, classifies what their
//! payloads install, and renders a bibop test recipe that checks the
//! installed result.
//!
//! # Architecture
//!
//! - Reader: queries the `rpm` tool and parses its output into `PackageRecord`s
//! - Classifier: runs payload rules over every record and merges the findings
//!   into one `AggregateInfo`
//! - Generator: renders the recipe text and picks its file name; pure, no I/O
//!
//! ```no_run
//! use bop::{RpmCommand, RpmReader, classify, generate};
//! use std::path::Path;
//!
//! # fn main() -> bop::Result<()> {
//! let reader = RpmReader::new(RpmCommand::default());
//! let record = reader.read(Path::new("demo-1.0-1.el7.x86_64.rpm"))?;
//! let info = classify(&[record])?;
//! let recipe = generate("demo", &[], &info);
//! println!("{}", recipe.content);
//! # Ok(())
//! # }
//! ```

pub mod classifier;
mod error;
pub mod output;
pub mod packages;
pub mod progress;
pub mod recipe;
pub mod scriptlet;

pub use classifier::{AggregateInfo, PayloadClassifier, classify};
pub use error::{Error, Result};
pub use output::write_recipe;
pub use packages::{PackageRecord, PayloadEntry, QueryService, RpmCommand, RpmReader};
pub use progress::{LogProgress, NoProgress, PackageStep, ProgressReporter};
pub use recipe::{GeneratedRecipe, generate};

use std::path::Path;

/// Read every package, stopping at the first failure
pub fn read_packages<Q, P>(reader: &RpmReader<Q>, files: &[P]) -> Result<Vec<PackageRecord>>
where
    Q: QueryService,
    P: AsRef<Path>,
{
    files.iter().map(|file| reader.read(file.as_ref())).collect()
}
