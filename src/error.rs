// src/error.rs

//! Error types for recipe generation

use std::io;
use thiserror::Error;

/// Errors raised while reading packages, classifying payloads or writing recipes
///
/// Every variant is fatal for a generation run. Malformed numeric fields in
/// rpm output are not errors: the reader degrades them to zero in place.
#[derive(Error, Debug)]
pub enum Error {
    /// A single rpm invocation could not be spawned or exited non-zero
    #[error("rpm query failed: {0}")]
    QueryError(String),

    /// Reading metadata from a package archive failed
    #[error("Failed to read package {path}: {reason}")]
    ReadError { path: String, reason: String },

    /// The package set targets more than one distribution
    #[error(
        "Packages for different versions of OS can not be used for test generation ({first} != {second})"
    )]
    MixedDistributionError { first: String, second: String },

    /// The recipe destination could not be written
    #[error("Failed to write recipe to {path}: {source}")]
    WriteError { path: String, source: io::Error },
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;
