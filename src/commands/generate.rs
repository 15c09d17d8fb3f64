// src/commands/generate.rs
//! Recipe generation command

use anyhow::{Context, Result, bail};
use bop::{LogProgress, PayloadClassifier, QueryService, RpmCommand, RpmReader};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Generate a bibop recipe for the given packages
pub fn cmd_generate(
    name: &str,
    packages: &[PathBuf],
    output: Option<&Path>,
    services: &[String],
    rpm: &str,
) -> Result<()> {
    if which::which(rpm).is_err() {
        bail!("rpm utility is mandatory for this application");
    }

    let reader = RpmReader::new(RpmCommand::new(rpm));

    let problems = validate_packages(&reader, packages);
    if !problems.is_empty() {
        for problem in &problems {
            eprintln!("{}", problem);
        }
        bail!("{} of {} package(s) can not be used", problems.len(), packages.len());
    }

    let started = Instant::now();

    println!(
        "Generating bibop tests for {} based on given {} package(s)…",
        name,
        packages.len()
    );

    let records = bop::read_packages(&reader, packages)?;

    let classifier = PayloadClassifier::new();
    debug!("Payload rules: {}", classifier.rule_names().join(", "));

    let info = classifier
        .classify_with_progress(&records, &LogProgress::new(name))
        .context("Can't generate recipe")?;

    let recipe = bop::generate(name, services, &info);
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&recipe.file_name));

    bop::write_recipe(&path, &recipe.content)?;
    info!("Recipe for {} written to {}", name, path.display());

    println!(
        "Recipe saved as {} (processing took {:.2?})",
        path.display(),
        started.elapsed()
    );

    Ok(())
}

/// Check every input file, collecting all problems instead of stopping early
fn validate_packages<Q: QueryService>(reader: &RpmReader<Q>, packages: &[PathBuf]) -> Vec<String> {
    let mut problems = Vec::new();

    for file in packages {
        if !file.exists() {
            problems.push(format!("File {} doesn't exist", file.display()));
            continue;
        }

        if let Err(e) = File::open(file) {
            problems.push(format!("File {} is not readable: {}", file.display(), e));
            continue;
        }

        if !reader.is_package(file) {
            problems.push(format!("File {} is not an RPM package", file.display()));
        }
    }

    problems
}
