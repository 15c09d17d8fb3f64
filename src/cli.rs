// src/cli.rs
//! CLI definitions for bop
//!
//! The command implementation lives in the `commands` module.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bop")]
#[command(version)]
#[command(about = "Generate bibop test recipes from RPM packages", long_about = None)]
pub struct Cli {
    /// Recipe name (also used for the output file name)
    pub name: String,

    /// Package archives to generate tests for
    #[arg(required = true)]
    pub packages: Vec<PathBuf>,

    /// Output file (overrides the generated name)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Services to check; accepts comma or space separated lists
    #[arg(short, long = "service", value_name = "SERVICES")]
    pub services: Vec<String>,

    /// rpm binary used to query packages
    #[arg(long, default_value = "rpm")]
    pub rpm: String,
}

impl Cli {
    /// Merged list of service names from every `--service` value
    pub fn service_filter(&self) -> Vec<String> {
        split_services(&self.services)
    }
}

fn split_services(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split(|c: char| c == ',' || c.is_whitespace()))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
