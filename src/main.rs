// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    // Quiet by default; RUST_LOG=info shows classification progress
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    commands::cmd_generate(
        &cli.name,
        &cli.packages,
        cli.output.as_deref(),
        &cli.service_filter(),
        &cli.rpm,
    )
}
