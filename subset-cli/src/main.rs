//! Subset-from-selection command line tool

use std::fs;

use anyhow::Context;
use clap::Parser as _;
use subset_cli::{run, Args};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Log to stderr (if you run with `RUST_LOG=debug`).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let json = run(&args)?;

    match &args.output {
        Some(path) => fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{json}"),
    }

    Ok(())
}
