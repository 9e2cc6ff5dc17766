//! Full outer join of two CSV files on a case-insensitive key
//!
//! ```bash
//! join-csv marks.csv roster.csv student:"Student ID" joined.csv
//! ```

use anyhow::Context;
use clap::Parser;
use records_core::{outer_join, JoinKey, Table};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "join-csv")]
#[command(version, about = "Join two CSV files on a shared key, keeping unmatched rows")]
struct Args {
    /// First (left) CSV file
    file1: PathBuf,

    /// Second (right) CSV file
    file2: PathBuf,

    /// Key columns as <field1>:<field2>
    key: JoinKey,

    /// Output CSV file, or - for standard output
    #[arg(default_value = "-")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout may carry the CSV, so logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let left = Table::read_path(&args.file1)
        .with_context(|| format!("Failed to load {}", args.file1.display()))?;
    let right = Table::read_path(&args.file2)
        .with_context(|| format!("Failed to load {}", args.file2.display()))?;

    let joined = outer_join(&left, &right, &args.key)
        .with_context(|| format!("Failed to join on {}", args.key))?;

    joined
        .write_path(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}
