//! Copy files N times with zero-padded sequence suffixes
//!
//! ```bash
//! copy-numbered 30            # a.pdf -> a-001.pdf .. a-030.pdf
//! copy-numbered 5 --pattern '*.docx'
//! ```

use anyhow::Context;
use clap::Parser;
use records_core::{matching_files, replicate};
use std::num::NonZeroU32;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "copy-numbered")]
#[command(version, about = "Make numbered copies of matching files")]
struct Args {
    /// Number of copies of each file
    count: NonZeroU32,

    /// Glob selecting the files to copy
    #[arg(short, long, default_value = "*.pdf")]
    pattern: String,

    /// Directory to operate in
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let files = matching_files(&args.dir, &args.pattern)
        .with_context(|| format!("Failed to list {} in {}", args.pattern, args.dir.display()))?;
    if files.is_empty() {
        tracing::warn!(pattern = %args.pattern, "No matching files");
        return Ok(());
    }

    replicate(&files, args.count).context("Failed to copy files")?;
    Ok(())
}
