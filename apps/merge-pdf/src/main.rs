//! Fill PDF form templates from CSV rows into templated destination paths
//!
//! ```bash
//! # One directory per student, original file names kept
//! merge-pdf roster.csv "graded/%student%/" cover.pdf rubric.pdf
//! # One directory per template, one file per student
//! merge-pdf roster.csv "graded/%pdf%/%student%.pdf" cover.pdf
//! ```

use anyhow::Context;
use clap::Parser;
use records_core::{fill_documents, load_templates, FillOptions, PathTemplate, Table};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "merge-pdf")]
#[command(version, about = "Fill PDF form fields from CSV rows")]
struct Args {
    /// CSV file whose columns name the form fields to fill
    csv_input: PathBuf,

    /// Destination path with %column% placeholders; %pdf% is the template's file name
    destination: String,

    /// PDF form templates, each filled once per row
    #[arg(required = true)]
    pdfs: Vec<PathBuf>,

    /// Resolve and check destinations without writing anything
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let table = Table::read_path(&args.csv_input)
        .with_context(|| format!("Failed to load {}", args.csv_input.display()))?;
    let templates = load_templates(&args.pdfs).context("Failed to load PDF templates")?;
    let destination = PathTemplate::new(args.destination);

    let written = fill_documents(
        &table,
        &destination,
        &templates,
        FillOptions {
            dry_run: args.dry_run,
        },
    )
    .context("Failed to fill forms")?;

    tracing::info!(
        rows = table.len(),
        documents = written.len(),
        dry_run = args.dry_run,
        "Done"
    );
    Ok(())
}
