//! Extract PDF form-field values into a CSV file, one row per document
//!
//! ```bash
//! extract-pdf grades.csv "name,grade" submissions/*.pdf
//! ls submissions/*.pdf | extract-pdf - "name,grade"
//! ```

use anyhow::Context;
use clap::Parser;
use records_core::{extract_fields, parse_field_list, read_path_list, ExtractOptions};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "extract-pdf")]
#[command(version, about = "Write named PDF form-field values to CSV")]
struct Args {
    /// Output CSV file, or - for standard output
    csv_output: PathBuf,

    /// Comma-separated list of form-field names
    fields: String,

    /// PDF files; read one per line from standard input if omitted or -
    pdfs: Vec<PathBuf>,

    /// Prepend a column with this name holding each PDF's file name
    #[arg(long, value_name = "NAME")]
    filename_column: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let fields = parse_field_list(&args.fields);
    if fields.is_empty() {
        anyhow::bail!("No field names given");
    }

    let pdfs = if args.pdfs.is_empty() || args.pdfs == [PathBuf::from("-")] {
        read_path_list(std::io::stdin().lock()).context("Failed to read PDF names from stdin")?
    } else {
        args.pdfs
    };

    let options = ExtractOptions {
        filename_column: args.filename_column,
    };
    let table = extract_fields(&fields, &pdfs, &options).context("Failed to extract fields")?;

    table
        .write_path(&args.csv_output)
        .with_context(|| format!("Failed to write {}", args.csv_output.display()))?;

    Ok(())
}
