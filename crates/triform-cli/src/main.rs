//! `triform` CLI — convert a document between JSON, YAML, and XML.
//!
//! ## Usage
//!
//! ```sh
//! # JSON to YAML
//! triform config.json config.yaml --format yaml
//!
//! # YAML to XML
//! triform config.yaml config.xml --format xml
//!
//! # XML to JSON (the root tag becomes the outer key)
//! triform feed.xml feed.json --format json
//! ```
//!
//! The input format is detected from the file extension; the output format
//! is always the explicit `--format`. Exit code 0 on success; on failure a
//! message naming the problem (missing input, unrecognized format,
//! malformed document, write error) goes to stderr and the exit code is
//! non-zero. No output file is left behind on failure.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use triform_core::Format;

#[derive(Parser)]
#[command(
    name = "triform",
    version,
    about = "Convert documents between JSON, YAML, and XML"
)]
struct Cli {
    /// Input file; its format is detected from the extension
    /// (.json, .yaml, .yml, .xml)
    input_file: PathBuf,

    /// Output file to create
    output_file: PathBuf,

    /// Format to convert to
    #[arg(long, value_enum)]
    format: OutputFormat,
}

/// Target formats accepted by --format.
#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
    Xml,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Format {
        match format {
            OutputFormat::Json => Format::Json,
            OutputFormat::Yaml => Format::Yaml,
            OutputFormat::Xml => Format::Xml,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let target = Format::from(cli.format);

    let source = Format::detect(&cli.input_file)?;
    triform_core::convert(&cli.input_file, &cli.output_file, target)?;

    println!(
        "Converted {} ({}) -> {} ({})",
        cli.input_file.display(),
        source,
        cli.output_file.display(),
        target
    );
    Ok(())
}
