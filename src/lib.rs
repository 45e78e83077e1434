//! detprep: object-detection dataset preparation.
//!
//! Splits a directory of YOLO-annotated images into `Train`, `Valid` and
//! `Test` partitions, copies each partition into a fixed directory layout,
//! and exports the annotations as Pascal VOC XML (one file per image) and
//! COCO JSON (one file per partition).
//!
//! # Modules
//!
//! - [`ir`]: Box geometry, the class catalog, and the YOLO/VOC/COCO codecs
//! - [`split`]: Image discovery and the cyclic partition assignment
//! - [`stage`]: Copying assigned files into the dataset layout
//! - [`conversion`]: YOLO → VOC → COCO conversion of staged partitions
//! - [`pipeline`]: The end-to-end run
//! - [`error`]: Error types for detprep operations

pub mod conversion;
pub mod error;
pub mod ir;
pub mod layout;
pub mod pipeline;
mod progress;
pub mod split;
pub mod stage;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

pub use error::PrepError;
use ir::DatasetInfo;
use pipeline::PrepareOptions;

/// The detprep CLI application.
#[derive(Parser)]
#[command(name = "detprep")]
#[command(version, author, about)]
struct Cli {
    /// Dataset root containing the images and their YOLO label files
    /// [default: current directory].
    #[arg(long, env = "DETPREP_DATA")]
    data: Option<PathBuf>,

    /// Class names file, one name per line [default: <cwd>/labels.txt].
    #[arg(long, env = "DETPREP_LABELS")]
    labels: Option<PathBuf>,

    /// Percentage of images held out for validation and test (1-100).
    #[arg(long, default_value_t = 40)]
    split: u32,

    /// Seed for the shuffle, for reproducible splits.
    #[arg(long, env = "DETPREP_SEED")]
    seed: Option<u64>,

    /// COCO info.description.
    #[arg(long)]
    description: Option<String>,

    /// COCO info.contributor.
    #[arg(long)]
    contributor: Option<String>,

    /// COCO info.year.
    #[arg(long)]
    year: Option<u32>,

    /// Output format for the run summary.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Run the detprep CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), PrepError> {
    let cli = Cli::parse();
    let opts = prepare_options(&cli)?;
    let summary = pipeline::prepare_dataset(&opts)?;

    match cli.output {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&summary).map_err(PrepError::ReportSerialize)?;
            println!("{json}");
        }
        OutputFormat::Text => print!("{summary}"),
    }

    Ok(())
}

/// Resolve the command line into pipeline options, filling in
/// current-directory defaults.
fn prepare_options(cli: &Cli) -> Result<PrepareOptions, PrepError> {
    let cwd = std::env::current_dir()?;

    let mut info = DatasetInfo::default();
    if let Some(description) = &cli.description {
        info.description = description.clone();
    }
    if let Some(contributor) = &cli.contributor {
        info.contributor = contributor.clone();
    }
    if let Some(year) = cli.year {
        info.year = year;
    }

    Ok(PrepareOptions {
        data_dir: cli.data.clone().unwrap_or_else(|| cwd.clone()),
        labels_path: cli.labels.clone().unwrap_or_else(|| cwd.join("labels.txt")),
        split_percent: cli.split,
        seed: cli.seed,
        info,
    })
}
