//! WW3 reprocessor.
//!
//! Subsets downloaded MARC WW3 files to the GRIB-relevant variables, renames
//! them and concatenates the results along time into one file.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use netcdf_processor::{silence_hdf5_errors, OutputFormat};
use reprocessor::{
    discover_inputs, run, CombineOutcome, ReprocessConfig, DEFAULT_OUTPUT, DEFAULT_PROCESSED_DIR,
};

#[derive(Parser, Debug)]
#[command(name = "ww3-reprocessor")]
#[command(about = "Process WW3 NetCDF files into a single file for GRIB conversion")]
struct Args {
    /// List of files to process
    files: Vec<PathBuf>,

    /// Output NetCDF file
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Directory for per-file processed outputs
    #[arg(
        short = 'p',
        long = "processed_dir",
        alias = "processed-dir",
        default_value = DEFAULT_PROCESSED_DIR
    )]
    processed_dir: PathBuf,

    /// Process every *.nc file in this directory when no files are given
    #[arg(long = "input_dir", alias = "input-dir")]
    input_dir: Option<PathBuf>,

    /// Output format: netcdf4-classic or netcdf4
    #[arg(long, default_value = "netcdf4-classic")]
    format: OutputFormat,

    /// YAML rename table replacing the built-in GRIB mapping
    #[arg(long = "var_map", alias = "var-map")]
    var_map: Option<PathBuf>,

    /// Write the per-file summary as JSON to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Exit with an error when any input file failed
    #[arg(long)]
    strict: bool,

    /// Log level
    #[arg(long = "log_level", alias = "log-level", default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    silence_hdf5_errors();

    let mut config =
        ReprocessConfig::new(&args.processed_dir, &args.output).with_format(args.format);
    if let Some(path) = &args.var_map {
        config = config.with_variable_map_file(path)?;
    }

    let inputs = match (&args.input_dir, args.files.is_empty()) {
        (Some(dir), true) => discover_inputs(dir)?,
        (Some(dir), false) => {
            warn!(input_dir = %dir.display(), "Explicit files given, ignoring --input_dir");
            args.files.clone()
        }
        (None, _) => args.files.clone(),
    };

    let summary = run(&inputs, &config)?;

    info!(
        completed = summary.files.completed(),
        skipped = summary.files.skipped(),
        failed = summary.files.failed(),
        combined = matches!(summary.combined, CombineOutcome::Written { .. }),
        "Reprocessing complete"
    );

    if let Some(path) = &args.summary {
        summary.write_json(path)?;
    }

    if !summary.files.is_complete() {
        warn!(failed = summary.files.failed(), "Some files could not be processed");
        if args.strict {
            bail!(
                "{} of {} files failed to process",
                summary.files.failed(),
                summary.files.len()
            );
        }
    }

    Ok(())
}
