//! WW3 forecast downloader.
//!
//! Downloads MARC WW3 NetCDF files from IFREMER with:
//! - HTTPS (default) or FTP transport
//! - Skip-if-present idempotence
//! - A per-file summary, optionally written as JSON

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use downloader::{run, FetchRequest, FtpCredentials, TransportMode};
use ww3_common::archive::{DEFAULT_BASE_URL, DEFAULT_FTP_HOST, DEFAULT_FTP_PORT};
use ww3_common::{default_start_date, parse_start_date, ArchiveLayout};

#[derive(Parser, Debug)]
#[command(name = "ww3-downloader")]
#[command(about = "Download WW3 NetCDF files from IFREMER")]
struct Args {
    /// Download via FTP instead of HTTPS
    #[arg(long)]
    ftp: bool,

    /// JSON containing FTP credentials (if using FTP)
    #[arg(long, default_value = "ftp_credentials.json")]
    credentials: PathBuf,

    /// Zone to download (e.g., MANCHE-NORD-500M or FINIS-200M)
    #[arg(short = 'z', long, default_value = "MANCHE-NORD-500M")]
    zone: String,

    /// How many days forward from the start date to download (0 = start date only)
    #[arg(short = 'd', long = "days_fwd", alias = "days-fwd", default_value_t = 3)]
    days_fwd: u32,

    /// Start date in YYYY-MM-DD format (default: tomorrow UTC)
    #[arg(long = "start_date", alias = "start-date")]
    start_date: Option<String>,

    /// Directory to save downloaded files
    #[arg(long = "download_dir", alias = "download-dir", default_value = "ww3_data")]
    download_dir: PathBuf,

    /// HTTPS archive root
    #[arg(long = "base_url", env = "WW3_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// FTP host (optionally host:port)
    #[arg(long = "ftp_host", env = "WW3_FTP_HOST", default_value = DEFAULT_FTP_HOST)]
    ftp_host: String,

    /// Archive year directory
    #[arg(long = "archive_year", default_value_t = 2025)]
    archive_year: u16,

    /// HTTPS request timeout in seconds
    #[arg(long = "timeout_secs", default_value_t = 10)]
    timeout_secs: u64,

    /// Write the per-file summary as JSON to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Exit with an error when any file could not be downloaded
    #[arg(long)]
    strict: bool,

    /// Log level
    #[arg(long = "log_level", alias = "log-level", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
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

    let start_date = match &args.start_date {
        Some(value) => parse_start_date(value)?,
        None => default_start_date(Utc::now()),
    };

    let mode = if args.ftp {
        TransportMode::Ftp(FtpCredentials::load(&args.credentials)?)
    } else {
        TransportMode::Https
    };

    let request = FetchRequest {
        zone: args.zone.clone(),
        start_date,
        days_fwd: args.days_fwd,
        download_dir: args.download_dir.clone(),
        layout: ArchiveLayout {
            base_url: args.base_url.clone(),
            ftp_host: args.ftp_host.clone(),
            ftp_port: DEFAULT_FTP_PORT,
            year: args.archive_year,
            ..Default::default()
        },
        mode,
        request_timeout: Duration::from_secs(args.timeout_secs),
    };

    let summary = run(&request).await?;

    info!(
        completed = summary.completed(),
        skipped = summary.skipped(),
        failed = summary.failed(),
        "Download session complete"
    );

    if let Some(path) = &args.summary {
        summary
            .write_json(path)
            .with_context(|| format!("Failed to write summary: {}", path.display()))?;
    }

    if !summary.is_complete() {
        warn!(failed = summary.failed(), "Some files could not be downloaded");
        if args.strict {
            bail!("{} of {} files failed to download", summary.failed(), summary.len());
        }
    }

    Ok(())
}
