//! Sequential download loop over the expected archive files.
//!
//! Key behaviour:
//! - A file already present at its final path is never transferred again
//! - Transfers land in `{filename}.part` and are renamed on success, so a
//!   failed transfer leaves nothing at the final path
//! - Per-file failures are logged and recorded; the batch always continues

use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{debug, info, warn};
use ww3_common::{forecast_filenames, FileOutcome, RunSummary, SkipReason, TargetFile};

use crate::config::{FetchRequest, TransportMode};
use crate::ftp::FtpTransport;
use crate::http::HttpTransport;
use crate::transport::Transport;

const PARTIAL_SUFFIX: &str = ".part";

/// Fetch a single file into `download_dir` unless it is already there.
pub async fn fetch_one<T>(transport: &mut T, filename: &str, download_dir: &Path) -> FileOutcome
where
    T: Transport + ?Sized,
{
    let final_path = download_dir.join(filename);
    if final_path.exists() {
        debug!(path = %final_path.display(), "File already exists, skipping download");
        return FileOutcome::Skipped {
            path: Some(final_path),
            reason: SkipReason::AlreadyPresent,
        };
    }

    let temp_path = download_dir.join(format!("{}{}", filename, PARTIAL_SUFFIX));

    let result = match transport.retrieve(filename, &temp_path).await {
        Ok(bytes) => fs::rename(&temp_path, &final_path)
            .await
            .map(|()| bytes)
            .map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    match result {
        Ok(bytes) => {
            info!(path = %final_path.display(), bytes = bytes, "Download completed");
            FileOutcome::Completed { path: final_path }
        }
        Err(reason) => {
            if temp_path.exists() {
                fs::remove_file(&temp_path).await.ok();
            }
            warn!(
                transport = transport.name(),
                file = %filename,
                error = %reason,
                "Error downloading file"
            );
            FileOutcome::Failed { reason }
        }
    }
}

/// Fetch every target in order, one at a time.
pub async fn fetch_all<T>(
    transport: &mut T,
    targets: &[TargetFile],
    download_dir: &Path,
) -> RunSummary
where
    T: Transport + ?Sized,
{
    let total = targets.len();
    let mut summary = RunSummary::new();

    for (index, target) in targets.iter().enumerate() {
        let filename = target.filename();
        let outcome = fetch_one(&mut *transport, &filename, download_dir).await;
        debug!(
            progress = format!("{}/{}", index + 1, total),
            file = %filename,
            "Processed target"
        );
        summary.push(filename, outcome);
    }

    summary
}

/// Create the download directory, open the selected transport and fetch the
/// whole date range.
///
/// Only setup failures (directory creation, FTP login) are errors; per-file
/// problems end up in the summary.
pub async fn run(request: &FetchRequest) -> Result<RunSummary> {
    fs::create_dir_all(&request.download_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create download directory: {}",
                request.download_dir.display()
            )
        })?;

    let targets = forecast_filenames(&request.zone, request.start_date, request.days_fwd)?;
    info!(
        zone = %request.zone,
        start_date = %request.start_date,
        days_fwd = request.days_fwd,
        files = targets.len(),
        "Starting WW3 download"
    );

    let mut transport: Box<dyn Transport> = match &request.mode {
        TransportMode::Https => Box::new(
            HttpTransport::new(request.layout.clone(), &request.zone, request.request_timeout)
                .context("Failed to create HTTP client")?,
        ),
        TransportMode::Ftp(credentials) => Box::new(
            FtpTransport::connect(&request.layout, &request.zone, credentials)
                .await
                .context("Failed to open FTP session")?,
        ),
    };

    let summary = fetch_all(transport.as_mut(), &targets, &request.download_dir).await;

    if let Err(e) = transport.close().await {
        warn!(transport = transport.name(), error = %e, "Failed to close session");
    }

    Ok(summary)
}
