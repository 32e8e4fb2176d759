//! Downloader configuration: transport selection and FTP credentials.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;
use ww3_common::ArchiveLayout;

use crate::http::DEFAULT_REQUEST_TIMEOUT;

/// FTP login read from a JSON file: `{"user": "...", "password": "..."}`.
#[derive(Clone, Deserialize)]
pub struct FtpCredentials {
    pub user: String,
    pub password: String,
}

impl FtpCredentials {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials file: {}", path.display()))?;

        let credentials: FtpCredentials = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse credentials file: {}", path.display()))?;

        debug!(path = %path.display(), user = %credentials.user, "Loaded FTP credentials");
        Ok(credentials)
    }
}

impl fmt::Debug for FtpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FtpCredentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum TransportMode {
    Https,
    Ftp(FtpCredentials),
}

/// Everything one download run needs.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub zone: String,
    pub start_date: NaiveDate,
    pub days_fwd: u32,
    pub download_dir: PathBuf,
    pub layout: ArchiveLayout,
    pub mode: TransportMode,
    /// HTTPS only; FTP operations are not bounded
    pub request_timeout: Duration,
}

impl FetchRequest {
    /// HTTPS request with default layout and timeout.
    pub fn https(
        zone: impl Into<String>,
        start_date: NaiveDate,
        days_fwd: u32,
        download_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            zone: zone.into(),
            start_date,
            days_fwd,
            download_dir: download_dir.into(),
            layout: ArchiveLayout::default(),
            mode: TransportMode::Https,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}
