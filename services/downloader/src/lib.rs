//! MARC WW3 forecast downloader.
//!
//! Enumerates the hourly archive files for a zone and date range and pulls
//! the missing ones over HTTPS or FTP:
//! - Files already on disk are skipped without contacting the server
//! - One file at a time; no retries
//! - Per-file results are returned as a [`ww3_common::RunSummary`]

pub mod config;
pub mod download;
pub mod error;
pub mod ftp;
pub mod http;
pub mod transport;

pub use config::{FetchRequest, FtpCredentials, TransportMode};
pub use download::{fetch_all, fetch_one, run};
pub use error::{FetchError, FetchResult};
pub use ftp::FtpTransport;
pub use http::{HttpTransport, DEFAULT_REQUEST_TIMEOUT};
pub use transport::Transport;
