//! Error types for archive transfers.

use thiserror::Error;

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

#[derive(Error, Debug)]
pub enum FetchError {
    /// Server answered with something other than 200 OK
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("FTP error: {0}")]
    Ftp(#[from] suppaftp::FtpError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
