//! Remote layout of the IFREMER MARC WW3 archive.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://data-dataref.ifremer.fr/marc/ww3";
pub const DEFAULT_FTP_HOST: &str = "ftp.ifremer.fr";
pub const DEFAULT_FTP_PORT: u16 = 21;
/// Archive designation for the most current forecast run.
pub const BEST_ESTIMATE: &str = "best_estimate";
pub const DEFAULT_ARCHIVE_YEAR: u16 = 2025;

/// Where zone files live on the HTTPS and FTP mirrors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveLayout {
    /// HTTPS root, zone directories sit directly below it
    pub base_url: String,
    pub ftp_host: String,
    pub ftp_port: u16,
    /// Run designation path segment
    pub product: String,
    /// Year directory under the product
    pub year: u16,
}

impl Default for ArchiveLayout {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            ftp_host: DEFAULT_FTP_HOST.to_string(),
            ftp_port: DEFAULT_FTP_PORT,
            product: BEST_ESTIMATE.to_string(),
            year: DEFAULT_ARCHIVE_YEAR,
        }
    }
}

impl ArchiveLayout {
    /// `{base_url}/{zone}/best_estimate/{year}/{filename}`
    pub fn https_url(&self, zone: &str, filename: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            zone,
            self.product,
            self.year,
            filename
        )
    }

    /// `/MARC_WW3/{zone}/best_estimate/{year}/`
    pub fn ftp_dir(&self, zone: &str) -> String {
        format!("/MARC_WW3/{}/{}/{}/", zone, self.product, self.year)
    }

    /// `host:port` for the control connection. A host that already carries
    /// a port is used as given.
    pub fn ftp_addr(&self) -> String {
        if self.ftp_host.contains(':') {
            self.ftp_host.clone()
        } else {
            format!("{}:{}", self.ftp_host, self.ftp_port)
        }
    }
}
