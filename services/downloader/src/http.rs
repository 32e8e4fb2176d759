//! HTTPS transport: one GET per file against the archive mirror.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response, StatusCode};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};
use ww3_common::ArchiveLayout;

use crate::error::{FetchError, FetchResult};
use crate::transport::Transport;

/// Default per-request timeout for archive GETs.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpTransport {
    client: Client,
    layout: ArchiveLayout,
    zone: String,
}

impl HttpTransport {
    pub fn new(
        layout: ArchiveLayout,
        zone: impl Into<String>,
        request_timeout: Duration,
    ) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .tcp_nodelay(true)
            .build()?;

        Ok(Self {
            client,
            layout,
            zone: zone.into(),
        })
    }

    pub fn url_for(&self, filename: &str) -> String {
        self.layout.https_url(&self.zone, filename)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        "https"
    }

    #[instrument(skip(self, dest), fields(zone = %self.zone))]
    async fn retrieve(&mut self, filename: &str, dest: &Path) -> FetchResult<u64> {
        let url = self.url_for(filename);
        debug!(url = %url, "GET");

        let response = self.client.get(&url).send().await?;
        match response.status() {
            StatusCode::OK => stream_to_file(response, dest).await,
            status => Err(FetchError::HttpStatus(status)),
        }
    }
}

/// Stream the response body to `path`, truncating any existing file.
async fn stream_to_file(response: Response, path: &Path) -> FetchResult<u64> {
    let mut file = File::create(path).await?;
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    file.sync_all().await?;

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for() {
        let transport =
            HttpTransport::new(ArchiveLayout::default(), "FINIS-200M", DEFAULT_REQUEST_TIMEOUT)
                .unwrap();
        assert_eq!(
            transport.url_for("MARC_WW3-FINIS-200M_20250601T00Z.nc"),
            "https://data-dataref.ifremer.fr/marc/ww3/FINIS-200M/best_estimate/2025/MARC_WW3-FINIS-200M_20250601T00Z.nc"
        );
    }
}
