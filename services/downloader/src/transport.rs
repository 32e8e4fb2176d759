//! Transfer seam between the download loop and the archive mirrors.

use std::path::Path;

use async_trait::async_trait;

use crate::error::FetchResult;

/// One way of pulling archive files (HTTPS, FTP, or a test double).
///
/// Implementations are used for a whole batch; a session-oriented transport
/// keeps its connection between calls.
#[async_trait]
pub trait Transport: Send {
    /// Short label for log lines.
    fn name(&self) -> &'static str;

    /// Retrieve `filename` from the zone directory into `dest`.
    ///
    /// Returns the number of bytes written. On error `dest` may hold a
    /// partial file; the caller removes it.
    async fn retrieve(&mut self, filename: &str, dest: &Path) -> FetchResult<u64>;

    /// End the session, if any.
    async fn close(&mut self) -> FetchResult<()> {
        Ok(())
    }
}
