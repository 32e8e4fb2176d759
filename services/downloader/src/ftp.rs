//! FTP transport: a logged-in session parked in the zone directory, binary
//! RETR per file.
//!
//! The session opened by [`FtpTransport::connect`] serves the whole batch.
//! A RETR the server refuses, or a control connection that breaks, leaves
//! suppaftp's session unusable (its data-connection flag stays set), so the
//! session is dropped and reopened before the next file. No timeout is
//! applied to FTP operations.

use std::path::Path;

use async_trait::async_trait;
use suppaftp::tokio::AsyncFtpStream;
use suppaftp::types::FileType;
use suppaftp::FtpError;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::{debug, info, warn};
use ww3_common::ArchiveLayout;

use crate::config::FtpCredentials;
use crate::error::FetchResult;
use crate::transport::Transport;

pub struct FtpTransport {
    addr: String,
    dir: String,
    credentials: FtpCredentials,
    session: Option<AsyncFtpStream>,
}

impl FtpTransport {
    /// Connect, log in, change to the zone directory and switch to binary mode.
    pub async fn connect(
        layout: &ArchiveLayout,
        zone: &str,
        credentials: &FtpCredentials,
    ) -> FetchResult<Self> {
        let mut transport = Self {
            addr: layout.ftp_addr(),
            dir: layout.ftp_dir(zone),
            credentials: credentials.clone(),
            session: None,
        };
        transport.session = Some(transport.open_session().await?);
        Ok(transport)
    }

    async fn open_session(&self) -> FetchResult<AsyncFtpStream> {
        let mut stream = AsyncFtpStream::connect(self.addr.as_str()).await?;
        stream.login(&self.credentials.user, &self.credentials.password).await?;
        stream.cwd(&self.dir).await?;
        stream.transfer_type(FileType::Binary).await?;

        info!(
            host = %self.addr,
            dir = %self.dir,
            user = %self.credentials.user,
            "FTP session ready"
        );
        Ok(stream)
    }
}

#[async_trait]
impl Transport for FtpTransport {
    fn name(&self) -> &'static str {
        "ftp"
    }

    async fn retrieve(&mut self, filename: &str, dest: &Path) -> FetchResult<u64> {
        let mut file = File::create(dest).await?;

        let mut stream = match self.session.take() {
            Some(stream) => stream,
            None => {
                info!(host = %self.addr, "Reopening FTP session");
                self.open_session().await?
            }
        };

        debug!(file = %filename, "RETR");
        let (result, reusable) = retr_to_file(&mut stream, filename, &mut file).await;

        if reusable {
            self.session = Some(stream);
        } else {
            warn!(file = %filename, "Discarding FTP session after failed RETR");
        }

        result
    }

    async fn close(&mut self) -> FetchResult<()> {
        if let Some(mut stream) = self.session.take() {
            stream.quit().await?;
        }
        Ok(())
    }
}

/// Run one RETR into `file`, always finalizing an opened data stream.
///
/// Returns the transfer result (the first error wins) and whether the
/// session can serve another command.
async fn retr_to_file(
    stream: &mut AsyncFtpStream,
    filename: &str,
    file: &mut File,
) -> (FetchResult<u64>, bool) {
    let mut reader = match stream.retr_as_stream(filename).await {
        Ok(reader) => reader,
        Err(e) => return (Err(e.into()), false),
    };

    let copied = copy_to_file(&mut reader, file).await;
    let finalized = stream.finalize_retr_stream(reader).await;

    // A reply other than 226/250 was still read, so the control channel is in step.
    let reusable = matches!(finalized, Ok(()) | Err(FtpError::UnexpectedResponse(_)));

    let result = match (copied, finalized) {
        (Err(e), _) => Err(e),
        (Ok(_), Err(e)) => Err(e.into()),
        (Ok(written), Ok(())) => Ok(written),
    };
    (result, reusable)
}

async fn copy_to_file<R>(reader: &mut R, file: &mut File) -> FetchResult<u64>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let written = tokio::io::copy(reader, file).await?;
    file.flush().await?;
    file.sync_all().await?;
    Ok(written)
}
