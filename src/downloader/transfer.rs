//! Streaming file transfer
//!
//! Downloads a URL to a destination path in buffered chunks, reporting
//! throughput through the [`ProgressSink`]. When an audio transfer fails the
//! orchestrator calls [`write_bad_marker`] so the next run retries the track
//! and the partial file never masquerades as a finished download.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

use crate::downloader::config::TRANSFER_BUFFER_BYTES;
use crate::downloader::progress::{ProgressSink, RateTracker};

/// Transfer errors
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Transport-level failure
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("HTTP status {0}")]
    Http(u16),

    /// Writing the destination file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for transfer operations
pub type TransferResult<T> = Result<T, TransferError>;

/// User agent sent on media transfers.
pub const DEFAULT_USER_AGENT: &str = "catalog-downloader/0.1";

/// Streams a remote file to disk.
#[async_trait]
pub trait FileTransfer: Send + Sync {
    /// Download `url` into `dest`, replacing any existing file.
    ///
    /// Reports throughput via `sink` while streaming and emits the idle text
    /// once done.
    async fn transfer(&self, url: &str, dest: &Path, sink: &dyn ProgressSink)
        -> TransferResult<()>;
}

/// reqwest-backed transfer implementation.
pub struct HttpTransferer {
    client: Client,
}

impl HttpTransferer {
    /// Create a transferer with its own HTTP client.
    pub fn new(user_agent: &str) -> TransferResult<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| TransferError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FileTransfer for HttpTransferer {
    async fn transfer(
        &self,
        url: &str,
        dest: &Path,
        sink: &dyn ProgressSink,
    ) -> TransferResult<()> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransferError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::Http(status.as_u16()));
        }

        let file = tokio::fs::File::create(dest).await?;
        let mut writer = BufWriter::with_capacity(TRANSFER_BUFFER_BYTES, file);
        let mut stream = response.bytes_stream();
        let mut tracker = RateTracker::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| TransferError::Network(e.to_string()))?;
            writer.write_all(&chunk).await?;
            if let Some(rate) = tracker.record(chunk.len()) {
                sink.on_speed(&rate);
            }
        }

        writer.flush().await?;
        sink.on_speed(RateTracker::idle_text());
        debug!(bytes = tracker.total_bytes(), dest = %dest.display(), "transfer complete");
        Ok(())
    }
}

/// Replace a failed download with a zero-byte `<name>.bad` marker.
///
/// The partial file is removed so a later run re-attempts the track instead
/// of skipping it as already downloaded.
pub fn write_bad_marker(audio_path: &Path) -> std::io::Result<PathBuf> {
    if audio_path.exists() {
        std::fs::remove_file(audio_path)?;
    }
    let mut marker = audio_path.as_os_str().to_owned();
    marker.push(".bad");
    let marker = PathBuf::from(marker);
    std::fs::File::create(&marker)?;
    Ok(marker)
}
