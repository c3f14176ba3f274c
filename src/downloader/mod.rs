//! Download orchestration
//!
//! The [`DownloadOrchestrator`] expands a recognized item link into per-track
//! downloads, drives transfers and tagging, and aggregates partial failures
//! into a single [`JobOutcome`]. Collaborators (catalog client, file
//! transfer, tag writer, progress sink) are injected as trait objects.

pub mod config;
pub mod job;
pub mod orchestrator;
pub mod progress;
pub mod transfer;

pub use config::DownloadConfig;
pub use job::{DownloadJob, JobOutcome, JobStatus};
pub use orchestrator::DownloadOrchestrator;
pub use progress::{NullProgress, ProgressSink, RateTracker};
pub use transfer::{write_bad_marker, FileTransfer, HttpTransferer, TransferError};

use crate::catalog::CatalogError;
use crate::logger::LoggerError;
use crate::output::OutputError;
use crate::tagger::TagError;

/// Download errors
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// Catalog request failed
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// File transfer failed
    #[error("transfer error: {0}")]
    Transfer(#[from] TransferError),

    /// Filesystem or playlist output failed
    #[error("output error: {0}")]
    Output(#[from] OutputError),

    /// Tag writing failed
    #[error("tagging error: {0}")]
    Tag(#[from] TagError),

    /// Job logger could not be set up
    #[error("logger error: {0}")]
    Logger(#[from] LoggerError),

    /// A job is already running on this orchestrator
    #[error("a download job is already running")]
    Busy,
}

/// Result type for download operations
pub type DownloadResult<T> = Result<T, DownloadError>;
