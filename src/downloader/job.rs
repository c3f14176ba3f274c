//! Download job model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::link::ItemLink;

/// Lifecycle state of a download job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Created, not yet started
    Pending,
    /// Currently running
    InProgress,
    /// Finished with every item downloaded or legitimately skipped
    Completed,
    /// Finished, but some items failed or were missing
    CompletedWithWarnings,
    /// Stopped at the user's request
    Cancelled,
    /// Could not run: unrecognized link, missing item, or orchestrator busy
    Aborted,
}

impl JobStatus {
    /// Whether the job has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending | JobStatus::InProgress)
    }
}

/// One download job: a recognized item link plus its lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadJob {
    /// The item to download
    pub link: ItemLink,
    /// Current lifecycle state
    pub status: JobStatus,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl DownloadJob {
    /// Create a pending job for an item link.
    pub fn new(link: ItemLink) -> Self {
        Self {
            link,
            status: JobStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

/// Result summary of a finished job.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    /// Terminal status the job ended in
    pub status: JobStatus,
    /// Number of warnings and per-item errors accumulated along the way
    pub warnings: usize,
}

impl JobOutcome {
    /// Whether the job finished without any warnings or errors.
    pub fn is_clean(&self) -> bool {
        self.status == JobStatus::Completed && self.warnings == 0
    }
}
