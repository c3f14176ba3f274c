//! Progress reporting
//!
//! The orchestrator and transfer layer report through a [`ProgressSink`]
//! trait object so front-ends decide how to surface activity. The
//! [`RateTracker`] computes transfer throughput and throttles how often
//! updates are emitted.

use std::time::Instant;

use crate::downloader::config::RATE_UPDATE_INTERVAL;

/// Receiver for live job activity.
///
/// All methods have no-op defaults; front-ends override what they display.
pub trait ProgressSink: Send + Sync {
    /// A new album (or playlist) is being processed.
    fn on_item_info(&self, _artist: &str, _title: &str) {}

    /// Transfer throughput changed; `text` is e.g. `"3.42 MB/s"` or `"Idle"`.
    fn on_speed(&self, _text: &str) {}

    /// A line was appended to the job log.
    fn on_log_line(&self, _line: &str) {}
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {}

/// Throughput tracker for one transfer.
///
/// The first chunk always produces an update so the display reacts
/// immediately; afterwards updates are limited to one per
/// [`RATE_UPDATE_INTERVAL`].
#[derive(Debug)]
pub struct RateTracker {
    started: Instant,
    last_emit: Option<Instant>,
    total_bytes: u64,
}

impl RateTracker {
    /// Start tracking from now.
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            last_emit: None,
            total_bytes: 0,
        }
    }

    /// Record a received chunk; returns a formatted rate when an update
    /// should be emitted.
    pub fn record(&mut self, chunk_bytes: usize) -> Option<String> {
        self.total_bytes += chunk_bytes as u64;

        let now = Instant::now();
        let due = match self.last_emit {
            None => true,
            Some(last) => now.duration_since(last) >= RATE_UPDATE_INTERVAL,
        };
        if !due {
            return None;
        }
        self.last_emit = Some(now);

        let elapsed = now.duration_since(self.started).as_secs_f64();
        if elapsed <= 0.0 {
            return Some("0.00 MB/s".to_string());
        }
        let mbps = self.total_bytes as f64 / elapsed / (1024.0 * 1024.0);
        Some(format!("{mbps:.2} MB/s"))
    }

    /// Total bytes recorded so far.
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Text emitted once a transfer finishes.
    pub fn idle_text() -> &'static str {
        "Idle"
    }
}

impl Default for RateTracker {
    fn default() -> Self {
        Self::new()
    }
}
