//! # Catalog Downloader Library
//!
//! A library for bulk-downloading music catalog content: single tracks, full
//! albums, complete artist and label discographies, user favorites, and
//! playlists. Downloads are tagged, numbered, and organized into a
//! deterministic folder layout, with playlist jobs additionally producing an
//! extended m3u8 file.
//!
//! ## Features
//!
//! - **Item Recognition**: Turns catalog store URLs into typed download items
//! - **Batch Expansion**: Walks paginated album, artist, label, favorites and
//!   playlist listings into per-track downloads
//! - **Streaming Transfer**: Chunked audio/artwork transfer with live
//!   throughput reporting
//! - **Tagging**: Per-field configurable metadata and cover-art embedding
//! - **Resumable Layout**: Already-downloaded files are detected and skipped;
//!   failed transfers leave a `.bad` marker behind
//! - **Cooperative Cancellation**: Jobs stop cleanly at item boundaries
//!
//! ## Quick Start
//!
//! ```no_run
//! use catalog_downloader::cancel::CancelToken;
//! use catalog_downloader::downloader::{DownloadConfig, DownloadJob, DownloadOrchestrator};
//! use catalog_downloader::link::ItemLink;
//! use std::sync::Arc;
//!
//! # async fn example(
//! #     catalog: Arc<dyn catalog_downloader::catalog::CatalogClient>,
//! #     transfer: Arc<dyn catalog_downloader::downloader::FileTransfer>,
//! #     tagger: Arc<dyn catalog_downloader::tagger::TagWriter>,
//! #     sink: Arc<dyn catalog_downloader::downloader::ProgressSink>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let link = ItemLink::parse("https://play.example.com/album/0060254735180");
//! let config = DownloadConfig::new("./downloads");
//! let orchestrator = DownloadOrchestrator::new(catalog, transfer, tagger, sink, config)?;
//!
//! let job = DownloadJob::new(link);
//! let outcome = orchestrator.run_job(job, CancelToken::new()).await;
//! println!("{:?}", outcome.status);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`link`] - Store URL recognition into typed item references
//! - [`catalog`] - Remote catalog client (metadata, listings, stream URLs)
//! - [`downloader`] - Download orchestration, transfer, progress reporting
//! - [`tagger`] - Metadata tag writing for downloaded audio files
//! - [`output`] - Path construction, sanitization, playlist files
//! - [`logger`] - Per-job log files with an error-detail companion log
//! - [`cancel`] - Cooperative cancellation token shared with the caller

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cooperative cancellation token
pub mod cancel;

/// Remote catalog client
pub mod catalog;

/// CLI command implementations
pub mod cli;

/// Download orchestration
pub mod downloader;

/// Store URL recognition
pub mod link;

/// Per-job log files
pub mod logger;

/// Output paths and playlist files
pub mod output;

/// Audio file tag writing
pub mod tagger;

// Re-export commonly used types
pub use link::{ItemLink, LinkKind};

/// Audio quality tier requested from the catalog.
///
/// Each tier maps to the numeric format id the catalog's file-url endpoint
/// expects, and determines the extension of downloaded audio files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    /// MP3 320 kbps
    Mp3,
    /// FLAC, 16-bit / 44.1 kHz (CD quality)
    Cd,
    /// FLAC, up to 24-bit / 96 kHz
    Hires96,
    /// FLAC, up to 24-bit / 192 kHz
    Hires192,
}

impl Quality {
    /// Numeric format id passed to the catalog's file-url endpoint.
    pub fn format_id(&self) -> &'static str {
        match self {
            Quality::Mp3 => "5",
            Quality::Cd => "6",
            Quality::Hires96 => "7",
            Quality::Hires192 => "27",
        }
    }

    /// File extension for audio downloaded at this tier, including the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Quality::Mp3 => ".mp3",
            _ => ".flac",
        }
    }

    /// Human-readable tier description.
    pub fn display_name(&self) -> &'static str {
        match self {
            Quality::Mp3 => "MP3 320 kbps",
            Quality::Cd => "FLAC (16bit/44.1kHz)",
            Quality::Hires96 => "FLAC (24bit/96kHz)",
            Quality::Hires192 => "FLAC (24bit/192kHz)",
        }
    }

    /// Upper bound on bit depth for this tier.
    pub fn max_bit_depth(&self) -> u32 {
        match self {
            Quality::Mp3 | Quality::Cd => 16,
            Quality::Hires96 | Quality::Hires192 => 24,
        }
    }

    /// Upper bound on sample rate in kHz for this tier.
    pub fn max_sample_rate_khz(&self) -> f64 {
        match self {
            Quality::Mp3 | Quality::Cd => 44.1,
            Quality::Hires96 => 96.0,
            Quality::Hires192 => 192.0,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Quality {
    type Err = QualityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "5" => Ok(Quality::Mp3),
            "6" => Ok(Quality::Cd),
            "7" => Ok(Quality::Hires96),
            "27" => Ok(Quality::Hires192),
            other => Err(QualityParseError::UnknownFormatId(other.to_string())),
        }
    }
}

/// Errors that can occur when parsing a quality format id
#[derive(Debug, thiserror::Error)]
pub enum QualityParseError {
    /// The format id is not one of the supported tiers
    #[error("unknown quality format id: {0} (expected 5, 6, 7 or 27)")]
    UnknownFormatId(String),
}
