//! Download configuration and paging/transfer constants

use std::path::PathBuf;
use std::time::Duration;

use crate::tagger::TaggingOptions;
use crate::Quality;

/// Page size for album track listings.
/// The catalog serves at most 50 tracks per album request.
pub const ALBUM_TRACK_PAGE_LIMIT: u64 = 50;

/// Page size for artist release lists.
/// Release-list responses carry a `has_more` flag, so 100 keeps request
/// counts low without needing a defensive cap.
pub const ARTIST_RELEASE_PAGE_LIMIT: u64 = 100;

/// Page size for label albums and user-favorite listings.
/// These endpoints report only a total, so walks stop on an empty page,
/// on reaching the total, or at [`MAX_CATALOG_PAGES`].
pub const CATALOG_ALBUM_PAGE_LIMIT: u64 = 500;

/// Upper bound on pages walked for label/favorites listings.
/// 500 pages of 500 items covers any real catalog; a remote that keeps
/// reporting more than that is considered wedged.
pub const MAX_CATALOG_PAGES: u64 = 500;

/// Page size for playlist track listings.
/// The catalog caps playlists at 10,000 tracks, so one request suffices.
pub const PLAYLIST_TRACK_LIMIT: u64 = 10_000;

/// Buffer size for streaming transfers to disk.
pub const TRANSFER_BUFFER_BYTES: usize = 32 * 1024;

/// Minimum interval between transfer-rate updates.
/// The first chunk always reports; afterwards updates are throttled so the
/// live surface is not flooded.
pub const RATE_UPDATE_INTERVAL: Duration = Duration::from_millis(200);

/// Default maximum length for generated file and folder names, in characters.
pub const DEFAULT_MAX_NAME_LENGTH: usize = 36;

/// Runtime configuration for one orchestrator.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Root directory downloads land under
    pub base_dir: PathBuf,
    /// Directory for job and error log files
    pub logging_dir: PathBuf,
    /// Quality tier to request
    pub quality: Quality,
    /// Separator between number/performer and title in filenames
    pub filename_separator: String,
    /// Maximum length for generated file and folder names, in characters
    pub max_name_length: usize,
    /// Suffix album folders with the album id
    pub album_id_in_folder: bool,
    /// Honor the catalog's per-track streamable flag.
    /// When off every track is attempted regardless of the flag.
    pub check_streamable: bool,
    /// Artwork size token for the embedded cover ("600" class)
    pub embedded_art_size: String,
    /// Artwork size token for the saved Cover.jpg ("max" for the original)
    pub saved_art_size: String,
    /// Tag field toggles
    pub tagging: TaggingOptions,
}

impl DownloadConfig {
    /// Configuration with defaults for everything but the base directory.
    ///
    /// Logs go to `<base_dir>/logs`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let logging_dir = base_dir.join("logs");
        Self {
            base_dir,
            logging_dir,
            quality: Quality::Cd,
            filename_separator: " - ".to_string(),
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
            album_id_in_folder: false,
            check_streamable: true,
            embedded_art_size: "600".to_string(),
            saved_art_size: "max".to_string(),
            tagging: TaggingOptions::default(),
        }
    }
}
