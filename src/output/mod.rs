//! Output paths and playlist files

pub mod path;
pub mod playlist;

pub use path::{
    album_dir, decode_non_ascii, pad_number, safe_filename, trim_to_max_length, TrackPathSpec,
    TrackPaths,
};
pub use playlist::PlaylistFile;

/// Output errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// Filesystem operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
