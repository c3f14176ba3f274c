//! Output path construction
//!
//! Builds the deterministic folder layout downloads land in and provides the
//! string utilities the layout depends on: filesystem-safe name sanitizing,
//! escape decoding, bounded truncation, and track-number padding.
//!
//! Layout for album-context downloads:
//!
//! ```text
//! <base>/<artist>/<album title> [<album id>]/[CD <n>/]<NN><sep><title><ext>
//! ```
//!
//! Tracklist-context downloads (favorite tracks, playlists) collapse the
//! artist/album/disc levels and name files by performer instead of number.

use regex::Regex;
use std::path::{Path, PathBuf};

use crate::output::OutputResult;

/// Characters that are invalid in filenames on common filesystems.
const INVALID_FILENAME_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Replace filesystem-invalid characters with underscores.
///
/// Also strips leading/trailing whitespace and trailing dots, which Windows
/// rejects in directory names.
pub fn safe_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if INVALID_FILENAME_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    replaced.trim().trim_end_matches('.').to_string()
}

/// Decode `\uXXXX` escapes the catalog occasionally leaves in metadata
/// strings.
///
/// Unpaired or out-of-range escapes are left as-is.
pub fn decode_non_ascii(value: &str) -> String {
    // Fixed literal, cannot fail to compile.
    let pattern = Regex::new(r"\\u([0-9a-fA-F]{4})").unwrap();
    pattern
        .replace_all(value, |caps: &regex::Captures<'_>| {
            u32::from_str_radix(&caps[1], 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Truncate a name to at most `max_chars` characters, trimming trailing
/// whitespace left at the cut.
///
/// Operates on characters rather than bytes so multi-byte names never split
/// mid-character.
pub fn trim_to_max_length(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let cut: String = value.chars().take(max_chars).collect();
    cut.trim_end().to_string()
}

/// Zero-pad a 1-based item number against the collection total.
///
/// Width is the decimal width of `total`, but never less than two, so small
/// collections still sort ("01".."09").
pub fn pad_number(number: u64, total: u64) -> String {
    let width = total.max(1).to_string().len().max(2);
    format!("{number:0width$}")
}

/// Directory an album's files land in: `<base>/<artist>/<album>[ <id>]`.
///
/// Shared by [`TrackPaths::build`] and callers that need the album folder
/// before any track exists (artwork, booklets).
pub fn album_dir(
    base_dir: &Path,
    artist: &str,
    album: &str,
    album_id: Option<&str>,
    max_name_length: usize,
) -> PathBuf {
    let artist_dir = trim_to_max_length(&safe_filename(&decode_non_ascii(artist)), max_name_length);
    let mut album_name =
        trim_to_max_length(&safe_filename(&decode_non_ascii(album)), max_name_length);
    if let Some(id) = album_id {
        album_name.push_str(&format!(" [{id}]"));
    }
    base_dir.join(artist_dir).join(album_name)
}

/// Everything needed to place one track on disk.
#[derive(Debug, Clone)]
pub struct TrackPaths {
    /// Directory of the album (artist/album levels), before any disc level
    pub album_dir: PathBuf,
    /// Directory the audio file lands in (album dir, or a `CD <n>` subdir)
    pub track_dir: PathBuf,
    /// Filename stem without extension
    pub file_stem: String,
    /// Full path of the audio file
    pub audio_file: PathBuf,
}

/// Inputs for [`TrackPaths::build`].
#[derive(Debug, Clone)]
pub struct TrackPathSpec<'a> {
    /// Root directory downloads go under
    pub base_dir: &'a Path,
    /// Album artist name
    pub artist: &'a str,
    /// Album display title (version included)
    pub album: &'a str,
    /// Album id to suffix the album folder with, when enabled
    pub album_id: Option<&'a str>,
    /// Disc number of the track, 1-based
    pub disc_number: u64,
    /// Total discs of the album
    pub disc_total: u64,
    /// Track number within its disc, 1-based
    pub track_number: u64,
    /// Total tracks of the album
    pub track_total: u64,
    /// Track display title (version included)
    pub title: &'a str,
    /// Track performer, used for tracklist-context filenames
    pub performer: &'a str,
    /// Tracklist context: flat layout, performer-based filename
    pub tracklist: bool,
    /// Separator between the number/performer part and the title
    pub separator: &'a str,
    /// Maximum length for generated file and folder names, in characters
    pub max_name_length: usize,
    /// Audio file extension including the dot
    pub extension: &'a str,
}

impl TrackPaths {
    /// Compute the directories and filename for one track.
    ///
    /// Pure path math; see [`TrackPaths::ensure_directories`] for creation.
    pub fn build(spec: &TrackPathSpec<'_>) -> Self {
        if spec.tracklist {
            let stem = Self::file_stem_from(spec.performer, spec.title, spec);
            let audio_file = spec.base_dir.join(format!("{stem}{}", spec.extension));
            return Self {
                album_dir: spec.base_dir.to_path_buf(),
                track_dir: spec.base_dir.to_path_buf(),
                file_stem: stem,
                audio_file,
            };
        }

        let album_dir = album_dir(
            spec.base_dir,
            spec.artist,
            spec.album,
            spec.album_id,
            spec.max_name_length,
        );

        // Disc subfolders only for multi-disc albums.
        let track_dir = if spec.disc_total > 1 {
            album_dir.join(format!("CD {}", pad_number(spec.disc_number, spec.disc_total)))
        } else {
            album_dir.clone()
        };

        let number = pad_number(spec.track_number, spec.track_total);
        let stem = Self::file_stem_from(&number, spec.title, spec);
        let audio_file = track_dir.join(format!("{stem}{}", spec.extension));

        Self {
            album_dir,
            track_dir,
            file_stem: stem,
            audio_file,
        }
    }

    fn file_stem_from(prefix: &str, title: &str, spec: &TrackPathSpec<'_>) -> String {
        let raw = format!(
            "{}{}{}",
            safe_filename(&decode_non_ascii(prefix)),
            spec.separator,
            safe_filename(&decode_non_ascii(title)),
        );
        trim_to_max_length(&raw, spec.max_name_length)
    }

    /// Create the track directory (and parents) if missing.
    pub fn ensure_directories(&self) -> OutputResult<()> {
        std::fs::create_dir_all(&self.track_dir)?;
        Ok(())
    }
}
