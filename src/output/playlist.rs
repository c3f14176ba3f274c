//! Extended m3u8 playlist files
//!
//! Collects entries during a playlist job and serializes them as an extended
//! m3u8 file next to the downloaded audio. Entries reference files by the
//! path they were written to; the caller only adds entries for files that
//! actually exist on disk, so the playlist never points at gaps.

use std::path::{Path, PathBuf};

use crate::output::OutputResult;

/// One playlist entry: a duration, a display label, and a file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    /// Track duration in whole seconds
    pub duration_secs: u64,
    /// Display label, "Performer - Title"
    pub label: String,
    /// Path of the audio file, as written
    pub path: PathBuf,
}

/// An extended m3u8 playlist under construction.
#[derive(Debug, Clone, Default)]
pub struct PlaylistFile {
    entries: Vec<PlaylistEntry>,
}

impl PlaylistFile {
    /// Start an empty playlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry for a downloaded track.
    pub fn push(&mut self, duration_secs: u64, performer: &str, title: &str, path: &Path) {
        self.entries.push(PlaylistEntry {
            duration_secs,
            label: format!("{performer} - {title}"),
            path: path.to_path_buf(),
        });
    }

    /// Number of entries collected so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries have been collected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the extended m3u8 text.
    pub fn render(&self) -> String {
        let mut out = String::from("#EXTM3U\n");
        for entry in &self.entries {
            out.push_str(&format!(
                "#EXTINF:{},{}\n{}\n",
                entry.duration_secs,
                entry.label,
                entry.path.display()
            ));
        }
        out
    }

    /// Write the playlist to `path`, replacing any previous file.
    pub fn write_to(&self, path: &Path) -> OutputResult<()> {
        std::fs::write(path, self.render())?;
        Ok(())
    }
}
