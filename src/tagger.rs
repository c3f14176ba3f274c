//! Audio file tag writing
//!
//! The orchestrator hands finished audio files to a [`TagWriter`] together
//! with a per-track [`TrackTags`] snapshot and the user's [`TaggingOptions`].
//! The default implementation writes tags with `lofty`; tests substitute a
//! no-op writer. Tag failures never fail a download, the audio file is kept
//! and the failure is reported as a warning.

use lofty::config::WriteOptions;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, ItemValue, Tag, TagItem};
use std::path::Path;

use crate::catalog::model::{AlbumMetadata, TrackMetadata};

/// Tag writing errors
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    /// The audio file could not be opened or parsed
    #[error("failed to read audio file: {0}")]
    Read(String),

    /// The tags could not be written back
    #[error("failed to write tags: {0}")]
    Write(String),

    /// The cover art file could not be read
    #[error("failed to read cover art: {0}")]
    Art(String),
}

/// Per-field tag toggles plus tagging behavior knobs.
///
/// Every field defaults to on except [`merge_performers`], matching the
/// most common configuration.
///
/// [`merge_performers`]: TaggingOptions::merge_performers
#[derive(Debug, Clone)]
#[allow(missing_docs)] // field names are self-describing toggles
pub struct TaggingOptions {
    pub write_track_title: bool,
    pub write_album_name: bool,
    pub write_album_artist: bool,
    pub write_track_artist: bool,
    pub write_composer: bool,
    pub write_producer: bool,
    pub write_label: bool,
    pub write_involved_people: bool,
    pub write_release_year: bool,
    pub write_release_date: bool,
    pub write_genre: bool,
    pub write_track_number: bool,
    pub write_track_total: bool,
    pub write_disc_number: bool,
    pub write_disc_total: bool,
    pub write_comment: bool,
    pub write_copyright: bool,
    pub write_upc: bool,
    pub write_isrc: bool,
    pub write_media_type: bool,
    pub write_url: bool,
    pub write_explicit: bool,
    pub write_cover_image: bool,
    /// Collapse duplicate names in the involved-people string, merging
    /// their roles, before writing it
    pub merge_performers: bool,
    /// Text for the comment tag
    pub comment: String,
}

impl Default for TaggingOptions {
    fn default() -> Self {
        Self {
            write_track_title: true,
            write_album_name: true,
            write_album_artist: true,
            write_track_artist: true,
            write_composer: true,
            write_producer: true,
            write_label: true,
            write_involved_people: true,
            write_release_year: true,
            write_release_date: true,
            write_genre: true,
            write_track_number: true,
            write_track_total: true,
            write_disc_number: true,
            write_disc_total: true,
            write_comment: true,
            write_copyright: true,
            write_upc: true,
            write_isrc: true,
            write_media_type: true,
            write_url: true,
            write_explicit: true,
            write_cover_image: true,
            merge_performers: false,
            comment: "catalog-downloader".to_string(),
        }
    }
}

/// Tag values for one track, assembled fresh per download.
#[derive(Debug, Clone, Default)]
#[allow(missing_docs)] // mirrors the tag fields one-to-one
pub struct TrackTags {
    pub title: String,
    pub album: String,
    pub album_artist: String,
    pub track_artist: String,
    pub composer: Option<String>,
    pub producer: Option<String>,
    pub label: Option<String>,
    pub involved_people: Option<String>,
    pub genre: Option<String>,
    /// Original release date, `YYYY-MM-DD`
    pub release_date: Option<String>,
    pub track_number: u64,
    pub track_total: u64,
    pub disc_number: u64,
    pub disc_total: u64,
    pub copyright: Option<String>,
    pub upc: Option<String>,
    pub isrc: Option<String>,
    pub media_type: Option<String>,
    /// Store page URL of the album
    pub url: Option<String>,
    pub explicit: bool,
}

impl TrackTags {
    /// Build the tag snapshot for a track within its album context.
    pub fn from_metadata(
        track: &TrackMetadata,
        album: &AlbumMetadata,
        options: &TaggingOptions,
    ) -> Self {
        let roles = track
            .performers
            .as_deref()
            .map(parse_performer_roles)
            .unwrap_or_default();
        let producer = names_with_role(&roles, "Producer");
        let composer = track
            .composer
            .as_ref()
            .map(|p| p.name.clone())
            .filter(|n| !n.is_empty());
        let involved_people = track.performers.as_deref().map(|raw| {
            if options.merge_performers {
                render_performer_roles(&roles)
            } else {
                raw.to_string()
            }
        });

        Self {
            title: track.full_title(),
            album: album.title.clone(),
            album_artist: album.artist.name.clone(),
            track_artist: if track.performer.name.is_empty() {
                album.artist.name.clone()
            } else {
                track.performer.name.clone()
            },
            composer,
            producer,
            label: Some(album.label.name.clone()).filter(|n| !n.is_empty()),
            involved_people,
            genre: Some(album.genre.name.clone()).filter(|n| !n.is_empty()),
            release_date: Some(album.release_date_original.clone()).filter(|d| !d.is_empty()),
            track_number: track.track_number,
            track_total: album.tracks_count,
            disc_number: track.media_number,
            disc_total: album.media_count,
            copyright: track
                .copyright
                .clone()
                .or_else(|| album.copyright.clone())
                .filter(|c| !c.is_empty()),
            upc: Some(album.upc.clone()).filter(|u| !u.is_empty()),
            isrc: track.isrc.clone().filter(|i| !i.is_empty()),
            media_type: Some(album.product_type.clone()).filter(|p| !p.is_empty()),
            url: Some(album.url.clone()).filter(|u| !u.is_empty()),
            explicit: track.parental_warning.unwrap_or(false),
        }
    }

    /// Release year derived from the release date.
    pub fn release_year(&self) -> Option<&str> {
        self.release_date.as_deref().and_then(|d| d.get(..4))
    }
}

/// Parse the raw involved-people string into `(name, roles)` pairs.
///
/// The wire format is ` - `-separated entries, each `Name, Role1, Role2`.
/// Repeated names are merged and their roles deduplicated, preserving first
/// appearance order throughout.
pub fn parse_performer_roles(raw: &str) -> Vec<(String, Vec<String>)> {
    let mut people: Vec<(String, Vec<String>)> = Vec::new();
    for entry in raw.split(" - ") {
        let mut fields = entry.split(", ").map(str::trim).filter(|f| !f.is_empty());
        let Some(name) = fields.next() else { continue };
        let roles: Vec<&str> = fields.collect();

        match people.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => {
                for role in roles {
                    if !existing.iter().any(|r| r == role) {
                        existing.push(role.to_string());
                    }
                }
            }
            None => people.push((
                name.to_string(),
                roles.into_iter().map(String::from).collect(),
            )),
        }
    }
    people
}

/// Comma-joined names holding the given role, if any.
pub fn names_with_role(people: &[(String, Vec<String>)], role: &str) -> Option<String> {
    let names: Vec<&str> = people
        .iter()
        .filter(|(_, roles)| roles.iter().any(|r| r.eq_ignore_ascii_case(role)))
        .map(|(name, _)| name.as_str())
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(names.join(", "))
    }
}

/// Render merged people back into the wire format.
fn render_performer_roles(people: &[(String, Vec<String>)]) -> String {
    people
        .iter()
        .map(|(name, roles)| {
            if roles.is_empty() {
                name.clone()
            } else {
                format!("{}, {}", name, roles.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join(" - ")
}

/// Writes tags into a finished audio file.
pub trait TagWriter: Send + Sync {
    /// Write the enabled tags (and cover art, when given) into `audio_path`.
    fn write_tags(
        &self,
        audio_path: &Path,
        art_path: Option<&Path>,
        tags: &TrackTags,
        options: &TaggingOptions,
    ) -> Result<(), TagError>;
}

/// `lofty`-backed tag writer.
#[derive(Debug, Default)]
pub struct LoftyTagger;

impl LoftyTagger {
    /// Create a tagger.
    pub fn new() -> Self {
        Self
    }
}

impl TagWriter for LoftyTagger {
    fn write_tags(
        &self,
        audio_path: &Path,
        art_path: Option<&Path>,
        tags: &TrackTags,
        options: &TaggingOptions,
    ) -> Result<(), TagError> {
        let mut tagged = Probe::open(audio_path)
            .map_err(|e| TagError::Read(e.to_string()))?
            .read()
            .map_err(|e| TagError::Read(e.to_string()))?;

        if tagged.primary_tag_mut().is_none() {
            let tag_type = tagged.primary_tag_type();
            tagged.insert_tag(Tag::new(tag_type));
        }
        let Some(tag) = tagged.primary_tag_mut() else {
            return Err(TagError::Write("no writable tag on file".to_string()));
        };

        if options.write_track_title {
            tag.set_title(tags.title.clone());
        }
        if options.write_album_name {
            tag.set_album(tags.album.clone());
        }
        if options.write_track_artist {
            tag.set_artist(tags.track_artist.clone());
        }
        if options.write_album_artist {
            set_text(tag, ItemKey::AlbumArtist, Some(&tags.album_artist));
        }
        if options.write_composer {
            set_text(tag, ItemKey::Composer, tags.composer.as_deref());
        }
        if options.write_producer {
            set_text(tag, ItemKey::Producer, tags.producer.as_deref());
        }
        if options.write_label {
            set_text(tag, ItemKey::Label, tags.label.as_deref());
        }
        if options.write_involved_people {
            set_text(
                tag,
                ItemKey::Unknown("TIPL".to_string()),
                tags.involved_people.as_deref(),
            );
        }
        if options.write_genre {
            if let Some(genre) = tags.genre.as_deref() {
                tag.set_genre(genre.to_string());
            }
        }
        if options.write_release_year {
            set_text(tag, ItemKey::Year, tags.release_year());
        }
        if options.write_release_date {
            set_text(tag, ItemKey::RecordingDate, tags.release_date.as_deref());
        }
        if options.write_track_number {
            tag.set_track(tags.track_number as u32);
        }
        if options.write_track_total {
            tag.set_track_total(tags.track_total as u32);
        }
        if options.write_disc_number {
            tag.set_disk(tags.disc_number as u32);
        }
        if options.write_disc_total {
            tag.set_disk_total(tags.disc_total as u32);
        }
        if options.write_comment {
            tag.set_comment(options.comment.clone());
        }
        if options.write_copyright {
            set_text(tag, ItemKey::CopyrightMessage, tags.copyright.as_deref());
        }
        if options.write_upc {
            set_text(tag, ItemKey::Barcode, tags.upc.as_deref());
        }
        if options.write_isrc {
            set_text(tag, ItemKey::Isrc, tags.isrc.as_deref());
        }
        if options.write_media_type {
            set_text(tag, ItemKey::OriginalMediaType, tags.media_type.as_deref());
        }
        if options.write_url {
            set_text(tag, ItemKey::CommercialInformationUrl, tags.url.as_deref());
        }
        if options.write_explicit && tags.explicit {
            set_text(tag, ItemKey::ParentalAdvisory, Some("1"));
        }
        if options.write_cover_image {
            if let Some(art) = art_path {
                let data = std::fs::read(art).map_err(|e| TagError::Art(e.to_string()))?;
                tag.push_picture(Picture::new_unchecked(
                    PictureType::CoverFront,
                    Some(MimeType::Jpeg),
                    None,
                    data,
                ));
            }
        }

        tagged
            .save_to_path(audio_path, WriteOptions::default())
            .map_err(|e| TagError::Write(e.to_string()))
    }
}

fn set_text(tag: &mut Tag, key: ItemKey, value: Option<&str>) {
    if let Some(value) = value {
        if !value.is_empty() {
            tag.insert(TagItem::new(key, ItemValue::Text(value.to_string())));
        }
    }
}
