//! Catalog data model
//!
//! Deserialization targets for the remote catalog's JSON responses. Only the
//! fields the downloader consumes are modeled; everything else is ignored.
//! Optional fields default so partially filled responses still deserialize.

use serde::{Deserialize, Serialize};

/// A paginated slice of a remote listing.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Page<T> {
    /// Items in this slice
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Total number of items the remote reports for the whole listing
    #[serde(default)]
    pub total: u64,
    /// Offset of the first item in this slice
    #[serde(default)]
    pub offset: u64,
    /// Page size the remote applied
    #[serde(default)]
    pub limit: u64,
}

impl<T> Page<T> {
    /// Whether this slice carries no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A named person attached to a track or album (performer, composer, artist).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Person {
    /// Catalog id
    #[serde(default)]
    pub id: u64,
    /// Display name
    #[serde(default)]
    pub name: String,
}

/// Cover art URLs at the sizes the catalog serves.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CoverImages {
    /// Largest rendition (600px class); the max-size original is derived
    /// from this URL by the orchestrator
    #[serde(default)]
    pub large: String,
    /// Small rendition
    #[serde(default)]
    pub small: String,
    /// Thumbnail rendition
    #[serde(default)]
    pub thumbnail: String,
}

impl CoverImages {
    /// URL for a given size token, derived from the large rendition.
    ///
    /// The catalog encodes the size in the filename (`..._600.jpg`); `"max"`
    /// maps to the original-size token. Falls back to the large URL when the
    /// size marker is not where expected.
    pub fn sized_url(&self, size: &str) -> String {
        let token = if size == "max" { "org" } else { size };
        match self.large.rfind("_600") {
            Some(idx) => format!(
                "{}_{}{}",
                &self.large[..idx],
                token,
                &self.large[idx + "_600".len()..]
            ),
            None => self.large.clone(),
        }
    }
}

/// A supplementary album download ("goody"), e.g. a digital booklet.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Goody {
    /// Remote file format id; booklet PDFs carry [`Goody::BOOKLET_FORMAT_ID`]
    #[serde(default)]
    pub file_format_id: u64,
    /// Download URL
    #[serde(default)]
    pub url: String,
    /// Display name
    #[serde(default)]
    pub name: String,
}

impl Goody {
    /// File format id the catalog uses for PDF booklets.
    pub const BOOKLET_FORMAT_ID: u64 = 21;

    /// Whether this goody is a digital booklet.
    pub fn is_booklet(&self) -> bool {
        self.file_format_id == Self::BOOKLET_FORMAT_ID
    }
}

/// Record label reference on an album.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LabelRef {
    /// Catalog id
    #[serde(default)]
    pub id: u64,
    /// Label name
    #[serde(default)]
    pub name: String,
}

/// Genre reference on an album.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenreRef {
    /// Genre name
    #[serde(default)]
    pub name: String,
}

/// Album metadata, optionally carrying a page of its tracks.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AlbumMetadata {
    /// Catalog id (alphanumeric)
    #[serde(default)]
    pub id: String,
    /// Album title
    #[serde(default)]
    pub title: String,
    /// Version qualifier, e.g. "Deluxe Edition"
    #[serde(default)]
    pub version: Option<String>,
    /// Main album artist
    #[serde(default)]
    pub artist: Person,
    /// Record label
    #[serde(default)]
    pub label: LabelRef,
    /// Primary genre
    #[serde(default)]
    pub genre: GenreRef,
    /// Original release date, `YYYY-MM-DD`
    #[serde(default)]
    pub release_date_original: String,
    /// Number of tracks across all discs
    #[serde(default)]
    pub tracks_count: u64,
    /// Number of discs
    #[serde(default)]
    pub media_count: u64,
    /// UPC / barcode
    #[serde(default)]
    pub upc: String,
    /// Copyright line
    #[serde(default)]
    pub copyright: Option<String>,
    /// Store page URL
    #[serde(default)]
    pub url: String,
    /// Product type token, e.g. "album"
    #[serde(default)]
    pub product_type: String,
    /// Cover art renditions
    #[serde(default)]
    pub image: CoverImages,
    /// Supplementary downloads, if any
    #[serde(default)]
    pub goodies: Option<Vec<Goody>>,
    /// Track listing slice, present on album-detail responses
    #[serde(default)]
    pub tracks: Option<Page<TrackMetadata>>,
}

impl AlbumMetadata {
    /// Full display title, appending the version qualifier when present.
    pub fn full_title(&self) -> String {
        match self.version.as_deref() {
            Some(v) if !v.trim().is_empty() => format!("{} ({})", self.title.trim(), v.trim()),
            _ => self.title.trim().to_string(),
        }
    }
}

/// Track metadata as served by the catalog.
///
/// On album-detail responses the per-track `album` field is absent; the
/// orchestrator injects the parent album before handing tracks on.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrackMetadata {
    /// Catalog id
    #[serde(default)]
    pub id: u64,
    /// Track title
    #[serde(default)]
    pub title: String,
    /// Version qualifier, e.g. "Remastered 2009"
    #[serde(default)]
    pub version: Option<String>,
    /// Position within its disc, 1-based
    #[serde(default)]
    pub track_number: u64,
    /// Disc number, 1-based
    #[serde(default)]
    pub media_number: u64,
    /// Duration in seconds
    #[serde(default)]
    pub duration: u64,
    /// Main performer
    #[serde(default)]
    pub performer: Person,
    /// Composer, when the catalog knows it
    #[serde(default)]
    pub composer: Option<Person>,
    /// Raw involved-people string ("Name, Role1, Role2 - Name, Role ...")
    #[serde(default)]
    pub performers: Option<String>,
    /// Copyright line
    #[serde(default)]
    pub copyright: Option<String>,
    /// ISRC code
    #[serde(default)]
    pub isrc: Option<String>,
    /// Explicit-lyrics flag
    #[serde(default)]
    pub parental_warning: Option<bool>,
    /// Whether the account may stream this track; `None` means unknown
    #[serde(default)]
    pub streamable: Option<bool>,
    /// Parent album, present on track-detail responses
    #[serde(default)]
    pub album: Option<Box<AlbumMetadata>>,
}

impl TrackMetadata {
    /// Full display title, appending the version qualifier when present.
    pub fn full_title(&self) -> String {
        match self.version.as_deref() {
            Some(v) if !v.trim().is_empty() => format!("{} ({})", self.title.trim(), v.trim()),
            _ => self.title.trim().to_string(),
        }
    }
}

/// Artist profile.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ArtistProfile {
    /// Catalog id
    #[serde(default)]
    pub id: u64,
    /// Artist name
    #[serde(default)]
    pub name: String,
}

/// One page of an artist's releases, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReleaseList {
    /// Whether another page follows this one
    #[serde(default)]
    pub has_more: bool,
    /// Releases in this page
    #[serde(default = "Vec::new")]
    pub items: Vec<ReleaseSummary>,
}

/// Minimal release entry from an artist's release list.
///
/// Only the id is needed; the album routine re-fetches full metadata.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReleaseSummary {
    /// Album id of the release
    #[serde(default)]
    pub id: String,
    /// Release title
    #[serde(default)]
    pub title: String,
}

/// Label profile with a page of its albums.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LabelProfile {
    /// Catalog id
    #[serde(default)]
    pub id: u64,
    /// Label name
    #[serde(default)]
    pub name: String,
    /// Album listing slice
    #[serde(default)]
    pub albums: Option<Page<AlbumMetadata>>,
}

/// Playlist metadata with a page of its tracks.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Playlist {
    /// Catalog id
    #[serde(default)]
    pub id: u64,
    /// Playlist name
    #[serde(default)]
    pub name: String,
    /// Total duration in seconds
    #[serde(default)]
    pub duration: u64,
    /// Number of tracks
    #[serde(default)]
    pub tracks_count: u64,
    /// Rectangular cover image URLs, largest first
    #[serde(default = "Vec::new")]
    pub image_rectangle: Vec<String>,
    /// Track listing slice
    #[serde(default)]
    pub tracks: Option<Page<TrackMetadata>>,
}

/// The complete lists of the user's favorite item ids, all flavors at once.
///
/// Id-only and unpaginated, so artist and track favorites can be expanded
/// item by item without walking metadata pages first.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FavoriteIds {
    /// Favorite album ids (alphanumeric)
    #[serde(default = "Vec::new")]
    pub albums: Vec<String>,
    /// Favorite artist ids
    #[serde(default = "Vec::new")]
    pub artists: Vec<u64>,
    /// Favorite track ids
    #[serde(default = "Vec::new")]
    pub tracks: Vec<u64>,
}

/// The user's favorites of one flavor, as paged listings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Favorites {
    /// Favorite albums, when requested
    #[serde(default)]
    pub albums: Option<Page<AlbumMetadata>>,
    /// Favorite artists, when requested
    #[serde(default)]
    pub artists: Option<Page<ArtistProfile>>,
    /// Favorite tracks, when requested
    #[serde(default)]
    pub tracks: Option<Page<TrackMetadata>>,
}

/// Response of the file-url endpoint for one track at one quality tier.
///
/// The catalog answers successfully but with an absent or empty `url` when
/// the account cannot stream the track at the requested tier; callers treat
/// that as a skip, not an error.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileUrl {
    /// Time-limited download URL, absent when unavailable
    #[serde(default)]
    pub url: Option<String>,
    /// Format id the URL was issued for
    #[serde(default)]
    pub format_id: u64,
    /// MIME type of the payload
    #[serde(default)]
    pub mime_type: String,
}

impl FileUrl {
    /// The usable download URL, if the catalog issued one.
    pub fn usable_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }
}
