//! Remote catalog client
//!
//! Defines the [`CatalogClient`] trait the orchestrator talks through, the
//! catalog error taxonomy, and the data model for catalog responses. The
//! HTTP-backed implementation lives in [`http`].

use async_trait::async_trait;
use std::fmt;

pub mod http;
pub mod model;

pub use model::{
    AlbumMetadata, ArtistProfile, CoverImages, FavoriteIds, Favorites, FileUrl, Goody,
    LabelProfile, Page, Person, Playlist, ReleaseList, TrackMetadata,
};

/// Catalog request errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The requested item does not exist
    #[error("item not found")]
    NotFound,

    /// The remote answered with a non-success status
    #[error("API error {status}: {reason}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Status reason line
        reason: String,
        /// Response body, kept for the error-detail log
        content: String,
    },

    /// The response body could not be decoded
    #[error("unreadable API response")]
    Parse {
        /// Raw body, kept for the error-detail log
        content: String,
    },

    /// Transport-level failure
    #[error("network error: {0}")]
    Network(String),
}

impl CatalogError {
    /// Detail text for the error log, when the error carries any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            CatalogError::Api { content, .. } | CatalogError::Parse { content } => {
                Some(content.as_str())
            }
            _ => None,
        }
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Which flavor of user favorites a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteFlavor {
    /// Favorite albums
    Albums,
    /// Favorite artists
    Artists,
    /// Favorite tracks
    Tracks,
}

impl FavoriteFlavor {
    /// Wire token for the favorites endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            FavoriteFlavor::Albums => "albums",
            FavoriteFlavor::Artists => "artists",
            FavoriteFlavor::Tracks => "tracks",
        }
    }

    /// Recognize a flavor from a favorites link id
    /// (`library/favorites/<flavor>`).
    pub fn from_link_id(id: &str) -> Option<Self> {
        match id.rsplit('/').next()? {
            "albums" => Some(FavoriteFlavor::Albums),
            "artists" => Some(FavoriteFlavor::Artists),
            "tracks" => Some(FavoriteFlavor::Tracks),
            _ => None,
        }
    }
}

impl fmt::Display for FavoriteFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Remote catalog operations the downloader depends on.
///
/// Paged calls take an explicit `limit` and `offset`; implementations pass
/// them through unchanged so the orchestrator owns the paging policy.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch one track with its parent album attached.
    async fn get_track(&self, track_id: &str) -> CatalogResult<TrackMetadata>;

    /// Fetch an album with one page of its track listing.
    async fn get_album(
        &self,
        album_id: &str,
        tracks_limit: u64,
        tracks_offset: u64,
    ) -> CatalogResult<AlbumMetadata>;

    /// Fetch an artist profile (name only, no releases).
    async fn get_artist(&self, artist_id: &str) -> CatalogResult<ArtistProfile>;

    /// Fetch one page of an artist's releases, all release types included,
    /// newest first.
    async fn get_release_list(
        &self,
        artist_id: &str,
        limit: u64,
        offset: u64,
    ) -> CatalogResult<ReleaseList>;

    /// Fetch a label with one page of its album listing.
    async fn get_label(
        &self,
        label_id: &str,
        albums_limit: u64,
        albums_offset: u64,
    ) -> CatalogResult<LabelProfile>;

    /// Fetch one page of the authenticated user's favorites.
    async fn get_user_favorites(
        &self,
        flavor: FavoriteFlavor,
        limit: u64,
        offset: u64,
    ) -> CatalogResult<Favorites>;

    /// Fetch the complete lists of the user's favorite item ids in one call.
    async fn get_user_favorite_ids(&self) -> CatalogResult<FavoriteIds>;

    /// Fetch a playlist with one page of its track listing.
    async fn get_playlist(
        &self,
        playlist_id: &str,
        tracks_limit: u64,
        tracks_offset: u64,
    ) -> CatalogResult<Playlist>;

    /// Resolve the time-limited download URL for a track at a quality tier.
    ///
    /// `format_id` is the numeric tier id ("5", "6", "7", "27").
    async fn get_track_file_url(&self, track_id: u64, format_id: &str)
        -> CatalogResult<FileUrl>;
}
