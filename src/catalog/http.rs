//! HTTP-backed catalog client
//!
//! Thin reqwest wrapper over the catalog's JSON endpoints with unified
//! status triage: 404 maps to [`CatalogError::NotFound`], other non-success
//! statuses to [`CatalogError::Api`] with the body captured for the error
//! log, and undecodable bodies to [`CatalogError::Parse`].

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::catalog::model::{
    AlbumMetadata, ArtistProfile, FavoriteIds, Favorites, FileUrl, LabelProfile, Playlist,
    ReleaseList, TrackMetadata,
};
use crate::catalog::{CatalogClient, CatalogError, CatalogResult, FavoriteFlavor};

/// HTTP client for the remote catalog API.
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
    app_id: String,
    user_auth_token: String,
}

impl HttpCatalogClient {
    /// Create a client against the given API base URL.
    ///
    /// `app_id` and `user_auth_token` are sent as headers on every request;
    /// the catalog rejects unauthenticated calls.
    pub fn new(
        base_url: impl Into<String>,
        app_id: impl Into<String>,
        user_auth_token: impl Into<String>,
    ) -> CatalogResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            app_id: app_id.into(),
            user_auth_token: user_auth_token.into(),
        })
    }

    /// Execute a GET request and deserialize the JSON response.
    async fn get<T>(&self, endpoint: &str, params: &[(&str, String)]) -> CatalogResult<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(endpoint, params = params.len(), "catalog GET");

        let response = self
            .client
            .get(&url)
            .query(params)
            .header("X-App-Id", &self.app_id)
            .header("X-User-Auth-Token", &self.user_auth_token)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(CatalogError::NotFound);
        }
        if !status.is_success() {
            let content = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
                content,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|_| CatalogError::Parse { content: body })
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn get_track(&self, track_id: &str) -> CatalogResult<TrackMetadata> {
        self.get("track/get", &[("track_id", track_id.to_string())])
            .await
    }

    async fn get_album(
        &self,
        album_id: &str,
        tracks_limit: u64,
        tracks_offset: u64,
    ) -> CatalogResult<AlbumMetadata> {
        self.get(
            "album/get",
            &[
                ("album_id", album_id.to_string()),
                ("extra", "goodies".to_string()),
                ("limit", tracks_limit.to_string()),
                ("offset", tracks_offset.to_string()),
            ],
        )
        .await
    }

    async fn get_artist(&self, artist_id: &str) -> CatalogResult<ArtistProfile> {
        self.get("artist/get", &[("artist_id", artist_id.to_string())])
            .await
    }

    async fn get_release_list(
        &self,
        artist_id: &str,
        limit: u64,
        offset: u64,
    ) -> CatalogResult<ReleaseList> {
        self.get(
            "artist/getReleasesList",
            &[
                ("artist_id", artist_id.to_string()),
                ("release_type", "all".to_string()),
                ("sort", "release_date".to_string()),
                ("order", "desc".to_string()),
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
            ],
        )
        .await
    }

    async fn get_label(
        &self,
        label_id: &str,
        albums_limit: u64,
        albums_offset: u64,
    ) -> CatalogResult<LabelProfile> {
        self.get(
            "label/get",
            &[
                ("label_id", label_id.to_string()),
                ("extra", "albums".to_string()),
                ("limit", albums_limit.to_string()),
                ("offset", albums_offset.to_string()),
            ],
        )
        .await
    }

    async fn get_user_favorites(
        &self,
        flavor: FavoriteFlavor,
        limit: u64,
        offset: u64,
    ) -> CatalogResult<Favorites> {
        self.get(
            "favorite/getUserFavorites",
            &[
                ("type", flavor.as_str().to_string()),
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
            ],
        )
        .await
    }

    async fn get_user_favorite_ids(&self) -> CatalogResult<FavoriteIds> {
        self.get("favorite/getUserFavoriteIds", &[]).await
    }

    async fn get_playlist(
        &self,
        playlist_id: &str,
        tracks_limit: u64,
        tracks_offset: u64,
    ) -> CatalogResult<Playlist> {
        self.get(
            "playlist/get",
            &[
                ("playlist_id", playlist_id.to_string()),
                ("extra", "tracks".to_string()),
                ("limit", tracks_limit.to_string()),
                ("offset", tracks_offset.to_string()),
            ],
        )
        .await
    }

    async fn get_track_file_url(
        &self,
        track_id: u64,
        format_id: &str,
    ) -> CatalogResult<FileUrl> {
        self.get(
            "track/getFileUrl",
            &[
                ("track_id", track_id.to_string()),
                ("format_id", format_id.to_string()),
            ],
        )
        .await
    }
}
