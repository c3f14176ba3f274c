//! Shared mocks and builders for integration tests
//!
//! The orchestrator's collaborators are replaced at their trait seams: a
//! scripted catalog, a transfer that writes canned bytes, a recording
//! progress sink, and a no-op tag writer.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use catalog_downloader::cancel::CancelToken;
use catalog_downloader::catalog::model::{
    AlbumMetadata, ArtistProfile, FavoriteIds, Favorites, FileUrl, LabelProfile, Page, Person,
    Playlist, ReleaseList, ReleaseSummary, TrackMetadata,
};
use catalog_downloader::catalog::{CatalogClient, CatalogError, CatalogResult, FavoriteFlavor};
use catalog_downloader::downloader::{
    DownloadConfig, DownloadJob, DownloadOrchestrator, FileTransfer, JobOutcome, ProgressSink,
    TransferError,
};
use catalog_downloader::link::ItemLink;
use catalog_downloader::output::pad_number;
use catalog_downloader::tagger::{TagError, TagWriter, TaggingOptions, TrackTags};

/// Scripted catalog backed by in-memory maps, with a call log.
#[derive(Default)]
pub struct MockCatalog {
    pub tracks: HashMap<u64, TrackMetadata>,
    pub albums: HashMap<String, AlbumMetadata>,
    pub album_tracks: HashMap<String, Vec<TrackMetadata>>,
    pub artists: HashMap<u64, ArtistProfile>,
    pub artist_releases: HashMap<u64, Vec<ReleaseSummary>>,
    pub labels: HashMap<String, LabelProfile>,
    pub label_albums: HashMap<String, Vec<AlbumMetadata>>,
    pub playlists: HashMap<u64, Playlist>,
    pub favorite_albums: Vec<AlbumMetadata>,
    pub favorite_artist_ids: Vec<u64>,
    pub favorite_track_ids: Vec<u64>,
    /// Overrides for the file-url endpoint; `None` simulates "no URL issued"
    pub file_urls: HashMap<u64, Option<String>>,
    /// Track ids whose file-url call fails with an API error
    pub failing_file_urls: HashSet<u64>,
    calls: Mutex<Vec<String>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    /// Number of recorded calls whose name starts with `prefix`.
    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn page_of<T: Clone>(items: &[T], limit: u64, offset: u64) -> Page<T> {
        let start = (offset as usize).min(items.len());
        let end = (start + limit as usize).min(items.len());
        Page {
            items: items[start..end].to_vec(),
            total: items.len() as u64,
            offset,
            limit,
        }
    }
}

#[async_trait]
impl CatalogClient for MockCatalog {
    async fn get_track(&self, track_id: &str) -> CatalogResult<TrackMetadata> {
        self.record(format!("track/get:{track_id}"));
        track_id
            .parse::<u64>()
            .ok()
            .and_then(|id| self.tracks.get(&id).cloned())
            .ok_or(CatalogError::NotFound)
    }

    async fn get_album(
        &self,
        album_id: &str,
        tracks_limit: u64,
        tracks_offset: u64,
    ) -> CatalogResult<AlbumMetadata> {
        self.record(format!("album/get:{album_id}:{tracks_offset}"));
        let mut album = self
            .albums
            .get(album_id)
            .cloned()
            .ok_or(CatalogError::NotFound)?;
        let tracks = self
            .album_tracks
            .get(album_id)
            .map(|t| Self::page_of(t, tracks_limit, tracks_offset))
            .unwrap_or_default();
        album.tracks = Some(tracks);
        Ok(album)
    }

    async fn get_artist(&self, artist_id: &str) -> CatalogResult<ArtistProfile> {
        self.record(format!("artist/get:{artist_id}"));
        artist_id
            .parse::<u64>()
            .ok()
            .and_then(|id| self.artists.get(&id).cloned())
            .ok_or(CatalogError::NotFound)
    }

    async fn get_release_list(
        &self,
        artist_id: &str,
        limit: u64,
        offset: u64,
    ) -> CatalogResult<ReleaseList> {
        self.record(format!("artist/getReleasesList:{artist_id}:{offset}"));
        let releases = artist_id
            .parse::<u64>()
            .ok()
            .and_then(|id| self.artist_releases.get(&id))
            .map(Vec::as_slice)
            .unwrap_or_default();
        let start = (offset as usize).min(releases.len());
        let end = (start + limit as usize).min(releases.len());
        Ok(ReleaseList {
            has_more: end < releases.len(),
            items: releases[start..end].to_vec(),
        })
    }

    async fn get_label(
        &self,
        label_id: &str,
        albums_limit: u64,
        albums_offset: u64,
    ) -> CatalogResult<LabelProfile> {
        self.record(format!("label/get:{label_id}:{albums_offset}"));
        let mut label = self
            .labels
            .get(label_id)
            .cloned()
            .ok_or(CatalogError::NotFound)?;
        let albums = self
            .label_albums
            .get(label_id)
            .map(|a| Self::page_of(a, albums_limit, albums_offset))
            .unwrap_or_default();
        label.albums = Some(albums);
        Ok(label)
    }

    async fn get_user_favorites(
        &self,
        flavor: FavoriteFlavor,
        limit: u64,
        offset: u64,
    ) -> CatalogResult<Favorites> {
        self.record(format!("favorite/getUserFavorites:{flavor}:{offset}"));
        let mut favorites = Favorites::default();
        match flavor {
            FavoriteFlavor::Albums => {
                favorites.albums = Some(Self::page_of(&self.favorite_albums, limit, offset));
            }
            FavoriteFlavor::Artists => {
                favorites.artists = Some(Page::default());
            }
            FavoriteFlavor::Tracks => {
                favorites.tracks = Some(Page::default());
            }
        }
        Ok(favorites)
    }

    async fn get_user_favorite_ids(&self) -> CatalogResult<FavoriteIds> {
        self.record("favorite/getUserFavoriteIds".to_string());
        Ok(FavoriteIds {
            albums: self.favorite_albums.iter().map(|a| a.id.clone()).collect(),
            artists: self.favorite_artist_ids.clone(),
            tracks: self.favorite_track_ids.clone(),
        })
    }

    async fn get_playlist(
        &self,
        playlist_id: &str,
        tracks_limit: u64,
        _tracks_offset: u64,
    ) -> CatalogResult<Playlist> {
        self.record(format!("playlist/get:{playlist_id}"));
        let mut playlist = playlist_id
            .parse::<u64>()
            .ok()
            .and_then(|id| self.playlists.get(&id).cloned())
            .ok_or(CatalogError::NotFound)?;
        if let Some(tracks) = &mut playlist.tracks {
            tracks.items.truncate(tracks_limit as usize);
        }
        Ok(playlist)
    }

    async fn get_track_file_url(
        &self,
        track_id: u64,
        format_id: &str,
    ) -> CatalogResult<FileUrl> {
        self.record(format!("track/getFileUrl:{track_id}:{format_id}"));
        if self.failing_file_urls.contains(&track_id) {
            return Err(CatalogError::Api {
                status: 400,
                reason: "Bad Request".to_string(),
                content: "{\"message\":\"scripted failure\"}".to_string(),
            });
        }
        let url = match self.file_urls.get(&track_id) {
            Some(override_url) => override_url.clone(),
            None => Some(cdn_url(track_id)),
        };
        Ok(FileUrl {
            url,
            format_id: format_id.parse().unwrap_or_default(),
            mime_type: "audio/flac".to_string(),
        })
    }
}

/// Default stream URL the mock catalog issues for a track.
pub fn cdn_url(track_id: u64) -> String {
    format!("https://cdn.test/{track_id}.flac")
}

/// Transfer mock writing canned bytes, with failure injection and an
/// optional cancel trigger after N transfers.
pub struct MockTransfer {
    pub payload: Vec<u8>,
    pub fail_urls: HashSet<String>,
    transfers: Mutex<Vec<String>>,
    cancel_after: Mutex<Option<(usize, CancelToken)>>,
}

impl Default for MockTransfer {
    fn default() -> Self {
        Self {
            payload: b"audio-bytes".to_vec(),
            fail_urls: HashSet::new(),
            transfers: Mutex::new(Vec::new()),
            cancel_after: Mutex::new(None),
        }
    }
}

impl MockTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel `token` once `count` transfers have completed or failed.
    pub fn cancel_after(&self, count: usize, token: CancelToken) {
        *self.cancel_after.lock().unwrap() = Some((count, token));
    }

    pub fn transfer_count(&self) -> usize {
        self.transfers.lock().unwrap().len()
    }

    /// Every transferred URL, in request order.
    pub fn transferred(&self) -> Vec<String> {
        self.transfers.lock().unwrap().clone()
    }
}

#[async_trait]
impl FileTransfer for MockTransfer {
    async fn transfer(
        &self,
        url: &str,
        dest: &Path,
        sink: &dyn ProgressSink,
    ) -> Result<(), TransferError> {
        self.transfers.lock().unwrap().push(url.to_string());
        if let Some((count, token)) = self.cancel_after.lock().unwrap().as_ref() {
            if self.transfer_count() >= *count {
                token.cancel();
            }
        }
        if self.fail_urls.contains(url) {
            return Err(TransferError::Http(500));
        }
        std::fs::write(dest, &self.payload)?;
        sink.on_speed("1.00 MB/s");
        sink.on_speed("Idle");
        Ok(())
    }
}

/// Progress sink recording every log line and speed update.
#[derive(Default)]
pub struct RecordingSink {
    pub lines: Mutex<Vec<String>>,
    pub speeds: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines_containing(&self, needle: &str) -> usize {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.contains(needle))
            .count()
    }
}

impl ProgressSink for RecordingSink {
    fn on_speed(&self, text: &str) {
        self.speeds.lock().unwrap().push(text.to_string());
    }

    fn on_log_line(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

/// Tag writer that does nothing; tagging behavior has its own unit tests.
pub struct NoopTagger;

impl TagWriter for NoopTagger {
    fn write_tags(
        &self,
        _audio_path: &Path,
        _art_path: Option<&Path>,
        _tags: &TrackTags,
        _options: &TaggingOptions,
    ) -> Result<(), TagError> {
        Ok(())
    }
}

/// Tag writer that always fails, for warning-path tests.
pub struct FailingTagger;

impl TagWriter for FailingTagger {
    fn write_tags(
        &self,
        _audio_path: &Path,
        _art_path: Option<&Path>,
        _tags: &TrackTags,
        _options: &TaggingOptions,
    ) -> Result<(), TagError> {
        Err(TagError::Write("scripted tag failure".to_string()))
    }
}

// ---- metadata builders ---------------------------------------------------

pub fn person(id: u64, name: &str) -> Person {
    Person {
        id,
        name: name.to_string(),
    }
}

/// Album shell with artwork URLs; track listing is attached by the mock.
pub fn album(id: &str, artist: &str, title: &str, tracks_count: u64) -> AlbumMetadata {
    AlbumMetadata {
        id: id.to_string(),
        title: title.to_string(),
        artist: person(1, artist),
        tracks_count,
        media_count: 1,
        release_date_original: "2020-01-01".to_string(),
        image: catalog_downloader::catalog::CoverImages {
            large: format!("https://img.test/{id}_600.jpg"),
            small: String::new(),
            thumbnail: String::new(),
        },
        ..Default::default()
    }
}

/// Streamable track within an album context.
pub fn track(id: u64, number: u64, title: &str, performer: &str) -> TrackMetadata {
    TrackMetadata {
        id,
        title: title.to_string(),
        track_number: number,
        media_number: 1,
        duration: 200 + id,
        performer: person(id, performer),
        streamable: Some(true),
        ..Default::default()
    }
}

/// A track carrying its parent album, as track-detail responses do.
pub fn track_with_album(track: TrackMetadata, album: AlbumMetadata) -> TrackMetadata {
    TrackMetadata {
        album: Some(Box::new(album)),
        ..track
    }
}

/// Expected audio path for an album-context track.
pub fn expected_track_path(
    base: &Path,
    artist: &str,
    album_title: &str,
    number: u64,
    total: u64,
    title: &str,
) -> PathBuf {
    base.join(artist).join(album_title).join(format!(
        "{} - {}.flac",
        pad_number(number, total),
        title
    ))
}

// ---- harness -------------------------------------------------------------

/// A ready-to-run orchestrator over mocks, with handles kept for assertions.
pub struct Harness {
    pub orchestrator: DownloadOrchestrator,
    pub catalog: Arc<MockCatalog>,
    pub transfer: Arc<MockTransfer>,
    pub sink: Arc<RecordingSink>,
    pub base_dir: PathBuf,
    _dir: TempDir,
}

impl Harness {
    /// Parse `url` and run it as a job against the orchestrator.
    pub async fn run(&self, url: &str, cancel: CancelToken) -> JobOutcome {
        let job = DownloadJob::new(ItemLink::parse(url));
        self.orchestrator.run_job(job, cancel).await
    }
}

/// Build a harness with default config over the given mocks.
pub fn harness(catalog: MockCatalog, transfer: MockTransfer) -> Harness {
    harness_with(catalog, transfer, |_| {})
}

/// Build a harness, tweaking the config first.
pub fn harness_with(
    catalog: MockCatalog,
    transfer: MockTransfer,
    configure: impl FnOnce(&mut DownloadConfig),
) -> Harness {
    harness_full(catalog, transfer, Arc::new(NoopTagger), configure)
}

/// Build a harness with an explicit tag writer.
pub fn harness_full(
    catalog: MockCatalog,
    transfer: MockTransfer,
    tagger: Arc<dyn TagWriter>,
    configure: impl FnOnce(&mut DownloadConfig),
) -> Harness {
    let dir = tempfile::tempdir().expect("tempdir");
    let base_dir = dir.path().join("downloads");
    let mut config = DownloadConfig::new(&base_dir);
    config.logging_dir = dir.path().join("logs");
    configure(&mut config);

    let catalog = Arc::new(catalog);
    let transfer = Arc::new(transfer);
    let sink = Arc::new(RecordingSink::new());

    let orchestrator = DownloadOrchestrator::new(
        catalog.clone(),
        transfer.clone(),
        tagger,
        sink.clone(),
        config,
    )
    .expect("orchestrator");

    Harness {
        orchestrator,
        catalog,
        transfer,
        sink,
        base_dir,
        _dir: dir,
    }
}
