//! Download orchestration core
//!
//! Expands one item link into the per-track downloads it implies, walking
//! paginated listings with defensive stops, skipping what is already on
//! disk, and aggregating per-item failures into a single job outcome. A
//! failed item never aborts the batch; a cancelled token stops the job at
//! the next item boundary.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info_span, Instrument};

use crate::cancel::CancelToken;
use crate::catalog::model::{AlbumMetadata, TrackMetadata};
use crate::catalog::{CatalogClient, CatalogResult, FavoriteFlavor};
use crate::downloader::config::{
    DownloadConfig, ALBUM_TRACK_PAGE_LIMIT, ARTIST_RELEASE_PAGE_LIMIT, CATALOG_ALBUM_PAGE_LIMIT,
    MAX_CATALOG_PAGES, PLAYLIST_TRACK_LIMIT,
};
use crate::downloader::job::{DownloadJob, JobOutcome, JobStatus};
use crate::downloader::progress::ProgressSink;
use crate::downloader::transfer::{write_bad_marker, FileTransfer};
use crate::downloader::DownloadResult;
use crate::link::LinkKind;
use crate::logger::JobLogger;
use crate::output::playlist::PlaylistFile;
use crate::output::{self, TrackPathSpec, TrackPaths};
use crate::tagger::{TagWriter, TrackTags};

/// Why a routine stopped before reaching its natural end.
enum Interrupt {
    Cancelled,
}

/// Result of one orchestration step; `Err` always means cancellation, never
/// a download failure (those are absorbed into warnings).
type Step<T> = Result<T, Interrupt>;

/// How a dispatch routine ended.
enum Dispatch {
    /// The routine ran to its end; warnings decide the final status
    Finished,
    /// The top-level item was unusable (unrecognized or unfetchable)
    Aborted,
}

/// What happened to one track.
enum TrackOutcome {
    /// Downloaded and placed at the given path
    Done { audio_file: PathBuf },
    /// A file for the track was already on disk
    AlreadyExists { audio_file: PathBuf },
    /// Legitimately skipped (not streamable, no stream URL)
    Skipped,
    /// Transfer or filesystem failure, counted as a warning
    Failed,
}

/// Mutable state carried through one job.
struct JobContext {
    warnings: usize,
}

/// Artwork files prepared for an album.
struct AlbumArt {
    /// Copy used for tag embedding, removed once the album is done
    embedded: Option<PathBuf>,
}

/// Drives download jobs end to end.
///
/// All collaborators are injected; one orchestrator runs at most one job at
/// a time (the busy flag rejects concurrent `run_job` calls).
pub struct DownloadOrchestrator {
    catalog: Arc<dyn CatalogClient>,
    transfer: Arc<dyn FileTransfer>,
    tagger: Arc<dyn TagWriter>,
    sink: Arc<dyn ProgressSink>,
    logger: JobLogger,
    config: DownloadConfig,
    busy: AtomicBool,
}

impl DownloadOrchestrator {
    /// Create an orchestrator, setting up the base directory and job log.
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        transfer: Arc<dyn FileTransfer>,
        tagger: Arc<dyn TagWriter>,
        sink: Arc<dyn ProgressSink>,
        config: DownloadConfig,
    ) -> DownloadResult<Self> {
        std::fs::create_dir_all(&config.base_dir)
            .map_err(crate::output::OutputError::Io)?;
        let logger = JobLogger::new(&config.logging_dir)?;
        Ok(Self {
            catalog,
            transfer,
            tagger,
            sink,
            logger,
            config,
            busy: AtomicBool::new(false),
        })
    }

    /// Whether a job is currently running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// The job logger, for access to the log file paths.
    pub fn logger(&self) -> &JobLogger {
        &self.logger
    }

    /// Run one job to completion, cancellation, or abort.
    ///
    /// Never returns an error: per-item failures become warnings in the
    /// outcome, cancellation becomes [`JobStatus::Cancelled`], and an
    /// unusable link becomes [`JobStatus::Aborted`].
    pub async fn run_job(&self, mut job: DownloadJob, cancel: CancelToken) -> JobOutcome {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            self.log_error("A download job is already running, ignoring this request.");
            return JobOutcome {
                status: JobStatus::Aborted,
                warnings: 0,
            };
        }

        job.status = JobStatus::InProgress;
        let mut ctx = JobContext { warnings: 0 };
        let span = info_span!("download_job", kind = %job.link.kind, id = %job.link.id);
        let result = self
            .dispatch(&mut ctx, &cancel, &job)
            .instrument(span)
            .await;
        self.busy.store(false, Ordering::SeqCst);

        let status = match result {
            Err(Interrupt::Cancelled) => {
                let message = self.logger.stopped_by_user();
                self.sink.on_log_line(message);
                JobStatus::Cancelled
            }
            Ok(Dispatch::Aborted) => JobStatus::Aborted,
            Ok(Dispatch::Finished) => {
                let clean = ctx.warnings == 0;
                let message = self.logger.finish_job(clean);
                self.sink.on_log_line(message);
                if clean {
                    JobStatus::Completed
                } else {
                    JobStatus::CompletedWithWarnings
                }
            }
        };

        JobOutcome {
            status,
            warnings: ctx.warnings,
        }
    }

    async fn dispatch(
        &self,
        ctx: &mut JobContext,
        cancel: &CancelToken,
        job: &DownloadJob,
    ) -> Step<Dispatch> {
        match job.link.kind {
            LinkKind::Track => self.run_track_job(ctx, cancel, &job.link.id).await,
            LinkKind::Album => self.run_album_job(ctx, cancel, &job.link.id).await,
            LinkKind::Artist => self.run_artist_job(ctx, cancel, &job.link.id).await,
            LinkKind::Label => self.run_label_job(ctx, cancel, &job.link.id).await,
            LinkKind::UserFavorites => self.run_favorites_job(ctx, cancel, &job.link.id).await,
            LinkKind::Playlist => self.run_playlist_job(ctx, cancel, &job.link.id).await,
            LinkKind::Unrecognized => {
                self.log_error(&format!("URL not recognized: {}", job.link.source_url));
                self.log(
                    "Supported links are album, track, artist, label, playlist and favorites pages.",
                );
                Ok(Dispatch::Aborted)
            }
        }
    }

    // ---- per-kind routines ----------------------------------------------

    async fn run_track_job(
        &self,
        ctx: &mut JobContext,
        cancel: &CancelToken,
        track_id: &str,
    ) -> Step<Dispatch> {
        self.log("Grabbing track info...");
        let Some(track) = self.absorb(
            ctx,
            "track information",
            self.catalog.get_track(track_id).await,
        ) else {
            return Ok(Dispatch::Aborted);
        };
        let album = track.album.as_deref().cloned().unwrap_or_default();

        self.sink.on_item_info(&album.artist.name, &album.full_title());
        self.log_blank();
        self.log(&format!(
            "Starting download for track \"{}\"...",
            track.full_title()
        ));

        let base = self.config.base_dir.clone();
        let album_dir = self.album_dir_for(&base, &album);
        if let Err(e) = std::fs::create_dir_all(&album_dir) {
            ctx.warnings += 1;
            self.log_error(&format!("Failed to create album folder: {e}"));
            return Ok(Dispatch::Finished);
        }

        let art = self.prepare_album_art(ctx, cancel, &album, &album_dir).await?;
        self.download_track(ctx, cancel, &track, &album, &base, false, art.embedded.as_deref())
            .await?;
        if let Some(embedded) = &art.embedded {
            let _ = std::fs::remove_file(embedded);
        }
        Ok(Dispatch::Finished)
    }

    async fn run_album_job(
        &self,
        ctx: &mut JobContext,
        cancel: &CancelToken,
        album_id: &str,
    ) -> Step<Dispatch> {
        let base = self.config.base_dir.clone();
        match self.download_album(ctx, cancel, album_id, &base).await? {
            true => Ok(Dispatch::Finished),
            false => Ok(Dispatch::Aborted),
        }
    }

    async fn run_artist_job(
        &self,
        ctx: &mut JobContext,
        cancel: &CancelToken,
        artist_id: &str,
    ) -> Step<Dispatch> {
        let base = self.config.base_dir.clone();
        match self.download_artist(ctx, cancel, artist_id, &base).await? {
            true => Ok(Dispatch::Finished),
            false => Ok(Dispatch::Aborted),
        }
    }

    async fn run_label_job(
        &self,
        ctx: &mut JobContext,
        cancel: &CancelToken,
        label_id: &str,
    ) -> Step<Dispatch> {
        self.log("Grabbing label info...");
        let Some(label) = self.absorb(
            ctx,
            "label information",
            self.catalog
                .get_label(label_id, CATALOG_ALBUM_PAGE_LIMIT, 0)
                .await,
        ) else {
            return Ok(Dispatch::Aborted);
        };

        self.log_blank();
        self.log(&format!("Starting downloads for label \"{}\"...", label.name));
        let base = self.config.base_dir.join("- Labels").join(
            output::trim_to_max_length(
                &output::safe_filename(&output::decode_non_ascii(&label.name)),
                self.config.max_name_length,
            ),
        );

        let mut page = label.albums.unwrap_or_default();
        if page.items.is_empty() {
            self.log(&format!(
                "Label \"{}\" has no albums, nothing to download.",
                label.name
            ));
            return Ok(Dispatch::Finished);
        }
        let total = page.total;
        let mut fetched = page.items.len() as u64;
        let mut pages: u64 = 1;
        loop {
            if page.items.is_empty() {
                // The remote can promise more items than it serves.
                break;
            }
            for album in &page.items {
                self.checkpoint(cancel)?;
                self.download_album(ctx, cancel, &album.id, &base).await?;
            }
            if fetched >= total || pages >= MAX_CATALOG_PAGES {
                break;
            }
            self.checkpoint(cancel)?;
            let Some(next) = self.absorb(
                ctx,
                "label album page",
                self.catalog
                    .get_label(label_id, CATALOG_ALBUM_PAGE_LIMIT, fetched)
                    .await,
            ) else {
                break;
            };
            page = next.albums.unwrap_or_default();
            fetched += page.items.len() as u64;
            pages += 1;
        }
        Ok(Dispatch::Finished)
    }

    async fn run_favorites_job(
        &self,
        ctx: &mut JobContext,
        cancel: &CancelToken,
        link_id: &str,
    ) -> Step<Dispatch> {
        let Some(flavor) = FavoriteFlavor::from_link_id(link_id) else {
            self.log_error(&format!("Favorites link not recognized: {link_id}"));
            return Ok(Dispatch::Aborted);
        };
        let base = self.config.base_dir.join("- Favorites");
        self.log(&format!("Starting downloads for favorite {flavor}..."));

        match flavor {
            FavoriteFlavor::Albums => {
                let mut offset: u64 = 0;
                let mut pages: u64 = 0;
                loop {
                    self.checkpoint(cancel)?;
                    let Some(favorites) = self.absorb(
                        ctx,
                        "favorite albums page",
                        self.catalog
                            .get_user_favorites(flavor, CATALOG_ALBUM_PAGE_LIMIT, offset)
                            .await,
                    ) else {
                        break;
                    };
                    let page = favorites.albums.unwrap_or_default();
                    if page.items.is_empty() {
                        break;
                    }
                    let count = page.items.len() as u64;
                    for album in &page.items {
                        self.checkpoint(cancel)?;
                        self.download_album(ctx, cancel, &album.id, &base).await?;
                    }
                    offset += count;
                    pages += 1;
                    if offset >= page.total || pages >= MAX_CATALOG_PAGES {
                        break;
                    }
                }
            }
            // Artist and track favorites come as one unpaginated id list;
            // each id is then expanded individually.
            FavoriteFlavor::Artists => {
                let Some(ids) = self.absorb(
                    ctx,
                    "favorite ids",
                    self.catalog.get_user_favorite_ids().await,
                ) else {
                    return Ok(Dispatch::Aborted);
                };
                for artist_id in &ids.artists {
                    self.checkpoint(cancel)?;
                    self.download_artist(ctx, cancel, &artist_id.to_string(), &base)
                        .await?;
                }
            }
            FavoriteFlavor::Tracks => {
                let Some(ids) = self.absorb(
                    ctx,
                    "favorite ids",
                    self.catalog.get_user_favorite_ids().await,
                ) else {
                    return Ok(Dispatch::Aborted);
                };
                if let Err(e) = std::fs::create_dir_all(&base) {
                    ctx.warnings += 1;
                    self.log_error(&format!("Failed to create favorites folder: {e}"));
                    return Ok(Dispatch::Finished);
                }
                for track_id in &ids.tracks {
                    self.checkpoint(cancel)?;
                    let Some(track) = self.absorb(
                        ctx,
                        "track information",
                        self.catalog.get_track(&track_id.to_string()).await,
                    ) else {
                        continue;
                    };
                    let album = track.album.as_deref().cloned().unwrap_or_default();
                    self.download_track(ctx, cancel, &track, &album, &base, true, None)
                        .await?;
                }
            }
        }
        Ok(Dispatch::Finished)
    }

    async fn run_playlist_job(
        &self,
        ctx: &mut JobContext,
        cancel: &CancelToken,
        playlist_id: &str,
    ) -> Step<Dispatch> {
        self.log("Grabbing playlist info...");
        let Some(playlist) = self.absorb(
            ctx,
            "playlist information",
            self.catalog
                .get_playlist(playlist_id, PLAYLIST_TRACK_LIMIT, 0)
                .await,
        ) else {
            return Ok(Dispatch::Aborted);
        };

        let tracks = playlist.tracks.clone().unwrap_or_default();
        if tracks.items.is_empty() {
            self.log(&format!(
                "Playlist \"{}\" is empty, nothing to download.",
                playlist.name
            ));
            return Ok(Dispatch::Finished);
        }

        self.sink.on_item_info("Playlist", &playlist.name);
        self.log_blank();
        self.log(&format!(
            "Starting downloads for playlist \"{}\"...",
            playlist.name
        ));

        let dir = self.config.base_dir.join("- Playlists").join(
            output::trim_to_max_length(
                &output::safe_filename(&output::decode_non_ascii(&playlist.name)),
                self.config.max_name_length,
            ),
        );
        if let Err(e) = std::fs::create_dir_all(&dir) {
            ctx.warnings += 1;
            self.log_error(&format!("Failed to create playlist folder: {e}"));
            return Ok(Dispatch::Aborted);
        }

        // Best-effort playlist cover.
        if let Some(cover_url) = playlist.image_rectangle.first() {
            let dest = dir.join("Playlist.jpg");
            if !dest.exists() && !cover_url.is_empty() {
                if let Err(e) = self
                    .transfer
                    .transfer(cover_url, &dest, self.sink.as_ref())
                    .await
                {
                    ctx.warnings += 1;
                    self.log_error(&format!("Failed to download playlist image: {e}"));
                }
            }
        }

        let mut m3u = PlaylistFile::new();
        for track in &tracks.items {
            self.checkpoint(cancel)?;
            let album = track.album.as_deref().cloned().unwrap_or_default();
            let outcome = self
                .download_track(ctx, cancel, track, &album, &dir, true, None)
                .await?;
            // Playlist entries only reference files that exist on disk.
            if let TrackOutcome::Done { audio_file } | TrackOutcome::AlreadyExists { audio_file } =
                outcome
            {
                if audio_file.exists() {
                    m3u.push(
                        track.duration,
                        &track.performer.name,
                        &track.full_title(),
                        &audio_file,
                    );
                }
            }
        }

        let m3u_path = dir.join(format!(
            "{}.m3u8",
            output::safe_filename(&output::decode_non_ascii(&playlist.name))
        ));
        match m3u.write_to(&m3u_path) {
            Ok(()) => self.log("Playlist file saved."),
            Err(e) => {
                ctx.warnings += 1;
                self.log_error(&format!("Failed to write playlist file: {e}"));
            }
        }
        Ok(Dispatch::Finished)
    }

    // ---- shared building blocks -----------------------------------------

    /// Download a full album into `base`. Returns `false` when the album
    /// itself could not be fetched or placed.
    async fn download_album(
        &self,
        ctx: &mut JobContext,
        cancel: &CancelToken,
        album_id: &str,
        base: &Path,
    ) -> Step<bool> {
        self.checkpoint(cancel)?;
        self.log("Grabbing album info...");
        let Some(album) = self.absorb(
            ctx,
            "album information",
            self.catalog
                .get_album(album_id, ALBUM_TRACK_PAGE_LIMIT, 0)
                .await,
        ) else {
            return Ok(false);
        };

        self.sink.on_item_info(&album.artist.name, &album.full_title());
        self.log_blank();
        self.log(&format!(
            "Starting downloads for album \"{}\" with ID: {}...",
            album.full_title(),
            album.id
        ));

        let album_dir = self.album_dir_for(base, &album);
        if let Err(e) = std::fs::create_dir_all(&album_dir) {
            ctx.warnings += 1;
            self.log_error(&format!("Failed to create album folder: {e}"));
            return Ok(false);
        }

        let art = self.prepare_album_art(ctx, cancel, &album, &album_dir).await?;

        let total = album.tracks_count;
        let mut page = album.tracks.clone().unwrap_or_default();
        let mut offset: u64 = 0;
        loop {
            if page.items.is_empty() {
                // The remote can promise more items than it serves.
                break;
            }
            for track in &page.items {
                self.checkpoint(cancel)?;
                self.download_track(
                    ctx,
                    cancel,
                    track,
                    &album,
                    base,
                    false,
                    art.embedded.as_deref(),
                )
                .await?;
            }
            offset += ALBUM_TRACK_PAGE_LIMIT;
            if offset >= total {
                break;
            }
            self.checkpoint(cancel)?;
            let Some(next) = self.absorb(
                ctx,
                "album track page",
                self.catalog
                    .get_album(album_id, ALBUM_TRACK_PAGE_LIMIT, offset)
                    .await,
            ) else {
                break;
            };
            page = next.tracks.unwrap_or_default();
        }

        // Goodies come after every track has been attempted.
        self.download_booklets(ctx, cancel, &album, &album_dir).await?;

        // The embedded-art copy is only needed while tagging.
        if let Some(embedded) = &art.embedded {
            let _ = std::fs::remove_file(embedded);
        }
        Ok(true)
    }

    /// Download an artist's full discography into `base`, newest release
    /// first. Returns `false` when the artist could not be fetched.
    async fn download_artist(
        &self,
        ctx: &mut JobContext,
        cancel: &CancelToken,
        artist_id: &str,
        base: &Path,
    ) -> Step<bool> {
        self.checkpoint(cancel)?;
        self.log("Grabbing artist info...");
        let Some(artist) = self.absorb(
            ctx,
            "artist information",
            self.catalog.get_artist(artist_id).await,
        ) else {
            return Ok(false);
        };

        self.log_blank();
        self.log(&format!(
            "Starting downloads for artist \"{}\"...",
            artist.name
        ));

        let mut offset: u64 = 0;
        loop {
            self.checkpoint(cancel)?;
            let Some(list) = self.absorb(
                ctx,
                "artist release list",
                self.catalog
                    .get_release_list(artist_id, ARTIST_RELEASE_PAGE_LIMIT, offset)
                    .await,
            ) else {
                break;
            };
            if list.items.is_empty() {
                break;
            }
            for release in &list.items {
                self.checkpoint(cancel)?;
                self.download_album(ctx, cancel, &release.id, base).await?;
            }
            if !list.has_more {
                break;
            }
            offset += ARTIST_RELEASE_PAGE_LIMIT;
        }
        Ok(true)
    }

    /// Download one track into its computed location.
    ///
    /// `tracklist` switches to the flat, performer-named layout used for
    /// favorite tracks and playlists; in that mode cover art is fetched per
    /// track and removed after tagging.
    async fn download_track(
        &self,
        ctx: &mut JobContext,
        cancel: &CancelToken,
        track: &TrackMetadata,
        album: &AlbumMetadata,
        base: &Path,
        tracklist: bool,
        embedded_art: Option<&Path>,
    ) -> Step<TrackOutcome> {
        self.checkpoint(cancel)?;

        let title = track.full_title();
        // Skip and override logs identify the track the way its filename
        // will: performer-style in tracklist context, numbered otherwise.
        let reference = if tracklist {
            format!("{} - {}", track.performer.name, title)
        } else {
            format!(
                "{} {}",
                output::pad_number(track.track_number, album.tracks_count),
                title
            )
        };
        if !self.is_streamable(track, &reference) {
            self.log(&format!(
                "\"{reference}\" is not available for streaming, skipping."
            ));
            return Ok(TrackOutcome::Skipped);
        }

        let album_title = album.full_title();
        let spec = TrackPathSpec {
            base_dir: base,
            artist: &album.artist.name,
            album: &album_title,
            album_id: self
                .config
                .album_id_in_folder
                .then_some(album.id.as_str()),
            disc_number: track.media_number.max(1),
            disc_total: album.media_count,
            track_number: track.track_number,
            track_total: album.tracks_count,
            title: &title,
            performer: &track.performer.name,
            tracklist,
            separator: &self.config.filename_separator,
            max_name_length: self.config.max_name_length,
            extension: self.config.quality.extension(),
        };
        let paths = TrackPaths::build(&spec);
        if let Err(e) = paths.ensure_directories() {
            ctx.warnings += 1;
            self.log_error(&format!("Failed to create track folder: {e}"));
            return Ok(TrackOutcome::Failed);
        }

        if paths.audio_file.exists() {
            self.log(&format!(
                "File for \"{title}\" already exists, skipping."
            ));
            return Ok(TrackOutcome::AlreadyExists {
                audio_file: paths.audio_file,
            });
        }

        let Some(file_url) = self.absorb(
            ctx,
            "track stream URL",
            self.catalog
                .get_track_file_url(track.id, self.config.quality.format_id())
                .await,
        ) else {
            return Ok(TrackOutcome::Failed);
        };
        let Some(url) = file_url.usable_url() else {
            self.log(&format!("No stream URL available for \"{title}\", skipping."));
            return Ok(TrackOutcome::Skipped);
        };

        self.log(&format!("Downloading - {}", paths.file_stem));
        if let Err(e) = self
            .transfer
            .transfer(url, &paths.audio_file, self.sink.as_ref())
            .await
        {
            ctx.warnings += 1;
            self.log_error(&format!("Track download failed for \"{title}\": {e}"));
            if let Err(marker_err) = write_bad_marker(&paths.audio_file) {
                self.log_error(&format!("Failed to write .bad marker: {marker_err}"));
            }
            return Ok(TrackOutcome::Failed);
        }

        // Tracklist mode fetches its own art copy next to the file.
        let track_art = if tracklist && embedded_art.is_none() {
            self.fetch_track_art(ctx, track, album, &paths.track_dir).await
        } else {
            None
        };
        let art = embedded_art.or(track_art.as_deref());

        let tags = TrackTags::from_metadata(track, album, &self.config.tagging);
        if let Err(e) = self
            .tagger
            .write_tags(&paths.audio_file, art, &tags, &self.config.tagging)
        {
            ctx.warnings += 1;
            self.log_error(&format!(
                "Tagging failed for \"{title}\", file kept untagged: {e}"
            ));
        }
        if let Some(track_art) = &track_art {
            let _ = std::fs::remove_file(track_art);
        }

        self.log("Track download done!");
        Ok(TrackOutcome::Done {
            audio_file: paths.audio_file,
        })
    }

    /// Download album artwork: the embedded-size copy for tagging and the
    /// full-size `Cover.jpg`. Both are best-effort.
    async fn prepare_album_art(
        &self,
        ctx: &mut JobContext,
        cancel: &CancelToken,
        album: &AlbumMetadata,
        album_dir: &Path,
    ) -> Step<AlbumArt> {
        self.checkpoint(cancel)?;
        if album.image.large.is_empty() {
            return Ok(AlbumArt { embedded: None });
        }

        let embedded_path = album_dir.join(format!("{}.jpg", self.config.embedded_art_size));
        let embedded = if embedded_path.exists() {
            Some(embedded_path)
        } else {
            match self
                .transfer
                .transfer(
                    &album.image.sized_url(&self.config.embedded_art_size),
                    &embedded_path,
                    self.sink.as_ref(),
                )
                .await
            {
                Ok(()) => Some(embedded_path),
                Err(e) => {
                    ctx.warnings += 1;
                    self.log_error(&format!("Failed to download album art: {e}"));
                    None
                }
            }
        };

        let cover_path = album_dir.join("Cover.jpg");
        if !cover_path.exists() {
            if let Err(e) = self
                .transfer
                .transfer(
                    &album.image.sized_url(&self.config.saved_art_size),
                    &cover_path,
                    self.sink.as_ref(),
                )
                .await
            {
                ctx.warnings += 1;
                self.log_error(&format!("Failed to download cover image: {e}"));
            }
        }

        Ok(AlbumArt { embedded })
    }

    /// Download the booklet PDFs attached to an album, numbering extras.
    async fn download_booklets(
        &self,
        ctx: &mut JobContext,
        cancel: &CancelToken,
        album: &AlbumMetadata,
        album_dir: &Path,
    ) -> Step<()> {
        let Some(goodies) = &album.goodies else {
            return Ok(());
        };
        let mut count = 0u32;
        for goody in goodies.iter().filter(|g| g.is_booklet()) {
            self.checkpoint(cancel)?;
            if goody.url.is_empty() {
                continue;
            }
            count += 1;
            let name = if count == 1 {
                "Digital Booklet.pdf".to_string()
            } else {
                format!("Digital Booklet {count}.pdf")
            };
            let dest = album_dir.join(name);
            if dest.exists() {
                continue;
            }
            self.log("Downloading booklet...");
            if let Err(e) = self
                .transfer
                .transfer(&goody.url, &dest, self.sink.as_ref())
                .await
            {
                ctx.warnings += 1;
                self.log_error(&format!("Booklet download failed: {e}"));
            }
        }
        Ok(())
    }

    /// Best-effort per-track art fetch for tracklist-mode downloads.
    async fn fetch_track_art(
        &self,
        ctx: &mut JobContext,
        track: &TrackMetadata,
        album: &AlbumMetadata,
        dir: &Path,
    ) -> Option<PathBuf> {
        if album.image.large.is_empty() {
            return None;
        }
        let dest = dir.join(format!(".art-{}.jpg", track.id));
        match self
            .transfer
            .transfer(
                &album.image.sized_url(&self.config.embedded_art_size),
                &dest,
                self.sink.as_ref(),
            )
            .await
        {
            Ok(()) => Some(dest),
            Err(e) => {
                ctx.warnings += 1;
                self.log_error(&format!("Failed to download track art: {e}"));
                None
            }
        }
    }

    // ---- small helpers ---------------------------------------------------

    fn album_dir_for(&self, base: &Path, album: &AlbumMetadata) -> PathBuf {
        output::album_dir(
            base,
            &album.artist.name,
            &album.full_title(),
            self.config
                .album_id_in_folder
                .then_some(album.id.as_str()),
            self.config.max_name_length,
        )
    }

    /// Streamability policy: an absent flag counts as streamable; an
    /// explicit `false` skips the track unless the check is disabled, in
    /// which case the download is attempted anyway with a warning logged.
    fn is_streamable(&self, track: &TrackMetadata, reference: &str) -> bool {
        if track.streamable.unwrap_or(true) {
            return true;
        }
        if !self.config.check_streamable {
            self.log(&format!(
                "\"{reference}\" is marked not streamable, check is being ignored, attempting to download anyway."
            ));
            return true;
        }
        false
    }

    fn checkpoint(&self, cancel: &CancelToken) -> Step<()> {
        if cancel.is_cancelled() {
            Err(Interrupt::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Absorb a catalog failure into the job: log it, record the detail,
    /// count a warning, and carry on with `None`.
    fn absorb<T>(
        &self,
        ctx: &mut JobContext,
        what: &str,
        result: CatalogResult<T>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                ctx.warnings += 1;
                self.log_error(&format!("Failed to get {what}: {e}"));
                if let Some(detail) = e.detail() {
                    self.logger.error_detail(detail);
                }
                None
            }
        }
    }

    fn log(&self, message: &str) {
        self.logger.line(message);
        self.sink.on_log_line(message);
    }

    fn log_blank(&self) {
        self.logger.blank();
    }

    fn log_error(&self, message: &str) {
        self.logger.error_line(message);
        self.sink.on_log_line(&format!("[ERROR] {message}"));
    }
}
