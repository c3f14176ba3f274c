//! Album job behavior: folder layout, artwork, pagination, failure handling.

use catalog_downloader::cancel::CancelToken;
use catalog_downloader::catalog::Goody;
use catalog_downloader::downloader::JobStatus;

use crate::support::{self, MockCatalog, MockTransfer};

fn album_catalog() -> MockCatalog {
    let mut catalog = MockCatalog::new();
    let album = support::album("abc123", "Nova Quartet", "First Light", 3);
    catalog.album_tracks.insert(
        "abc123".to_string(),
        vec![
            support::track(101, 1, "Dawn", "Nova Quartet"),
            support::track(102, 2, "Noon", "Nova Quartet"),
            support::track(103, 3, "Dusk", "Nova Quartet"),
        ],
    );
    catalog.albums.insert("abc123".to_string(), album);
    catalog
}

#[tokio::test]
async fn test_album_lands_in_artist_album_layout() {
    let h = support::harness(album_catalog(), MockTransfer::new());
    let outcome = h
        .run("https://play.example.com/album/abc123", CancelToken::new())
        .await;

    assert_eq!(outcome.status, JobStatus::Completed);
    assert_eq!(outcome.warnings, 0);

    for (number, title) in [(1, "Dawn"), (2, "Noon"), (3, "Dusk")] {
        let path = support::expected_track_path(
            &h.base_dir,
            "Nova Quartet",
            "First Light",
            number,
            3,
            title,
        );
        assert!(path.exists(), "missing {}", path.display());
    }

    let album_dir = h.base_dir.join("Nova Quartet").join("First Light");
    assert!(album_dir.join("Cover.jpg").exists());
    // The embedded-art copy is removed once the album is tagged.
    assert!(!album_dir.join("600.jpg").exists());

    assert_eq!(h.sink.lines_containing("Download job completed!"), 1);
    assert_eq!(
        h.sink
            .lines_containing("Starting downloads for album \"First Light\" with ID: abc123..."),
        1
    );
}

#[tokio::test]
async fn test_album_track_listing_is_paged() {
    let mut catalog = MockCatalog::new();
    let album = support::album("big", "Archive Ensemble", "Complete Works", 120);
    let tracks: Vec<_> = (1..=120)
        .map(|n| support::track(1000 + n, n, &format!("Movement {n}"), "Archive Ensemble"))
        .collect();
    catalog.album_tracks.insert("big".to_string(), tracks);
    catalog.albums.insert("big".to_string(), album);

    let h = support::harness(catalog, MockTransfer::new());
    let outcome = h
        .run("https://play.example.com/album/big", CancelToken::new())
        .await;

    assert_eq!(outcome.status, JobStatus::Completed);
    // 120 tracks at a page size of 50 need three album requests.
    assert_eq!(h.catalog.call_count("album/get:big:0"), 1);
    assert_eq!(h.catalog.call_count("album/get:big:50"), 1);
    assert_eq!(h.catalog.call_count("album/get:big:100"), 1);
    assert_eq!(h.catalog.call_count("album/get:"), 3);

    // Numbers are padded to the width of the total.
    let last = support::expected_track_path(
        &h.base_dir,
        "Archive Ensemble",
        "Complete Works",
        120,
        120,
        "Movement 120",
    );
    assert!(last.exists(), "missing {}", last.display());
    // Two artwork transfers plus one per track.
    assert_eq!(h.transfer.transfer_count(), 122);
}

#[tokio::test]
async fn test_failed_track_leaves_bad_marker() {
    let catalog = album_catalog();
    let mut transfer = MockTransfer::new();
    transfer.fail_urls.insert(support::cdn_url(102));

    let h = support::harness(catalog, transfer);
    let outcome = h
        .run("https://play.example.com/album/abc123", CancelToken::new())
        .await;

    assert_eq!(outcome.status, JobStatus::CompletedWithWarnings);
    assert_eq!(outcome.warnings, 1);

    let failed =
        support::expected_track_path(&h.base_dir, "Nova Quartet", "First Light", 2, 3, "Noon");
    assert!(!failed.exists());
    let mut marker = failed.into_os_string();
    marker.push(".bad");
    assert!(std::path::PathBuf::from(marker).exists());

    // The rest of the album still downloads.
    let ok = support::expected_track_path(&h.base_dir, "Nova Quartet", "First Light", 3, 3, "Dusk");
    assert!(ok.exists());
    assert_eq!(
        h.sink
            .lines_containing("[ERROR] Track download failed for \"Noon\""),
        1
    );
    assert_eq!(
        h.sink
            .lines_containing("Download job completed with warnings and/or errors!"),
        1
    );
}

#[tokio::test]
async fn test_rerun_skips_existing_files() {
    let h = support::harness(album_catalog(), MockTransfer::new());
    let first = h
        .run("https://play.example.com/album/abc123", CancelToken::new())
        .await;
    assert_eq!(first.status, JobStatus::Completed);
    let transfers_after_first = h.transfer.transfer_count();

    let second = h
        .run("https://play.example.com/album/abc123", CancelToken::new())
        .await;
    assert_eq!(second.status, JobStatus::Completed);
    assert_eq!(h.sink.lines_containing("already exists, skipping."), 3);
    // Only the embedded-art copy is fetched again; Cover.jpg and the audio
    // files are already in place.
    assert_eq!(h.transfer.transfer_count(), transfers_after_first + 1);
}

#[tokio::test]
async fn test_booklet_downloads_after_all_tracks() {
    let mut catalog = album_catalog();
    if let Some(album) = catalog.albums.get_mut("abc123") {
        album.goodies = Some(vec![Goody {
            file_format_id: Goody::BOOKLET_FORMAT_ID,
            url: "https://img.test/abc123_booklet.pdf".to_string(),
            name: "Digital Booklet".to_string(),
        }]);
    }

    let h = support::harness(catalog, MockTransfer::new());
    let outcome = h
        .run("https://play.example.com/album/abc123", CancelToken::new())
        .await;

    assert_eq!(outcome.status, JobStatus::Completed);
    let album_dir = h.base_dir.join("Nova Quartet").join("First Light");
    assert!(album_dir.join("Digital Booklet.pdf").exists());

    let transfers = h.transfer.transferred();
    let booklet_pos = transfers
        .iter()
        .position(|u| u.ends_with("booklet.pdf"))
        .unwrap();
    for id in [101, 102, 103] {
        let track_pos = transfers
            .iter()
            .position(|u| *u == support::cdn_url(id))
            .unwrap();
        assert!(
            track_pos < booklet_pos,
            "track {id} transferred after the booklet"
        );
    }
}

#[tokio::test]
async fn test_existing_embedded_art_is_not_refetched() {
    let h = support::harness(album_catalog(), MockTransfer::new());
    let album_dir = h.base_dir.join("Nova Quartet").join("First Light");
    std::fs::create_dir_all(&album_dir).unwrap();
    std::fs::write(album_dir.join("600.jpg"), b"art").unwrap();

    let outcome = h
        .run("https://play.example.com/album/abc123", CancelToken::new())
        .await;

    assert_eq!(outcome.status, JobStatus::Completed);
    assert!(!h
        .transfer
        .transferred()
        .iter()
        .any(|u| u == "https://img.test/abc123_600.jpg"));
    // The on-disk copy still feeds tagging and is cleaned up afterwards.
    assert!(!album_dir.join("600.jpg").exists());
}

#[tokio::test]
async fn test_unfetchable_album_aborts() {
    let h = support::harness(MockCatalog::new(), MockTransfer::new());
    let outcome = h
        .run("https://play.example.com/album/missing", CancelToken::new())
        .await;

    assert_eq!(outcome.status, JobStatus::Aborted);
    assert_eq!(h.sink.lines_containing("Failed to get album information"), 1);
    assert_eq!(h.sink.lines_containing("Download job completed"), 0);
}
