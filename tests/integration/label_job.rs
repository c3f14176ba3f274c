//! Label jobs: the whole album listing lands under a "- Labels" root.

use catalog_downloader::cancel::CancelToken;
use catalog_downloader::catalog::model::LabelProfile;
use catalog_downloader::downloader::JobStatus;

use crate::support::{self, MockCatalog, MockTransfer};

fn label_catalog() -> MockCatalog {
    let mut catalog = MockCatalog::new();

    let first = support::album("la1", "Vela Trio", "Night Shift", 1);
    catalog.album_tracks.insert(
        "la1".to_string(),
        vec![support::track(41, 1, "Late Hours", "Vela Trio")],
    );
    catalog.albums.insert("la1".to_string(), first.clone());

    let second = support::album("la2", "Ada Frost", "Winter Lines", 1);
    catalog.album_tracks.insert(
        "la2".to_string(),
        vec![support::track(42, 1, "Snowfall", "Ada Frost")],
    );
    catalog.albums.insert("la2".to_string(), second.clone());

    catalog.labels.insert(
        "555".to_string(),
        LabelProfile {
            id: 555,
            name: "Night Shift Records".to_string(),
            albums: None,
        },
    );
    catalog
        .label_albums
        .insert("555".to_string(), vec![first, second]);
    catalog
}

#[tokio::test]
async fn test_label_albums_land_under_labels_root() {
    let h = support::harness(label_catalog(), MockTransfer::new());
    let outcome = h
        .run("https://play.example.com/label/555", CancelToken::new())
        .await;

    assert_eq!(outcome.status, JobStatus::Completed);
    assert_eq!(outcome.warnings, 0);

    let label_root = h.base_dir.join("- Labels").join("Night Shift Records");
    let first = support::expected_track_path(
        &label_root,
        "Vela Trio",
        "Night Shift",
        1,
        1,
        "Late Hours",
    );
    let second = support::expected_track_path(
        &label_root,
        "Ada Frost",
        "Winter Lines",
        1,
        1,
        "Snowfall",
    );
    assert!(first.exists(), "missing {}", first.display());
    assert!(second.exists(), "missing {}", second.display());

    assert_eq!(
        h.sink
            .lines_containing("Starting downloads for label \"Night Shift Records\"..."),
        1
    );
    // Both albums fit the first page, so no follow-up label request is made.
    assert_eq!(h.catalog.call_count("label/get:555:0"), 1);
    assert_eq!(h.catalog.call_count("label/get:"), 1);
}

#[tokio::test]
async fn test_label_without_albums_stops_clean() {
    let mut catalog = MockCatalog::new();
    catalog.labels.insert(
        "556".to_string(),
        LabelProfile {
            id: 556,
            name: "Quiet Seasons".to_string(),
            albums: None,
        },
    );

    let h = support::harness(catalog, MockTransfer::new());
    let outcome = h
        .run("https://play.example.com/label/556", CancelToken::new())
        .await;

    assert_eq!(outcome.status, JobStatus::Completed);
    assert_eq!(outcome.warnings, 0);
    assert_eq!(
        h.sink
            .lines_containing("Label \"Quiet Seasons\" has no albums, nothing to download."),
        1
    );
    assert_eq!(h.transfer.transfer_count(), 0);
    assert!(!h.base_dir.join("- Labels").exists());
}

#[tokio::test]
async fn test_missing_label_aborts() {
    let h = support::harness(MockCatalog::new(), MockTransfer::new());
    let outcome = h
        .run("https://play.example.com/label/404", CancelToken::new())
        .await;

    assert_eq!(outcome.status, JobStatus::Aborted);
    assert_eq!(h.sink.lines_containing("Failed to get label information"), 1);
    assert_eq!(h.sink.lines_containing("Download job completed"), 0);
}
