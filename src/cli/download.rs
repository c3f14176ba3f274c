//! Download command implementation

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::cancel::CancelToken;
use crate::catalog::http::HttpCatalogClient;
use crate::downloader::transfer::DEFAULT_USER_AGENT;
use crate::downloader::{
    DownloadConfig, DownloadJob, DownloadOrchestrator, HttpTransferer, JobOutcome, ProgressSink,
};
use crate::link::ItemLink;
use crate::tagger::LoftyTagger;
use crate::Quality;

use super::CliError;

/// Bounds for the generated-name length option; shorter truncates titles
/// into uselessness, longer risks blowing filesystem path limits.
const MIN_NAME_LENGTH: usize = 10;
const MAX_NAME_LENGTH: usize = 120;

/// Parse and validate the quality tier option.
///
/// Accepts the numeric format ids ("5", "6", "7", "27") and the mnemonic
/// names ("mp3", "cd", "hires96", "hires192").
fn parse_quality(s: &str) -> Result<Quality, String> {
    match s.to_lowercase().as_str() {
        "mp3" => Ok(Quality::Mp3),
        "cd" => Ok(Quality::Cd),
        "hires96" => Ok(Quality::Hires96),
        "hires192" => Ok(Quality::Hires192),
        other => other
            .parse::<Quality>()
            .map_err(|_| format!("invalid quality '{s}': use 5, 6, 7, 27 or mp3, cd, hires96, hires192")),
    }
}

/// Parse and validate the maximum generated-name length.
fn parse_name_length(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&value) {
        return Err(format!(
            "name length {value} outside allowed range {MIN_NAME_LENGTH}-{MAX_NAME_LENGTH}"
        ));
    }
    Ok(value)
}

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(name = "catalog-downloader")]
#[command(about = "Bulk downloader for music catalog content", long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download a track, album, artist, label, favorites or playlist URL
    Download(DownloadArgs),
}

/// Arguments for the `download` subcommand.
#[derive(Debug, Parser)]
pub struct DownloadArgs {
    /// Store or player URL of the item to download
    pub url: String,

    /// Root directory downloads land under
    #[arg(short, long, default_value = "downloads")]
    pub output_dir: PathBuf,

    /// Quality tier: 5/mp3, 6/cd, 7/hires96, 27/hires192
    #[arg(short, long, default_value = "6", value_parser = parse_quality)]
    pub quality: Quality,

    /// Catalog API base URL (falls back to CATALOG_API_BASE)
    #[arg(long)]
    pub api_base: Option<String>,

    /// Catalog application id (falls back to CATALOG_APP_ID)
    #[arg(long)]
    pub app_id: Option<String>,

    /// Catalog user auth token (falls back to CATALOG_USER_TOKEN)
    #[arg(long)]
    pub user_token: Option<String>,

    /// Maximum length for generated file and folder names
    #[arg(long, default_value = "36", value_parser = parse_name_length)]
    pub max_name_length: usize,

    /// Separator between track number/performer and title in filenames
    #[arg(long, default_value = " - ")]
    pub separator: String,

    /// Suffix album folders with the album id
    #[arg(long)]
    pub album_id_in_folder: bool,

    /// Attempt every track regardless of the catalog's streamable flag
    #[arg(long)]
    pub ignore_streamable_check: bool,

    /// Directory for job log files (default: <output-dir>/logs)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

impl DownloadArgs {
    /// Run the download job for the given URL.
    pub async fn execute(&self, cancel: CancelToken) -> Result<JobOutcome, CliError> {
        let api_base = self.resolve(self.api_base.as_deref(), "CATALOG_API_BASE", "--api-base")?;
        let app_id = self.resolve(self.app_id.as_deref(), "CATALOG_APP_ID", "--app-id")?;
        let user_token =
            self.resolve(self.user_token.as_deref(), "CATALOG_USER_TOKEN", "--user-token")?;

        let mut config = DownloadConfig::new(self.output_dir.clone());
        config.quality = self.quality;
        config.filename_separator = self.separator.clone();
        config.max_name_length = self.max_name_length;
        config.album_id_in_folder = self.album_id_in_folder;
        config.check_streamable = !self.ignore_streamable_check;
        if let Some(log_dir) = &self.log_dir {
            config.logging_dir = log_dir.clone();
        }

        let catalog = Arc::new(HttpCatalogClient::new(api_base, app_id, user_token)?);
        let transfer = Arc::new(
            HttpTransferer::new(DEFAULT_USER_AGENT)
                .map_err(crate::downloader::DownloadError::Transfer)?,
        );
        let tagger = Arc::new(LoftyTagger::new());
        let sink = Arc::new(SpinnerProgress::new());

        let orchestrator =
            DownloadOrchestrator::new(catalog, transfer, tagger, sink.clone(), config)?;
        info!(log = %orchestrator.logger().log_path().display(), "job log created");

        let link = ItemLink::parse(&self.url);
        let job = DownloadJob::new(link);
        let outcome = orchestrator.run_job(job, cancel).await;
        sink.finish();
        Ok(outcome)
    }

    fn resolve(
        &self,
        arg: Option<&str>,
        env_var: &str,
        flag: &str,
    ) -> Result<String, CliError> {
        if let Some(value) = arg {
            return Ok(value.to_string());
        }
        std::env::var(env_var).map_err(|_| {
            CliError::ConfigurationError(format!("{flag} not given and {env_var} not set"))
        })
    }
}

/// Progress sink rendering a spinner with the current activity.
pub struct SpinnerProgress {
    bar: ProgressBar,
}

impl SpinnerProgress {
    /// Create and start the spinner.
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    /// Stop the spinner, clearing its line.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for SpinnerProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for SpinnerProgress {
    fn on_item_info(&self, artist: &str, title: &str) {
        self.bar.println(format!("{artist} - {title}"));
    }

    fn on_speed(&self, text: &str) {
        self.bar.set_message(text.to_string());
    }

    fn on_log_line(&self, line: &str) {
        self.bar.println(line.to_string());
    }
}
