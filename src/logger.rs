//! Per-job log files
//!
//! Writes the user-facing download log plus a companion error-detail log.
//! Every non-blank line is prefixed with a millisecond timestamp; repeated
//! blank lines collapse into one so the log stays readable. Lines are also
//! emitted as `tracing` events, keeping structured logging and the job log
//! in sync.

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, info};

/// Logger errors
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Log file could not be created or written
    #[error("log I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-run download logger.
///
/// One instance covers one orchestrator lifetime; files are named with the
/// creation timestamp so runs never overwrite each other. The error-detail
/// file is only created once an error detail is actually recorded.
pub struct JobLogger {
    log_path: PathBuf,
    error_log_path: PathBuf,
    state: Mutex<LoggerState>,
}

struct LoggerState {
    log_file: File,
    error_log_file: Option<File>,
    last_was_blank: bool,
    wrote_any: bool,
}

impl JobLogger {
    /// Create the download log under `logging_dir`, creating the directory
    /// if needed.
    pub fn new(logging_dir: &Path) -> Result<Self, LoggerError> {
        std::fs::create_dir_all(logging_dir)?;
        let stamp = Local::now().format("%Y-%m-%d_%H.%M.%S").to_string();
        let log_path = logging_dir.join(format!("Download_Log_{stamp}.log"));
        let error_log_path = logging_dir.join(format!("Download_Errors_{stamp}.log"));
        let log_file = File::create(&log_path)?;

        Ok(Self {
            log_path,
            error_log_path,
            state: Mutex::new(LoggerState {
                log_file,
                error_log_file: None,
                last_was_blank: false,
                wrote_any: false,
            }),
        })
    }

    /// Path of the download log file.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Path of the error-detail log file (may not exist yet).
    pub fn error_log_path(&self) -> &Path {
        &self.error_log_path
    }

    /// Append a timestamped line to the download log.
    pub fn line(&self, message: &str) {
        if message.trim().is_empty() {
            self.blank();
            return;
        }
        info!(target: "job_log", "{message}");
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
        let mut state = self.lock();
        let _ = writeln!(state.log_file, "{stamp} : {message}");
        state.last_was_blank = false;
        state.wrote_any = true;
    }

    /// Append a blank separator line.
    ///
    /// Collapsed when the previous line was already blank, and skipped
    /// entirely at the top of the file.
    pub fn blank(&self) {
        let mut state = self.lock();
        if !state.wrote_any || state.last_was_blank {
            return;
        }
        let _ = writeln!(state.log_file);
        state.last_was_blank = true;
    }

    /// Append an `[ERROR]` line to the download log.
    pub fn error_line(&self, message: &str) {
        error!(target: "job_log", "{message}");
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
        let mut state = self.lock();
        let _ = writeln!(state.log_file, "{stamp} : [ERROR] {message}");
        state.last_was_blank = false;
        state.wrote_any = true;
    }

    /// Record full error detail (response bodies, backtrace-style context)
    /// in the companion error log, creating it on first use.
    pub fn error_detail(&self, detail: &str) {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
        let mut state = self.lock();
        if state.error_log_file.is_none() {
            match OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.error_log_path)
            {
                Ok(f) => state.error_log_file = Some(f),
                Err(e) => {
                    error!("failed to create error log: {e}");
                    return;
                }
            }
        }
        if let Some(f) = state.error_log_file.as_mut() {
            let _ = writeln!(f, "{stamp} : {detail}");
            let _ = writeln!(f);
        }
    }

    /// Emit the single end-of-job summary line and return it, so callers
    /// can mirror it to a live surface.
    ///
    /// `clean` selects between the all-good message and the
    /// warnings-and-errors variant; exactly one of the two is written per
    /// job.
    pub fn finish_job(&self, clean: bool) -> &'static str {
        let message = if clean {
            "Download job completed! All downloaded files will be located in your chosen path."
        } else {
            "Download job completed with warnings and/or errors! Some files may be missing, check the log for details."
        };
        self.blank();
        self.line(message);
        message
    }

    /// Emit the user-cancellation line and return it.
    pub fn stopped_by_user(&self) -> &'static str {
        let message = "Download stopped by user!";
        self.blank();
        self.line(message);
        message
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LoggerState> {
        // Poisoning only happens if a writer panicked; keep logging anyway.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
