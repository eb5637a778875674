//! Rolling Logger
//!
//! Installs a `tracing` subscriber writing to stderr and, when a log directory
//! is given, to a timestamped file in it. Only the newest `max_files` log files
//! of an application are kept.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static INITIALIZED: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Logger has already been initialized")]
    AlreadyInitialized,

    #[error("Logger is not initialized")]
    NotInitialized,

    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("Log directory error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to install subscriber: {0}")]
    Install(String),
}

/// Logger settings
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Directory for log files; `None` logs to stderr only
    pub log_dir: Option<PathBuf>,
    /// Prefix of the log file names
    pub app_name: String,
    /// Filter directive, e.g. `info` or `taskboard=debug`
    pub level: String,
    /// Number of log files kept, including the new one
    pub max_files: usize,
}

impl LoggerConfig {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            log_dir: None,
            app_name: app_name.into(),
            level: "info".to_string(),
            max_files: 5,
        }
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }
}

/// File name of a log file started at `now`
pub fn log_file_name(app_name: &str, now: DateTime<Local>) -> String {
    format!("{}_{}.log", app_name, now.format("%Y%m%d_%H%M%S%3f"))
}

fn is_log_of(path: &Path, app_name: &str) -> bool {
    let prefix = format!("{}_", app_name);
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with(&prefix) && name.ends_with(".log"))
        .unwrap_or(false)
}

/// Removes the oldest log files of `app_name` so that at most `keep` remain
///
/// Returns how many files were removed.
pub fn prune_old_logs(dir: &Path, app_name: &str, keep: usize) -> Result<usize, LoggerError> {
    let mut logs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_log_of(path, app_name))
        .collect();
    // timestamps in the names sort chronologically
    logs.sort();

    let excess = logs.len().saturating_sub(keep);
    for path in logs.iter().take(excess) {
        fs::remove_file(path)?;
    }
    Ok(excess)
}

/// Installs the global subscriber
///
/// Returns the path of the log file when a log directory is configured.
pub fn init_logger(config: &LoggerConfig) -> Result<Option<PathBuf>, LoggerError> {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Err(LoggerError::AlreadyInitialized);
    }

    let result = install(config);
    if result.is_err() {
        INITIALIZED.store(false, Ordering::SeqCst);
    }
    result
}

fn install(config: &LoggerConfig) -> Result<Option<PathBuf>, LoggerError> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| LoggerError::InvalidFilter(e.to_string()))?;

    let mut log_path = None;
    let file_layer = match &config.log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            prune_old_logs(dir, &config.app_name, config.max_files.saturating_sub(1))?;
            let path = dir.join(log_file_name(&config.app_name, Local::now()));
            let file = fs::File::create(&path)?;
            log_path = Some(path);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggerError::Install(e.to_string()))?;

    tracing::info!(app = %config.app_name, level = %config.level, "Logger initialized");
    Ok(log_path)
}

pub fn is_initialized() -> bool {
    INITIALIZED.load(Ordering::SeqCst)
}

/// Logs a plain message at info level
pub fn info(message: &str) -> Result<(), LoggerError> {
    if !is_initialized() {
        return Err(LoggerError::NotInitialized);
    }
    tracing::info!("{}", message);
    Ok(())
}

/// Logs a plain message at error level
pub fn error(message: &str) -> Result<(), LoggerError> {
    if !is_initialized() {
        return Err(LoggerError::NotInitialized);
    }
    tracing::error!("{}", message);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_prune_keeps_newest() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "board_20240101_000000000.log");
        touch(dir.path(), "board_20240102_000000000.log");
        touch(dir.path(), "board_20240103_000000000.log");
        touch(dir.path(), "other_20240101_000000000.log");

        let removed = prune_old_logs(dir.path(), "board", 2).unwrap();
        assert_eq!(removed, 1);
        assert!(!dir.path().join("board_20240101_000000000.log").exists());
        assert!(dir.path().join("board_20240103_000000000.log").exists());
        assert!(dir.path().join("other_20240101_000000000.log").exists());
    }

    #[test]
    fn test_prune_with_nothing_to_remove() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "board_20240101_000000000.log");
        assert_eq!(prune_old_logs(dir.path(), "board", 3).unwrap(), 0);
    }

    #[test]
    fn test_log_file_name_format() {
        let name = log_file_name("board", Local::now());
        assert!(name.starts_with("board_"));
        assert!(name.ends_with(".log"));
        assert!(is_log_of(Path::new(&name), "board"));
    }

    #[test]
    fn test_config_builder() {
        let config = LoggerConfig::new("board")
            .with_level("debug")
            .with_max_files(2)
            .with_log_dir("/tmp/board-logs");
        assert_eq!(config.level, "debug");
        assert_eq!(config.max_files, 2);
        assert!(config.log_dir.is_some());
    }
}
