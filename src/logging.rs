//! Logging
//!
//! Console logging to stderr, plus a daily-rotated log file when debug mode
//! is on.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Prefix of rotated log file names
const LOG_FILE_PREFIX: &str = "duovox.log";

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub debug_mode: bool,
    pub log_dir: PathBuf,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            debug_mode: false,
            log_dir: default_log_dir(),
            level: "info".to_string(),
        }
    }

    pub fn with_debug_mode(mut self, debug: bool) -> Self {
        self.debug_mode = debug;
        self
    }

    pub fn with_log_dir(mut self, dir: PathBuf) -> Self {
        self.log_dir = dir;
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Filter directive: `RUST_LOG` wins, then debug mode, then the level.
    fn filter(&self) -> EnvFilter {
        let fallback = if self.debug_mode {
            "duovox=debug".to_string()
        } else {
            format!("duovox={}", self.level)
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    }
}

/// Log directory used when none is configured
pub fn default_log_dir() -> PathBuf {
    PathBuf::from(".duovox").join("logs")
}

/// Install the global subscriber.
///
/// Returns the file writer's guard in debug mode; keep it alive until exit
/// so buffered lines are flushed.
pub fn init_logging(config: LogConfig) -> Result<Option<WorkerGuard>> {
    let console = fmt::layer().with_writer(std::io::stderr).with_target(false);

    if !config.debug_mode {
        tracing_subscriber::registry()
            .with(config.filter())
            .with(console)
            .try_init()
            .context("Failed to install tracing subscriber")?;
        return Ok(None);
    }

    fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("Failed to create log directory: {:?}", config.log_dir))?;

    let appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(config.filter())
        .with(console)
        .with(file)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!("Debug logging to {:?}", config.log_dir);
    Ok(Some(guard))
}

/// Log files in `dir`, oldest first
fn log_files(dir: &Path) -> Result<Vec<(PathBuf, SystemTime)>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {:?}", dir))? {
        let entry = entry?;
        let path = entry.path();
        let is_log = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(LOG_FILE_PREFIX));
        if !is_log || !path.is_file() {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        files.push((path, modified));
    }
    files.sort_by_key(|(_, modified)| *modified);
    Ok(files)
}

/// Delete log files in `dir` older than `days`.
pub fn cleanup_old_logs(dir: &Path, days: u64) -> Result<usize> {
    let max_age = Duration::from_secs(days * 24 * 60 * 60);
    let now = SystemTime::now();
    let mut removed = 0;

    for (path, modified) in log_files(dir)? {
        let age = now.duration_since(modified).unwrap_or_default();
        if age > max_age {
            fs::remove_file(&path).with_context(|| format!("Failed to remove {:?}", path))?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Most recent log file in `dir`, if any
pub fn get_log_path(dir: &Path) -> Option<PathBuf> {
    log_files(dir).ok()?.pop().map(|(path, _)| path)
}

/// Every log file in `dir`, oldest first
pub fn list_logs(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(log_files(dir)?.into_iter().map(|(path, _)| path).collect())
}
