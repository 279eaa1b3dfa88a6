//! Configuration Module
//!
//! Handles application configuration loading, validation, and management.

pub mod secrets;

pub use secrets::SecretString;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::narration::{NarrationSettings, PAUSE_RANGE_MS};
use crate::segmenter::{Markers, Segmenter};
use crate::tts::{DEFAULT_TTS_MODEL, OPENAI_BASE_URL};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Speech provider configuration
    #[serde(default)]
    pub tts: TtsConfig,

    /// Voices, pause, and output format
    #[serde(default)]
    pub narration: NarrationSettings,

    /// Marker words that open questions and answers
    #[serde(default)]
    pub markers: Markers,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// OpenAI speech endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// API key (usually loaded from OPENAI_API_KEY)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<SecretString>,

    /// API base URL (default: "https://api.openai.com/v1")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Speech model (default: "gpt-4o-mini-tts")
    #[serde(default = "default_model")]
    pub model: String,

    /// Per-request timeout in seconds (default: 60)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    OPENAI_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_TTS_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for debug log files (default: ./.duovox/logs)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

impl LoggingConfig {
    /// Configured log directory, or the default one
    pub fn log_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(crate::logging::default_log_dir)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. Default values
    /// 2. System config: ~/.config/duovox/config.toml
    /// 3. Local config: ./duovox.toml
    /// 4. Environment variables
    pub fn load() -> Result<Self> {
        tracing::debug!("Loading configuration...");

        let mut config = Self::default();

        if let Some(system_config_path) = Self::system_config_path()
            && system_config_path.exists()
        {
            tracing::debug!("Loading system config from: {:?}", system_config_path);
            config = Self::merge_from_file(config, &system_config_path)?;
        }

        let local_config_path = Self::local_config_path();
        if local_config_path.exists() {
            tracing::debug!("Loading local config from: {:?}", local_config_path);
            config = Self::merge_from_file(config, &local_config_path)?;
        }

        config = Self::apply_env_overrides(config)?;

        tracing::debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from a specific file path
    ///
    /// Priority (lowest to highest):
    /// 1. Default values
    /// 2. Custom config file (specified path)
    /// 3. Environment variables
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading configuration from custom path: {:?}", path);

        if !path.exists() {
            anyhow::bail!("Config file not found: {:?}", path);
        }
        let config = Self::merge_from_file(Self::default(), path)?;
        let config = Self::apply_env_overrides(config)?;

        tracing::debug!("Configuration loaded successfully from custom path");
        Ok(config)
    }

    /// Get the system config path: ~/.config/duovox/config.toml
    pub fn system_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("duovox").join("config.toml"))
    }

    /// Get the local config path: ./duovox.toml
    pub fn local_config_path() -> PathBuf {
        PathBuf::from("./duovox.toml")
    }

    /// Load and merge configuration from a TOML file
    fn merge_from_file(base: Self, path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let file_config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(Self::merge(base, file_config))
    }

    /// Sections from `overlay` replace those of `base`; a key already set
    /// in `base` survives a file that does not mention one.
    fn merge(base: Self, overlay: Self) -> Self {
        let mut tts = overlay.tts;
        if tts.api_key.is_none() {
            tts.api_key = base.tts.api_key;
        }
        Self {
            tts,
            narration: overlay.narration,
            markers: overlay.markers,
            logging: overlay.logging,
        }
    }

    fn apply_env_overrides(config: Self) -> Result<Self> {
        Self::apply_overrides(config, |name| std::env::var(name).ok())
    }

    /// Apply overrides from a variable lookup
    fn apply_overrides<F>(mut config: Self, var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = var("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()) {
            config.tts.api_key = Some(SecretString::new(api_key.trim()));
        }

        if let Some(base_url) = var("OPENAI_BASE_URL") {
            config.tts.base_url = base_url;
        }

        if let Some(model) = var("DUOVOX_TTS_MODEL") {
            config.tts.model = model;
        }

        if let Some(log_level) = var("DUOVOX_LOG_LEVEL") {
            config.logging.level = log_level;
        }

        if let Some(pause_ms) = var("DUOVOX_PAUSE_MS") {
            config.narration.pause_ms = pause_ms
                .trim()
                .parse()
                .with_context(|| format!("Invalid DUOVOX_PAUSE_MS: {:?}", pause_ms))?;
        }

        Ok(config)
    }

    /// Check if an API key is configured (from env or config file).
    pub fn has_api_key(&self) -> bool {
        self.tts.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Segmenter for the configured marker words
    pub fn segmenter(&self) -> Result<Segmenter> {
        Segmenter::new(&self.markers).context("Failed to build marker patterns")
    }

    pub fn validate(&self) -> Result<()> {
        tracing::debug!("Validating configuration...");

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            );
        }

        let narration = &self.narration;
        if !PAUSE_RANGE_MS.contains(&narration.pause_ms) {
            anyhow::bail!(
                "Invalid pause: {} ms. Must be between {} and {} ms",
                narration.pause_ms,
                PAUSE_RANGE_MS.start(),
                PAUSE_RANGE_MS.end()
            );
        }
        if !(1..=2).contains(&narration.channels) {
            anyhow::bail!("Invalid channel count: {}. Must be 1 or 2", narration.channels);
        }
        if narration.sample_rate == 0 {
            anyhow::bail!("Sample rate must be greater than zero");
        }
        if narration.concurrency == 0 {
            anyhow::bail!("Concurrency must be at least 1");
        }

        if self.markers.question.trim().is_empty() || self.markers.answer.trim().is_empty() {
            anyhow::bail!("Question and answer markers must not be empty");
        }

        if self.tts.base_url.is_empty() {
            anyhow::bail!("TTS base_url is empty");
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        fs::write(path, toml_string)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        tracing::info!("Configuration saved to: {:?}", path);
        Ok(())
    }
}
