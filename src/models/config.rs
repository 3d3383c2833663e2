//! Runtime configuration structures.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root runtime configuration.
///
/// Built once at startup from an optional TOML file plus environment
/// overrides, then passed by reference to every component that needs it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Display name used as the `[...]` prefix of every notice
    #[serde(default = "defaults::bot_name")]
    pub bot_name: String,

    /// Telegram destination and credentials
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Comic archive location
    #[serde(default)]
    pub archive: ArchiveConfig,

    /// Batch size and sleep interval bounds
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Retry behavior for archive requests
    #[serde(default)]
    pub retry: RetryConfig,

    /// Visited-set file location
    #[serde(default)]
    pub storage: StorageConfig,
}

impl RuntimeConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load the optional TOML file, then apply process environment overrides.
    pub fn from_sources(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                Self::load(path)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Override fields from environment-style variables.
    ///
    /// `lookup` returns the raw value of a variable, if set.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(env::BOT_TOKEN) {
            self.telegram.bot_token = token;
        }
        if let Some(chat_id) = lookup(env::CHAT_ID) {
            self.telegram.chat_id = chat_id;
        }
        if let Some(api_url) = lookup(env::TELEGRAM_API_URL) {
            self.telegram.api_url = api_url;
        }
        if let Some(base_url) = lookup(env::ARCHIVE_URL) {
            self.archive.base_url = base_url;
        }
        if let Some(path) = lookup(env::DATA_FILE) {
            self.storage.data_file = PathBuf::from(path);
        }
        if let Some(raw) = lookup(env::BATCH_SIZE) {
            self.schedule.batch_size = parse_int(env::BATCH_SIZE, &raw)?;
        }
        if let Some(raw) = lookup(env::MIN_INTERVAL) {
            self.schedule.min_interval = parse_int(env::MIN_INTERVAL, &raw)?;
        }
        if let Some(raw) = lookup(env::MAX_INTERVAL) {
            self.schedule.max_interval = parse_int(env::MAX_INTERVAL, &raw)?;
        }
        Ok(())
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        self.telegram.validate()?;
        Url::parse(&self.archive.base_url)
            .map_err(|e| AppError::config(format!("Invalid archive URL: {e}")))?;
        if self.http.timeout_secs == 0 {
            return Err(AppError::config("http.timeout_secs must be > 0"));
        }
        if self.retry.attempts == 0 {
            return Err(AppError::config("retry.attempts must be > 0"));
        }
        self.schedule.validated()?;
        Ok(())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bot_name: defaults::bot_name(),
            telegram: TelegramConfig::default(),
            archive: ArchiveConfig::default(),
            schedule: ScheduleConfig::default(),
            http: HttpConfig::default(),
            retry: RetryConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

/// Environment variable names.
pub mod env {
    pub const BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
    pub const CHAT_ID: &str = "TELEGRAM_CHAT_ID";
    pub const TELEGRAM_API_URL: &str = "TELEGRAM_API_URL";
    pub const ARCHIVE_URL: &str = "XKCD_BASE_URL";
    pub const DATA_FILE: &str = "DATA_FILE_PATH";
    pub const BATCH_SIZE: &str = "BATCH_SIZE";
    pub const MIN_INTERVAL: &str = "MIN_INTERVAL";
    pub const MAX_INTERVAL: &str = "MAX_INTERVAL";
}

fn parse_int(name: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::config(format!("{name} must be an integer, got '{raw}'")))
}

/// Telegram Bot API settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,

    #[serde(default)]
    pub chat_id: String,

    /// Bot API base URL
    #[serde(default = "defaults::telegram_api_url")]
    pub api_url: String,
}

impl TelegramConfig {
    /// Whether enough is configured to send a message at all.
    pub fn has_credentials(&self) -> bool {
        !self.bot_token.trim().is_empty() && !self.chat_id.trim().is_empty()
    }

    fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            return Err(AppError::config(format!("{} is not set", env::BOT_TOKEN)));
        }
        if self.chat_id.trim().is_empty() {
            return Err(AppError::config(format!("{} is not set", env::CHAT_ID)));
        }
        Url::parse(&self.api_url)
            .map_err(|e| AppError::config(format!("Invalid Telegram API URL: {e}")))?;
        Ok(())
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            api_url: defaults::telegram_api_url(),
        }
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.bot_token.is_empty() { "" } else { "***" };
        f.debug_struct("TelegramConfig")
            .field("bot_token", &token)
            .field("chat_id", &self.chat_id)
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Comic archive settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    #[serde(default = "defaults::archive_url")]
    pub base_url: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::archive_url(),
        }
    }
}

/// Raw schedule settings as read from file or environment.
///
/// Kept signed so a negative batch size can be reported rather than
/// rejected by the parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Deliveries per wake cycle
    #[serde(default = "defaults::batch_size")]
    pub batch_size: i64,

    /// Lower bound of the sleep between batches, in minutes
    #[serde(default = "defaults::interval")]
    pub min_interval: i64,

    /// Upper bound of the sleep between batches, in minutes
    #[serde(default = "defaults::interval")]
    pub max_interval: i64,
}

/// Longest interval whose length in seconds still fits a `u64`.
pub const MAX_INTERVAL_MINUTES: u64 = u64::MAX / 60;

impl ScheduleConfig {
    /// Check the batch and interval invariants.
    pub fn validated(&self) -> Result<Schedule> {
        let batch_size = usize::try_from(self.batch_size)
            .map_err(|_| AppError::config(format!("Invalid batch size {}", self.batch_size)))?;

        if self.min_interval <= 0
            || self.min_interval > self.max_interval
            || self.max_interval as u64 > MAX_INTERVAL_MINUTES
        {
            return Err(AppError::config(format!(
                "Invalid intervals: {}, {}",
                self.min_interval, self.max_interval
            )));
        }

        Ok(Schedule {
            batch_size,
            min_interval_minutes: self.min_interval as u64,
            max_interval_minutes: self.max_interval as u64,
        })
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            batch_size: defaults::batch_size(),
            min_interval: defaults::interval(),
            max_interval: defaults::interval(),
        }
    }
}

/// Validated schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub batch_size: usize,
    pub min_interval_minutes: u64,
    pub max_interval_minutes: u64,
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Retry settings for archive requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first
    #[serde(default = "defaults::attempts")]
    pub attempts: u32,

    /// Pause between attempts in milliseconds
    #[serde(default)]
    pub delay_ms: u64,
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: defaults::attempts(),
            delay_ms: 0,
        }
    }
}

/// Storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "defaults::data_file")]
    pub data_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: defaults::data_file(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn bot_name() -> String {
        "xkcd Random Bot".into()
    }
    pub fn telegram_api_url() -> String {
        "https://api.telegram.org".into()
    }
    pub fn archive_url() -> String {
        "https://xkcd.com".into()
    }
    pub fn batch_size() -> i64 {
        1
    }
    pub fn interval() -> i64 {
        1440
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; xkcd-relay/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn attempts() -> u32 {
        3
    }
    pub fn data_file() -> PathBuf {
        PathBuf::from("/data/data.json")
    }
}
