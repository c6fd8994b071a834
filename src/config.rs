use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::notify::telegram::TELEGRAM_API_BASE;
use crate::review::praktikum::PRAKTIKUM_API_URL;
use crate::review::status::StatusMode;

pub const PRAKTIKUM_TOKEN_VAR: &str = "PRAKTIKUM_TOKEN";
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

/// Tunables read from `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_url: String,
    pub telegram_api_base: String,
    pub poll_interval_secs: u64,
    pub retry_interval_secs: u64,
    pub request_timeout_secs: Option<u64>,
    pub status_mode: StatusMode,
    pub notify_errors: bool,
    /// Read by the binary before logging starts; not part of [`Config`].
    pub log_file: Option<PathBuf>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            api_url: PRAKTIKUM_API_URL.to_string(),
            telegram_api_base: TELEGRAM_API_BASE.to_string(),
            poll_interval_secs: 300,
            retry_interval_secs: 5,
            request_timeout_secs: None,
            status_mode: StatusMode::Strict,
            notify_errors: false,
            log_file: None,
        }
    }
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load `explicit` if given, otherwise the per-user config file when it exists.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("homework-bot").join("config.toml"))
}

/// Credentials for both remote services.
#[derive(Clone, PartialEq)]
pub struct Secrets {
    pub praktikum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("praktikum_token", &"***")
            .field("telegram_token", &"***")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

impl Secrets {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let require = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::MissingVar(name))
        };

        Ok(Self {
            praktikum_token: require(PRAKTIKUM_TOKEN_VAR)?,
            telegram_token: require(TELEGRAM_TOKEN_VAR)?,
            telegram_chat_id: require(TELEGRAM_CHAT_ID_VAR)?,
        })
    }
}

/// Everything the bot needs, fixed at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub secrets: Secrets,
    pub api_url: String,
    pub telegram_api_base: String,
    pub poll_interval: Duration,
    pub retry_interval: Duration,
    pub request_timeout: Option<Duration>,
    pub status_mode: StatusMode,
    pub notify_errors: bool,
}

impl Config {
    pub fn new(file: FileConfig, secrets: Secrets) -> Result<Self, ConfigError> {
        if file.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_secs must be greater than zero".to_string(),
            ));
        }
        if file.retry_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "retry_interval_secs must be greater than zero".to_string(),
            ));
        }
        if file.request_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        reqwest::Url::parse(&file.api_url)
            .map_err(|e| ConfigError::Invalid(format!("api_url {}: {}", file.api_url, e)))?;

        Ok(Self {
            secrets,
            api_url: file.api_url,
            telegram_api_base: file.telegram_api_base,
            poll_interval: Duration::from_secs(file.poll_interval_secs),
            retry_interval: Duration::from_secs(file.retry_interval_secs),
            request_timeout: file.request_timeout_secs.map(Duration::from_secs),
            status_mode: file.status_mode,
            notify_errors: file.notify_errors,
        })
    }
}
