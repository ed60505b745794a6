//! # configs
//!
//! Layered settings for the Rediscover binary:
//! built-in defaults → `rediscover.toml` (optional) → `REDISCOVER__*`
//! environment variables. A `.env` file, when present, is loaded first.

use config::{Config, Environment, File, Map};
use domains::ServerKind;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "rediscover.toml";
/// Overrides the settings file location
pub const CONFIG_PATH_ENV: &str = "REDISCOVER_CONFIG";
const ENV_PREFIX: &str = "REDISCOVER";
/// A century; anything larger is a typo
pub const MAX_SINCE_DAYS: u32 = 36_500;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub rediscover: RediscoverSettings,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    /// Base URL of the home server, e.g. `https://mastodon.social`
    pub origin: String,
    #[serde(default)]
    pub kind: ServerKind,
    /// Bearer token obtained out of band; never logged
    pub access_token: SecretString,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RediscoverSettings {
    /// Posts and accounts quieter than this many days are ignored
    pub since_days: u32,
    /// Followings sampled per round
    pub batch_size: usize,
}

impl Default for RediscoverSettings {
    fn default() -> Self {
        Self {
            since_days: 7,
            batch_size: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: None,
        }
    }
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing-subscriber` filter directive; `RUST_LOG` wins when set
    pub filter: String,
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            json: false,
        }
    }
}

fn env_source(vars: Option<Map<String, String>>) -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .source(vars)
}

impl Settings {
    /// Loads settings from `path`, or `$REDISCOVER_CONFIG`, or
    /// `rediscover.toml` in the working directory. A missing file is fine as
    /// long as the environment supplies the required keys.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        // A missing .env is the normal case
        let _ = dotenvy::dotenv();

        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let config = Config::builder()
            .add_source(File::from(path.as_path()).required(false))
            .add_source(env_source(None))
            .build()?;
        Self::from_config(config)
    }

    fn from_config(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let origin = self.server.origin.trim();
        let is_http_url = Url::parse(origin)
            .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
            .unwrap_or(false);
        if !is_http_url {
            return Err(ConfigError::Invalid(format!(
                "server.origin must be an http(s) URL, got {origin:?}"
            )));
        }
        if self.server.access_token.expose_secret().trim().is_empty() {
            return Err(ConfigError::Invalid("server.access_token is empty".into()));
        }
        if self.rediscover.since_days == 0 {
            return Err(ConfigError::Invalid("rediscover.since_days must be at least 1".into()));
        }
        if self.rediscover.since_days > MAX_SINCE_DAYS {
            return Err(ConfigError::Invalid(format!(
                "rediscover.since_days must be at most {MAX_SINCE_DAYS}"
            )));
        }
        if self.rediscover.batch_size == 0 {
            return Err(ConfigError::Invalid("rediscover.batch_size must be at least 1".into()));
        }
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Invalid("http.timeout_secs must be at least 1".into()));
        }
        Ok(())
    }

    /// Logs the effective settings, minus the token.
    pub fn describe(&self) {
        info!(
            origin = %self.server.origin,
            kind = %self.server.kind,
            since_days = self.rediscover.since_days,
            batch_size = self.rediscover.batch_size,
            "settings loaded"
        );
    }
}
