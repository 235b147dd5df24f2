use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::adapters::groq::{DEFAULT_BASE_URL as DEFAULT_GROQ_BASE_URL, DEFAULT_MODEL as DEFAULT_GROQ_MODEL};
use crate::error::ConfigError;

const DEFAULT_FEED_URL: &str = "https://babylonbee.com/feed";
const DEFAULT_STORAGE_DIR: &str = "/tmp/pollenprophet";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost,http://localhost:8080";

/// Which `ImprovementRepository` implementation is wired in at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// One JSON file per improvement in a local directory
    File { dir: PathBuf },
    /// Rows in a relational `improvements` table
    Postgres { database_url: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub groq_base_url: String,
    pub groq_model: String,
    pub llm_timeout: Duration,
    pub feed_url: String,
    pub storage: StorageBackend,
    pub port: u16,
    /// Development mode: verbose logging, permissive CORS
    pub dev_mode: bool,
    /// Interval of the background refresh; `None` disables it
    pub refresh_interval: Option<Duration>,
    /// How many recent headlines are shown to the model to avoid repeats
    pub title_history: usize,
    pub static_dir: PathBuf,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from any variable source; `from_env` passes the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let groq_api_key = lookup("GROQ_API_KEY").unwrap_or_default();
        if groq_api_key.trim().is_empty() {
            return Err(ConfigError::Missing("GROQ_API_KEY"));
        }

        let storage = match var("STORAGE_BACKEND", "file").trim().to_lowercase().as_str() {
            "file" => StorageBackend::File {
                dir: var("STORAGE_DIR", DEFAULT_STORAGE_DIR).into(),
            },
            "postgres" => StorageBackend::Postgres {
                database_url: lookup("DATABASE_URL")
                    .filter(|url| !url.trim().is_empty())
                    .ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            other => {
                return Err(ConfigError::Invalid {
                    name: "STORAGE_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        let refresh_secs: u64 = parse_var(&lookup, "REFRESH_INTERVAL_SECS", 3600)?;

        Ok(Self {
            groq_api_key,
            groq_base_url: var("GROQ_BASE_URL", DEFAULT_GROQ_BASE_URL),
            groq_model: var("GROQ_MODEL", DEFAULT_GROQ_MODEL),
            llm_timeout: Duration::from_secs(parse_var(&lookup, "LLM_TIMEOUT_SECS", 120)?),
            feed_url: var("FEED_URL", DEFAULT_FEED_URL),
            storage,
            port: parse_var(&lookup, "PORT", 8000)?,
            dev_mode: parse_flag(&lookup, "DEV_MODE")?,
            refresh_interval: (refresh_secs > 0).then(|| Duration::from_secs(refresh_secs)),
            title_history: parse_var(&lookup, "TITLE_HISTORY", 5)?,
            static_dir: var("STATIC_DIR", "static").into(),
            cors_origins: split_list(&var("CORS_ORIGINS", DEFAULT_CORS_ORIGINS)),
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

fn parse_flag(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<bool, ConfigError> {
    match lookup(name) {
        Some(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "" | "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { name, value }),
        },
        None => Ok(false),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
