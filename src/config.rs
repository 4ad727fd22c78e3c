use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use chrono::{NaiveDate, Utc};

pub const DEFAULT_BDL_BASE_URL: &str = "https://api.balldontlie.io/v1";

/// Where the three snapshot files come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Directory(PathBuf),
    /// Base URL; file names are appended to it.
    Remote(String),
}

impl DataSource {
    pub fn describe(&self) -> String {
        match self {
            DataSource::Directory(dir) => dir.display().to_string(),
            DataSource::Remote(base) => base.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: DataSource,
    pub refresh_interval: Duration,
    pub http_timeout: Duration,
    pub schedule_date: NaiveDate,
    pub log_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(opt_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let source = match lookup("SPOTSTATS_DATA_URL") {
            Some(url) => DataSource::Remote(url.trim().trim_end_matches('/').to_string()),
            None => DataSource::Directory(PathBuf::from(
                lookup("SPOTSTATS_DATA_DIR").unwrap_or_else(|| "data".to_string()),
            )),
        };
        let refresh_secs = lookup("SPOTSTATS_REFRESH_SECS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(300)
            .max(30);
        let timeout_secs = lookup("SPOTSTATS_HTTP_TIMEOUT_SECS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(10)
            .clamp(1, 60);
        let schedule_date = lookup("SPOTSTATS_DATE")
            .and_then(|val| parse_date(&val))
            .unwrap_or_else(|| Utc::now().date_naive());
        let log_dir = lookup("SPOTSTATS_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);

        Self {
            source,
            refresh_interval: Duration::from_secs(refresh_secs),
            http_timeout: Duration::from_secs(timeout_secs),
            schedule_date,
            log_dir,
        }
    }
}

/// Settings for the BallDontLie ingestion binary.
#[derive(Debug, Clone)]
pub struct BdlConfig {
    pub api_key: String,
    pub base_url: String,
}

impl BdlConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(opt_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let Some(api_key) = lookup("BALLDONTLIE_API_KEY") else {
            bail!("BALLDONTLIE_API_KEY is not set");
        };
        let base_url = lookup("BALLDONTLIE_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BDL_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            api_key: api_key.trim().to_string(),
            base_url,
        })
    }
}

/// `.env.local` wins over `.env`; neither is required.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), "%Y-%m-%d").ok()
}

fn opt_env(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|val| {
        if val.trim().is_empty() {
            None
        } else {
            Some(val)
        }
    })
}
