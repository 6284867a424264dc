//! Configuration module for the badge scraper.
//!
//! Values come from, in increasing priority: built-in defaults, an optional
//! `badge-scraper.toml` in the working directory, and `BADGE_SCRAPER_*`
//! environment variables. Command-line flags are applied on top by the caller.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Deserializer};

use crate::badges::NamePolicy;
use crate::scraper::LISTING_URL;

/// Optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = "badge-scraper.toml";

/// Prefix for environment overrides, e.g. `BADGE_SCRAPER_READY_TIMEOUT=10s`.
pub const ENV_PREFIX: &str = "BADGE_SCRAPER_";

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Log level for this crate's targets; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// WebDriver server endpoint
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
    /// Run the browser without a window
    #[serde(default)]
    pub headless: bool,
    /// Badge listing page to scrape
    #[serde(default = "default_listing_url")]
    pub listing_url: String,
    /// How long to wait for the first badge tile to appear
    ///
    /// Accepts a bare number of seconds or a duration string like `"5s"`,
    /// `"1500ms"`, `"1m"`.
    #[serde(
        default = "default_ready_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub ready_timeout: Duration,
    /// Where the badge file is written
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// Name cleanup policy
    #[serde(default)]
    pub name_policy: NamePolicy,
}

impl Config {
    /// Load from the standard sources.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file(CONFIG_FILE))
                .merge(Env::prefixed(ENV_PREFIX)),
        )
    }

    pub fn from_figment(figment: Figment) -> anyhow::Result<Self> {
        figment.extract().context("Failed to load config")
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_listing_url() -> String {
    LISTING_URL.to_string()
}

fn default_ready_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_output_path() -> PathBuf {
    PathBuf::from("twitch/json/twitch_badges.json")
}

/// Either seconds as a number or a human-readable duration string.
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Seconds(secs) => Ok(Duration::from_secs(secs)),
        Raw::Text(text) => fundu::parse_duration(text.trim()).map_err(|e| {
            serde::de::Error::custom(format!("invalid duration '{text}': {e}"))
        }),
    }
}
