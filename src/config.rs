use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub scraper: ScraperConfig,
    pub notifier: NotifierConfig,
    pub watch: WatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Upper bound on in-flight page fetches during a fan-out pass.
    pub max_concurrent_fetches: usize,
    /// Per-request timeout in seconds; a timed-out URL counts as a fetch
    /// failure for that URL only.
    pub request_timeout: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// When unset, price changes are logged instead of delivered.
    pub webhook_url: Option<String>,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Wishlist pages scraped on every pass.
    pub urls: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .set_default("database.url", "sqlite://wishwatch.db?mode=rwc")?
            .set_default("database.max_connections", 5)?
            .set_default("scraper.max_concurrent_fetches", 4)?
            .set_default("scraper.request_timeout", 30)?
            .set_default("scraper.user_agent", "wishwatch/0.1")?
            .set_default("notifier.username", "Wishwatch")?
            .set_default::<_, Vec<String>>("watch.urls", Vec::new())?
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Add environment-specific config
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add local config (ignored by git)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix "WISHWATCH"
            .add_source(Environment::with_prefix("WISHWATCH").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
