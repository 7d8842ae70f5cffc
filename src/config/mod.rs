use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::components::marketplace_loan_card::DEFAULT_RATING;
use crate::error::Result;
use crate::views::{HIGHLIGHTED_LOANS_LIMIT, RECENT_TRANSACTIONS_LIMIT};

pub const API_URL_ENV: &str = "BITLEND_API_URL";
pub const SESSION_TOKEN_ENV: &str = "BITLEND_SESSION_TOKEN";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Session cookie issued by the login endpoint. Sent with every request.
    #[serde(default)]
    pub session_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 30,
            session_token: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CacheConfig {
    /// Entries never go stale on their own unless this is set.
    #[serde(default)]
    pub stale_after_secs: Option<u64>,
}

impl CacheConfig {
    pub fn stale_after(&self) -> Option<Duration> {
        self.stale_after_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    /// Can only shorten the dashboard lists, never lengthen them.
    pub recent_transactions_limit: usize,
    pub highlighted_loans_limit: usize,
    pub default_rating: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_transactions_limit: RECENT_TRANSACTIONS_LIMIT,
            highlighted_loans_limit: HIGHLIGHTED_LOANS_LIMIT,
            default_rating: DEFAULT_RATING,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct NotificationConfig {
    pub max_toasts: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { max_toasts: 5 }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub file: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        fs::write(path, config_str)?;
        Ok(())
    }

    /// Reads `.env` (if any) and lets the environment override API settings.
    pub fn apply_env_overrides(&mut self) {
        dotenv::dotenv().ok();
        if let Ok(url) = env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url;
            }
        }
        if let Ok(token) = env::var(SESSION_TOKEN_ENV) {
            if !token.trim().is_empty() {
                self.api.session_token = Some(token);
            }
        }
    }
}
