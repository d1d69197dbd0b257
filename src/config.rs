//! Application configuration loaded from environment variables.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// HTTP listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path of the persisted stats file.
    #[serde(default = "default_stats_path")]
    pub stats_path: PathBuf,

    /// Root directory for static file serving.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    // === Default Seed Values ===
    /// Follower count used when no persisted file exists yet.
    #[serde(default)]
    pub instagram_followers: Option<u64>,

    /// Engagement rate used when no persisted file exists yet.
    #[serde(default)]
    pub engagement_rate: Option<f64>,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

fn default_port() -> u16 {
    8000
}

fn default_stats_path() -> PathBuf {
    PathBuf::from("data.json")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("PORT must be non-zero".to_string());
        }

        if self.stats_path.as_os_str().is_empty() {
            return Err("STATS_PATH must not be empty".to_string());
        }

        if let Some(rate) = self.engagement_rate {
            if !rate.is_finite() || rate < 0.0 {
                return Err("ENGAGEMENT_RATE must be a non-negative number".to_string());
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            stats_path: default_stats_path(),
            static_dir: default_static_dir(),
            instagram_followers: None,
            engagement_rate: None,
            rust_log: default_log_level(),
        }
    }
}
