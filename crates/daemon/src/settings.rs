//! Daemon configuration
//!
//! Layered: built-in defaults, then an optional TOML file, then `WAITLIST_*`
//! environment variables (`__` separates nested keys, e.g. `WAITLIST_HTTP__PORT`).

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::time::Duration;
use waitlist_core::application::WaitlistConfig;
use waitlist_core::domain::{Activity, ActivityCatalog};
use waitlist_core::error::{AppError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "~/.waitlist/waitlist.toml";
const DEFAULT_DB_PATH: &str = "~/.waitlist/waitlist.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub http: HttpSettings,
    pub max_wait_minutes: u64,
    pub sweep_interval_secs: u64,
    pub store_timeout_secs: u64,
    pub log_format: LogFormat,
    #[serde(default = "default_activities")]
    pub activities: Vec<Activity>,
}

fn default_activities() -> Vec<Activity> {
    ActivityCatalog::default().as_slice().to_vec()
}

fn config_error(err: config::ConfigError) -> AppError {
    AppError::Config(err.to_string())
}

impl Settings {
    /// Load settings
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p, true),
            None => (DEFAULT_CONFIG_PATH, false),
        };
        let path = shellexpand::tilde(path).into_owned();

        Self::builder()?
            .add_source(
                File::with_name(&path)
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix("WAITLIST")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(config_error)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Config::builder()
            .set_default("database_url", DEFAULT_DB_PATH)
            .and_then(|b| b.set_default("http.host", "127.0.0.1"))
            .and_then(|b| b.set_default("http.port", 8787))
            .and_then(|b| b.set_default("max_wait_minutes", 20))
            .and_then(|b| b.set_default("sweep_interval_secs", 60))
            .and_then(|b| b.set_default("store_timeout_secs", 5))
            .and_then(|b| b.set_default("log_format", "pretty"))
            .map_err(config_error)
    }

    /// sqlx connection URL, with `~` expanded and the `sqlite://` scheme added
    /// to bare paths
    pub fn database_url(&self) -> String {
        let expanded = shellexpand::tilde(&self.database_url).into_owned();
        if expanded.starts_with("sqlite:") {
            expanded
        } else {
            format!("sqlite://{}", expanded)
        }
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Validate and convert into the core policy
    pub fn waitlist_config(&self) -> Result<WaitlistConfig> {
        if self.max_wait_minutes == 0 {
            return Err(AppError::Config(
                "max_wait_minutes must be greater than 0".to_string(),
            ));
        }
        if self.sweep_interval_secs == 0 {
            return Err(AppError::Config(
                "sweep_interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.store_timeout_secs == 0 {
            return Err(AppError::Config(
                "store_timeout_secs must be greater than 0".to_string(),
            ));
        }

        let catalog = ActivityCatalog::new(self.activities.clone()).map_err(AppError::Config)?;
        let max_wait_ms = i64::try_from(self.max_wait_minutes)
            .ok()
            .and_then(|m| m.checked_mul(60 * 1000))
            .ok_or_else(|| AppError::Config("max_wait_minutes is too large".to_string()))?;

        Ok(WaitlistConfig {
            max_wait_ms,
            catalog,
        })
    }
}
