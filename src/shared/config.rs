//! Application configuration. Storage paths, defaults for prompts and seeding.
//!
//! Sources, lowest precedence first: built-in defaults, optional file named by
//! `LEDGER_CONFIG`, environment variables prefixed `LEDGER_` (a `.env` file is loaded first).

use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_DATABASE_FILE: &str = "ledger.db";
pub const DEFAULT_RECENT_DAYS: u32 = 7;
pub const DEFAULT_REPORT_DAYS: u32 = 30;
pub const DEFAULT_SEED_CLIENTS: usize = 10;

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory holding the database and exported reports. Read from LEDGER_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,

    /// Database file name inside `data_dir`. Read from LEDGER_DATABASE_FILE.
    #[serde(default)]
    pub database_file: Option<String>,

    /// Rate offered when adding a project. Read from LEDGER_DEFAULT_HOURLY_RATE.
    #[serde(default)]
    pub default_hourly_rate: Option<f64>,

    /// Window for the recent time entries view. Read from LEDGER_RECENT_DAYS.
    #[serde(default)]
    pub recent_days: Option<u32>,

    /// Window offered for period reports. Read from LEDGER_REPORT_DAYS.
    #[serde(default)]
    pub report_days: Option<u32>,

    // ─────────────────────────────────────────────────────────────────────────
    // Sample data
    // ─────────────────────────────────────────────────────────────────────────
    /// Number of clients generated by the seeder. Read from LEDGER_SEED_CLIENTS.
    #[serde(default)]
    pub seed_clients: Option<usize>,

    /// Fixed RNG seed for reproducible sample data. Read from LEDGER_SEED_RNG.
    #[serde(default)]
    pub seed_rng: Option<u64>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        if let Ok(path) = std::env::var("LEDGER_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c = c.add_source(config::Environment::with_prefix("LEDGER").try_parsing(true));
        Self::from_builder(c)
    }

    pub fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, config::ConfigError> {
        builder.build()?.try_deserialize()
    }

    pub fn data_dir_or_default(&self) -> PathBuf {
        PathBuf::from(self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR))
    }

    pub fn database_file_or_default(&self) -> String {
        self.database_file
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE_FILE.to_string())
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.data_dir_or_default().join("reports")
    }

    /// Falls back to the domain default when unset or not a positive amount.
    pub fn default_hourly_rate_or_default(&self) -> f64 {
        self.default_hourly_rate
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or(crate::domain::DEFAULT_HOURLY_RATE)
    }

    pub fn recent_days_or_default(&self) -> u32 {
        self.recent_days.unwrap_or(DEFAULT_RECENT_DAYS)
    }

    pub fn report_days_or_default(&self) -> u32 {
        self.report_days.unwrap_or(DEFAULT_REPORT_DAYS)
    }

    pub fn seed_clients_or_default(&self) -> usize {
        self.seed_clients.unwrap_or(DEFAULT_SEED_CLIENTS).max(1)
    }
}
