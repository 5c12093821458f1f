//! Server configuration
//!
//! All settings can be overridden through environment variables:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | WORK_DIR | /var/lib/kds | Working directory (database, logs) |
//! | KITCHEN_DB_FILE | kitchen.redb | Database file name inside WORK_DIR |
//! | SLA_SWEEP_INTERVAL_SECS | 60 | Period of the SLA breach sweep |
//! | LOG_LEVEL | info | Tracing level filter |

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database and log files
    pub work_dir: String,
    /// Database file name, relative to `work_dir`
    pub db_filename: String,
    /// Period of the background SLA sweep in seconds
    pub sla_sweep_interval_secs: u64,
    /// Tracing level filter: trace | debug | info | warn | error
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/kds".into()),
            db_filename: std::env::var("KITCHEN_DB_FILE").unwrap_or_else(|_| "kitchen.redb".into()),
            sla_sweep_interval_secs: std::env::var("SLA_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
        }
    }

    /// Override the working directory (used by tests)
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    /// Full path of the database file
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(&self.db_filename)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
