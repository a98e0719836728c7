//! # Config Repository
//!
//! Tracker settings live in a single YAML file at the root of the data
//! directory.
//!
//! ## YAML Format
//!
//! ```yaml
//! storage_key: mysavings_goals
//! log_level: warn
//! data_format_version: 4
//! created_at: "2026-01-21T19:30:00Z"
//! updated_at: "2026-01-21T19:35:00Z"
//! ```
//!
//! Missing fields fall back to their defaults, and a missing file is created
//! with defaults on first access.

use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::goal_repository::DEFAULT_GOALS_KEY;
use super::migration;

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Settings for the tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Storage key the goal collection is kept under
    pub storage_key: String,
    /// Default log filter when `RUST_LOG` is not set
    pub log_level: String,
    /// Number of migration steps the stored goals have been through
    pub data_format_version: usize,
    pub created_at: String,
    pub updated_at: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            storage_key: DEFAULT_GOALS_KEY.to_string(),
            log_level: "warn".to_string(),
            data_format_version: migration::current_format_version(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Reads and writes `config.yaml`
#[derive(Debug, Clone)]
pub struct ConfigRepository {
    base_directory: PathBuf,
}

impl ConfigRepository {
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Self {
        Self {
            base_directory: base_directory.as_ref().to_path_buf(),
        }
    }

    fn config_path(&self) -> PathBuf {
        self.base_directory.join(CONFIG_FILE_NAME)
    }

    /// Load the config, creating a default file if there is none
    pub fn load_or_create(&self) -> Result<TrackerConfig> {
        let config_path = self.config_path();

        if config_path.exists() {
            let yaml_content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config: TrackerConfig = serde_yaml::from_str(&yaml_content)
                .with_context(|| format!("Invalid config file {}", config_path.display()))?;
            debug!("Loaded config from {:?}", config_path);
            Ok(config)
        } else {
            let config = TrackerConfig::default();
            self.save(&config)?;
            info!("Created default config at {:?}", config_path);
            Ok(config)
        }
    }

    /// Write the config back, stamping `updated_at`
    pub fn update(&self, config: &TrackerConfig) -> Result<TrackerConfig> {
        let mut updated = config.clone();
        updated.updated_at = Utc::now().to_rfc3339();
        self.save(&updated)?;
        info!("Updated config");
        Ok(updated)
    }

    /// Record that stored goals now match the current migration pipeline
    pub fn record_data_format_version(&self) -> Result<()> {
        let config = self.load_or_create()?;
        let version = migration::current_format_version();
        if config.data_format_version != version {
            info!(
                "Stored goals migrated from format {} to {}",
                config.data_format_version, version
            );
            self.update(&TrackerConfig {
                data_format_version: version,
                ..config
            })?;
        }
        Ok(())
    }

    fn save(&self, config: &TrackerConfig) -> Result<()> {
        if !self.base_directory.exists() {
            fs::create_dir_all(&self.base_directory)?;
            info!("Created data directory: {:?}", self.base_directory);
        }

        let config_path = self.config_path();
        let yaml_content = serde_yaml::to_string(config)?;

        let temp_path = config_path.with_extension("yaml.tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, &config_path)?;

        debug!("Saved config to {:?}", config_path);
        Ok(())
    }
}
