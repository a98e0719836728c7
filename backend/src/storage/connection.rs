//! # File Store
//!
//! Key-value storage backed by a data directory. Each key maps to one JSON
//! file:
//!
//! ```text
//! My Savings/
//! ├── config.yaml
//! └── mysavings_goals.json    ← one file per key
//! ```
//!
//! Writes go to a temporary file first and are moved into place with a
//! rename, so a crash mid-write never leaves a half-written slot behind.

use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::traits::KeyValueStore;

/// Environment variable overriding the default data directory
pub const DATA_DIR_ENV: &str = "MYSAVINGS_DATA_DIR";

const DEFAULT_DIRECTORY_NAME: &str = "My Savings";

/// File-per-key store rooted at a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    base_directory: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).with_context(|| {
                format!("Failed to create data directory {}", base_path.display())
            })?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Path of the file holding `key`
    pub fn key_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.base_directory.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => {
                debug!("Read {} bytes from {:?}", content.len(), path);
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, value)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }
}

/// Resolve the data directory: `MYSAVINGS_DATA_DIR` if set, otherwise
/// `My Savings` inside the user's documents (or home) directory
pub fn default_data_directory() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    let parent = dirs::document_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(parent.join(DEFAULT_DIRECTORY_NAME))
}

/// Keys become file names, so only a conservative character set is allowed
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(anyhow::anyhow!("Invalid storage key: {:?}", key));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_key_reads_as_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::new(temp_dir.path()).unwrap();

        assert_eq!(store.get("mysavings_goals").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites_value() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::new(temp_dir.path()).unwrap();

        store.set("mysavings_goals", "[1]").unwrap();
        store.set("mysavings_goals", "[]").unwrap();

        assert_eq!(store.get("mysavings_goals").unwrap().as_deref(), Some("[]"));
        assert!(!temp_dir.path().join("mysavings_goals.json.tmp").exists());
    }

    #[test]
    fn test_creates_missing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let nested = temp_dir.path().join("nested").join("data");

        let store = FileStore::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.base_directory(), nested.as_path());
    }

    #[test]
    fn test_rejects_unsafe_keys() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::new(temp_dir.path()).unwrap();

        assert!(store.get("../escape").is_err());
        assert!(store.set("", "[]").is_err());
    }
}
