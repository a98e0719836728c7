/// Test utilities for file-backed storage
///
/// Provides a temporary data directory that is removed when the environment
/// is dropped, even if the test panics.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::connection::FileStore;
use super::goal_repository::{GoalRepository, DEFAULT_GOALS_KEY};

/// RAII test environment around a temporary data directory
pub struct TestEnvironment {
    /// Kept alive so the directory survives until drop
    _temp_dir: TempDir,
    pub store: FileStore,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let store = FileStore::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            store,
            base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_path
    }

    pub fn goal_repository(&self) -> GoalRepository<FileStore> {
        GoalRepository::new(self.store.clone())
    }

    /// Write raw text into the goals slot, bypassing the repository
    pub fn write_raw_goals(&self, content: &str) -> Result<()> {
        std::fs::write(self.store.key_path(DEFAULT_GOALS_KEY)?, content)?;
        Ok(())
    }
}

impl Drop for TestEnvironment {
    fn drop(&mut self) {
        if std::env::var("MYSAVINGS_DEBUG_TESTS").is_ok() {
            println!("Cleaning up test environment: {:?}", self.base_path);
        }
    }
}
