//! # Storage Module
//!
//! Persistence for the savings tracker.
//!
//! The goal collection is stored as one JSON document under a fixed key of a
//! [`KeyValueStore`]. The domain layer never sees the store; the
//! [`GoalRepository`] loads the collection once at startup and overwrites it
//! after every accepted change.
//!
//! ## Components
//!
//! - **traits**: the get/set storage contract
//! - **connection**: file-per-key store inside the data directory
//! - **memory_store**: in-memory store for embedding and tests
//! - **goal_repository**: load/save of the goal collection
//! - **migration**: forward migration of records written by older versions
//! - **config_repository**: `config.yaml` settings

pub mod config_repository;
pub mod connection;
pub mod goal_repository;
pub mod memory_store;
pub mod migration;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use config_repository::{ConfigRepository, TrackerConfig};
pub use connection::{default_data_directory, FileStore, DATA_DIR_ENV};
pub use goal_repository::{GoalRepository, DEFAULT_GOALS_KEY};
pub use memory_store::MemoryStore;
pub use traits::KeyValueStore;
