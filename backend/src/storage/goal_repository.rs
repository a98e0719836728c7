//! # Goal Repository
//!
//! Persists the whole goal collection as a single JSON array under one key of
//! a [`KeyValueStore`]. The stored text uses the field names of [`Goal`]
//! (`id, name, targetAmount, currentAmount, targetDate, icon, color, isSpent,
//! createdAt, history`).
//!
//! ## Loading
//!
//! Loading never fails. An empty slot, unreadable storage, or text that is
//! not a JSON array all produce an empty collection. Each record goes through
//! the [`migration`](super::migration) pipeline and is then decoded; records
//! that still cannot be decoded, or that break the ledger invariants, are
//! skipped so one bad record cannot take the rest of the collection with it.
//!
//! ## Saving
//!
//! Every save serializes the full collection and overwrites the slot. Write
//! errors are returned to the caller untouched; nothing is retried here.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde_json::Value;
use shared::Goal;
use std::collections::HashSet;

use super::migration;
use super::traits::KeyValueStore;

/// Key the collection is stored under unless configured otherwise
pub const DEFAULT_GOALS_KEY: &str = "mysavings_goals";

/// Persistence adapter for the goal collection
pub struct GoalRepository<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> GoalRepository<S> {
    /// Repository using the default key
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_GOALS_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the collection, falling back to an empty one on any read problem
    pub fn load(&self) -> Vec<Goal> {
        match self.try_load() {
            Ok(goals) => {
                info!("Loaded {} goals from '{}'", goals.len(), self.key);
                goals
            }
            Err(e) => {
                warn!("Could not read goals from '{}', starting empty: {:#}", self.key, e);
                Vec::new()
            }
        }
    }

    /// Serialize the full collection and overwrite the stored value
    pub fn save(&self, goals: &[Goal]) -> Result<()> {
        let content = serialize_goals(goals)?;
        self.store
            .set(&self.key, &content)
            .with_context(|| format!("Failed to save goals to '{}'", self.key))?;
        debug!("Saved {} goals to '{}'", goals.len(), self.key);
        Ok(())
    }

    fn try_load(&self) -> Result<Vec<Goal>> {
        let raw = match self.store.get(&self.key)? {
            Some(raw) => raw,
            None => {
                debug!("No stored goals under '{}'", self.key);
                return Ok(Vec::new());
            }
        };
        parse_goals(&raw)
    }
}

/// Compact JSON form of a collection, as written to storage
pub fn serialize_goals(goals: &[Goal]) -> Result<String> {
    serde_json::to_string(goals).context("Failed to serialize goals")
}

/// Parse stored text into goals, migrating legacy records on the way
pub fn parse_goals(raw: &str) -> Result<Vec<Goal>> {
    let value: Value = serde_json::from_str(raw).context("Stored goals are not valid JSON")?;
    let records = migration::migrate_collection(value)
        .ok_or_else(|| anyhow::anyhow!("Stored goals are not a JSON array"))?;

    let mut seen_ids = HashSet::new();
    let mut goals = Vec::with_capacity(records.len());

    for record in records {
        let goal: Goal = match serde_json::from_value(record) {
            Ok(goal) => goal,
            Err(e) => {
                warn!("Failed to parse goal record: {}. Skipping.", e);
                continue;
            }
        };

        if let Err(reason) = check_invariants(&goal) {
            warn!("Skipping goal {}: {}", goal.id, reason);
            continue;
        }
        if !seen_ids.insert(goal.id.clone()) {
            warn!("Skipping duplicate goal id {}", goal.id);
            continue;
        }

        goals.push(goal);
    }

    Ok(goals)
}

fn check_invariants(goal: &Goal) -> Result<(), String> {
    if goal.name.trim().is_empty() {
        return Err("name is empty".to_string());
    }
    if !goal.target_amount.is_finite() || goal.target_amount <= 0.0 {
        return Err(format!("target amount {} is not positive", goal.target_amount));
    }
    if !goal.current_amount.is_finite() || goal.current_amount < 0.0 {
        return Err(format!("current amount {} is negative", goal.current_amount));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::goal::{AmountCommand, CreateGoalCommand};
    use crate::domain::LedgerService;
    use crate::storage::memory_store::MemoryStore;
    use crate::storage::test_utils::TestEnvironment;
    use shared::HistoryEntryType;

    const LEGACY_COLLECTION: &str = r#"[
        {"id":"a1","name":"Bike","targetAmount":300,"currentAmount":20,"isSpent":false,"createdAt":"2025-06-01T10:00:00.000Z","categoryId":"c1"},
        {"id":"a2","name":"Trip","targetAmount":1000,"currentAmount":0,"targetDate":"","isSpent":false,"createdAt":"2025-06-02T10:00:00.000Z","history":null}
    ]"#;

    fn sample_goals() -> Vec<Goal> {
        let ledger = LedgerService::new();
        let outcome = ledger
            .create_goal(&[], CreateGoalCommand::new("Trip", 1000.0))
            .unwrap();
        let id = outcome.event.goal_id().to_string();
        ledger
            .deposit(&outcome.goals, AmountCommand { goal_id: id, amount: 400.0 })
            .unwrap()
            .goals
    }

    #[test]
    fn test_load_absent_key_is_empty() {
        let repository = GoalRepository::new(MemoryStore::new());
        assert!(repository.load().is_empty());
    }

    #[test]
    fn test_load_malformed_content_is_empty() {
        for raw in ["not json", "{\"goals\": []}", "42", ""] {
            let repository = GoalRepository::new(MemoryStore::with_value(DEFAULT_GOALS_KEY, raw));
            assert!(repository.load().is_empty(), "expected empty collection for {:?}", raw);
        }
    }

    #[test]
    fn test_load_migrates_legacy_records() {
        let repository = GoalRepository::new(MemoryStore::with_value(DEFAULT_GOALS_KEY, LEGACY_COLLECTION));

        let goals = repository.load();
        assert_eq!(goals.len(), 2);
        assert_eq!(goals[0].name, "Bike");
        assert_eq!(goals[0].current_amount, 20.0);
        assert!(goals[0].history.is_empty());
        assert!(goals[1].history.is_empty());
        assert_eq!(goals[1].target_date, None);
    }

    #[test]
    fn test_migrated_save_is_stable() {
        let store = MemoryStore::with_value(DEFAULT_GOALS_KEY, LEGACY_COLLECTION);
        let repository = GoalRepository::new(&store);

        repository.save(&repository.load()).unwrap();
        let first_pass = store.raw(DEFAULT_GOALS_KEY).unwrap();
        assert!(!first_pass.contains("categoryId"));

        repository.save(&repository.load()).unwrap();
        let second_pass = store.raw(DEFAULT_GOALS_KEY).unwrap();
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn test_round_trip_preserves_collection() {
        let store = MemoryStore::new();
        let repository = GoalRepository::new(&store);
        let goals = sample_goals();

        repository.save(&goals).unwrap();
        let written = store.raw(DEFAULT_GOALS_KEY).unwrap();
        let loaded = repository.load();
        assert_eq!(loaded, goals);
        assert_eq!(loaded[0].history[0].entry_type, HistoryEntryType::Add);

        repository.save(&loaded).unwrap();
        assert_eq!(store.raw(DEFAULT_GOALS_KEY).unwrap(), written);
    }

    #[test]
    fn test_bad_records_are_skipped() {
        let raw = r#"[
            {"id":"ok","name":"Bike","targetAmount":300,"currentAmount":20,"isSpent":false,"createdAt":"2025-06-01T10:00:00Z"},
            {"id":"neg","name":"Broken","targetAmount":300,"currentAmount":-5,"isSpent":false,"createdAt":"2025-06-01T10:00:00Z"},
            {"id":"zero","name":"Broken","targetAmount":0,"currentAmount":0,"isSpent":false,"createdAt":"2025-06-01T10:00:00Z"},
            {"id":"nodate","name":"Broken","targetAmount":10,"currentAmount":0,"isSpent":false},
            {"id":"ok","name":"Duplicate","targetAmount":10,"currentAmount":0,"isSpent":false,"createdAt":"2025-06-01T10:00:00Z"}
        ]"#;

        let goals = parse_goals(raw).unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].name, "Bike");
    }

    #[test]
    fn test_save_failure_propagates() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        let repository = GoalRepository::new(&store);

        let result = repository.save(&sample_goals());
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("Failed to save goals"));
        assert_eq!(store.raw(DEFAULT_GOALS_KEY), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let env = TestEnvironment::new().expect("Failed to create test environment");
        let repository = GoalRepository::new(env.store.clone());
        let goals = sample_goals();

        repository.save(&goals).unwrap();
        assert!(env.base_directory().join("mysavings_goals.json").exists());

        let reopened = GoalRepository::new(env.store.clone());
        assert_eq!(reopened.load(), goals);
    }
}
