use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single savings objective.
///
/// The serialized shape of this struct is the storage format: field names are
/// camelCase and absent optional fields are omitted rather than written as
/// `null`, so saving a loaded collection reproduces the same text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Opaque identifier, assigned at creation and never reused
    pub id: String,
    /// Display name (stored trimmed, never empty)
    pub name: String,
    /// Amount the user intends to accumulate (always positive)
    pub target_amount: f64,
    /// Amount accumulated so far (never negative, may exceed the target)
    pub current_amount: f64,
    /// Informational deadline, not enforced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Once true the goal is archived and its balance is frozen
    pub is_spent: bool,
    pub created_at: DateTime<Utc>,
    /// Ledger transactions, oldest first
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl Goal {
    /// Generate a fresh goal id
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Whether deposits and withdrawals are still accepted
    pub fn is_active(&self) -> bool {
        !self.is_spent
    }
}

/// One ledger transaction against a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    /// Magnitude of the transaction, never a signed delta
    pub amount: f64,
    #[serde(rename = "type")]
    pub entry_type: HistoryEntryType,
}

impl HistoryEntry {
    /// Generate a fresh history entry id
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Kind of ledger transaction recorded in a goal's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryEntryType {
    /// Money deposited into the goal
    Add,
    /// Money withdrawn from the goal
    Subtract,
    /// Archival entry recording the balance when the goal was closed
    Spent,
}

impl fmt::Display for HistoryEntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HistoryEntryType::Add => "add",
            HistoryEntryType::Subtract => "subtract",
            HistoryEntryType::Spent => "spent",
        };
        f.pad(label)
    }
}

impl HistoryEntryType {
    pub fn from_string(s: &str) -> Result<Self, String> {
        match s {
            "add" => Ok(HistoryEntryType::Add),
            "subtract" => Ok(HistoryEntryType::Subtract),
            "spent" => Ok(HistoryEntryType::Spent),
            _ => Err(format!("Invalid history entry type: {}", s)),
        }
    }
}

/// Aggregates computed over a goal collection. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSummary {
    /// Sum of `current_amount` over active goals
    pub total_saved: f64,
    /// Sum of `target_amount` over active goals
    pub total_target: f64,
    /// Sum of `current_amount` over spent goals
    pub total_spent: f64,
    pub active_count: usize,
    pub spent_count: usize,
    /// Overall progress of active goals, capped at 100
    pub progress_percent: f64,
}
