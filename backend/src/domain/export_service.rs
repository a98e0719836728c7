//! History export for the savings tracker.
//!
//! Renders goal transaction history as CSV so it can be opened in a
//! spreadsheet. Export only reads the collection.

use anyhow::Result;
use csv::WriterBuilder;
use log::info;
use serde::Serialize;
use shared::Goal;

use crate::domain::ledger_service::find_goal;

/// One CSV row per history entry
#[derive(Debug, Serialize)]
struct HistoryRow<'a> {
    goal_id: &'a str,
    goal_name: &'a str,
    entry_id: &'a str,
    date: String,
    #[serde(rename = "type")]
    entry_type: String,
    amount: String,
}

#[derive(Clone, Default)]
pub struct ExportService;

impl ExportService {
    pub fn new() -> Self {
        Self
    }

    /// Export the history of every goal, goals in collection order
    pub fn export_all_history_csv(&self, goals: &[Goal]) -> Result<String> {
        let content = write_rows(goals.iter())?;
        info!("Exported history of {} goals", goals.len());
        Ok(content)
    }

    /// Export the history of a single goal
    pub fn export_goal_history_csv(&self, goals: &[Goal], goal_id: &str) -> Result<String> {
        let goal = find_goal(goals, goal_id)?;
        let content = write_rows(std::iter::once(goal))?;
        info!("Exported {} history entries of goal {}", goal.history.len(), goal.id);
        Ok(content)
    }

    /// Suggested file name for an export made now
    pub fn export_filename(&self, goal: Option<&Goal>) -> String {
        let date = chrono::Utc::now().format("%Y%m%d");
        match goal {
            Some(goal) => format!(
                "{}_history_{}.csv",
                goal.name.replace(' ', "_").to_lowercase(),
                date
            ),
            None => format!("savings_history_{}.csv", date),
        }
    }
}

fn write_rows<'a>(goals: impl Iterator<Item = &'a Goal>) -> Result<String> {
    // Header is written by hand so an empty export still has one
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(["goal_id", "goal_name", "entry_id", "date", "type", "amount"])?;

    for goal in goals {
        for entry in &goal.history {
            writer.serialize(HistoryRow {
                goal_id: &goal.id,
                goal_name: &goal.name,
                entry_id: &entry.id,
                date: entry.date.to_rfc3339(),
                entry_type: entry.entry_type.to_string(),
                amount: format!("{:.2}", entry.amount),
            })?;
        }
    }

    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("Failed to flush CSV: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}
