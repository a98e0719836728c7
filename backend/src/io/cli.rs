//! Command-line front end for the savings tracker.
//!
//! This is a thin caller around [`GoalTracker`]: it turns arguments into
//! ledger commands, asks for confirmation before destructive operations and
//! prints a short notice for every outcome.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use log::warn;
use shared::Goal;
use std::path::PathBuf;

use crate::domain::commands::goal::{CreateGoalCommand, UpdateGoalMetadataCommand};
use crate::domain::{progress_percent, ExportService, LedgerError, LedgerEvent};
use crate::storage::KeyValueStore;
use crate::tracker::{Confirmation, GoalTracker, TrackerError};

#[derive(Parser, Debug)]
#[command(name = "savings-tracker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Track savings goals on this device", long_about = None)]
pub struct Cli {
    /// Data directory (defaults to MYSAVINGS_DATA_DIR, then ~/Documents/My Savings)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Do not ask for confirmation before spending or deleting a goal
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List goals with their progress
    List {
        /// Include spent goals
        #[arg(short, long)]
        all: bool,
    },

    /// Create a new goal
    Create {
        name: String,
        target: f64,

        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        icon: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },

    /// Add money to a goal
    Deposit { goal: String, amount: f64 },

    /// Take money out of a goal
    Withdraw { goal: String, amount: f64 },

    /// Mark a goal as spent (archives it)
    Spend { goal: String },

    /// Change a goal's name, target or appearance
    Update {
        goal: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        target: Option<f64>,

        /// Target date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_date")]
        date: Option<NaiveDate>,

        #[arg(long)]
        clear_date: bool,

        #[arg(long, conflicts_with = "clear_icon")]
        icon: Option<String>,

        #[arg(long)]
        clear_icon: bool,

        #[arg(long, conflicts_with = "clear_color")]
        color: Option<String>,

        #[arg(long)]
        clear_color: bool,
    },

    /// Delete a goal and its history
    Delete { goal: String },

    /// Show the transaction history of a goal
    History { goal: String },

    /// Show totals over active goals
    Summary,

    /// Export transaction history as CSV
    Export {
        /// Only export this goal
        #[arg(long)]
        goal: Option<String>,

        /// Write to this file instead of stdout; a directory gets a dated file name
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Commands {
    /// Whether the command can change stored goals
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Commands::Create { .. }
                | Commands::Deposit { .. }
                | Commands::Withdraw { .. }
                | Commands::Spend { .. }
                | Commands::Update { .. }
                | Commands::Delete { .. }
        )
    }
}

/// Asks on the terminal, defaulting to "no"
pub struct TerminalConfirmation;

impl Confirmation for TerminalConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        match Confirm::new().with_prompt(prompt).default(false).interact() {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Could not read confirmation: {}", e);
                false
            }
        }
    }
}

/// Confirms everything, for `--yes`
pub struct AssumeYes;

impl Confirmation for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Run one command against the tracker
pub fn run<S: KeyValueStore>(
    command: Commands,
    tracker: &mut GoalTracker<S>,
    confirmation: &dyn Confirmation,
) -> Result<()> {
    match command {
        Commands::List { all } => {
            let goals: Vec<&Goal> = tracker
                .goals()
                .iter()
                .filter(|goal| all || !goal.is_spent)
                .collect();
            if goals.is_empty() {
                println!("No goals yet.");
            }
            for goal in goals {
                println!("{}", goal_line(goal));
            }
            Ok(())
        }
        Commands::Create {
            name,
            target,
            date,
            icon,
            color,
        } => {
            let command = CreateGoalCommand {
                name,
                target_amount: target,
                target_date: date,
                icon,
                color,
            };
            report(tracker.create_goal(command))
        }
        Commands::Deposit { goal, amount } => {
            let goal_id = resolve_goal_id(tracker.goals(), &goal)?;
            report(tracker.deposit(&goal_id, amount))
        }
        Commands::Withdraw { goal, amount } => {
            let goal_id = resolve_goal_id(tracker.goals(), &goal)?;
            report(tracker.withdraw(&goal_id, amount))
        }
        Commands::Spend { goal } => {
            let goal_id = resolve_goal_id(tracker.goals(), &goal)?;
            report(tracker.mark_spent(&goal_id, confirmation))
        }
        Commands::Update {
            goal,
            name,
            target,
            date,
            clear_date,
            icon,
            clear_icon,
            color,
            clear_color,
        } => {
            let goal_id = resolve_goal_id(tracker.goals(), &goal)?;
            let command = UpdateGoalMetadataCommand {
                goal_id,
                name,
                target_amount: target,
                target_date: clearable(date, clear_date),
                icon: clearable(icon, clear_icon),
                color: clearable(color, clear_color),
            };
            if command.is_empty() {
                println!("Nothing to update.");
                return Ok(());
            }
            report(tracker.update_goal_metadata(command))
        }
        Commands::Delete { goal } => {
            let goal_id = resolve_goal_id(tracker.goals(), &goal)?;
            report(tracker.delete_goal(&goal_id, confirmation))
        }
        Commands::History { goal } => {
            let goal_id = resolve_goal_id(tracker.goals(), &goal)?;
            let history = tracker.history(&goal_id)?;
            if history.is_empty() {
                println!("No transactions yet.");
            }
            for entry in history {
                println!(
                    "{}  {:<8}  {:>10.2}",
                    entry.date.format("%Y-%m-%d %H:%M"),
                    entry.entry_type,
                    entry.amount
                );
            }
            Ok(())
        }
        Commands::Summary => {
            let summary = tracker.summary();
            println!("Active goals: {}", summary.active_count);
            println!("Spent goals:  {}", summary.spent_count);
            println!(
                "Saved:        {:.2} of {:.2} ({:.0}%)",
                summary.total_saved, summary.total_target, summary.progress_percent
            );
            println!("Spent total:  {:.2}", summary.total_spent);
            Ok(())
        }
        Commands::Export { goal, output } => {
            let export = ExportService::new();
            let selected = match goal {
                Some(goal) => Some(tracker.goal(&resolve_goal_id(tracker.goals(), &goal)?)?),
                None => None,
            };
            let csv = match selected {
                Some(goal) => export.export_goal_history_csv(tracker.goals(), &goal.id)?,
                None => export.export_all_history_csv(tracker.goals())?,
            };
            match output {
                Some(output) => {
                    let path = export_path(output, &export.export_filename(selected));
                    std::fs::write(&path, csv)?;
                    println!("Exported history to {}", path.display());
                }
                None => print!("{}", csv),
            }
            Ok(())
        }
    }
}

/// Print the notice for an outcome. Ledger rejections and cancellations are
/// expected and only reported; a failed save is an error.
fn report(result: Result<LedgerEvent, TrackerError>) -> Result<()> {
    match result {
        Ok(event) => {
            println!("{}", notice(&event));
            Ok(())
        }
        Err(TrackerError::Cancelled) => {
            println!("Cancelled.");
            Ok(())
        }
        Err(TrackerError::Ledger(e)) => {
            println!("{}", rejection_notice(&e));
            Ok(())
        }
        Err(e @ TrackerError::StorageWrite { .. }) => Err(e.into()),
    }
}

/// Short message describing an accepted operation
pub fn notice(event: &LedgerEvent) -> String {
    match event {
        LedgerEvent::GoalCreated {
            name, target_amount, ..
        } => format!("Created goal '{}' with a target of {:.2}", name, target_amount),
        LedgerEvent::Deposited {
            name,
            amount,
            balance,
            ..
        } => format!("Added {:.2} to '{}' (balance {:.2})", amount, name, balance),
        LedgerEvent::Withdrawn {
            name,
            amount,
            balance,
            ..
        } => format!("Withdrew {:.2} from '{}' (balance {:.2})", amount, name, balance),
        LedgerEvent::MarkedSpent { name, amount, .. } => {
            format!("Marked '{}' as spent ({:.2})", name, amount)
        }
        LedgerEvent::MetadataUpdated { name, .. } => format!("Updated '{}'", name),
        LedgerEvent::GoalDeleted { name, .. } => format!("Deleted '{}'", name),
    }
}

/// Short message describing a rejected operation
pub fn rejection_notice(error: &LedgerError) -> String {
    match error {
        LedgerError::InsufficientFunds { available, .. } => {
            format!("Not enough saved: only {:.2} available", available)
        }
        LedgerError::AlreadySpent { .. } => "That goal has already been spent".to_string(),
        other => other.to_string(),
    }
}

/// Find a goal by exact id, unique id prefix or case-insensitive name
pub fn resolve_goal_id(goals: &[Goal], query: &str) -> Result<String, LedgerError> {
    if let Some(goal) = goals.iter().find(|goal| goal.id == query) {
        return Ok(goal.id.clone());
    }

    let by_prefix: Vec<&Goal> = goals.iter().filter(|goal| goal.id.starts_with(query)).collect();
    if by_prefix.len() == 1 && !query.is_empty() {
        return Ok(by_prefix[0].id.clone());
    }

    let by_name: Vec<&Goal> = goals
        .iter()
        .filter(|goal| goal.name.eq_ignore_ascii_case(query.trim()))
        .collect();
    match by_name.as_slice() {
        [goal] => Ok(goal.id.clone()),
        [] => Err(LedgerError::not_found(query)),
        _ => Err(LedgerError::validation(format!(
            "Several goals are named '{}', use the goal id instead",
            query.trim()
        ))),
    }
}

fn goal_line(goal: &Goal) -> String {
    let short_id: String = goal.id.chars().take(8).collect();
    let mut line = format!(
        "{}  {}{}  {:.2} / {:.2} ({:.0}%)",
        short_id,
        goal.icon.as_deref().map(|icon| format!("{} ", icon)).unwrap_or_default(),
        goal.name,
        goal.current_amount,
        goal.target_amount,
        progress_percent(goal)
    );
    if let Some(date) = goal.target_date {
        line.push_str(&format!("  by {}", date));
    }
    if goal.is_spent {
        line.push_str("  [spent]");
    }
    line
}

/// An existing directory receives the suggested file name
fn export_path(output: PathBuf, suggested_name: &str) -> PathBuf {
    if output.is_dir() {
        output.join(suggested_name)
    } else {
        output
    }
}

fn clearable<T>(value: Option<T>, clear: bool) -> Option<Option<T>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{GoalRepository, MemoryStore};

    fn goal(id: &str, name: &str) -> Goal {
        Goal {
            id: id.to_string(),
            name: name.to_string(),
            target_amount: 100.0,
            current_amount: 0.0,
            target_date: None,
            icon: None,
            color: None,
            is_spent: false,
            created_at: "2026-01-01T00:00:00Z".parse().unwrap(),
            history: Vec::new(),
        }
    }

    #[test]
    fn test_resolve_goal_id() {
        let goals = vec![goal("abc123", "Trip"), goal("abd456", "Bike"), goal("fff000", "bike")];

        assert_eq!(resolve_goal_id(&goals, "abc123").unwrap(), "abc123");
        assert_eq!(resolve_goal_id(&goals, "abd").unwrap(), "abd456");
        assert_eq!(resolve_goal_id(&goals, "trip").unwrap(), "abc123");
        assert!(matches!(resolve_goal_id(&goals, "ab"), Err(LedgerError::NotFound { .. })));
        assert!(matches!(resolve_goal_id(&goals, "BIKE"), Err(LedgerError::Validation(_))));
    }

    #[test]
    fn test_notices() {
        let event = LedgerEvent::Withdrawn {
            goal_id: "g1".to_string(),
            name: "Trip".to_string(),
            amount: 25.0,
            balance: 75.0,
        };
        assert_eq!(notice(&event), "Withdrew 25.00 from 'Trip' (balance 75.00)");

        let error = LedgerError::InsufficientFunds {
            goal_id: "g1".to_string(),
            requested: 100.0,
            available: 75.0,
        };
        assert_eq!(rejection_notice(&error), "Not enough saved: only 75.00 available");
    }

    #[test]
    fn test_parse_update_arguments() {
        let cli = Cli::try_parse_from([
            "savings-tracker",
            "update",
            "trip",
            "--target",
            "1200",
            "--clear-icon",
        ])
        .unwrap();

        match cli.command {
            Commands::Update {
                goal,
                target,
                clear_icon,
                icon,
                ..
            } => {
                assert_eq!(goal, "trip");
                assert_eq!(target, Some(1200.0));
                assert!(clear_icon);
                assert_eq!(clearable(icon, clear_icon), Some(None));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_bad_date() {
        let result = Cli::try_parse_from(["savings-tracker", "create", "Trip", "1000", "--date", "soon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_commands_against_memory_store() {
        let store = MemoryStore::new();
        let mut tracker = GoalTracker::open(GoalRepository::new(&store));

        let create = Cli::try_parse_from(["savings-tracker", "create", "Trip", "1000"]).unwrap();
        assert!(create.command.is_mutation());
        run(create.command, &mut tracker, &AssumeYes).unwrap();

        let deposit = Cli::try_parse_from(["savings-tracker", "deposit", "trip", "400"]).unwrap();
        run(deposit.command, &mut tracker, &AssumeYes).unwrap();

        // Rejections are reported, not failures
        let withdraw = Cli::try_parse_from(["savings-tracker", "withdraw", "trip", "900"]).unwrap();
        run(withdraw.command, &mut tracker, &AssumeYes).unwrap();

        let spend = Cli::try_parse_from(["savings-tracker", "--yes", "spend", "Trip"]).unwrap();
        run(spend.command, &mut tracker, &AssumeYes).unwrap();

        assert_eq!(tracker.goals()[0].current_amount, 400.0);
        assert!(tracker.goals()[0].is_spent);
        assert_eq!(store.write_count(), 3);
    }

    #[test]
    fn test_export_to_directory_uses_suggested_name() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = MemoryStore::new();
        let mut tracker = GoalTracker::open(GoalRepository::new(&store));
        let create = Cli::try_parse_from(["savings-tracker", "create", "Summer Trip", "1000"]).unwrap();
        run(create.command, &mut tracker, &AssumeYes).unwrap();

        let output = dir.path().to_str().unwrap();
        let export = Cli::try_parse_from(["savings-tracker", "export", "--goal", "summer trip", "-o", output]).unwrap();
        run(export.command, &mut tracker, &AssumeYes).unwrap();

        let files: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].starts_with("summer_trip_history_"));

        let file = dir.path().join("all.csv");
        assert_eq!(export_path(file.clone(), "ignored.csv"), file);
    }

    #[test]
    fn test_failed_save_is_an_error() {
        let store = MemoryStore::new();
        let mut tracker = GoalTracker::open(GoalRepository::new(&store));
        store.set_fail_writes(true);

        let create = Cli::try_parse_from(["savings-tracker", "create", "Trip", "1000"]).unwrap();
        assert!(run(create.command, &mut tracker, &AssumeYes).is_err());
    }
}
