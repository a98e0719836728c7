//! Ledger engine for savings goals.
//!
//! This module holds the rules for how a goal's balance and history evolve.
//! The service is stateless: every operation borrows the current collection,
//! and on success returns a brand new collection alongside a [`LedgerEvent`].
//! The input collection is never modified, so a rejected operation leaves the
//! caller's state exactly as it was.
//!
//! ## Business Rules
//!
//! - Names are trimmed and must not be empty
//! - Target amounts and transaction amounts must be positive and finite
//! - A balance change moves `current_amount` by exactly the recorded amount,
//!   and the resulting balance must stay finite
//! - A withdrawal may not exceed the current balance
//! - Balances may exceed the target (overpayment is allowed)
//! - Every balance change appends exactly one history entry
//! - Spent goals are frozen: no deposits, withdrawals or second archival

use chrono::{DateTime, Utc};
use log::{info, warn};
use shared::{Goal, HistoryEntry, HistoryEntryType};

use crate::domain::commands::goal::{AmountCommand, CreateGoalCommand, UpdateGoalMetadataCommand};
use crate::domain::models::goal::{LedgerError, LedgerEvent, LedgerOutcome};

type Clock = fn() -> DateTime<Utc>;

/// Stateless engine applying ledger operations to a goal collection
#[derive(Clone, Copy)]
pub struct LedgerService {
    clock: Clock,
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerService {
    pub fn new() -> Self {
        Self { clock: Utc::now }
    }

    /// Use a fixed time source, mostly for tests
    pub fn with_clock(clock: Clock) -> Self {
        Self { clock }
    }

    /// Create a new goal and append it to the collection
    pub fn create_goal(
        &self,
        goals: &[Goal],
        command: CreateGoalCommand,
    ) -> Result<LedgerOutcome, LedgerError> {
        let name = validate_name(&command.name).map_err(|e| rejected("create goal", e))?;
        validate_amount(command.target_amount, "Target amount")
            .map_err(|e| rejected("create goal", e))?;

        let goal = Goal {
            id: allocate_goal_id(goals),
            name,
            target_amount: command.target_amount,
            current_amount: 0.0,
            target_date: command.target_date,
            icon: non_blank(command.icon),
            color: non_blank(command.color),
            is_spent: false,
            created_at: (self.clock)(),
            history: Vec::new(),
        };

        info!("Created goal {} ({}) with target {:.2}", goal.id, goal.name, goal.target_amount);

        let event = LedgerEvent::GoalCreated {
            goal_id: goal.id.clone(),
            name: goal.name.clone(),
            target_amount: goal.target_amount,
        };

        let mut next = goals.to_vec();
        next.push(goal);
        Ok(LedgerOutcome { goals: next, event })
    }

    /// Add money to an active goal
    pub fn deposit(
        &self,
        goals: &[Goal],
        command: AmountCommand,
    ) -> Result<LedgerOutcome, LedgerError> {
        let index = find_index(goals, &command.goal_id).map_err(|e| rejected("deposit", e))?;
        validate_amount(command.amount, "Deposit amount").map_err(|e| rejected("deposit", e))?;
        ensure_active(&goals[index]).map_err(|e| rejected("deposit", e))?;

        let balance = goals[index].current_amount + command.amount;
        if !balance.is_finite() {
            return Err(rejected(
                "deposit",
                LedgerError::validation("Deposit would make the balance too large"),
            ));
        }

        let mut next = goals.to_vec();
        let goal = &mut next[index];
        goal.current_amount = balance;
        goal.history.push(self.history_entry(HistoryEntryType::Add, command.amount));

        info!(
            "Deposited {:.2} into goal {}, balance now {:.2}",
            command.amount, goal.id, goal.current_amount
        );

        let event = LedgerEvent::Deposited {
            goal_id: goal.id.clone(),
            name: goal.name.clone(),
            amount: command.amount,
            balance: goal.current_amount,
        };
        Ok(LedgerOutcome { goals: next, event })
    }

    /// Take money out of an active goal, never below zero
    pub fn withdraw(
        &self,
        goals: &[Goal],
        command: AmountCommand,
    ) -> Result<LedgerOutcome, LedgerError> {
        let index = find_index(goals, &command.goal_id).map_err(|e| rejected("withdraw", e))?;
        validate_amount(command.amount, "Withdrawal amount").map_err(|e| rejected("withdraw", e))?;
        let current = &goals[index];
        ensure_active(current).map_err(|e| rejected("withdraw", e))?;

        if command.amount > current.current_amount {
            return Err(rejected(
                "withdraw",
                LedgerError::InsufficientFunds {
                    goal_id: current.id.clone(),
                    requested: command.amount,
                    available: current.current_amount,
                },
            ));
        }

        let mut next = goals.to_vec();
        let goal = &mut next[index];
        goal.current_amount -= command.amount;
        goal.history.push(self.history_entry(HistoryEntryType::Subtract, command.amount));

        info!(
            "Withdrew {:.2} from goal {}, balance now {:.2}",
            command.amount, goal.id, goal.current_amount
        );

        let event = LedgerEvent::Withdrawn {
            goal_id: goal.id.clone(),
            name: goal.name.clone(),
            amount: command.amount,
            balance: goal.current_amount,
        };
        Ok(LedgerOutcome { goals: next, event })
    }

    /// Archive a goal, recording its balance in a `spent` history entry.
    ///
    /// The balance itself is left in place and frozen. Asking the user for
    /// confirmation is the caller's job.
    pub fn mark_spent(&self, goals: &[Goal], goal_id: &str) -> Result<LedgerOutcome, LedgerError> {
        let index = find_index(goals, goal_id).map_err(|e| rejected("mark spent", e))?;
        ensure_active(&goals[index]).map_err(|e| rejected("mark spent", e))?;

        let mut next = goals.to_vec();
        let goal = &mut next[index];
        let amount = goal.current_amount;
        goal.history.push(self.history_entry(HistoryEntryType::Spent, amount));
        goal.is_spent = true;

        info!("Marked goal {} as spent with {:.2}", goal.id, amount);

        let event = LedgerEvent::MarkedSpent {
            goal_id: goal.id.clone(),
            name: goal.name.clone(),
            amount,
        };
        Ok(LedgerOutcome { goals: next, event })
    }

    /// Change a goal's descriptive fields without touching its balance or history
    pub fn update_goal_metadata(
        &self,
        goals: &[Goal],
        command: UpdateGoalMetadataCommand,
    ) -> Result<LedgerOutcome, LedgerError> {
        let index = find_index(goals, &command.goal_id).map_err(|e| rejected("update goal", e))?;

        let mut updated = goals[index].clone();
        if let Some(name) = command.name {
            updated.name = validate_name(&name).map_err(|e| rejected("update goal", e))?;
        }
        if let Some(target_amount) = command.target_amount {
            validate_amount(target_amount, "Target amount").map_err(|e| rejected("update goal", e))?;
            updated.target_amount = target_amount;
        }
        if let Some(target_date) = command.target_date {
            updated.target_date = target_date;
        }
        if let Some(icon) = command.icon {
            updated.icon = non_blank(icon);
        }
        if let Some(color) = command.color {
            updated.color = non_blank(color);
        }

        info!("Updated metadata of goal {}", updated.id);

        let event = LedgerEvent::MetadataUpdated {
            goal_id: updated.id.clone(),
            name: updated.name.clone(),
        };

        let mut next = goals.to_vec();
        next[index] = updated;
        Ok(LedgerOutcome { goals: next, event })
    }

    /// Remove a goal together with its whole history
    pub fn delete_goal(&self, goals: &[Goal], goal_id: &str) -> Result<LedgerOutcome, LedgerError> {
        let index = find_index(goals, goal_id).map_err(|e| rejected("delete goal", e))?;

        let mut next = goals.to_vec();
        let removed = next.remove(index);

        info!(
            "Deleted goal {} ({}) with {} history entries",
            removed.id,
            removed.name,
            removed.history.len()
        );

        let event = LedgerEvent::GoalDeleted {
            goal_id: removed.id,
            name: removed.name,
        };
        Ok(LedgerOutcome { goals: next, event })
    }

    fn history_entry(&self, entry_type: HistoryEntryType, amount: f64) -> HistoryEntry {
        HistoryEntry {
            id: HistoryEntry::generate_id(),
            date: (self.clock)(),
            amount,
            entry_type,
        }
    }
}

/// Look up a goal by id
pub fn find_goal<'a>(goals: &'a [Goal], goal_id: &str) -> Result<&'a Goal, LedgerError> {
    goals
        .iter()
        .find(|goal| goal.id == goal_id)
        .ok_or_else(|| LedgerError::not_found(goal_id))
}

/// Transaction history of a goal, oldest first
pub fn goal_history<'a>(goals: &'a [Goal], goal_id: &str) -> Result<&'a [HistoryEntry], LedgerError> {
    find_goal(goals, goal_id).map(|goal| goal.history.as_slice())
}

/// Goals still accepting deposits and withdrawals
pub fn active_goals(goals: &[Goal]) -> impl Iterator<Item = &Goal> {
    goals.iter().filter(|goal| !goal.is_spent)
}

/// Archived goals
pub fn spent_goals(goals: &[Goal]) -> impl Iterator<Item = &Goal> {
    goals.iter().filter(|goal| goal.is_spent)
}

fn find_index(goals: &[Goal], goal_id: &str) -> Result<usize, LedgerError> {
    goals
        .iter()
        .position(|goal| goal.id == goal_id)
        .ok_or_else(|| LedgerError::not_found(goal_id))
}

fn ensure_active(goal: &Goal) -> Result<(), LedgerError> {
    if goal.is_spent {
        return Err(LedgerError::already_spent(&goal.id));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<String, LedgerError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::validation("Goal name cannot be empty"));
    }
    Ok(trimmed.to_string())
}

fn validate_amount(amount: f64, label: &str) -> Result<(), LedgerError> {
    if !amount.is_finite() {
        return Err(LedgerError::validation(format!("{} must be a number", label)));
    }
    if amount <= 0.0 {
        return Err(LedgerError::validation(format!("{} must be positive", label)));
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn allocate_goal_id(goals: &[Goal]) -> String {
    loop {
        let id = Goal::generate_id();
        if goals.iter().all(|goal| goal.id != id) {
            return id;
        }
    }
}

fn rejected(operation: &str, error: LedgerError) -> LedgerError {
    warn!("Rejected {}: {}", operation, error);
    error
}
