//! State container for a user's goals.
//!
//! [`GoalTracker`] owns the in-memory goal collection and the repository it
//! came from. Each mutating method runs one ledger operation; when the ledger
//! accepts it, the in-memory collection is replaced first and the full
//! collection is then written through to storage. A rejected operation
//! writes nothing.
//!
//! If the write fails the in-memory collection keeps the change and the
//! caller receives [`TrackerError::StorageWrite`]. It can then retry with
//! [`GoalTracker::save`] or drop the change with [`GoalTracker::reload`].

use log::{error, info};
use shared::{Goal, GoalSummary, HistoryEntry};

use crate::domain::commands::goal::{AmountCommand, CreateGoalCommand, UpdateGoalMetadataCommand};
use crate::domain::{
    find_goal, goal_history, LedgerError, LedgerEvent, LedgerOutcome, LedgerService, SummaryService,
};
use crate::storage::{GoalRepository, KeyValueStore};

/// Yes/no decision point for destructive operations
pub trait Confirmation {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirmation for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// The change is live in memory but could not be persisted
    #[error("Change applied but not saved: {cause:#}")]
    StorageWrite {
        event: LedgerEvent,
        cause: anyhow::Error,
    },
    #[error("Cancelled")]
    Cancelled,
}

pub struct GoalTracker<S: KeyValueStore> {
    goals: Vec<Goal>,
    repository: GoalRepository<S>,
    ledger: LedgerService,
}

impl<S: KeyValueStore> GoalTracker<S> {
    /// Load the stored collection and take ownership of it
    pub fn open(repository: GoalRepository<S>) -> Self {
        Self::with_ledger(repository, LedgerService::new())
    }

    pub fn with_ledger(repository: GoalRepository<S>, ledger: LedgerService) -> Self {
        let goals = repository.load();
        Self {
            goals,
            repository,
            ledger,
        }
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn goal(&self, goal_id: &str) -> Result<&Goal, LedgerError> {
        find_goal(&self.goals, goal_id)
    }

    pub fn history(&self, goal_id: &str) -> Result<&[HistoryEntry], LedgerError> {
        goal_history(&self.goals, goal_id)
    }

    pub fn summary(&self) -> GoalSummary {
        SummaryService::new().summarize(&self.goals)
    }

    pub fn repository(&self) -> &GoalRepository<S> {
        &self.repository
    }

    pub fn create_goal(&mut self, command: CreateGoalCommand) -> Result<LedgerEvent, TrackerError> {
        let outcome = self.ledger.create_goal(&self.goals, command)?;
        self.commit(outcome)
    }

    pub fn deposit(&mut self, goal_id: &str, amount: f64) -> Result<LedgerEvent, TrackerError> {
        let outcome = self.ledger.deposit(&self.goals, amount_command(goal_id, amount))?;
        self.commit(outcome)
    }

    pub fn withdraw(&mut self, goal_id: &str, amount: f64) -> Result<LedgerEvent, TrackerError> {
        let outcome = self.ledger.withdraw(&self.goals, amount_command(goal_id, amount))?;
        self.commit(outcome)
    }

    /// Archive a goal once the user agrees
    pub fn mark_spent(
        &mut self,
        goal_id: &str,
        confirmation: &dyn Confirmation,
    ) -> Result<LedgerEvent, TrackerError> {
        let outcome = self.ledger.mark_spent(&self.goals, goal_id)?;
        let prompt = match &outcome.event {
            LedgerEvent::MarkedSpent { name, amount, .. } => {
                format!("Mark '{}' as spent? {:.2} will be archived.", name, amount)
            }
            _ => format!("Mark goal {} as spent?", goal_id),
        };
        if !confirmation.confirm(&prompt) {
            info!("Marking goal {} as spent was cancelled", goal_id);
            return Err(TrackerError::Cancelled);
        }
        self.commit(outcome)
    }

    pub fn update_goal_metadata(
        &mut self,
        command: UpdateGoalMetadataCommand,
    ) -> Result<LedgerEvent, TrackerError> {
        let outcome = self.ledger.update_goal_metadata(&self.goals, command)?;
        self.commit(outcome)
    }

    /// Delete a goal and its history once the user agrees
    pub fn delete_goal(
        &mut self,
        goal_id: &str,
        confirmation: &dyn Confirmation,
    ) -> Result<LedgerEvent, TrackerError> {
        let outcome = self.ledger.delete_goal(&self.goals, goal_id)?;
        let prompt = match &outcome.event {
            LedgerEvent::GoalDeleted { name, .. } => {
                format!("Delete '{}' and its entire history?", name)
            }
            _ => format!("Delete goal {}?", goal_id),
        };
        if !confirmation.confirm(&prompt) {
            info!("Deleting goal {} was cancelled", goal_id);
            return Err(TrackerError::Cancelled);
        }
        self.commit(outcome)
    }

    /// Write the current in-memory collection again
    pub fn save(&self) -> anyhow::Result<()> {
        self.repository.save(&self.goals)
    }

    /// Replace the in-memory collection with what storage holds
    pub fn reload(&mut self) {
        self.goals = self.repository.load();
    }

    fn commit(&mut self, outcome: LedgerOutcome) -> Result<LedgerEvent, TrackerError> {
        self.goals = outcome.goals;
        match self.repository.save(&self.goals) {
            Ok(()) => Ok(outcome.event),
            Err(cause) => {
                error!("Failed to persist goals after {:?}: {:#}", outcome.event, cause);
                Err(TrackerError::StorageWrite {
                    event: outcome.event,
                    cause,
                })
            }
        }
    }
}

fn amount_command(goal_id: &str, amount: f64) -> AmountCommand {
    AmountCommand {
        goal_id: goal_id.to_string(),
        amount,
    }
}
