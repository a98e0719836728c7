//! Read-only aggregates derived from the goal collection.
//!
//! Nothing here is stored; every figure is recomputed from the goals on
//! demand. Spent goals are excluded from the saved and target totals.

use shared::{Goal, GoalSummary};

/// Progress of a single goal in percent, capped at 100
pub fn progress_percent(goal: &Goal) -> f64 {
    if goal.target_amount <= 0.0 {
        return 0.0;
    }
    (100.0 * goal.current_amount / goal.target_amount).min(100.0)
}

/// How much is still missing to reach the target, never negative
pub fn remaining_amount(goal: &Goal) -> f64 {
    (goal.target_amount - goal.current_amount).max(0.0)
}

/// Sum of balances over active goals
pub fn total_saved(goals: &[Goal]) -> f64 {
    goals
        .iter()
        .filter(|goal| !goal.is_spent)
        .map(|goal| goal.current_amount)
        .sum()
}

/// Sum of targets over active goals
pub fn total_target(goals: &[Goal]) -> f64 {
    goals
        .iter()
        .filter(|goal| !goal.is_spent)
        .map(|goal| goal.target_amount)
        .sum()
}

/// Computes collection-wide aggregates
#[derive(Clone, Default)]
pub struct SummaryService;

impl SummaryService {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize(&self, goals: &[Goal]) -> GoalSummary {
        let total_saved = total_saved(goals);
        let total_target = total_target(goals);
        let (spent, active): (Vec<&Goal>, Vec<&Goal>) = goals.iter().partition(|goal| goal.is_spent);

        let progress_percent = if total_target > 0.0 {
            (100.0 * total_saved / total_target).min(100.0)
        } else {
            0.0
        };

        GoalSummary {
            total_saved,
            total_target,
            total_spent: spent.iter().map(|goal| goal.current_amount).sum(),
            active_count: active.len(),
            spent_count: spent.len(),
            progress_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::goal::{AmountCommand, CreateGoalCommand};
    use crate::domain::LedgerService;

    fn goal(name: &str, target: f64, current: f64, is_spent: bool) -> Goal {
        Goal {
            id: format!("goal::{}", name),
            name: name.to_string(),
            target_amount: target,
            current_amount: current,
            target_date: None,
            icon: None,
            color: None,
            is_spent,
            created_at: "2026-01-01T00:00:00Z".parse().unwrap(),
            history: Vec::new(),
        }
    }

    #[test]
    fn test_progress_percent_is_capped() {
        assert_eq!(progress_percent(&goal("Trip", 1000.0, 250.0, false)), 25.0);
        assert_eq!(progress_percent(&goal("Trip", 1000.0, 1100.0, false)), 100.0);
        assert_eq!(remaining_amount(&goal("Trip", 1000.0, 1100.0, false)), 0.0);
        assert_eq!(remaining_amount(&goal("Trip", 1000.0, 250.0, false)), 750.0);
    }

    #[test]
    fn test_totals_skip_spent_goals() {
        let goals = vec![
            goal("Trip", 1000.0, 400.0, false),
            goal("Bike", 300.0, 150.0, false),
            goal("Console", 500.0, 500.0, true),
        ];

        assert_eq!(total_saved(&goals), 550.0);
        assert_eq!(total_target(&goals), 1300.0);

        let summary = SummaryService::new().summarize(&goals);
        assert_eq!(summary.active_count, 2);
        assert_eq!(summary.spent_count, 1);
        assert_eq!(summary.total_spent, 500.0);
        assert!((summary.progress_percent - 550.0 / 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_collection_summary() {
        let summary = SummaryService::new().summarize(&[]);
        assert_eq!(summary.total_saved, 0.0);
        assert_eq!(summary.total_target, 0.0);
        assert_eq!(summary.progress_percent, 0.0);
    }

    #[test]
    fn test_trip_scenario_totals() {
        let ledger = LedgerService::new();
        let outcome = ledger.create_goal(&[], CreateGoalCommand::new("Trip", 1000.0)).unwrap();
        let id = outcome.event.goal_id().to_string();
        let mut goals = outcome.goals;
        for amount in [400.0, 700.0] {
            goals = ledger
                .deposit(&goals, AmountCommand { goal_id: id.clone(), amount })
                .unwrap()
                .goals;
        }

        assert_eq!(total_saved(&goals), 1100.0);
        assert_eq!(progress_percent(&goals[0]), 100.0);
    }

    #[test]
    fn test_spent_goal_leaves_totals() {
        let ledger = LedgerService::new();
        let outcome = ledger.create_goal(&[], CreateGoalCommand::new("Console", 500.0)).unwrap();
        let id = outcome.event.goal_id().to_string();
        let goals = ledger
            .deposit(&outcome.goals, AmountCommand { goal_id: id.clone(), amount: 500.0 })
            .unwrap()
            .goals;
        assert_eq!(total_saved(&goals), 500.0);
        assert_eq!(total_target(&goals), 500.0);

        let goals = ledger.mark_spent(&goals, &id).unwrap().goals;
        assert_eq!(total_saved(&goals), 0.0);
        assert_eq!(total_target(&goals), 0.0);
    }
}
