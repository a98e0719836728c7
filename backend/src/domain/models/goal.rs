use shared::Goal;

/// Reasons the ledger refuses an operation.
///
/// Every rejection leaves the goal collection exactly as it was.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    #[error("{0}")]
    Validation(String),
    #[error("Goal not found: {goal_id}")]
    NotFound { goal_id: String },
    #[error("Insufficient funds in goal {goal_id}: requested {requested:.2}, available {available:.2}")]
    InsufficientFunds {
        goal_id: String,
        requested: f64,
        available: f64,
    },
    #[error("Goal {goal_id} has already been spent")]
    AlreadySpent { goal_id: String },
}

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }

    pub fn not_found(goal_id: &str) -> Self {
        LedgerError::NotFound {
            goal_id: goal_id.to_string(),
        }
    }

    pub fn already_spent(goal_id: &str) -> Self {
        LedgerError::AlreadySpent {
            goal_id: goal_id.to_string(),
        }
    }
}

/// What an accepted ledger operation did, with enough detail for the caller
/// to tell the user about it.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEvent {
    GoalCreated {
        goal_id: String,
        name: String,
        target_amount: f64,
    },
    Deposited {
        goal_id: String,
        name: String,
        amount: f64,
        balance: f64,
    },
    Withdrawn {
        goal_id: String,
        name: String,
        amount: f64,
        balance: f64,
    },
    MarkedSpent {
        goal_id: String,
        name: String,
        amount: f64,
    },
    MetadataUpdated {
        goal_id: String,
        name: String,
    },
    GoalDeleted {
        goal_id: String,
        name: String,
    },
}

impl LedgerEvent {
    pub fn goal_id(&self) -> &str {
        match self {
            LedgerEvent::GoalCreated { goal_id, .. }
            | LedgerEvent::Deposited { goal_id, .. }
            | LedgerEvent::Withdrawn { goal_id, .. }
            | LedgerEvent::MarkedSpent { goal_id, .. }
            | LedgerEvent::MetadataUpdated { goal_id, .. }
            | LedgerEvent::GoalDeleted { goal_id, .. } => goal_id,
        }
    }

    /// Amount moved by the operation, if it moved any
    pub fn amount(&self) -> Option<f64> {
        match self {
            LedgerEvent::Deposited { amount, .. }
            | LedgerEvent::Withdrawn { amount, .. }
            | LedgerEvent::MarkedSpent { amount, .. } => Some(*amount),
            _ => None,
        }
    }
}

/// Result of an accepted operation: the next collection plus the event.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerOutcome {
    pub goals: Vec<Goal>,
    pub event: LedgerEvent,
}
