//! Domain-level command types.
//!
//! These are the inputs to the ledger operations. Callers (the CLI, or any
//! other front end) build them from user input; the ledger re-validates every
//! field regardless of what the caller already checked.

pub mod goal {
    use chrono::NaiveDate;

    /// Input for creating a new goal.
    #[derive(Debug, Clone)]
    pub struct CreateGoalCommand {
        pub name: String,
        pub target_amount: f64,
        pub target_date: Option<NaiveDate>,
        pub icon: Option<String>,
        pub color: Option<String>,
    }

    impl CreateGoalCommand {
        pub fn new(name: impl Into<String>, target_amount: f64) -> Self {
            Self {
                name: name.into(),
                target_amount,
                target_date: None,
                icon: None,
                color: None,
            }
        }
    }

    /// Input for moving money into or out of a goal.
    #[derive(Debug, Clone)]
    pub struct AmountCommand {
        pub goal_id: String,
        pub amount: f64,
    }

    /// Partial update of a goal's descriptive fields.
    ///
    /// `None` leaves a field unchanged. For the optional fields,
    /// `Some(None)` clears the stored value.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateGoalMetadataCommand {
        pub goal_id: String,
        pub name: Option<String>,
        pub target_amount: Option<f64>,
        pub target_date: Option<Option<NaiveDate>>,
        pub icon: Option<Option<String>>,
        pub color: Option<Option<String>>,
    }

    impl UpdateGoalMetadataCommand {
        pub fn for_goal(goal_id: impl Into<String>) -> Self {
            Self {
                goal_id: goal_id.into(),
                ..Default::default()
            }
        }

        pub fn is_empty(&self) -> bool {
            self.name.is_none()
                && self.target_amount.is_none()
                && self.target_date.is_none()
                && self.icon.is_none()
                && self.color.is_none()
        }
    }
}
