//! Savings goal model
//!
//! A goal is a target amount to put aside by a deadline, optionally measured
//! against one account. Its status is always derived by the goal tracker;
//! `last_status` is only a cached copy for display.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, GoalId};
use super::money::Money;

/// Derived state of a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    OnTrack,
    Behind,
    Achieved,
    Overdue,
    Completed,
}

impl GoalStatus {
    /// Completed and overdue goals get no savings recommendations
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Overdue)
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnTrack => write!(f, "on_track"),
            Self::Behind => write!(f, "behind"),
            Self::Achieved => write!(f, "achieved"),
            Self::Overdue => write!(f, "overdue"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,

    pub name: String,

    #[serde(default)]
    pub description: String,

    pub target_amount: Money,

    pub deadline: NaiveDate,

    /// Account whose balance growth counts as progress
    pub account_id: Option<AccountId>,

    /// Day the goal was created; pacing is measured from here
    pub created: NaiveDate,

    /// Linked account balance when the goal was created
    #[serde(default)]
    pub initial_balance: Money,

    /// Set explicitly by the user; overrides every derived status
    #[serde(default)]
    pub completed: bool,

    #[serde(default)]
    pub last_status: Option<GoalStatus>,

    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(
        name: impl Into<String>,
        target_amount: Money,
        deadline: NaiveDate,
        created: NaiveDate,
    ) -> Self {
        Self {
            id: GoalId::new(),
            name: name.into(),
            description: String::new(),
            target_amount,
            deadline,
            account_id: None,
            created,
            initial_balance: Money::zero(),
            completed: false,
            last_status: None,
            created_at: Utc::now(),
        }
    }

    /// Measure progress as growth of `account_id` above `initial_balance`
    pub fn linked_to(mut self, account_id: AccountId, initial_balance: Money) -> Self {
        self.account_id = Some(account_id);
        self.initial_balance = initial_balance;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn mark_completed(&mut self) {
        self.completed = true;
        self.last_status = Some(GoalStatus::Completed);
    }

    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.name.trim().is_empty() {
            return Err(GoalValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(GoalValidationError::NameTooLong(self.name.len()));
        }

        if !self.target_amount.is_positive() {
            return Err(GoalValidationError::NonPositiveTarget(self.target_amount));
        }

        if self.deadline <= self.created {
            return Err(GoalValidationError::DeadlineNotAfterCreation {
                deadline: self.deadline,
                created: self.created,
            });
        }

        Ok(())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} by {})",
            self.name,
            self.target_amount,
            self.deadline.format("%Y-%m-%d")
        )
    }
}

/// Validation errors for goals
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyName,
    NameTooLong(usize),
    NonPositiveTarget(Money),
    DeadlineNotAfterCreation {
        deadline: NaiveDate,
        created: NaiveDate,
    },
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Goal name cannot be empty"),
            Self::NameTooLong(len) => write!(f, "Goal name too long ({} chars, max 100)", len),
            Self::NonPositiveTarget(amount) => {
                write!(f, "Goal target must be greater than zero (got {})", amount)
            }
            Self::DeadlineNotAfterCreation { deadline, created } => write!(
                f,
                "Goal deadline {} must be after {}",
                deadline.format("%Y-%m-%d"),
                created.format("%Y-%m-%d")
            ),
        }
    }
}

impl std::error::Error for GoalValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_goal_is_unlinked() {
        let goal = Goal::new("Vacation", Money::from_dollars(1000), date(2025, 6, 1), date(2025, 1, 1));
        assert!(goal.account_id.is_none());
        assert!(!goal.completed);
        assert!(goal.validate().is_ok());
    }

    #[test]
    fn test_linked_goal() {
        let account = AccountId::new();
        let goal = Goal::new("Car", Money::from_dollars(5000), date(2026, 1, 1), date(2025, 1, 1))
            .linked_to(account, Money::from_dollars(1200));
        assert_eq!(goal.account_id, Some(account));
        assert_eq!(goal.initial_balance.cents(), 120000);
    }

    #[test]
    fn test_validation() {
        let today = date(2025, 1, 1);
        let zero_target = Goal::new("Fund", Money::zero(), date(2025, 2, 1), today);
        assert!(matches!(
            zero_target.validate(),
            Err(GoalValidationError::NonPositiveTarget(_))
        ));

        let past_deadline = Goal::new("Fund", Money::from_dollars(10), today, today);
        assert!(matches!(
            past_deadline.validate(),
            Err(GoalValidationError::DeadlineNotAfterCreation { .. })
        ));
    }

    #[test]
    fn test_mark_completed() {
        let mut goal = Goal::new("Fund", Money::from_dollars(10), date(2025, 2, 1), date(2025, 1, 1));
        goal.mark_completed();
        assert!(goal.completed);
        assert_eq!(goal.last_status, Some(GoalStatus::Completed));
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&GoalStatus::OnTrack).unwrap(),
            "\"on_track\""
        );
        assert_eq!(GoalStatus::Behind.to_string(), "behind");
        assert!(GoalStatus::Overdue.is_terminal());
        assert!(!GoalStatus::Achieved.is_terminal());
    }
}
