//! Goal service
//!
//! Works out each goal's progress and passes it to the tracker. A goal linked
//! to an account measures the balance growth since creation; an unlinked
//! goal measures net income over the ledger since creation.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::analytics::{GoalEvaluation, GoalTracker};
use crate::config::AnalyticsSettings;
use crate::error::{FintrackError, FintrackResult};
use crate::ledger::{DateRange, LedgerFilter, LedgerQuery};
use crate::models::{Account, Goal, Money};
use crate::storage::{AccountRepository, GoalRepository};

/// Dashboard view over all goals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalSummary {
    pub total_goals: usize,
    pub active_goals: usize,
    pub completed_goals: usize,
    /// Sum over active goals
    pub total_target: Money,
    /// Sum over active goals
    pub total_progress: Money,
    pub average_progress_pct: f64,
    /// Active goals closest to their deadline, at most three
    pub nearest: Vec<GoalEvaluation>,
}

/// Input for [`GoalService::create`]
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub name: String,
    pub description: String,
    pub target: Money,
    pub deadline: NaiveDate,
    pub account: Option<Account>,
    /// Defaults to the linked account's current balance
    pub initial_balance: Option<Money>,
}

pub struct GoalService<'a, L> {
    goals: &'a GoalRepository,
    accounts: &'a AccountRepository,
    ledger: L,
    tracker: GoalTracker,
}

impl<'a, L: LedgerQuery> GoalService<'a, L> {
    pub fn new(
        goals: &'a GoalRepository,
        accounts: &'a AccountRepository,
        ledger: L,
        settings: &AnalyticsSettings,
    ) -> Self {
        Self {
            goals,
            accounts,
            ledger,
            tracker: GoalTracker::from_settings(settings),
        }
    }

    /// Create a goal dated `today`
    pub fn create(&self, new_goal: NewGoal, today: NaiveDate) -> FintrackResult<Goal> {
        let name = new_goal.name.trim();
        if self.goals.get_by_name(name)?.is_some() {
            return Err(FintrackError::Duplicate {
                entity_type: "Goal",
                identifier: name.to_string(),
            });
        }

        let mut goal = Goal::new(name, new_goal.target, new_goal.deadline, today)
            .with_description(new_goal.description);
        if let Some(account) = &new_goal.account {
            let initial = new_goal.initial_balance.unwrap_or(account.balance);
            goal = goal.linked_to(account.id, initial);
        }

        goal.validate()
            .map_err(|e| FintrackError::Validation(e.to_string()))?;

        self.goals.upsert(goal.clone())?;
        self.goals.save()?;

        info!(goal = %goal.name, target = %goal.target_amount, deadline = %goal.deadline, "created goal");
        Ok(goal)
    }

    pub fn require(&self, name: &str) -> FintrackResult<Goal> {
        self.goals
            .get_by_name(name)?
            .ok_or_else(|| FintrackError::goal_not_found(name))
    }

    pub fn complete(&self, name: &str) -> FintrackResult<Goal> {
        let mut goal = self.require(name)?;
        goal.mark_completed();
        self.goals.upsert(goal.clone())?;
        self.goals.save()?;

        info!(goal = %goal.name, "marked goal completed");
        Ok(goal)
    }

    pub fn delete(&self, name: &str) -> FintrackResult<Goal> {
        let goal = self.require(name)?;
        self.goals.delete(goal.id)?;
        self.goals.save()?;

        info!(goal = %goal.name, "deleted goal");
        Ok(goal)
    }

    /// Progress toward the goal as of `today`
    pub fn progress(&self, goal: &Goal, today: NaiveDate) -> FintrackResult<Money> {
        if let Some(account_id) = goal.account_id {
            let account = self
                .accounts
                .get(account_id)?
                .ok_or_else(|| FintrackError::account_not_found(account_id.to_string()))?;
            return Ok(account.balance - goal.initial_balance);
        }

        if today < goal.created {
            return Ok(Money::zero());
        }
        let range = DateRange::new(goal.created, today)?;
        let records = self.ledger.fetch(&LedgerFilter::new(range))?;
        debug!(goal = %goal.name, records = records.len(), "net ledger progress");
        Ok(records.iter().map(|r| r.signed_amount()).sum())
    }

    pub fn evaluate(&self, goal: &Goal, today: NaiveDate) -> FintrackResult<GoalEvaluation> {
        let progress = self.progress(goal, today)?;
        Ok(self.tracker.evaluate(goal, progress, today))
    }

    /// Evaluate every goal and remember each status that changed
    pub fn evaluate_all(&self, today: NaiveDate) -> FintrackResult<Vec<GoalEvaluation>> {
        let mut evaluations = Vec::new();
        let mut changed = false;

        for mut goal in self.goals.get_all()? {
            let evaluation = self.evaluate(&goal, today)?;
            if goal.last_status != Some(evaluation.status) {
                info!(goal = %goal.name, status = %evaluation.status, "goal status changed");
                goal.last_status = Some(evaluation.status);
                self.goals.upsert(goal)?;
                changed = true;
            }
            evaluations.push(evaluation);
        }

        if changed {
            self.goals.save()?;
        }
        Ok(evaluations)
    }

    pub fn summary(&self, today: NaiveDate) -> FintrackResult<GoalSummary> {
        let all = self.goals.get_all()?;
        let active: Vec<&Goal> = all.iter().filter(|g| !g.completed).collect();

        let mut evaluations = active
            .iter()
            .map(|goal| self.evaluate(goal, today))
            .collect::<FintrackResult<Vec<_>>>()?;

        let total_target = active.iter().map(|g| g.target_amount).sum();
        let total_progress = evaluations.iter().map(|e| e.progress).sum();
        let average_progress_pct = if evaluations.is_empty() {
            0.0
        } else {
            evaluations.iter().map(|e| e.progress_pct).sum::<f64>() / evaluations.len() as f64
        };

        evaluations.sort_by_key(|e| e.days_remaining);
        evaluations.truncate(3);

        info!(active = active.len(), average_progress_pct, "goal summary");
        Ok(GoalSummary {
            total_goals: all.len(),
            active_goals: active.len(),
            completed_goals: all.len() - active.len(),
            total_target,
            total_progress,
            average_progress_pct,
            nearest: evaluations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedger;
    use crate::models::{AccountId, CategoryId, GoalStatus, TransactionRecord};
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct Fixture {
        _temp_dir: TempDir,
        goals: GoalRepository,
        accounts: AccountRepository,
    }

    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let goals = GoalRepository::new(temp_dir.path().join("goals.json"));
        let accounts = AccountRepository::new(temp_dir.path().join("accounts.json"));
        Fixture {
            _temp_dir: temp_dir,
            goals,
            accounts,
        }
    }

    fn new_goal(name: &str, dollars: i64, deadline: NaiveDate) -> NewGoal {
        NewGoal {
            name: name.to_string(),
            description: String::new(),
            target: Money::from_dollars(dollars),
            deadline,
            account: None,
            initial_balance: None,
        }
    }

    #[test]
    fn test_linked_goal_measures_balance_growth() {
        let f = fixture();
        let mut savings = Account::with_balance("Savings", Money::from_dollars(500));
        f.accounts.upsert(savings.clone()).unwrap();

        let ledger = InMemoryLedger::default();
        let service = GoalService::new(&f.goals, &f.accounts, &ledger, &AnalyticsSettings::default());
        let mut request = new_goal("Trip", 1000, date(2025, 6, 30));
        request.account = Some(savings.clone());
        let goal = service.create(request, date(2025, 1, 1)).unwrap();
        assert_eq!(goal.initial_balance, Money::from_dollars(500));

        savings.apply(Money::from_dollars(200)).unwrap();
        f.accounts.upsert(savings).unwrap();

        let progress = service.progress(&goal, date(2025, 2, 1)).unwrap();
        assert_eq!(progress, Money::from_dollars(200));
    }

    #[test]
    fn test_unlinked_goal_uses_net_ledger_since_creation() {
        let f = fixture();
        let salary = CategoryId::new();
        let rent = CategoryId::new();
        let account = AccountId::new();
        let ledger: InMemoryLedger = vec![
            TransactionRecord::income(date(2024, 12, 31), Money::from_dollars(999), salary, account),
            TransactionRecord::income(date(2025, 1, 31), Money::from_dollars(3000), salary, account),
            TransactionRecord::expense(date(2025, 2, 1), Money::from_dollars(1200), rent, account),
        ]
        .into_iter()
        .collect();

        let service = GoalService::new(&f.goals, &f.accounts, &ledger, &AnalyticsSettings::default());
        let goal = service
            .create(new_goal("Cushion", 5000, date(2025, 12, 31)), date(2025, 1, 1))
            .unwrap();

        assert_eq!(
            service.progress(&goal, date(2025, 2, 15)).unwrap(),
            Money::from_dollars(1800)
        );
        assert_eq!(service.progress(&goal, date(2024, 12, 1)).unwrap(), Money::zero());
    }

    #[test]
    fn test_missing_linked_account() {
        let f = fixture();
        let ledger = InMemoryLedger::default();
        let service = GoalService::new(&f.goals, &f.accounts, &ledger, &AnalyticsSettings::default());
        let goal = Goal::new("Ghost", Money::from_dollars(10), date(2025, 3, 1), date(2025, 1, 1))
            .linked_to(AccountId::new(), Money::zero());

        assert!(service.progress(&goal, date(2025, 2, 1)).unwrap_err().is_not_found());
    }

    #[test]
    fn test_create_validates_and_rejects_duplicates() {
        let f = fixture();
        let ledger = InMemoryLedger::default();
        let service = GoalService::new(&f.goals, &f.accounts, &ledger, &AnalyticsSettings::default());
        let today = date(2025, 1, 1);

        let past = service.create(new_goal("Late", 100, today), today);
        assert!(past.unwrap_err().is_validation());

        service.create(new_goal("Bike", 600, date(2025, 5, 1)), today).unwrap();
        let again = service.create(new_goal("bike", 600, date(2025, 5, 1)), today);
        assert!(matches!(again.unwrap_err(), FintrackError::Duplicate { .. }));
    }

    #[test]
    fn test_complete_and_evaluate_all_caches_status() {
        let f = fixture();
        let ledger = InMemoryLedger::default();
        let service = GoalService::new(&f.goals, &f.accounts, &ledger, &AnalyticsSettings::default());
        let today = date(2025, 1, 1);
        service.create(new_goal("Bike", 600, date(2025, 5, 1)), today).unwrap();
        service.complete("BIKE").unwrap();

        let evaluations = service.evaluate_all(date(2025, 2, 1)).unwrap();
        assert_eq!(evaluations[0].status, GoalStatus::Completed);
        assert_eq!(
            f.goals.get_by_name("bike").unwrap().unwrap().last_status,
            Some(GoalStatus::Completed)
        );
        assert!(service.complete("Car").unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_by_name() {
        let f = fixture();
        let ledger = InMemoryLedger::default();
        let service = GoalService::new(&f.goals, &f.accounts, &ledger, &AnalyticsSettings::default());
        service
            .create(new_goal("Bike", 600, date(2025, 5, 1)), date(2025, 1, 1))
            .unwrap();

        assert_eq!(service.delete("bike").unwrap().name, "Bike");
        assert!(f.goals.get_all().unwrap().is_empty());
        assert!(service.delete("Bike").unwrap_err().is_not_found());
    }

    #[test]
    fn test_summary_counts_and_nearest() {
        let f = fixture();
        let ledger = InMemoryLedger::default();
        let service = GoalService::new(&f.goals, &f.accounts, &ledger, &AnalyticsSettings::default());
        let today = date(2025, 1, 1);
        for (name, month) in [("A", 9), ("B", 3), ("C", 6), ("D", 4)] {
            service
                .create(new_goal(name, 1000, date(2025, month, 1)), today)
                .unwrap();
        }
        service.create(new_goal("Done", 50, date(2025, 2, 1)), today).unwrap();
        service.complete("Done").unwrap();

        let summary = service.summary(date(2025, 1, 15)).unwrap();
        assert_eq!(summary.total_goals, 5);
        assert_eq!(summary.active_goals, 4);
        assert_eq!(summary.completed_goals, 1);
        assert_eq!(summary.total_target, Money::from_dollars(4000));
        assert_eq!(summary.total_progress, Money::zero());
        assert_eq!(summary.average_progress_pct, 0.0);
        let nearest: Vec<_> = summary.nearest.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(nearest, vec!["B", "D", "C"]);
    }
}
