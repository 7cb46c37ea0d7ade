//! Service layer for fintrack
//!
//! Entity services work on the [`Storage`](crate::storage::Storage)
//! repositories; the analytic services read transactions only through a
//! [`LedgerQuery`] and hand the results to the engine.

pub mod account;
pub mod budget;
pub mod category;
pub mod goal;
pub mod report;
pub mod transaction;

pub use account::AccountService;
pub use budget::{BudgetOutlook, BudgetService, BudgetState, SpendingRecommendation};
pub use category::CategoryService;
pub use goal::{GoalService, GoalSummary, NewGoal};
pub use report::{ForecastMode, PeriodSummary, ReportService};
pub use transaction::{ImportSummary, TransactionService};

use crate::analytics::aggregate;
use crate::error::FintrackResult;
use crate::ledger::{DateRange, LedgerFilter, LedgerQuery};
use crate::models::{CategoryId, Money, PeriodKey, TransactionKind};

/// Per-period totals for the `lookback` periods before `period`, oldest first
///
/// Every period of the window is kept, quiet ones as zero. A window without
/// a single record has no history at all and comes back empty.
pub(crate) fn history_for<Q: LedgerQuery>(
    ledger: &Q,
    category_id: CategoryId,
    kind: TransactionKind,
    period: PeriodKey,
    lookback: u32,
) -> FintrackResult<Vec<Money>> {
    let periods = period.preceding(lookback);
    let (Some(first), Some(last)) = (periods.first(), periods.last()) else {
        return Ok(Vec::new());
    };

    let range = DateRange::new(first.start_date(), last.end_date())?;
    let filter = LedgerFilter::new(range).category(category_id).kind(kind);
    let records = ledger.fetch(&filter)?;

    if records.is_empty() {
        return Ok(Vec::new());
    }
    Ok(aggregate(&records, period.granularity()).history(category_id, kind, &periods))
}
