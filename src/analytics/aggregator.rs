//! Period aggregation
//!
//! Buckets transaction records by (period, category, type). The caller is
//! responsible for fetching only the window of interest; nothing here filters
//! by date.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{CategoryId, Granularity, Money, PeriodKey, TransactionKind, TransactionRecord};

/// Bucket identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AggregateKey {
    pub period: PeriodKey,
    pub category_id: CategoryId,
    pub kind: TransactionKind,
}

/// One bucket as a flat row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodAggregate {
    pub period: PeriodKey,
    pub category_id: CategoryId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub total: Money,
}

/// Income, expense and net for one period across all categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    pub period: PeriodKey,
    pub income: Money,
    pub expense: Money,
    pub net: Money,
}

/// Total for one category across all periods
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category_id: CategoryId,
    pub total: Money,
}

/// Result of [`aggregate`]: totals keyed by (period, category, type)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PeriodAggregates {
    granularity: Granularity,
    totals: BTreeMap<AggregateKey, Money>,
}

impl PeriodAggregates {
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Number of non-empty buckets
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// Total for one bucket, zero when nothing was recorded
    pub fn get(&self, period: PeriodKey, category_id: CategoryId, kind: TransactionKind) -> Money {
        self.totals
            .get(&AggregateKey {
                period,
                category_id,
                kind,
            })
            .copied()
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AggregateKey, &Money)> {
        self.totals.iter()
    }

    /// All buckets ordered by period, then category, then type
    pub fn rows(&self) -> Vec<PeriodAggregate> {
        self.totals
            .iter()
            .map(|(key, total)| PeriodAggregate {
                period: key.period,
                category_id: key.category_id,
                kind: key.kind,
                total: *total,
            })
            .collect()
    }

    /// Distinct periods with any activity, in order
    pub fn periods(&self) -> Vec<PeriodKey> {
        let mut periods: Vec<PeriodKey> = self.totals.keys().map(|key| key.period).collect();
        periods.dedup();
        periods
    }

    /// Sum of every bucket of the given type
    pub fn total(&self, kind: TransactionKind) -> Money {
        self.totals
            .iter()
            .filter(|(key, _)| key.kind == kind)
            .map(|(_, total)| *total)
            .sum()
    }

    /// Per-period totals for one category over `periods`, zero-filled
    pub fn history(
        &self,
        category_id: CategoryId,
        kind: TransactionKind,
        periods: &[PeriodKey],
    ) -> Vec<Money> {
        periods
            .iter()
            .map(|period| self.get(*period, category_id, kind))
            .collect()
    }

    /// Income, expense and net per active period, in order
    pub fn period_totals(&self) -> Vec<PeriodTotals> {
        let mut by_period: BTreeMap<PeriodKey, (Money, Money)> = BTreeMap::new();
        for (key, total) in &self.totals {
            let entry = by_period.entry(key.period).or_default();
            match key.kind {
                TransactionKind::Income => entry.0 += *total,
                TransactionKind::Expense => entry.1 += *total,
            }
        }

        by_period
            .into_iter()
            .map(|(period, (income, expense))| PeriodTotals {
                period,
                income,
                expense,
                net: income - expense,
            })
            .collect()
    }

    /// Per-category totals of one type across all periods, largest first
    pub fn category_totals(&self, kind: TransactionKind) -> Vec<CategoryTotal> {
        let mut by_category: BTreeMap<CategoryId, Money> = BTreeMap::new();
        for (key, total) in self.totals.iter().filter(|(key, _)| key.kind == kind) {
            *by_category.entry(key.category_id).or_default() += *total;
        }

        let mut totals: Vec<CategoryTotal> = by_category
            .into_iter()
            .map(|(category_id, total)| CategoryTotal { category_id, total })
            .collect();
        // Stable sort keeps ties in category order
        totals.sort_by(|a, b| b.total.cmp(&a.total));
        totals
    }
}

/// Sum records into (period, category, type) buckets
pub fn aggregate(records: &[TransactionRecord], granularity: Granularity) -> PeriodAggregates {
    let mut totals: BTreeMap<AggregateKey, Money> = BTreeMap::new();

    for record in records {
        let key = AggregateKey {
            period: PeriodKey::for_date(granularity, record.date),
            category_id: record.category_id,
            kind: record.kind,
        };
        *totals.entry(key).or_default() += record.amount;
    }

    PeriodAggregates {
        granularity,
        totals,
    }
}
