//! Period buckets for aggregation and budgets
//!
//! A [`PeriodKey`] is a date truncated to a [`Granularity`]: a single day, an
//! ISO week (Monday to Sunday) or a calendar month. Keys order
//! chronologically.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Bucket size used when grouping transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    #[default]
    Month,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Week => write!(f, "week"),
            Self::Month => write!(f, "month"),
        }
    }
}

impl FromStr for Granularity {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" => Ok(Self::Day),
            "week" | "weekly" => Ok(Self::Week),
            "month" | "monthly" => Ok(Self::Month),
            other => Err(PeriodParseError::UnknownGranularity(other.to_string())),
        }
    }
}

/// A day, ISO week or calendar month
///
/// Serialized in its display form (`2025-01-15`, `2025-W03`, `2025-01`) so
/// stored keys are always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PeriodKey {
    Day { date: NaiveDate },
    Week { year: i32, week: u32 },
    Month { year: i32, month: u32 },
}

impl PeriodKey {
    /// Truncate a date to the period containing it
    pub fn for_date(granularity: Granularity, date: NaiveDate) -> Self {
        match granularity {
            Granularity::Day => Self::Day { date },
            Granularity::Week => {
                let iso = date.iso_week();
                Self::Week {
                    year: iso.year(),
                    week: iso.week(),
                }
            }
            Granularity::Month => Self::Month {
                year: date.year(),
                month: date.month(),
            },
        }
    }

    /// A calendar month, validated
    pub fn month(year: i32, month: u32) -> Result<Self, PeriodParseError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|_| Self::Month { year, month })
            .ok_or(PeriodParseError::InvalidMonth(month))
    }

    /// An ISO week, validated against the weeks that year actually has
    pub fn week(year: i32, week: u32) -> Result<Self, PeriodParseError> {
        NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
            .map(|_| Self::Week { year, week })
            .ok_or(PeriodParseError::InvalidWeek(week))
    }

    pub fn day(date: NaiveDate) -> Self {
        Self::Day { date }
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            Self::Day { .. } => Granularity::Day,
            Self::Week { .. } => Granularity::Week,
            Self::Month { .. } => Granularity::Month,
        }
    }

    /// First day of the period
    pub fn start_date(&self) -> NaiveDate {
        match self {
            Self::Day { date } => *date,
            Self::Week { year, week } => NaiveDate::from_isoywd_opt(*year, *week, Weekday::Mon)
                .unwrap_or(NaiveDate::MIN),
            Self::Month { year, month } => {
                NaiveDate::from_ymd_opt(*year, *month, 1).unwrap_or(NaiveDate::MIN)
            }
        }
    }

    /// Last day of the period (inclusive)
    pub fn end_date(&self) -> NaiveDate {
        let start = self.start_date();
        start + Duration::days(i64::from(self.days()) - 1)
    }

    /// Number of days in the period
    pub fn days(&self) -> u32 {
        match self {
            Self::Day { .. } => 1,
            Self::Week { .. } => 7,
            Self::Month { year, month } => days_in_month(*year, *month),
        }
    }

    /// Days of the period that have passed as of `today`, counting today
    ///
    /// Zero before the period starts, [`days`](Self::days) after it ends.
    pub fn days_elapsed(&self, today: NaiveDate) -> u32 {
        if today < self.start_date() {
            return 0;
        }
        let elapsed = (today - self.start_date()).num_days() + 1;
        elapsed.min(i64::from(self.days())) as u32
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date() && date <= self.end_date()
    }

    pub fn next(&self) -> Self {
        Self::for_date(self.granularity(), self.end_date() + Duration::days(1))
    }

    pub fn prev(&self) -> Self {
        Self::for_date(self.granularity(), self.start_date() - Duration::days(1))
    }

    /// The `count` periods before this one, oldest first
    pub fn preceding(&self, count: u32) -> Vec<Self> {
        let mut periods = Vec::with_capacity(count as usize);
        let mut cursor = *self;
        for _ in 0..count {
            cursor = cursor.prev();
            periods.push(cursor);
        }
        periods.reverse();
        periods
    }

    /// Every period of `granularity` touching `start..=end`, in order
    pub fn covering(granularity: Granularity, start: NaiveDate, end: NaiveDate) -> Vec<Self> {
        let mut periods = Vec::new();
        if end < start {
            return periods;
        }
        let last = Self::for_date(granularity, end);
        let mut cursor = Self::for_date(granularity, start);
        while cursor <= last {
            periods.push(cursor);
            cursor = cursor.next();
        }
        periods
    }

    /// Parse `2025-01-15` (day), `2025-W03` (ISO week) or `2025-01` (month)
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        let s = s.trim();
        let invalid = || PeriodParseError::InvalidFormat(s.to_string());

        if let Some((year, week)) = s.split_once("-W") {
            let year: i32 = year.parse().map_err(|_| invalid())?;
            let week: u32 = week.parse().map_err(|_| invalid())?;
            return Self::week(year, week);
        }

        match s.split('-').count() {
            3 => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Self::day)
                .map_err(|_| invalid()),
            2 => {
                let (year, month) = s.split_once('-').ok_or_else(invalid)?;
                let year: i32 = year.parse().map_err(|_| invalid())?;
                let month: u32 = month.parse().map_err(|_| invalid())?;
                Self::month(year, month)
            }
            _ => Err(invalid()),
        }
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 30,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day { date } => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Week { year, week } => write!(f, "{:04}-W{:02}", year, week),
            Self::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
        }
    }
}

impl FromStr for PeriodKey {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PeriodKey {
    type Error = PeriodParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PeriodKey> for String {
    fn from(key: PeriodKey) -> Self {
        key.to_string()
    }
}

// Day, week and month spans never coincide, so (start, end) is a total order
// consistent with equality.
impl Ord for PeriodKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start_date()
            .cmp(&other.start_date())
            .then_with(|| self.end_date().cmp(&other.end_date()))
    }
}

impl PartialOrd for PeriodKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
    InvalidWeek(u32),
    UnknownGranularity(String),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(f, "Invalid period format: {}", s),
            Self::InvalidMonth(m) => write!(f, "Invalid month: {}", m),
            Self::InvalidWeek(w) => write!(f, "Invalid ISO week: {}", w),
            Self::UnknownGranularity(g) => {
                write!(f, "Unknown granularity '{}' (expected day, week or month)", g)
            }
        }
    }
}

impl std::error::Error for PeriodParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_bounds() {
        let feb = PeriodKey::for_date(Granularity::Month, date(2024, 2, 17));
        assert_eq!(feb, PeriodKey::Month { year: 2024, month: 2 });
        assert_eq!(feb.start_date(), date(2024, 2, 1));
        assert_eq!(feb.end_date(), date(2024, 2, 29));
        assert_eq!(feb.days(), 29);
    }

    #[test]
    fn test_iso_week_crosses_year() {
        // 2024-12-30 is the Monday of ISO week 1 of 2025
        let week = PeriodKey::for_date(Granularity::Week, date(2025, 1, 2));
        assert_eq!(week, PeriodKey::Week { year: 2025, week: 1 });
        assert_eq!(week.start_date(), date(2024, 12, 30));
        assert_eq!(week.end_date(), date(2025, 1, 5));
        assert!(week.contains(date(2024, 12, 31)));
    }

    #[test]
    fn test_navigation() {
        let dec = PeriodKey::month(2024, 12).unwrap();
        assert_eq!(dec.next(), PeriodKey::month(2025, 1).unwrap());
        assert_eq!(dec.next().prev(), dec);

        let last_week_2020 = PeriodKey::week(2020, 53).unwrap();
        assert_eq!(last_week_2020.next(), PeriodKey::week(2021, 1).unwrap());

        let day = PeriodKey::day(date(2025, 3, 1));
        assert_eq!(day.prev(), PeriodKey::day(date(2025, 2, 28)));
    }

    #[test]
    fn test_preceding_is_oldest_first() {
        let mar = PeriodKey::month(2025, 3).unwrap();
        let history = mar.preceding(3);
        assert_eq!(
            history,
            vec![
                PeriodKey::month(2024, 12).unwrap(),
                PeriodKey::month(2025, 1).unwrap(),
                PeriodKey::month(2025, 2).unwrap(),
            ]
        );
    }

    #[test]
    fn test_covering() {
        let weeks = PeriodKey::covering(Granularity::Week, date(2025, 1, 1), date(2025, 1, 14));
        assert_eq!(weeks.len(), 3);
        assert!(PeriodKey::covering(Granularity::Day, date(2025, 1, 2), date(2025, 1, 1)).is_empty());
    }

    #[test]
    fn test_days_elapsed() {
        let jan = PeriodKey::month(2025, 1).unwrap();
        assert_eq!(jan.days_elapsed(date(2024, 12, 31)), 0);
        assert_eq!(jan.days_elapsed(date(2025, 1, 1)), 1);
        assert_eq!(jan.days_elapsed(date(2025, 1, 10)), 10);
        assert_eq!(jan.days_elapsed(date(2025, 3, 1)), 31);
    }

    #[test]
    fn test_parse_and_display() {
        for text in ["2025-01", "2025-W03", "2025-01-15"] {
            let key = PeriodKey::parse(text).unwrap();
            assert_eq!(key.to_string(), text);
        }
        assert_eq!(
            PeriodKey::parse("2025-13"),
            Err(PeriodParseError::InvalidMonth(13))
        );
        assert_eq!(
            PeriodKey::parse("2025-W53"),
            Err(PeriodParseError::InvalidWeek(53))
        );
        assert!(PeriodKey::parse("January").is_err());
    }

    #[test]
    fn test_ordering_is_chronological() {
        let mut keys = vec![
            PeriodKey::month(2025, 2).unwrap(),
            PeriodKey::day(date(2025, 1, 3)),
            PeriodKey::month(2024, 11).unwrap(),
        ];
        keys.sort();
        assert_eq!(keys[0], PeriodKey::month(2024, 11).unwrap());
        assert_eq!(keys[2], PeriodKey::month(2025, 2).unwrap());
    }

    #[test]
    fn test_serializes_as_string() {
        let key = PeriodKey::week(2025, 3).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2025-W03\"");

        let back: PeriodKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<PeriodKey>("\"2025-00\"").is_err());
    }

    #[test]
    fn test_granularity_from_str() {
        assert_eq!("weekly".parse::<Granularity>().unwrap(), Granularity::Week);
        assert_eq!("DAY".parse::<Granularity>().unwrap(), Granularity::Day);
        assert!("year".parse::<Granularity>().is_err());
    }
}
