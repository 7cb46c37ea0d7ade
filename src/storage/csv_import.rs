//! CSV import reader
//!
//! Expected header: `date,type,amount,category,account,description`
//! (`description` may be omitted). Rows are parsed into [`ImportRow`]s
//! carrying names; resolving names to ids is the caller's job.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{FintrackError, FintrackResult};
use crate::models::{Money, TransactionKind};

#[derive(Debug, Deserialize)]
struct RawRow {
    date: String,
    #[serde(rename = "type")]
    kind: String,
    amount: String,
    category: String,
    account: String,
    #[serde(default)]
    description: Option<String>,
}

/// One parsed CSV row, before name resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    /// 1-based line in the file (the header is line 1)
    pub line: usize,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub amount: Money,
    pub category: String,
    pub account: String,
    pub description: String,
}

impl ImportRow {
    /// Import error that names this row
    pub fn error(&self, message: impl std::fmt::Display) -> FintrackError {
        row_error(self.line, message)
    }
}

fn row_error(line: usize, message: impl std::fmt::Display) -> FintrackError {
    FintrackError::Import(format!("row {}: {}", line, message))
}

pub fn read_file(path: &Path) -> FintrackResult<Vec<ImportRow>> {
    let file = std::fs::File::open(path).map_err(|e| {
        FintrackError::Import(format!("Cannot open {}: {}", path.display(), e))
    })?;
    read_rows(file)
}

/// Parse every row; the first bad row fails the whole read
pub fn read_rows<R: Read>(input: R) -> FintrackResult<Vec<ImportRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<RawRow>().enumerate() {
        let line = idx + 2;
        let raw = result.map_err(|e| row_error(line, e))?;
        rows.push(parse_row(raw, line)?);
    }
    Ok(rows)
}

fn parse_row(raw: RawRow, line: usize) -> FintrackResult<ImportRow> {
    let date = NaiveDate::parse_from_str(&raw.date, "%Y-%m-%d")
        .map_err(|_| row_error(line, format!("invalid date '{}'", raw.date)))?;
    let kind: TransactionKind = raw.kind.parse().map_err(|e| row_error(line, e))?;
    let amount = Money::parse(&raw.amount)
        .map_err(|e| row_error(line, format!("amount '{}': {}", raw.amount, e)))?;

    if amount.is_negative() {
        return Err(row_error(line, "amount must not be negative"));
    }
    if raw.category.is_empty() {
        return Err(row_error(line, "missing category"));
    }
    if raw.account.is_empty() {
        return Err(row_error(line, "missing account"));
    }

    Ok(ImportRow {
        line,
        date,
        kind,
        amount,
        category: raw.category,
        account: raw.account,
        description: raw.description.unwrap_or_default(),
    })
}
