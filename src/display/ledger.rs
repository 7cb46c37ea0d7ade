//! Account, category and transaction listings

use std::collections::HashMap;

use super::{category_name, column_width, CategoryNames};
use crate::models::{Account, AccountId, Category, Money, TransactionRecord};

pub fn format_account_list(accounts: &[Account]) -> String {
    if accounts.is_empty() {
        return "No accounts found.".to_string();
    }

    let name_width = column_width(accounts.iter().map(|a| a.name.as_str()), 4);
    let mut output = format!("{:<name_width$}  {:>12}\n", "Name", "Balance");
    output.push_str(&format!("{:-<name_width$}  {:->12}\n", "", ""));

    for account in accounts {
        output.push_str(&format!(
            "{:<name_width$}  {:>12}\n",
            account.name,
            account.balance.to_string()
        ));
    }

    let total: Money = accounts.iter().map(|a| a.balance).sum();
    output.push_str(&format!("{:-<name_width$}  {:->12}\n", "", ""));
    output.push_str(&format!("{:<name_width$}  {:>12}\n", "Total", total.to_string()));
    output
}

pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.".to_string();
    }

    let name_width = column_width(categories.iter().map(|c| c.name.as_str()), 4);
    let mut output = format!("{:<name_width$}  Type\n", "Name");
    output.push_str(&format!("{:-<name_width$}  {:-<7}\n", "", ""));
    for category in categories {
        output.push_str(&format!("{:<name_width$}  {}\n", category.name, category.kind));
    }
    output
}

pub fn format_transaction_list(
    records: &[TransactionRecord],
    categories: &CategoryNames,
    accounts: &HashMap<AccountId, String>,
) -> String {
    if records.is_empty() {
        return "No transactions found.".to_string();
    }

    let rows: Vec<(String, String)> = records
        .iter()
        .map(|r| {
            let account = accounts
                .get(&r.account_id)
                .cloned()
                .unwrap_or_else(|| r.account_id.to_string());
            (category_name(categories, r.category_id), account)
        })
        .collect();
    let cat_width = column_width(rows.iter().map(|(c, _)| c.as_str()), 8);
    let acc_width = column_width(rows.iter().map(|(_, a)| a.as_str()), 7);

    let mut output = format!(
        "{:<12}  {:<10}  {:<7}  {:>12}  {:<cat_width$}  {:<acc_width$}  Description\n",
        "ID", "Date", "Type", "Amount", "Category", "Account"
    );
    output.push_str(&format!(
        "{:-<12}  {:-<10}  {:-<7}  {:->12}  {:-<cat_width$}  {:-<acc_width$}  {:-<11}\n",
        "", "", "", "", "", "", ""
    ));

    for (record, (category, account)) in records.iter().zip(&rows) {
        output.push_str(&format!(
            "{:<12}  {:<10}  {:<7}  {:>12}  {:<cat_width$}  {:<acc_width$}  {}\n",
            record.id.to_string(),
            record.date.format("%Y-%m-%d").to_string(),
            record.kind.to_string(),
            record.amount.to_string(),
            category,
            account,
            record.description
        ));
    }
    output.push_str(&format!("{} transaction(s)\n", records.len()));
    output
}
