//! Monthly financial summary batch.
//!
//! Walks every verified account, aggregates the previous calendar month's
//! incomes and expenses, and emails a summary to each account that had any
//! activity in that month.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Utc};
use tracing::{error, info};

use crate::constants::summary::SEND_DELAY_MS;
use crate::db::{Account, Store};
use crate::entities::{expenses, incomes};
use crate::services::email::{EmailTemplate, Mailer, MonthlySummaryData};

pub struct SummaryService {
    store: Store,
    mailer: Arc<Mailer>,
}

/// Counters for one batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRunStats {
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl SummaryService {
    #[must_use]
    pub const fn new(store: Store, mailer: Arc<Mailer>) -> Self {
        Self { store, mailer }
    }

    /// Runs the batch for the previous calendar month.
    pub async fn run(&self) -> anyhow::Result<SummaryRunStats> {
        let today = Utc::now().date_naive();
        let (year, month) = previous_month(today.year(), today.month());
        self.run_for_month(year, month).await
    }

    /// Runs the batch for a specific month. One account failing does not
    /// abort the rest of the walk.
    pub async fn run_for_month(&self, year: i32, month: u32) -> anyhow::Result<SummaryRunStats> {
        let accounts = self.store.list_verified_accounts().await?;
        info!(
            "Monthly summary run for {year}-{month:02} across {} verified accounts",
            accounts.len()
        );

        let (start, end) = month_range(year, month);
        let mut stats = SummaryRunStats::default();

        for account in accounts {
            match self
                .summarize_and_send(&account, year, month, &start, &end)
                .await
            {
                Ok(true) => stats.sent += 1,
                Ok(false) => stats.skipped += 1,
                Err(err) => {
                    stats.failed += 1;
                    error!(
                        "Monthly summary for account {} failed: {err:#}",
                        account.id
                    );
                }
            }

            // Spread sends out to stay under provider rate limits.
            tokio::time::sleep(Duration::from_millis(SEND_DELAY_MS)).await;
        }

        info!(
            "Monthly summary run finished: {} sent, {} skipped, {} failed",
            stats.sent, stats.skipped, stats.failed
        );

        Ok(stats)
    }

    /// Returns `Ok(true)` when a summary was sent, `Ok(false)` when the
    /// account had no activity in the month.
    async fn summarize_and_send(
        &self,
        account: &Account,
        year: i32,
        month: u32,
        start: &str,
        end: &str,
    ) -> anyhow::Result<bool> {
        let incomes = self.store.incomes_in_range(account.id, start, end).await?;
        let expenses = self.store.expenses_in_range(account.id, start, end).await?;

        if incomes.is_empty() && expenses.is_empty() {
            return Ok(false);
        }

        let data = build_summary(year, month, &account.currency, &incomes, &expenses);
        let template = EmailTemplate::MonthlySummary {
            username: account.username.clone(),
            data,
        };

        self.mailer.send(&account.email, &template).await?;

        Ok(true)
    }
}

fn build_summary(
    year: i32,
    month: u32,
    currency: &str,
    incomes: &[incomes::Model],
    expenses: &[expenses::Model],
) -> MonthlySummaryData {
    let total_income: f64 = incomes.iter().map(|entry| entry.amount).sum();
    let total_expenses: f64 = expenses.iter().map(|entry| entry.amount).sum();

    let highest_expense = expenses
        .iter()
        .map(|entry| entry.amount)
        .fold(0.0_f64, f64::max);

    let top_category =
        top_expense_category(expenses).unwrap_or_else(|| "None".to_string());

    MonthlySummaryData {
        month: month_name(month).to_string(),
        year,
        currency: currency.to_string(),
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
        transaction_count: incomes.len() + expenses.len(),
        highest_expense,
        top_category,
    }
}

/// Most frequent expense category. Ties go to the category encountered
/// later in the month.
fn top_expense_category(expenses: &[expenses::Model]) -> Option<String> {
    let mut counts: Vec<(&str, u32)> = Vec::new();
    for expense in expenses {
        if let Some(entry) = counts
            .iter_mut()
            .find(|(name, _)| *name == expense.category.as_str())
        {
            entry.1 += 1;
        } else {
            counts.push((expense.category.as_str(), 1));
        }
    }

    counts
        .into_iter()
        .max_by_key(|&(_, count)| count)
        .map(|(name, _)| name.to_string())
}

const fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Half-open `[first day, first day of next month)` as ISO date strings,
/// matching how ledger dates are stored.
fn month_range(year: i32, month: u32) -> (String, String) {
    let start = format!("{year:04}-{month:02}-01");
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = format!("{next_year:04}-{next_month:02}-01");
    (start, end)
}

const fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}
