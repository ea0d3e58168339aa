// Rust guideline compliant 2026-10-12

//! Metric calculator for the FinTrack alert engine.
//!
//! [`compute_metrics`] turns a transaction list and the current instant into
//! [`FinancialMetrics`]; [`summarize`] produces the whole-ledger totals. Both
//! are pure and total: every division is guarded, so there is no error path.

use chrono::{DateTime, Datelike as _, Months, NaiveDate, Utc};
use domain::{FinancialMetrics, Transaction, TransactionKind};

/// Runway reported when the burn rate is zero (nothing is being spent).
pub const RUNWAY_SENTINEL_MONTHS: f64 = 12.0;

/// Length of the trailing burn-rate window, in calendar months.
pub const BURN_WINDOW_MONTHS: u32 = 3;

/// Whole-ledger income and expense totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerSummary {
    /// Sum of all income amounts.
    pub total_income: f64,
    /// Sum of all expense amounts.
    pub total_expenses: f64,
    /// `total_income - total_expenses`.
    pub cash_balance: f64,
}

/// Sum income and expenses over the entire list (not windowed).
#[must_use]
pub fn summarize(transactions: &[Transaction]) -> LedgerSummary {
    let (total_income, total_expenses) =
        transactions.iter().fold((0.0, 0.0), |(income, expenses), tx| match tx.kind {
            TransactionKind::Income => (income + tx.amount, expenses),
            TransactionKind::Expense => (income, expenses + tx.amount),
        });
    LedgerSummary { total_income, total_expenses, cash_balance: total_income - total_expenses }
}

/// Compute burn rate, cash runway and expense growth as of `now`.
///
/// - Burn rate: expenses dated on or after `now - 3 months`, divided by 3.
/// - Cash runway: `cash_balance / burn_rate`, or [`RUNWAY_SENTINEL_MONTHS`]
///   when the burn rate is zero.
/// - Expense growth: percentage change between the expenses of `now`'s month
///   and of the month before. Months are matched by number only, so entries
///   from the same month of other years fall into the same bucket. Zero when
///   the previous month has no expenses.
#[must_use]
pub fn compute_metrics(transactions: &[Transaction], now: DateTime<Utc>) -> FinancialMetrics {
    let today = now.date_naive();
    let cutoff = today
        .checked_sub_months(Months::new(BURN_WINDOW_MONTHS))
        .unwrap_or(NaiveDate::MIN);

    let recent_expenses = expense_total(transactions, |date| date >= cutoff);
    let burn_rate = recent_expenses / f64::from(BURN_WINDOW_MONTHS);

    let cash_balance = summarize(transactions).cash_balance;
    let cash_runway =
        if burn_rate > 0.0 { cash_balance / burn_rate } else { RUNWAY_SENTINEL_MONTHS };

    let current_month = today.month0();
    let previous_month = (current_month + 11) % 12;
    let current_expenses = expense_total(transactions, |date| date.month0() == current_month);
    let previous_expenses = expense_total(transactions, |date| date.month0() == previous_month);
    let expense_growth = if previous_expenses > 0.0 {
        (current_expenses - previous_expenses) / previous_expenses * 100.0
    } else {
        0.0
    };

    tracing::debug!(
        transactions = transactions.len(),
        burn_rate,
        cash_runway,
        expense_growth,
        "calculator.metrics.computed"
    );

    FinancialMetrics { burn_rate, cash_runway, expense_growth }
}

fn expense_total(transactions: &[Transaction], include: impl Fn(NaiveDate) -> bool) -> f64 {
    transactions
        .iter()
        .filter(|tx| tx.is_expense() && include(tx.date))
        .map(|tx| tx.amount)
        .sum()
}
