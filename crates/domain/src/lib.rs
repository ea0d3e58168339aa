// Rust guideline compliant 2026-10-12

//! Shared domain types for the FinTrack alert engine.
//!
//! Defines `Transaction`, `FinancialMetrics`, `AlertThresholds`, `Alert`, the
//! error types of the ports, and the hexagonal port traits: `Ledger`,
//! `Notifier`, and `Clock`. All engine components depend on this crate; no
//! other workspace crate is imported here.

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

/// Whether a transaction brings money in or takes it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// Money received (client payment, grant, ...).
    Income,
    /// Money spent.
    Expense,
}

impl TransactionKind {
    /// Stable lowercase label, used by storage adapters.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Parse the label produced by [`as_str`](Self::as_str).
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

/// Settlement state of a recorded transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
    /// Settled. Every append through the `Ledger` port lands here.
    Completed,
    /// Recorded but not settled yet (only seen in imported data).
    Pending,
}

impl TransactionStatus {
    /// Stable lowercase label, used by storage adapters.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
        }
    }

    /// Parse the label produced by [`as_str`](Self::as_str).
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "completed" => Some(Self::Completed),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// A transaction submitted for recording; the ledger assigns `id` and `status`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Calendar date the transaction applies to.
    pub date: NaiveDate,
    /// Free-form description (e.g. "UI/UX Design - Acme").
    pub description: String,
    /// Non-negative amount in USD-equivalent units.
    pub amount: f64,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Free-form category label, not validated.
    pub category: String,
}

impl NewTransaction {
    /// Turn the submission into a recorded transaction with the given `id`.
    #[must_use]
    pub fn into_recorded(self, id: String) -> Transaction {
        Transaction {
            id,
            date: self.date,
            description: self.description,
            amount: self.amount,
            kind: self.kind,
            category: self.category,
            status: TransactionStatus::Completed,
        }
    }
}

/// A recorded ledger transaction. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Opaque identifier assigned by the ledger.
    pub id: String,
    /// Calendar date the transaction applies to.
    pub date: NaiveDate,
    /// Free-form description.
    pub description: String,
    /// Non-negative amount in USD-equivalent units.
    pub amount: f64,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Free-form category label.
    pub category: String,
    /// Settlement state.
    pub status: TransactionStatus,
}

impl Transaction {
    /// `true` for expense transactions.
    #[must_use]
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

/// Financial health metrics derived from the ledger on every evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancialMetrics {
    /// Average monthly expense over the trailing three months.
    pub burn_rate: f64,
    /// Months of operation left at the current burn rate.
    pub cash_runway: f64,
    /// Percentage change of expenses, current month vs. previous month.
    pub expense_growth: f64,
}

/// Limits the evaluator compares [`FinancialMetrics`] against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertThresholds {
    /// Burn rate ceiling; above it a "High Burn Rate" alert fires.
    pub burn_rate: f64,
    /// Runway floor in months; below it a "Low Cash Runway" alert fires.
    pub cash_runway: f64,
    /// Expense growth ceiling in percent; above it a "High Expense Growth" alert fires.
    pub expense_growth: f64,
}

impl Default for AlertThresholds {
    /// `{ burn_rate: 50_000, cash_runway: 6, expense_growth: 15 }`.
    fn default() -> Self {
        Self { burn_rate: 50_000.0, cash_runway: 6.0, expense_growth: 15.0 }
    }
}

impl AlertThresholds {
    /// Return a copy with every field present in `partial` overwritten.
    #[must_use]
    pub fn merged(self, partial: PartialAlertThresholds) -> Self {
        Self {
            burn_rate: partial.burn_rate.unwrap_or(self.burn_rate),
            cash_runway: partial.cash_runway.unwrap_or(self.cash_runway),
            expense_growth: partial.expense_growth.unwrap_or(self.expense_growth),
        }
    }
}

/// Partial threshold update; `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PartialAlertThresholds {
    /// New burn rate ceiling.
    pub burn_rate: Option<f64>,
    /// New runway floor.
    pub cash_runway: Option<f64>,
    /// New expense growth ceiling.
    pub expense_growth: Option<f64>,
}

/// Severity of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    /// Informational.
    Info,
    /// Worth a look.
    Warning,
    /// Needs action.
    Danger,
}

/// A timestamped notification with read/unread state.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    /// Unique identifier.
    pub id: uuid::Uuid,
    /// Severity.
    pub kind: AlertKind,
    /// Short headline (e.g. "High Burn Rate").
    pub title: String,
    /// Human-readable text embedding the offending value and the threshold.
    pub message: String,
    /// Creation instant.
    pub timestamp: DateTime<Utc>,
    /// `false` until the consumer marks it read.
    pub is_read: bool,
}

impl Alert {
    /// Create an unread alert with a fresh v4 id.
    #[must_use]
    pub fn new(
        kind: AlertKind,
        title: impl Into<String>,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            kind,
            title: title.into(),
            message: message.into(),
            timestamp,
            is_read: false,
        }
    }
}

/// Errors from the Ledger hexagonal port.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    /// Reading or subscribing to the ledger failed.
    #[error("load failed: {reason}")]
    LoadFailed {
        /// Human-readable description.
        reason: String,
    },
    /// Appending a transaction failed.
    #[error("write failed: {reason}")]
    WriteFailed {
        /// Human-readable description.
        reason: String,
    },
}

/// Errors from the Notifier hexagonal port.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The notification could not be delivered.
    #[error("delivery failed: {reason}")]
    DeliveryFailed {
        /// Human-readable description.
        reason: String,
    },
}

/// One push from the ledger: the full current list, or the error that
/// prevented reading it.
pub type LedgerUpdate<'a> = Result<&'a [Transaction], &'a LedgerError>;

/// Callback invoked with every [`LedgerUpdate`].
pub type ChangeListener = Box<dyn Fn(LedgerUpdate<'_>)>;

/// Handle for a registered [`ChangeListener`].
///
/// Dropping the handle unsubscribes; [`unsubscribe`](Self::unsubscribe) does
/// the same explicitly.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wrap the adapter-specific removal routine.
    #[must_use]
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self { cancel: Some(Box::new(cancel)) }
    }

    /// Remove the listener from the ledger.
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

/// Hexagonal port: the authoritative, append-only transaction ledger.
///
/// Implementations live in the binary crate (in-memory, `SQLite`). The
/// evaluator and producer depend exclusively on this trait.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait Ledger {
    /// Record a new transaction and return it with its assigned id.
    ///
    /// Registered listeners receive the updated list before this returns.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::WriteFailed` when the transaction cannot be stored.
    async fn append(&self, tx: NewTransaction) -> Result<Transaction, LedgerError>;

    /// Read the full transaction list, newest date first.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::LoadFailed` when the ledger cannot be read.
    async fn snapshot(&self) -> Result<Vec<Transaction>, LedgerError>;

    /// Register `listener`; it is called once immediately with the current list
    /// and again after every change. Read failures after registration are
    /// pushed as `Err` and do not end the subscription.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::LoadFailed` when the subscription cannot be set up.
    fn on_change(&self, listener: ChangeListener) -> Result<Subscription, LedgerError>;
}

/// Hexagonal port: surfaces freshly raised alerts to the user.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait Notifier {
    /// Deliver the alerts raised by one evaluation, plus the resulting unread count.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::DeliveryFailed` when the notification cannot be delivered.
    async fn notify(&self, fresh: &[Alert], unread_count: usize) -> Result<(), NotifyError>;
}

/// Hexagonal port: wall-clock source.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}
