// Rust guideline compliant 2026-10-15

//! `SQLite` adapter for the `Ledger` port.
//!
//! Persists transactions to a `SQLite` file via `sqlx`. The full list is
//! cached in memory and updated on every successful write so that listeners
//! can be served synchronously; [`Ledger::snapshot`] always reads the table
//! and pushes read failures to listeners.
//!
//! Dates are stored as `YYYY-MM-DD` text, which sorts chronologically.

use std::cell::{Cell, RefCell};

use chrono::NaiveDate;
use domain::{
    ChangeListener, Ledger, LedgerError, NewTransaction, Subscription, Transaction,
    TransactionKind, TransactionStatus,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::adapters::listeners::ListenerRegistry;

const DATE_FORMAT: &str = "%Y-%m-%d";

type Row = (String, String, String, f64, String, String, String);

/// `Ledger` adapter backed by a `SQLite` database via `sqlx`.
#[derive(Debug)]
pub struct SqliteLedger {
    pool: sqlx::SqlitePool,
    cache: RefCell<Vec<Transaction>>,
    /// Set after a failed read until the next successful one.
    degraded: Cell<bool>,
    listeners: ListenerRegistry,
}

impl SqliteLedger {
    /// Open or create a `SQLite` database, initialize the schema and load the cache.
    ///
    /// A single pooled connection is used so that `sqlite::memory:` URLs
    /// see one database.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::LoadFailed` when the connection, the schema
    /// creation or the initial read fails.
    pub async fn new(db_url: &str) -> Result<Self, LedgerError> {
        let opts = db_url
            .parse::<SqliteConnectOptions>()
            .map_err(load_failed)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .map_err(load_failed)?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS transactions (
                id          TEXT PRIMARY KEY,
                date        TEXT NOT NULL,
                description TEXT NOT NULL,
                amount      REAL NOT NULL,
                kind        TEXT NOT NULL,   -- income / expense
                category    TEXT NOT NULL,
                status      TEXT NOT NULL    -- completed / pending
            )",
        )
        .execute(&pool)
        .await
        .map_err(load_failed)?;

        let ledger = Self {
            pool,
            cache: RefCell::new(vec![]),
            degraded: Cell::new(false),
            listeners: ListenerRegistry::new(),
        };
        let current = ledger.read_all().await?;
        tracing::info!(transactions = current.len(), "sqlite_ledger.opened");
        *ledger.cache.borrow_mut() = current;
        Ok(ledger)
    }

    async fn read_all(&self) -> Result<Vec<Transaction>, LedgerError> {
        let rows: Vec<Row> = sqlx::query_as(
            "SELECT id, date, description, amount, kind, category, status
             FROM transactions
             ORDER BY date DESC, rowid ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(load_failed)?;
        rows.into_iter().map(decode).collect()
    }
}

impl Ledger for SqliteLedger {
    /// Insert `tx` under a fresh UUID, add it to the cache and notify listeners.
    ///
    /// The table is not re-read: once the insert has succeeded the call
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::WriteFailed` on any `sqlx` error during the insert.
    async fn append(&self, tx: NewTransaction) -> Result<Transaction, LedgerError> {
        let recorded = tx.into_recorded(uuid::Uuid::new_v4().to_string());
        sqlx::query(
            "INSERT INTO transactions (id, date, description, amount, kind, category, status)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&recorded.id)
        .bind(recorded.date.format(DATE_FORMAT).to_string())
        .bind(&recorded.description)
        .bind(recorded.amount)
        .bind(recorded.kind.as_str())
        .bind(&recorded.category)
        .bind(recorded.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "sqlite_ledger.append.failed");
            LedgerError::WriteFailed { reason: e.to_string() }
        })?;

        {
            let mut cache = self.cache.borrow_mut();
            // Newest date first; a same-day entry goes after the existing ones.
            let at = cache.partition_point(|t| t.date >= recorded.date);
            cache.insert(at, recorded.clone());
        } // borrow_mut dropped before listeners read the list

        self.listeners.notify(&self.cache.borrow());
        Ok(recorded)
    }

    /// Read the table, newest date first.
    ///
    /// A failed read is pushed to listeners as `Err`; the next successful
    /// read pushes the list again.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::LoadFailed` on any `sqlx` error or corrupt row.
    async fn snapshot(&self) -> Result<Vec<Transaction>, LedgerError> {
        match self.read_all().await {
            Ok(current) => {
                let changed = self.degraded.replace(false) || *self.cache.borrow() != current;
                if changed {
                    self.cache.borrow_mut().clone_from(&current);
                    self.listeners.notify(&self.cache.borrow());
                }
                Ok(current)
            }
            Err(e) => {
                self.degraded.set(true);
                self.listeners.notify_error(&e);
                Err(e)
            }
        }
    }

    fn on_change(&self, listener: ChangeListener) -> Result<Subscription, LedgerError> {
        Ok(self.listeners.register(listener, &self.cache.borrow()))
    }
}

fn load_failed(e: sqlx::Error) -> LedgerError {
    tracing::error!(error = %e, "sqlite_ledger.load.failed");
    LedgerError::LoadFailed { reason: e.to_string() }
}

fn decode(row: Row) -> Result<Transaction, LedgerError> {
    let (id, date, description, amount, kind, category, status) = row;
    let corrupt = |field: &str, value: &str| {
        tracing::error!(%id, field, value, "sqlite_ledger.row.corrupt");
        LedgerError::LoadFailed { reason: format!("row {id}: invalid {field} {value:?}") }
    };
    let date = NaiveDate::parse_from_str(&date, DATE_FORMAT)
        .ok()
        .ok_or_else(|| corrupt("date", &date))?;
    let kind = TransactionKind::parse(&kind).ok_or_else(|| corrupt("kind", &kind))?;
    let status = TransactionStatus::parse(&status).ok_or_else(|| corrupt("status", &status))?;
    Ok(Transaction { id, date, description, amount, kind, category, status })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
