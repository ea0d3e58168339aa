// Rust guideline compliant 2026-10-15

//! In-memory adapter for the `Ledger` port.
//!
//! Intended for demo runs and unit tests. Keeps transactions sorted newest
//! date first and returns `LedgerError::WriteFailed` once the configured
//! capacity is reached. `LedgerError::LoadFailed` is part of the port
//! contract but is never returned by this adapter.

use std::cell::RefCell;

use domain::{ChangeListener, Ledger, LedgerError, NewTransaction, Subscription, Transaction};

use crate::adapters::listeners::ListenerRegistry;

/// `Ledger` adapter backed by an in-memory `Vec<Transaction>`.
///
/// Listeners run synchronously inside [`Ledger::append`], after the write.
#[derive(Debug)]
pub struct InMemoryLedger {
    inner: RefCell<Vec<Transaction>>,
    listeners: ListenerRegistry,
    /// Maximum number of transactions the ledger can hold.
    capacity: usize,
}

impl InMemoryLedger {
    /// Create an empty ledger with the given `capacity`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { inner: RefCell::new(vec![]), listeners: ListenerRegistry::new(), capacity }
    }

    /// Return the number of stored transactions.
    #[cfg(test)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }
}

impl Ledger for InMemoryLedger {
    /// Record `tx` under a fresh UUID and notify listeners.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::WriteFailed` when the ledger is at capacity.
    async fn append(&self, tx: NewTransaction) -> Result<Transaction, LedgerError> {
        let recorded = {
            let mut inner = self.inner.borrow_mut();
            if inner.len() >= self.capacity {
                tracing::error!(capacity = self.capacity, "in_memory_ledger.append.full");
                return Err(LedgerError::WriteFailed {
                    reason: format!("ledger full (capacity: {})", self.capacity),
                });
            }
            let recorded = tx.into_recorded(uuid::Uuid::new_v4().to_string());
            inner.push(recorded.clone());
            // Stable sort: same-day entries keep insertion order.
            inner.sort_by(|a, b| b.date.cmp(&a.date));
            recorded
        }; // borrow_mut dropped before listeners read the list

        self.listeners.notify(&self.inner.borrow());
        Ok(recorded)
    }

    async fn snapshot(&self) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self.inner.borrow().clone())
    }

    fn on_change(&self, listener: ChangeListener) -> Result<Subscription, LedgerError> {
        Ok(self.listeners.register(listener, &self.inner.borrow()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
