// Rust guideline compliant 2026-10-15

//! Listener bookkeeping shared by the ledger adapters.
//!
//! Implements the push half of the `Ledger` port: registration delivers the
//! current list at once, [`ListenerRegistry::notify`] fans a new list out,
//! [`ListenerRegistry::notify_error`] fans a read failure out, and the
//! returned `Subscription` removes its listener when dropped.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use domain::{ChangeListener, LedgerError, LedgerUpdate, Subscription, Transaction};

/// Registered change listeners, keyed by a per-registry counter.
pub struct ListenerRegistry {
    /// `Rc` so that a `Subscription` can remove its entry without borrowing the ledger.
    listeners: Rc<RefCell<Vec<(u64, ChangeListener)>>>,
    next_id: Cell<u64>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { listeners: Rc::new(RefCell::new(vec![])), next_id: Cell::new(0) }
    }

    /// Deliver `current` to `listener`, then keep it for later changes.
    pub fn register(&self, listener: ChangeListener, current: &[Transaction]) -> Subscription {
        listener(Ok(current));

        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().push((id, listener));
        tracing::debug!(listener = id, "ledger.listener.registered");

        let listeners = Rc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.borrow_mut().retain(|(other, _)| *other != id);
                tracing::debug!(listener = id, "ledger.listener.removed");
            }
        })
    }

    /// Hand `current` to every registered listener.
    ///
    /// Listeners must not register or unsubscribe from inside the callback.
    pub fn notify(&self, current: &[Transaction]) {
        self.deliver(Ok(current));
    }

    /// Hand a read failure to every registered listener.
    pub fn notify_error(&self, error: &LedgerError) {
        tracing::debug!(listeners = self.len(), "ledger.listener.error_pushed");
        self.deliver(Err(error));
    }

    fn deliver(&self, update: LedgerUpdate<'_>) {
        for (_, listener) in self.listeners.borrow().iter() {
            listener(update);
        }
    }

    /// Number of live listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry").field("listeners", &self.len()).finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
