// Rust guideline compliant 2026-10-14

//! Session-side view of the ledger's push subscription.
//!
//! [`LedgerFeed`] keeps the most recent snapshot delivered by the `Ledger`
//! port, tracks a load status for the consumer, and wakes the evaluator on
//! every change. A read failure pushed by the ledger flips the status to
//! failed until the next good snapshot. A failed subscription is not retried;
//! a new feed has to be attached.

use domain::{ChangeListener, Ledger, LedgerUpdate, Subscription, Transaction};
use std::cell::RefCell;
use std::rc::Rc;
use tokio::sync::Notify;

/// Generic message surfaced to the consumer when the ledger cannot be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load transactions";

/// Load state of the feed, as shown to the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    /// Subscribed, no snapshot received yet.
    Loading,
    /// At least one snapshot received.
    Ready,
    /// Subscribing or reading failed; the cached list keeps the last good snapshot.
    Failed {
        /// Generic, user-facing message.
        message: String,
    },
}

impl FeedStatus {
    /// The boolean error flag.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[derive(Debug)]
struct FeedState {
    transactions: Vec<Transaction>,
    status: FeedStatus,
    deliveries: u64,
}

/// Cached ledger snapshot plus change signal.
///
/// Shared state sits behind `Rc<RefCell<_>>` because the ledger's listener
/// must own a handle to it; borrows never span an `.await`.
#[derive(Debug)]
pub struct LedgerFeed {
    state: Rc<RefCell<FeedState>>,
    changed: Rc<Notify>,
    subscription: RefCell<Option<Subscription>>,
}

impl LedgerFeed {
    /// Subscribe to `ledger` and start caching its snapshots.
    ///
    /// The snapshot delivered at registration time only primes the cache; the
    /// change signal fires for every later snapshot. When subscribing fails,
    /// or the ledger later pushes a read error, the error is logged and the
    /// status becomes [`FeedStatus::Failed`]. A pushed error does not raise the
    /// change signal.
    pub fn attach<L: Ledger>(ledger: &L) -> Self {
        let feed = Self {
            state: Rc::new(RefCell::new(FeedState {
                transactions: vec![],
                status: FeedStatus::Loading,
                deliveries: 0,
            })),
            changed: Rc::new(Notify::new()),
            subscription: RefCell::new(None),
        };

        let state = Rc::clone(&feed.state);
        let changed = Rc::clone(&feed.changed);
        let listener: ChangeListener = Box::new(move |update: LedgerUpdate<'_>| {
            let transactions = match update {
                Ok(transactions) => transactions,
                Err(e) => {
                    tracing::error!(error = %e, "feed.snapshot.failed");
                    state.borrow_mut().status =
                        FeedStatus::Failed { message: LOAD_FAILED_MESSAGE.to_owned() };
                    return;
                }
            };
            let deliveries = {
                let mut state = state.borrow_mut();
                state.transactions = transactions.to_vec();
                state.status = FeedStatus::Ready;
                state.deliveries += 1;
                state.deliveries
            };
            tracing::debug!(transactions = transactions.len(), deliveries, "feed.snapshot.received");
            if deliveries > 1 {
                changed.notify_one();
            }
        });

        match ledger.on_change(listener) {
            Ok(subscription) => {
                *feed.subscription.borrow_mut() = Some(subscription);
            }
            Err(e) => {
                tracing::error!(error = %e, "feed.subscribe.failed");
                feed.state.borrow_mut().status =
                    FeedStatus::Failed { message: LOAD_FAILED_MESSAGE.to_owned() };
            }
        }
        feed
    }

    /// Current load status.
    #[must_use]
    pub fn status(&self) -> FeedStatus {
        self.state.borrow().status.clone()
    }

    /// Run `f` against the cached snapshot without copying it.
    pub fn with_transactions<R>(&self, f: impl FnOnce(&[Transaction]) -> R) -> R {
        f(&self.state.borrow().transactions)
    }

    /// Copy of the cached snapshot.
    #[must_use]
    pub fn transactions(&self) -> Vec<Transaction> {
        self.state.borrow().transactions.clone()
    }

    /// Resolve after the next change (or immediately if one is pending).
    pub async fn changed(&self) {
        self.changed.notified().await;
    }

    /// `true` while the ledger subscription is live.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.subscription.borrow().is_some()
    }

    /// Cancel the subscription. Idempotent; the cached snapshot is kept.
    pub fn detach(&self) {
        let subscription = self.subscription.borrow_mut().take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
            tracing::debug!("feed.detached");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
