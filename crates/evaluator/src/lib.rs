// Rust guideline compliant 2026-10-14

//! Alert evaluator -- recomputes financial metrics from the ledger snapshot,
//! compares them with the session thresholds, and raises alerts.
//!
//! Entry points: [`Evaluator::evaluate`], [`Evaluator::evaluate_once`],
//! [`Evaluator::run`]. Configuration via [`EvaluatorConfig::builder`].
//! The repeating task stops through a [`Cancellation`] handle.

pub mod feed;
pub mod message;

pub use feed::{FeedStatus, LOAD_FAILED_MESSAGE, LedgerFeed};

use alerts::AlertCenter;
use chrono::{DateTime, Utc};
use domain::{Alert, AlertThresholds, Clock, Notifier, Transaction};
use std::cell::Cell;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::{Instant, MissedTickBehavior};

/// Default delay between timer-driven evaluations.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(5 * 60);

// ---------------------------------------------------------------------------
// EvaluatorError
// ---------------------------------------------------------------------------

/// Errors that can occur while setting up the evaluator.
#[derive(Debug, thiserror::Error)]
pub enum EvaluatorError {
    /// The supplied configuration is invalid.
    #[error("invalid evaluator configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// EvaluatorConfig + builder
// ---------------------------------------------------------------------------

/// Runtime configuration for an [`Evaluator`].
///
/// Construct via [`EvaluatorConfig::builder`].
#[derive(Debug)]
pub struct EvaluatorConfig {
    /// Delay between timer-driven evaluations.
    pub check_interval: Duration,
    /// Optional upper bound on the number of evaluations. `None` means until cancelled.
    pub iterations: Option<u64>,
    /// Also evaluate right after a threshold update.
    pub reevaluate_on_threshold_change: bool,
}

/// Builder for [`EvaluatorConfig`].
///
/// Obtain via [`EvaluatorConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct EvaluatorConfigBuilder {
    check_interval: Duration,
    iterations: Option<u64>,
    reevaluate_on_threshold_change: bool,
}

impl EvaluatorConfig {
    /// Create a builder.
    ///
    /// Default values: `check_interval = 5 min`, `iterations = None`,
    /// `reevaluate_on_threshold_change = false`.
    #[must_use]
    pub fn builder() -> EvaluatorConfigBuilder {
        EvaluatorConfigBuilder {
            check_interval: DEFAULT_CHECK_INTERVAL,
            iterations: None,
            reevaluate_on_threshold_change: false,
        }
    }
}

impl EvaluatorConfigBuilder {
    /// Override the timer period.
    #[must_use]
    pub fn check_interval(mut self, check_interval: Duration) -> Self {
        self.check_interval = check_interval;
        self
    }

    /// Set a finite evaluation count. Without this the evaluator runs until cancelled.
    #[must_use]
    pub fn iterations(mut self, n: u64) -> Self {
        self.iterations = Some(n);
        self
    }

    /// Evaluate immediately whenever the thresholds are updated.
    #[must_use]
    pub fn reevaluate_on_threshold_change(mut self, enabled: bool) -> Self {
        self.reevaluate_on_threshold_change = enabled;
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluatorError::InvalidConfig`] when `check_interval` is zero.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<EvaluatorConfig, EvaluatorError> {
        if self.check_interval.is_zero() {
            return Err(EvaluatorError::InvalidConfig {
                reason: "check_interval must be > 0".to_owned(),
            });
        }
        Ok(EvaluatorConfig {
            check_interval: self.check_interval,
            iterations: self.iterations,
            reevaluate_on_threshold_change: self.reevaluate_on_threshold_change,
        })
    }
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// Stop signal for [`Evaluator::run`], fired at session teardown.
#[derive(Debug, Default)]
pub struct Cancellation {
    cancelled: Cell<bool>,
    notify: Notify,
}

impl Cancellation {
    /// Create a handle that has not fired yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal. Idempotent: safe to call multiple times.
    pub fn cancel(&self) {
        self.cancelled.set(true);
        self.notify.notify_waiters();
    }

    /// `true` once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// Resolve once the signal has fired.
    pub async fn cancelled(&self) {
        while !self.cancelled.get() {
            self.notify.notified().await;
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

/// What woke the evaluator up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Startup,
    Timer,
    LedgerChange,
    ThresholdUpdate,
}

/// Turns ledger snapshots into alerts.
///
/// Each evaluation is independent: metrics are recomputed from scratch and
/// every fired rule yields a new alert, even if the same rule fired on the
/// previous tick. Generic over the `Clock` and `Notifier` ports; holds no
/// adapter references.
#[derive(Debug)]
pub struct Evaluator {
    config: EvaluatorConfig,
}

impl Evaluator {
    /// Create a new evaluator from `config`.
    #[must_use]
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    /// Compute metrics for `transactions` as of `now` and return one alert per
    /// breached threshold, stamped with `now`.
    #[must_use]
    pub fn evaluate(
        &self,
        transactions: &[Transaction],
        thresholds: &AlertThresholds,
        now: DateTime<Utc>,
    ) -> Vec<Alert> {
        let metrics = calculator::compute_metrics(transactions, now);
        message::breaches(&metrics, thresholds)
            .into_iter()
            .map(|breach| Alert::new(breach.kind, breach.title, breach.message, now))
            .collect()
    }

    /// Evaluate the cached snapshot of `feed`, add the raised alerts to
    /// `center` in one batch, and tell `notifier` about them.
    ///
    /// Notification is best-effort: a delivery failure is logged and the
    /// alerts stay in the store. Returns the number of alerts raised.
    pub async fn evaluate_once<C, N>(
        &self,
        feed: &LedgerFeed,
        center: &AlertCenter,
        clock: &C,
        notifier: &N,
    ) -> usize
    where
        C: Clock,
        N: Notifier,
    {
        let now = clock.now();
        let thresholds = center.thresholds();
        let fresh = feed.with_transactions(|txs| self.evaluate(txs, &thresholds, now));
        let raised = fresh.len();
        if raised == 0 {
            return 0;
        }

        center.add(fresh.clone());
        let unread = center.unread_count();
        tracing::info!(raised, unread, "evaluator.alerts.raised");

        if let Err(e) = notifier.notify(&fresh, unread).await {
            tracing::warn!(error = %e, "evaluator.notify.failed");
        }
        raised
    }

    /// Run the evaluation loop until cancelled.
    ///
    /// Evaluates at once on the first poll, before any other future in the same
    /// `join!` can touch the ledger or thresholds, then on every
    /// `check_interval` tick (the first one a full period later), every ledger
    /// change and, if configured, every threshold update. Stops cleanly when:
    /// - `cancellation` fires, or
    /// - `config.iterations` evaluations have run, the start-up one included.
    pub async fn run<C, N>(
        &self,
        feed: &LedgerFeed,
        center: &AlertCenter,
        clock: &C,
        notifier: &N,
        cancellation: &Cancellation,
    ) where
        C: Clock,
        N: Notifier,
    {
        if cancellation.is_cancelled() {
            tracing::info!("evaluator.run.stopped: cancelled before start");
            return;
        }

        let raised = self.evaluate_once(feed, center, clock, notifier).await;
        let mut count = 1u64;
        let trigger = Trigger::Startup;
        tracing::debug!(iteration = count, ?trigger, raised, "evaluator.tick.done");
        if self.limit_reached(count) {
            return;
        }

        let period = self.config.check_interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let trigger = tokio::select! {
                biased;
                () = cancellation.cancelled() => {
                    tracing::info!("evaluator.run.stopped: cancelled after {count} evaluation(s)");
                    return;
                }
                _ = ticker.tick() => Trigger::Timer,
                () = feed.changed() => Trigger::LedgerChange,
                () = center.thresholds_changed(), if self.config.reevaluate_on_threshold_change => {
                    Trigger::ThresholdUpdate
                }
            };

            let raised = self.evaluate_once(feed, center, clock, notifier).await;
            count += 1;
            tracing::debug!(iteration = count, ?trigger, raised, "evaluator.tick.done");

            if self.limit_reached(count) {
                return;
            }
        }
    }

    fn limit_reached(&self, count: u64) -> bool {
        if let Some(max) = self.config.iterations
            && count >= max
        {
            tracing::info!("evaluator.run.stopped: iteration limit reached");
            return true;
        }
        false
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::{Cancellation, Evaluator, EvaluatorConfig, EvaluatorError, LedgerFeed};
    use crate::feed::tests::{MockLedger, expense};
    use crate::message::{HIGH_BURN_RATE, HIGH_EXPENSE_GROWTH, LOW_CASH_RUNWAY};
    use alerts::AlertCenter;
    use chrono::{DateTime, NaiveDate, TimeZone as _, Utc};
    use domain::{
        Alert, AlertKind, AlertThresholds, Clock, Ledger as _, NewTransaction, Notifier,
        NotifyError, PartialAlertThresholds, Transaction, TransactionKind,
    };
    use std::cell::{Cell, RefCell};
    use std::time::Duration;

    // ------------------------------------------------------------------
    // Test helpers
    // ------------------------------------------------------------------

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 20, 12, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn income(amount: f64, date: NaiveDate) -> NewTransaction {
        NewTransaction {
            date,
            description: "Client payment".to_owned(),
            amount,
            kind: TransactionKind::Income,
            category: "Technology".to_owned(),
        }
    }

    /// Ledger whose metrics are burn 60 000, runway 4, growth 20 % as of `now()`.
    fn stressed_ledger() -> Vec<Transaction> {
        [
            income(420_000.0, date(2024, 1, 10)),
            expense(15_000.0, date(2024, 9, 1)),
            expense(75_000.0, date(2024, 10, 10)),
            expense(90_000.0, date(2024, 11, 5)),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, tx)| tx.into_recorded(format!("tx-{i}")))
        .collect()
    }

    /// Ledger whose metrics are burn 10 000, runway 20, growth 5 % as of `now()`.
    fn healthy_ledger() -> Vec<Transaction> {
        [
            income(230_000.0, date(2024, 1, 10)),
            expense(9_500.0, date(2024, 9, 1)),
            expense(10_000.0, date(2024, 10, 10)),
            expense(10_500.0, date(2024, 11, 5)),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, tx)| tx.into_recorded(format!("tx-{i}")))
        .collect()
    }

    fn make_evaluator() -> Evaluator {
        Evaluator::new(EvaluatorConfig::builder().build().unwrap())
    }

    struct MockNotifier {
        calls: Cell<u32>,
        last_batch: RefCell<Vec<Alert>>,
        last_unread: Cell<usize>,
        always_fail: bool,
    }

    impl MockNotifier {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
                last_batch: RefCell::new(vec![]),
                last_unread: Cell::new(0),
                always_fail: false,
            }
        }

        fn always_failing() -> Self {
            Self { always_fail: true, ..Self::new() }
        }
    }

    impl Notifier for MockNotifier {
        async fn notify(&self, fresh: &[Alert], unread_count: usize) -> Result<(), NotifyError> {
            self.calls.set(self.calls.get() + 1);
            *self.last_batch.borrow_mut() = fresh.to_vec();
            self.last_unread.set(unread_count);
            if self.always_fail {
                return Err(NotifyError::DeliveryFailed { reason: "mock failure".to_owned() });
            }
            Ok(())
        }
    }

    // ------------------------------------------------------------------
    // EvaluatorConfig validation
    // ------------------------------------------------------------------

    #[test]
    fn config_rejects_zero_interval() {
        let result = EvaluatorConfig::builder().check_interval(Duration::ZERO).build();
        assert!(matches!(result, Err(EvaluatorError::InvalidConfig { .. })));
    }

    #[test]
    fn builder_defaults() {
        let config = EvaluatorConfig::builder().build().unwrap();
        assert_eq!(config.check_interval, Duration::from_secs(300));
        assert_eq!(config.iterations, None);
        assert!(!config.reevaluate_on_threshold_change);
    }

    #[test]
    fn builder_overrides() {
        let config = EvaluatorConfig::builder()
            .check_interval(Duration::from_secs(1))
            .iterations(4)
            .reevaluate_on_threshold_change(true)
            .build()
            .unwrap();
        assert_eq!(config.check_interval, Duration::from_secs(1));
        assert_eq!(config.iterations, Some(4));
        assert!(config.reevaluate_on_threshold_change);
    }

    // ------------------------------------------------------------------
    // Pure evaluation
    // ------------------------------------------------------------------

    #[test]
    fn stressed_metrics_raise_three_alerts() {
        let alerts =
            make_evaluator().evaluate(&stressed_ledger(), &AlertThresholds::default(), now());

        let titles: Vec<_> = alerts.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec![HIGH_BURN_RATE, LOW_CASH_RUNWAY, HIGH_EXPENSE_GROWTH]);
        let dangers = alerts.iter().filter(|a| a.kind == AlertKind::Danger).count();
        let warnings = alerts.iter().filter(|a| a.kind == AlertKind::Warning).count();
        assert_eq!((dangers, warnings), (2, 1));
        assert!(alerts.iter().all(|a| !a.is_read && a.timestamp == now()));
    }

    #[test]
    fn healthy_metrics_raise_nothing() {
        let alerts =
            make_evaluator().evaluate(&healthy_ledger(), &AlertThresholds::default(), now());
        assert!(alerts.is_empty());
    }

    #[test]
    fn empty_ledger_raises_nothing_with_defaults() {
        // Runway sentinel 12 >= 6, burn 0, growth 0.
        let alerts = make_evaluator().evaluate(&[], &AlertThresholds::default(), now());
        assert!(alerts.is_empty());
    }

    #[test]
    fn every_alert_gets_a_fresh_id() {
        let alerts =
            make_evaluator().evaluate(&stressed_ledger(), &AlertThresholds::default(), now());
        assert_ne!(alerts[0].id, alerts[1].id);
        assert_ne!(alerts[1].id, alerts[2].id);
    }

    // ------------------------------------------------------------------
    // evaluate_once
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn evaluate_once_adds_one_batch_and_notifies() {
        let ledger = MockLedger::new(stressed_ledger());
        let feed = LedgerFeed::attach(&ledger);
        let center = AlertCenter::default();
        let notifier = MockNotifier::new();

        let raised = make_evaluator()
            .evaluate_once(&feed, &center, &FixedClock(now()), &notifier)
            .await;

        assert_eq!(raised, 3);
        assert_eq!(center.alerts().len(), 3);
        assert_eq!(center.unread_count(), 3);
        assert_eq!(notifier.calls.get(), 1);
        assert_eq!(notifier.last_batch.borrow().len(), 3);
        assert_eq!(notifier.last_unread.get(), 3);
    }

    #[tokio::test]
    async fn evaluate_once_skips_notifier_when_healthy() {
        let ledger = MockLedger::new(healthy_ledger());
        let feed = LedgerFeed::attach(&ledger);
        let center = AlertCenter::default();
        let notifier = MockNotifier::new();

        let raised = make_evaluator()
            .evaluate_once(&feed, &center, &FixedClock(now()), &notifier)
            .await;

        assert_eq!(raised, 0);
        assert!(center.alerts().is_empty());
        assert_eq!(notifier.calls.get(), 0);
    }

    #[tokio::test]
    async fn notify_failure_keeps_alerts() {
        let ledger = MockLedger::new(stressed_ledger());
        let feed = LedgerFeed::attach(&ledger);
        let center = AlertCenter::default();
        let notifier = MockNotifier::always_failing();

        let raised = make_evaluator()
            .evaluate_once(&feed, &center, &FixedClock(now()), &notifier)
            .await;

        assert_eq!(raised, 3);
        assert_eq!(center.alerts().len(), 3);
        assert_eq!(notifier.calls.get(), 1);
    }

    #[tokio::test]
    async fn repeated_breaches_are_not_deduplicated() {
        let ledger = MockLedger::new(stressed_ledger());
        let feed = LedgerFeed::attach(&ledger);
        let center = AlertCenter::default();
        let notifier = MockNotifier::new();
        let evaluator = make_evaluator();
        let clock = FixedClock(now());

        evaluator.evaluate_once(&feed, &center, &clock, &notifier).await;
        evaluator.evaluate_once(&feed, &center, &clock, &notifier).await;

        assert_eq!(center.alerts().len(), 6);
    }

    #[tokio::test]
    async fn store_stays_bounded_under_repeated_ticks() {
        let ledger = MockLedger::new(stressed_ledger());
        let feed = LedgerFeed::attach(&ledger);
        let center = AlertCenter::default();
        let notifier = MockNotifier::new();
        let evaluator = make_evaluator();
        let clock = FixedClock(now());

        for _ in 0..20 {
            evaluator.evaluate_once(&feed, &center, &clock, &notifier).await;
        }

        assert_eq!(center.alerts().len(), alerts::ALERT_CAPACITY);
        assert_eq!(notifier.last_unread.get(), alerts::ALERT_CAPACITY);
    }

    #[tokio::test]
    async fn updated_thresholds_apply_on_next_evaluation() {
        let ledger = MockLedger::new(healthy_ledger());
        let feed = LedgerFeed::attach(&ledger);
        let center = AlertCenter::default();
        let notifier = MockNotifier::new();
        let evaluator = make_evaluator();
        let clock = FixedClock(now());

        center.update_thresholds(PartialAlertThresholds {
            cash_runway: Some(25.0),
            ..Default::default()
        });
        evaluator.evaluate_once(&feed, &center, &clock, &notifier).await;

        let alerts = center.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, LOW_CASH_RUNWAY);
        assert_eq!(
            alerts[0].message,
            "Your cash runway of 20.0 months is below the minimum threshold of 25.0 months."
        );
    }

    #[tokio::test]
    async fn failed_feed_evaluates_empty_snapshot() {
        let ledger = MockLedger::failing_subscribe();
        let feed = LedgerFeed::attach(&ledger);
        let center = AlertCenter::new(AlertThresholds {
            cash_runway: 24.0,
            ..AlertThresholds::default()
        });
        let notifier = MockNotifier::new();

        let raised = make_evaluator()
            .evaluate_once(&feed, &center, &FixedClock(now()), &notifier)
            .await;

        // Sentinel runway 12 < 24.
        assert_eq!(raised, 1);
        assert!(feed.status().is_failed());
    }

    // ------------------------------------------------------------------
    // run loop
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn run_evaluates_immediately_on_start() {
        let ledger = MockLedger::new(stressed_ledger());
        let feed = LedgerFeed::attach(&ledger);
        let center = AlertCenter::default();
        let notifier = MockNotifier::new();
        let evaluator = Evaluator::new(
            EvaluatorConfig::builder()
                .check_interval(Duration::from_secs(3600))
                .iterations(1)
                .build()
                .unwrap(),
        );

        evaluator
            .run(&feed, &center, &FixedClock(now()), &notifier, &Cancellation::new())
            .await;

        assert_eq!(center.alerts().len(), 3);
    }

    #[tokio::test]
    async fn run_repeats_on_timer() {
        let ledger = MockLedger::new(stressed_ledger());
        let feed = LedgerFeed::attach(&ledger);
        let center = AlertCenter::default();
        let notifier = MockNotifier::new();
        let evaluator = Evaluator::new(
            EvaluatorConfig::builder()
                .check_interval(Duration::from_millis(1))
                .iterations(3)
                .build()
                .unwrap(),
        );

        evaluator
            .run(&feed, &center, &FixedClock(now()), &notifier, &Cancellation::new())
            .await;

        assert_eq!(notifier.calls.get(), 3);
        assert_eq!(center.alerts().len(), 9);
    }

    #[tokio::test]
    async fn run_reacts_to_ledger_change() {
        let ledger = MockLedger::new(healthy_ledger());
        let feed = LedgerFeed::attach(&ledger);
        let center = AlertCenter::default();
        let notifier = MockNotifier::new();
        let clock = FixedClock(now());
        let cancellation = Cancellation::new();
        // Long timer: only the start-up pass and the append can trigger.
        let evaluator = Evaluator::new(
            EvaluatorConfig::builder()
                .check_interval(Duration::from_secs(3600))
                .iterations(2)
                .build()
                .unwrap(),
        );

        tokio::join!(
            evaluator.run(&feed, &center, &clock, &notifier, &cancellation),
            async {
                // A 1M November expense breaches every rule.
                ledger.append(expense(1_000_000.0, date(2024, 11, 18))).await.unwrap();
            }
        );

        let titles: Vec<_> = center.alerts().iter().map(|a| a.title.clone()).collect();
        assert_eq!(titles, vec![HIGH_BURN_RATE, LOW_CASH_RUNWAY, HIGH_EXPENSE_GROWTH]);
        assert_eq!(notifier.calls.get(), 1);
    }

    #[tokio::test]
    async fn startup_pass_sees_the_ledger_before_concurrent_appends() {
        let ledger = MockLedger::new(vec![]);
        let feed = LedgerFeed::attach(&ledger);
        // Sentinel runway 12 < 24: the empty ledger raises exactly one alert.
        let center = AlertCenter::new(AlertThresholds {
            cash_runway: 24.0,
            ..AlertThresholds::default()
        });
        let notifier = MockNotifier::new();
        let clock = FixedClock(now());
        let cancellation = Cancellation::new();
        let evaluator = Evaluator::new(
            EvaluatorConfig::builder()
                .check_interval(Duration::from_secs(3600))
                .iterations(2)
                .build()
                .unwrap(),
        );

        tokio::join!(
            evaluator.run(&feed, &center, &clock, &notifier, &cancellation),
            async {
                assert_eq!(center.alerts().len(), 1, "start-up pass must run on the first poll");
                ledger.append(expense(1_000_000.0, date(2024, 11, 18))).await.unwrap();
            }
        );

        // One batch for the empty ledger, one for the change: never the same snapshot twice.
        // No October expenses, so growth stays 0.
        let titles: Vec<_> = center.alerts().iter().map(|a| a.title.clone()).collect();
        assert_eq!(titles, vec![HIGH_BURN_RATE, LOW_CASH_RUNWAY, LOW_CASH_RUNWAY]);
        assert_eq!(notifier.calls.get(), 2);
    }

    #[tokio::test]
    async fn first_timer_tick_waits_a_full_period() {
        let ledger = MockLedger::new(stressed_ledger());
        let feed = LedgerFeed::attach(&ledger);
        let center = AlertCenter::default();
        let notifier = MockNotifier::new();
        let clock = FixedClock(now());
        let cancellation = Cancellation::new();
        let evaluator = Evaluator::new(
            EvaluatorConfig::builder()
                .check_interval(Duration::from_millis(200))
                .build()
                .unwrap(),
        );

        tokio::join!(
            evaluator.run(&feed, &center, &clock, &notifier, &cancellation),
            async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                cancellation.cancel();
            }
        );

        assert_eq!(notifier.calls.get(), 1, "only the start-up pass before the first period");
    }

    #[tokio::test]
    async fn run_ignores_threshold_updates_by_default() {
        let ledger = MockLedger::new(healthy_ledger());
        let feed = LedgerFeed::attach(&ledger);
        let center = AlertCenter::default();
        let notifier = MockNotifier::new();
        let clock = FixedClock(now());
        let cancellation = Cancellation::new();
        let evaluator = Evaluator::new(
            EvaluatorConfig::builder()
                .check_interval(Duration::from_secs(3600))
                .build()
                .unwrap(),
        );

        tokio::join!(
            evaluator.run(&feed, &center, &clock, &notifier, &cancellation),
            async {
                center.update_thresholds(PartialAlertThresholds {
                    cash_runway: Some(25.0),
                    ..Default::default()
                });
                tokio::time::sleep(Duration::from_millis(20)).await;
                cancellation.cancel();
            }
        );

        assert!(center.alerts().is_empty(), "no evaluation should follow a threshold update");
    }

    #[tokio::test]
    async fn run_reevaluates_on_threshold_update_when_enabled() {
        let ledger = MockLedger::new(healthy_ledger());
        let feed = LedgerFeed::attach(&ledger);
        let center = AlertCenter::default();
        let notifier = MockNotifier::new();
        let clock = FixedClock(now());
        let cancellation = Cancellation::new();
        let evaluator = Evaluator::new(
            EvaluatorConfig::builder()
                .check_interval(Duration::from_secs(3600))
                .iterations(2)
                .reevaluate_on_threshold_change(true)
                .build()
                .unwrap(),
        );

        tokio::join!(
            evaluator.run(&feed, &center, &clock, &notifier, &cancellation),
            async {
                center.update_thresholds(PartialAlertThresholds {
                    cash_runway: Some(25.0),
                    ..Default::default()
                });
            }
        );

        let alerts = center.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, LOW_CASH_RUNWAY);
    }

    #[tokio::test]
    async fn run_stops_on_cancellation() {
        let ledger = MockLedger::new(stressed_ledger());
        let feed = LedgerFeed::attach(&ledger);
        let center = AlertCenter::default();
        let notifier = MockNotifier::new();
        let clock = FixedClock(now());
        let cancellation = Cancellation::new();
        let evaluator = make_evaluator();

        tokio::join!(
            evaluator.run(&feed, &center, &clock, &notifier, &cancellation),
            async {
                tokio::task::yield_now().await;
                cancellation.cancel();
                cancellation.cancel();
            }
        );

        assert!(cancellation.is_cancelled());
        assert_eq!(center.alerts().len(), 3, "only the start-up batch");
    }

    #[tokio::test]
    async fn run_returns_at_once_when_already_cancelled() {
        let ledger = MockLedger::new(stressed_ledger());
        let feed = LedgerFeed::attach(&ledger);
        let center = AlertCenter::default();
        let notifier = MockNotifier::new();
        let cancellation = Cancellation::new();
        cancellation.cancel();

        make_evaluator()
            .run(&feed, &center, &FixedClock(now()), &notifier, &cancellation)
            .await;

        assert!(center.alerts().is_empty());
    }
}
