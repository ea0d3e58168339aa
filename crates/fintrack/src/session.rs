// Rust guideline compliant 2026-10-15

//! Session wiring shared by both binaries.
//!
//! Attaches the evaluator to a ledger, runs the demo producer against the
//! same ledger, and tears everything down on CTRL+C.

use crate::adapters::log_notifier::LogNotifier;
use crate::adapters::system_clock::SystemClock;
use alerts::AlertCenter;
use anyhow::Context as _;
use domain::{Clock, Ledger, Notifier};
use evaluator::{Cancellation, Evaluator, EvaluatorConfig, LedgerFeed};
use producer::{Producer, ProducerConfig};
use std::time::Duration;
use tracing::Instrument as _;

/// Run one alert session against `ledger` until CTRL+C.
///
/// # Errors
///
/// Returns an error when a component configuration is invalid, the ledger
/// cannot be read at start-up, or the CTRL+C handler cannot be installed.
/// Producer write failures are logged and end the producer only.
pub async fn run<L: Ledger>(ledger: &L) -> anyhow::Result<()> {
    // -- Evaluator: default five-minute cadence, re-runs on every ledger change --
    let evaluator_config = EvaluatorConfig::builder()
        .build()
        .context("failed to build evaluator config")?;

    // -- Producer: one small batch every 10 s keeps logs readable --
    let producer_config = ProducerConfig::builder(3)
        .poll_interval(Duration::from_secs(10))
        .build()
        .context("failed to build producer config")?;

    let center = AlertCenter::default();
    let shutdown = async {
        let r = tokio::signal::ctrl_c().await;
        tracing::info!("session.shutdown: ctrl_c received");
        r.context("failed to listen for ctrl_c")
    };

    run_until(
        ledger,
        &Evaluator::new(evaluator_config),
        &Producer::new(producer_config),
        &center,
        &SystemClock,
        &LogNotifier::new(),
        shutdown,
    )
    .await
}

/// Run one alert session against `ledger` until `shutdown` resolves.
///
/// The evaluator is polled first, so its start-up pass sees the ledger
/// before the producer's first batch.
///
/// # Errors
///
/// Returns an error when the ledger cannot be read at start-up, or the
/// error `shutdown` resolved with.
pub async fn run_until<L, C, N>(
    ledger: &L,
    evaluator: &Evaluator,
    producer: &Producer,
    center: &AlertCenter,
    clock: &C,
    notifier: &N,
    shutdown: impl Future<Output = anyhow::Result<()>>,
) -> anyhow::Result<()>
where
    L: Ledger,
    C: Clock,
    N: Notifier,
{
    let summary = calculator::summarize(&ledger.snapshot().await.context("failed to read ledger")?);
    tracing::info!(
        total_income = summary.total_income,
        total_expenses = summary.total_expenses,
        cash_balance = summary.cash_balance,
        "session.ledger.summary"
    );

    let feed = LedgerFeed::attach(ledger);
    tracing::info!(status = ?feed.status(), "session.feed.attached");
    let cancellation = Cancellation::new();

    let ((), shutdown, ()) = tokio::join!(
        evaluator
            .run(&feed, center, clock, notifier, &cancellation)
            .instrument(tracing::info_span!("evaluator")),
        async {
            let r = shutdown.await;
            cancellation.cancel();
            r
        },
        async {
            tokio::select! {
                () = cancellation.cancelled() => {}
                result = producer.run(ledger, clock) => {
                    if let Err(e) = result {
                        tracing::error!(error = %e, "session.producer.stopped");
                    }
                }
            }
        }
        .instrument(tracing::info_span!("producer"))
    );

    feed.detach();
    tracing::info!(
        alerts = center.alerts().len(),
        unread = center.unread_count(),
        "session.finished"
    );
    shutdown
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
