// Rust guideline compliant 2026-10-15

//! FinTrack alert session entry point.
//!
//! Seeds an in-memory ledger with the sample transactions, then runs the
//! alert evaluator alongside the demo producer until CTRL+C.
//!
//! # Usage
//!
//! ```text
//! # Press CTRL+C to stop
//! RUST_LOG=info cargo run --bin fintrack
//!
//! # Also show per-evaluation debug output
//! RUST_LOG=debug cargo run --bin fintrack
//! ```

mod adapters;
mod session;

// Load in_memory_ledger directly so it only enters this binary's module tree.
#[path = "adapters/in_memory_ledger.rs"]
mod in_memory_ledger;

use anyhow::Context as _;
use in_memory_ledger::InMemoryLedger;

/// Generous capacity: enough for hours of demo production.
const LEDGER_CAPACITY: usize = 10_000;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize the tracing subscriber before any async work.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let ledger = InMemoryLedger::new(LEDGER_CAPACITY);
    let seeded = producer::seed_ledger(&ledger)
        .await
        .context("failed to seed the in-memory ledger")?;
    tracing::info!(seeded, "main.ledger.seeded");

    session::run(&ledger).await
}
