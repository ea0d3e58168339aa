// Rust guideline compliant 2026-10-15

//! FinTrack alert session entry point -- `SQLite` ledger.
//!
//! Identical to the main `fintrack` binary except that the ledger is backed
//! by a `SQLite` file (`fintrack.db` in the current working directory). The
//! sample transactions are only seeded into an empty database, so history
//! accumulates across runs.
//!
//! # Usage
//!
//! ```text
//! # Press CTRL+C to stop
//! RUST_LOG=info cargo run --bin fintrack_sqlite
//! ```

mod adapters;
mod session;

// Load sqlite_ledger directly so it only enters this binary's module tree.
#[path = "adapters/sqlite_ledger.rs"]
mod sqlite_ledger;

use anyhow::Context as _;
use domain::Ledger as _;
use sqlite_ledger::SqliteLedger;

/// Database file created in the current working directory on first run.
const DB_URL: &str = "sqlite:fintrack.db";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize the tracing subscriber before any async work.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let ledger = SqliteLedger::new(DB_URL)
        .await
        .context("failed to open SQLite ledger")?;

    if ledger.snapshot().await.context("failed to read SQLite ledger")?.is_empty() {
        let seeded = producer::seed_ledger(&ledger)
            .await
            .context("failed to seed the SQLite ledger")?;
        tracing::info!(seeded, "main.ledger.seeded");
    }

    session::run(&ledger).await
}
