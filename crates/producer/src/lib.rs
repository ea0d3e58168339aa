// Rust guideline compliant 2026-10-15

//! Producer component -- records transactions into a `Ledger` hexagonal port.
//!
//! Two sources: [`seed_ledger`] appends the fixed sample book used for demos,
//! and [`Producer`] keeps appending random income/expense entries dated
//! "today" so the evaluator's change trigger gets exercised.
//!
//! Entry points: [`seed_ledger`], [`Producer::generate_batch`],
//! [`Producer::produce_once`], [`Producer::run`]. Configuration via
//! [`ProducerConfig::builder`].

use chrono::NaiveDate;
use domain::{Clock, Ledger, LedgerError, NewTransaction, TransactionKind};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::cell::RefCell;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ProducerError
// ---------------------------------------------------------------------------

/// Errors that can occur during transaction production.
#[derive(Debug, thiserror::Error)]
pub enum ProducerError {
    /// The supplied configuration is invalid.
    #[error("invalid producer configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
    /// A ledger append failed.
    #[error("ledger error: {source}")]
    Ledger {
        /// The underlying ledger error.
        #[from]
        source: LedgerError,
    },
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

/// The sample book loaded into a fresh ledger: four client payments and one
/// marketing expense, mid-March 2024.
#[must_use]
pub fn sample_transactions() -> Vec<NewTransaction> {
    const SAMPLES: &[(u32, &str, f64, TransactionKind, &str)] = &[
        (15, "Website Development - Srishant Kumar", 25_000.0, TransactionKind::Income, "Technology"),
        (14, "UI/UX Design - Harshita Shankar", 18_000.0, TransactionKind::Income, "Design"),
        (13, "Marketing Campaign - Rohan Kumar", 15_000.0, TransactionKind::Expense, "Marketing"),
        (12, "Financial Analysis - Rayyan Seliya", 20_000.0, TransactionKind::Income, "Finance"),
        (11, "Software Development - TechCorp Inc.", 35_000.0, TransactionKind::Income, "Technology"),
    ];

    SAMPLES
        .iter()
        .filter_map(|&(day, description, amount, kind, category)| {
            Some(NewTransaction {
                date: NaiveDate::from_ymd_opt(2024, 3, day)?,
                description: description.to_owned(),
                amount,
                kind,
                category: category.to_owned(),
            })
        })
        .collect()
}

/// Append [`sample_transactions`] to `ledger`, one by one.
///
/// Returns the number of transactions written.
///
/// # Errors
///
/// Stops at and propagates the first append failure as [`ProducerError::Ledger`].
pub async fn seed_ledger<L: Ledger>(ledger: &L) -> Result<usize, ProducerError> {
    let mut written = 0;
    for tx in sample_transactions() {
        let recorded = ledger.append(tx).await?;
        tracing::debug!(id = %recorded.id, description = %recorded.description, "producer.seed.added");
        written += 1;
    }
    tracing::info!(written, "producer.seed.done");
    Ok(written)
}

// ---------------------------------------------------------------------------
// ProducerConfig + builder
// ---------------------------------------------------------------------------

/// Runtime configuration for a [`Producer`].
///
/// Construct via [`ProducerConfig::builder`].
#[derive(Debug)]
pub struct ProducerConfig {
    /// Maximum number of transactions per batch (range: `[1, max_batch]`).
    pub max_batch: usize,
    /// Delay between successive batches.
    pub poll_interval: Duration,
    /// Optional upper bound on the number of iterations. `None` means infinite.
    pub iterations: Option<u64>,
    /// Optional RNG seed for reproducible batches. `None` seeds from the OS.
    pub seed: Option<u64>,
}

/// Builder for [`ProducerConfig`].
///
/// Obtain via [`ProducerConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct ProducerConfigBuilder {
    max_batch: usize,
    poll_interval: Duration,
    iterations: Option<u64>,
    seed: Option<u64>,
}

impl ProducerConfig {
    /// Create a builder. `max_batch` is the only required parameter.
    ///
    /// Default values: `poll_interval = 30 s`, `iterations = None`, `seed = None`.
    #[must_use]
    pub fn builder(max_batch: usize) -> ProducerConfigBuilder {
        ProducerConfigBuilder {
            max_batch,
            poll_interval: Duration::from_secs(30),
            iterations: None,
            seed: None,
        }
    }
}

impl ProducerConfigBuilder {
    /// Override the inter-batch delay.
    #[must_use]
    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Set a finite iteration count. Without this the producer runs until dropped.
    #[must_use]
    pub fn iterations(mut self, n: u64) -> Self {
        self.iterations = Some(n);
        self
    }

    /// Fix the RNG seed for deterministic output (useful in tests).
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProducerError::InvalidConfig`] when `max_batch` is zero.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<ProducerConfig, ProducerError> {
        if self.max_batch == 0 {
            return Err(ProducerError::InvalidConfig {
                reason: "max_batch must be >= 1".to_owned(),
            });
        }
        Ok(ProducerConfig {
            max_batch: self.max_batch,
            poll_interval: self.poll_interval,
            iterations: self.iterations,
            seed: self.seed,
        })
    }
}

// ---------------------------------------------------------------------------
// Producer
// ---------------------------------------------------------------------------

/// Description/category pools for synthetic entries, one per kind.
const INCOME_SOURCES: &[(&str, &str)] = &[
    ("Website Development", "Technology"),
    ("UI/UX Design", "Design"),
    ("Financial Analysis", "Finance"),
    ("Software Development", "Technology"),
    ("Consulting Retainer", "Consulting"),
];

const EXPENSE_SOURCES: &[(&str, &str)] = &[
    ("Marketing Campaign", "Marketing"),
    ("Cloud Hosting", "Infrastructure"),
    ("Office Rent", "Operations"),
    ("Payroll", "Salaries"),
    ("Software Licenses", "Tools"),
];

/// Generates random transaction batches and appends them to a [`Ledger`] port.
///
/// Generic over `L: Ledger` and `C: Clock` for zero-cost static dispatch.
/// Holds no concrete adapter reference -- dependencies are injected per call.
#[derive(Debug)]
pub struct Producer {
    config: ProducerConfig,
    /// Interior mutability required because all public methods take `&self`.
    rng: RefCell<StdRng>,
}

impl Producer {
    /// Create a new producer from `config`.
    ///
    /// Seeds the RNG from `config.seed` if set, otherwise from the OS.
    #[must_use]
    pub fn new(config: ProducerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { config, rng: RefCell::new(rng) }
    }

    /// Generate one batch of random transactions dated `date`.
    ///
    /// Batch size is uniformly distributed in `[1, config.max_batch]`. Each
    /// entry is income or expense with equal odds and an amount in
    /// `[100.00, 20_000.00]` (integer cents / 100).
    #[must_use]
    pub fn generate_batch(&self, date: NaiveDate) -> Vec<NewTransaction> {
        let mut rng = self.rng.borrow_mut();
        let size = rng.random_range(1..=self.config.max_batch);
        let mut batch = Vec::with_capacity(size);
        for _ in 0..size {
            let (kind, pool) = if rng.random_bool(0.5) {
                (TransactionKind::Income, INCOME_SOURCES)
            } else {
                (TransactionKind::Expense, EXPENSE_SOURCES)
            };
            // Index is always in bounds: derived from len().
            let (description, category) = pool[rng.random_range(0..pool.len())];

            // Integer cents avoids float-rounding during generation.
            let amount = f64::from(rng.random_range(10_000u32..=2_000_000u32)) / 100.0;

            batch.push(NewTransaction {
                date,
                description: description.to_owned(),
                amount,
                kind,
                category: category.to_owned(),
            });
        }
        batch
    }

    /// Generate one batch dated today (per `clock`) and append it to `ledger`.
    ///
    /// Returns the number of transactions written.
    ///
    /// # Errors
    ///
    /// Propagates the first append failure wrapped in [`ProducerError::Ledger`];
    /// entries before it stay recorded.
    pub async fn produce_once<L: Ledger, C: Clock>(
        &self,
        ledger: &L,
        clock: &C,
    ) -> Result<usize, ProducerError> {
        let batch = self.generate_batch(clock.now().date_naive());
        let size = batch.len();
        tracing::debug!(size, "producer.batch.generated");
        for tx in batch {
            ledger.append(tx).await?;
        }
        Ok(size)
    }

    /// Run the production loop.
    ///
    /// Calls [`produce_once`](Self::produce_once) repeatedly, sleeping
    /// `config.poll_interval` between iterations. Returns `Ok(())` once
    /// `config.iterations` batches have been written; without a limit it runs
    /// until the future is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ProducerError::Ledger`] on the first append failure; there is
    /// no retry.
    pub async fn run<L: Ledger, C: Clock>(&self, ledger: &L, clock: &C) -> Result<(), ProducerError> {
        let mut count = 0u64;
        loop {
            if let Err(e) = self.produce_once(ledger, clock).await {
                tracing::error!(error = %e, "producer.append.failed");
                return Err(e);
            }

            count += 1;
            tracing::info!("producer.batch.written: iteration={count}");

            if let Some(max) = self.config.iterations
                && count >= max
            {
                tracing::info!("producer.run.stopped: iteration limit reached");
                return Ok(());
            }

            tokio::time::sleep(self.config.poll_interval).await;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
