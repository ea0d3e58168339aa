// Rust guideline compliant 2026-10-15

//! Adapters (secondary ports) for the fintrack binaries.
//!
//! Each sub-module implements one hexagonal port trait defined in the
//! `domain` crate. The ledger adapters are loaded by their own binary via
//! `#[path]`; only the pieces both binaries use are declared here.

pub mod listeners;
pub mod log_notifier;
pub mod system_clock;
