//! Data model for the ledger reconciliation engine.
//!
//! This crate defines the shared types that flow between ingestion,
//! matching, and reporting: ledger records, extracted product feature
//! sets, reconciliation result rows, and run statistics. It carries no
//! matching logic of its own.

pub mod error;
pub mod features;
pub mod options;
pub mod record;
pub mod row;
pub mod stats;

pub use error::{ReconError, Result};
pub use features::FeatureSet;
pub use options::ReconcileOptions;
pub use record::LedgerRecord;
pub use row::{MatchQuality, ReconciliationRow, Status, OUTPUT_COLUMNS};
pub use stats::SummaryStats;
