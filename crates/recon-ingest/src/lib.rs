//! Ledger ingestion: CSV loading, fuzzy header mapping and dataset
//! preparation.
//!
//! The only fatal failures here are input-shape problems (unreadable
//! file, required column missing after header mapping); everything at the
//! cell level degrades to sentinels inside the normalizers.

use std::path::Path;

use recon_model::{LedgerRecord, ReconcileOptions};

pub mod csv_ingest;
pub mod dataset;
pub mod headers;

pub use csv_ingest::{RawRow, load_rows};
pub use dataset::prepare_records;
pub use headers::{CanonicalField, HeaderMap, classify_header};

/// Load and prepare one ledger CSV end to end.
pub fn load_ledger(path: &Path, options: &ReconcileOptions) -> anyhow::Result<Vec<LedgerRecord>> {
    let rows = load_rows(path)?;
    Ok(prepare_records(rows, options))
}
