//! JSON statistics sidecar.
//!
//! Written next to the result table so downstream collaborators
//! (history storage, schedulers) can pick up a run's counters without
//! re-parsing the CSV.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;

use recon_model::SummaryStats;

/// Sidecar path for a given result table path.
pub fn stats_sidecar_path(result_path: &Path) -> PathBuf {
    result_path.with_extension("stats.json")
}

pub fn write_stats_json(path: &Path, stats: &SummaryStats) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), stats)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
