//! Result table CSV writer.
//!
//! Emits the fixed 20-column layout from [`OUTPUT_COLUMNS`]. Missing
//! values become empty cells, money and quantity cells are written with
//! two decimals, timestamps day-first.

use std::path::Path;

use anyhow::Context;
use chrono::NaiveDateTime;
use tracing::debug;

use recon_model::{OUTPUT_COLUMNS, ReconciliationRow};

const DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

pub fn write_result_csv(path: &Path, rows: &[ReconciliationRow]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(OUTPUT_COLUMNS)?;
    for row in rows {
        writer.write_record(row_cells(row))?;
    }
    writer.flush()?;
    debug!(path = %path.display(), rows = rows.len(), "result table written");
    Ok(())
}

fn row_cells(row: &ReconciliationRow) -> [String; 20] {
    [
        format_date(row.date),
        row.origin_unit.clone(),
        row.destination_unit.clone(),
        row.document.clone(),
        row.product_out.clone(),
        row.product_in.clone(),
        row.species.clone(),
        format_number(row.value_out),
        format_number(row.value_in),
        format_number(row.value_diff),
        format_number(row.qty_out),
        format_number(row.qty_in),
        format_number(row.qty_diff),
        format_date(row.date_in),
        format_number(row.lead_time_hours),
        row.status.label().to_string(),
        row.divergence.clone(),
        row.quality.map(|q| q.label()).unwrap_or("-").to_string(),
        row.observations.clone(),
        row.product_detail.clone(),
    ]
}

fn format_date(value: Option<NaiveDateTime>) -> String {
    value.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()
}

fn format_number(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}
