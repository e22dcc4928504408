//! Dataset preparation: raw rows to annotated ledger records.
//!
//! Applies the normalizers (facility aliases, amount parsing, tolerant
//! date parsing with optional time-of-day combination), drops records
//! touching an excluded facility, and fills the derived annotation fields
//! the engine matches on.

use tracing::debug;

use recon_engine::annotate_record;
use recon_model::{LedgerRecord, ReconcileOptions};
use recon_normalize::dates::{combine_date_time, parse_date_cell, parse_time_text};
use recon_normalize::{canonical_facility, parse_amount};

use crate::csv_ingest::RawRow;

/// Prepare raw rows for reconciliation. Cell-level parse failures degrade
/// to sentinels (0.0, missing date); only the exclusion filter removes
/// rows.
pub fn prepare_records(rows: Vec<RawRow>, options: &ReconcileOptions) -> Vec<LedgerRecord> {
    let total = rows.len();
    let mut records = Vec::with_capacity(total);

    for row in rows {
        let origin_unit = canonical_facility(&row.origin_unit);
        let destination_unit = canonical_facility(&row.destination_unit);
        if is_excluded(&origin_unit, &destination_unit, &options.excluded_facility_terms) {
            continue;
        }

        let time = parse_time_text(&row.time);
        let timestamp = parse_date_cell(&row.date).map(|date| combine_date_time(date, time));

        let mut record = LedgerRecord {
            document: row.document,
            product: row.product,
            origin_unit,
            destination_unit,
            species: row.species,
            value: parse_amount(&row.value),
            quantity: parse_amount(&row.quantity),
            timestamp,
            ..LedgerRecord::default()
        };
        annotate_record(&mut record);
        records.push(record);
    }

    if records.len() < total {
        debug!(
            dropped = total - records.len(),
            "records removed by the facility exclusion filter"
        );
    }
    records
}

fn is_excluded(origin: &str, destination: &str, terms: &[String]) -> bool {
    let origin = origin.to_uppercase();
    let destination = destination.to_uppercase();
    terms.iter().any(|term| {
        let term = term.to_uppercase();
        origin.contains(&term) || destination.contains(&term)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn raw(document: &str, product: &str, value: &str, quantity: &str, date: &str) -> RawRow {
        RawRow {
            document: document.to_string(),
            product: product.to_string(),
            origin_unit: "HOSPITAL A".to_string(),
            destination_unit: "HOSPITAL B".to_string(),
            value: value.to_string(),
            quantity: quantity.to_string(),
            date: date.to_string(),
            ..RawRow::default()
        }
    }

    #[test]
    fn prepares_and_annotates() {
        let rows = vec![raw("NF 100-A", "DIPIRONA 500MG COMP C/20", "1.234,56", "20", "01/03/2024")];
        let records = prepare_records(rows, &ReconcileOptions::default());

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.doc_num, "100");
        assert!((r.value - 1234.56).abs() < 1e-9);
        assert!((r.quantity - 20.0).abs() < 1e-9);
        assert!(r.timestamp.is_some());
        assert_eq!(r.features.concentration, "500MG");
    }

    #[test]
    fn time_column_is_combined_into_the_timestamp() {
        let mut row = raw("100", "DIPIRONA", "10", "1", "01/03/2024");
        row.time = "14:30".to_string();
        let records = prepare_records(vec![row], &ReconcileOptions::default());
        assert_eq!(records[0].timestamp.unwrap().hour(), 14);
    }

    #[test]
    fn excluded_facility_drops_the_record() {
        let mut kept = raw("100", "DIPIRONA", "10", "1", "01/03/2024");
        kept.destination_unit = "HOSPITAL B".to_string();
        let mut dropped = raw("200", "DIPIRONA", "10", "1", "01/03/2024");
        dropped.destination_unit = "CLINICA OFTALMOCASA".to_string();

        let records = prepare_records(vec![kept, dropped], &ReconcileOptions::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].doc_num, "100");
    }

    #[test]
    fn facility_aliases_are_canonicalized() {
        let mut row = raw("100", "DIPIRONA", "10", "1", "01/03/2024");
        row.origin_unit = "CASA DE PORTUGAL".to_string();
        let records = prepare_records(vec![row], &ReconcileOptions::default());
        assert_eq!(records[0].origin_unit, "HOSPITAL CASA DE PORTUGAL");
    }

    #[test]
    fn unparseable_cells_degrade_to_sentinels() {
        let rows = vec![raw("100", "DIPIRONA", "abc", "", "not a date")];
        let records = prepare_records(rows, &ReconcileOptions::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, 0.0);
        assert_eq!(records[0].quantity, 0.0);
        assert!(records[0].timestamp.is_none());
    }
}
