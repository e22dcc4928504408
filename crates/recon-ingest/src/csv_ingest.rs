//! CSV loading into raw canonical rows.

use std::path::Path;

use anyhow::Context;
use tracing::debug;

use crate::headers::{CanonicalField, HeaderMap};

/// One source row with canonical fields as raw text, before any parsing.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub document: String,
    pub product: String,
    pub origin_unit: String,
    pub destination_unit: String,
    pub species: String,
    pub value: String,
    pub quantity: String,
    pub date: String,
    pub time: String,
}

/// Read a ledger CSV, resolving its header layout first. Fails on an
/// unreadable file or a missing required column; individual cells are
/// taken as-is (trimmed) and left for the preparation step to parse.
pub fn load_rows(path: &Path) -> anyhow::Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let map = HeaderMap::from_headers(&headers)
        .with_context(|| format!("mapping columns of {}", path.display()))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cell = |field: CanonicalField| -> String {
            map.index(field)
                .and_then(|i| record.get(i))
                .unwrap_or("")
                .trim()
                .to_string()
        };
        rows.push(RawRow {
            document: cell(CanonicalField::Document),
            product: cell(CanonicalField::Product),
            origin_unit: cell(CanonicalField::OriginUnit),
            destination_unit: cell(CanonicalField::DestinationUnit),
            species: cell(CanonicalField::Species),
            value: cell(CanonicalField::Value),
            quantity: cell(CanonicalField::Quantity),
            date: cell(CanonicalField::Date),
            time: cell(CanonicalField::Time),
        });
    }
    debug!(path = %path.display(), rows = rows.len(), "loaded ledger csv");
    Ok(rows)
}
