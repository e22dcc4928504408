//! Fuzzy header-name mapping.
//!
//! Source exports name their columns inconsistently ("Produto",
//! "descrição do material", "Qt Entrada", ...). Headers are matched by
//! lowercase substring rules, first match wins per canonical field, and
//! a required field that no header claims is a hard error before any row
//! is read.

use std::collections::BTreeMap;

use recon_model::{ReconError, Result};

/// Canonical fields a ledger column can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CanonicalField {
    Document,
    Product,
    OriginUnit,
    DestinationUnit,
    Value,
    Quantity,
    Species,
    Date,
    Time,
}

impl CanonicalField {
    /// Fields without which reconciliation cannot run. Species and time
    /// of day are optional enrichments.
    pub const REQUIRED: [CanonicalField; 7] = [
        Self::Document,
        Self::Product,
        Self::OriginUnit,
        Self::DestinationUnit,
        Self::Value,
        Self::Quantity,
        Self::Date,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Product => "product",
            Self::OriginUnit => "origin unit",
            Self::DestinationUnit => "destination unit",
            Self::Value => "value",
            Self::Quantity => "quantity",
            Self::Species => "species",
            Self::Date => "date",
            Self::Time => "time",
        }
    }
}

/// Classify one header by substring rules, in rule order.
pub fn classify_header(header: &str) -> Option<CanonicalField> {
    let h = header.trim().to_lowercase();
    let any = |terms: &[&str]| terms.iter().any(|t| h.contains(t));

    if any(&["produto", "descricao", "descrição", "material"]) {
        Some(CanonicalField::Product)
    } else if any(&["documento", "nf", "nota"]) {
        Some(CanonicalField::Document)
    } else if h.contains("origem") && h.contains("unidade") {
        Some(CanonicalField::OriginUnit)
    } else if h.contains("destino") && h.contains("unidade") {
        Some(CanonicalField::DestinationUnit)
    } else if any(&["valor total", "vl_total", "total"]) {
        Some(CanonicalField::Value)
    } else if any(&["quantidade", "qtd", "qt_entrada", "qt entrada"]) {
        Some(CanonicalField::Quantity)
    } else if any(&["especie", "espécie"]) {
        Some(CanonicalField::Species)
    } else if any(&["hora", "time"]) {
        Some(CanonicalField::Time)
    } else if any(&["data", "date"]) {
        Some(CanonicalField::Date)
    } else {
        None
    }
}

/// Resolved header layout: canonical field to column position.
#[derive(Debug, Default)]
pub struct HeaderMap {
    by_field: BTreeMap<CanonicalField, usize>,
}

impl HeaderMap {
    /// Map a header row. The earliest header claiming a field keeps it;
    /// later headers matching the same field are ignored.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Result<Self> {
        let mut by_field = BTreeMap::new();
        for (idx, header) in headers.iter().enumerate() {
            if let Some(field) = classify_header(header.as_ref()) {
                by_field.entry(field).or_insert(idx);
            }
        }
        for field in CanonicalField::REQUIRED {
            if !by_field.contains_key(&field) {
                return Err(ReconError::MissingColumn {
                    field: field.label(),
                    headers: headers.iter().map(|h| h.as_ref().to_string()).collect(),
                });
            }
        }
        Ok(Self { by_field })
    }

    /// Column position of a canonical field, if mapped.
    pub fn index(&self, field: CanonicalField) -> Option<usize> {
        self.by_field.get(&field).copied()
    }
}
