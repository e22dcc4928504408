use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::features::FeatureSet;

/// One line item of a shipped ("outgoing") or received ("incoming")
/// transaction ledger. Both sides share the same shape.
///
/// The raw fields are immutable once loaded; the `doc_num`, `features`,
/// normalized-unit and `exempt_destination` fields are derived
/// annotations filled in during dataset preparation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Free-text document reference; may embed a numeric id.
    pub document: String,
    /// Free-text product description.
    pub product: String,
    /// Shipping facility name (canonicalized).
    pub origin_unit: String,
    /// Receiving facility name (canonicalized).
    pub destination_unit: String,
    /// Species/category of the movement (may be empty).
    pub species: String,
    /// Monetary value of the line.
    pub value: f64,
    /// Quantity of the line.
    pub quantity: f64,
    /// Movement timestamp; `None` when the source cell was unparseable.
    pub timestamp: Option<NaiveDateTime>,

    /// First digit run extracted from `document`; empty when none.
    pub doc_num: String,
    /// Uppercased origin unit for comparisons.
    pub origin_norm: String,
    /// Uppercased destination unit for comparisons.
    pub destination_norm: String,
    /// Cached product feature set.
    pub features: FeatureSet,
    /// Destination is the document-exempt facility (loans to it are known
    /// to omit document references).
    pub exempt_destination: bool,
}

impl LedgerRecord {
    /// True when the record carries a usable numeric document id.
    pub fn has_document(&self) -> bool {
        !self.doc_num.is_empty()
    }
}
