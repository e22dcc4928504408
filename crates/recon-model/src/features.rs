use serde::{Deserialize, Serialize};

/// Structured view of a free-text product description.
///
/// Computed once per record during preparation and cached on the record
/// for the life of the run. All fields are derived deterministically from
/// the raw description; absent components are empty strings or an empty
/// keyword list, never errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Uppercased, unit-normalized text with punctuation collapsed to
    /// single spaces.
    pub normalized: String,
    /// Coarse active-ingredient guess: the first two keyword tokens.
    pub ingredient: String,
    /// Space-joined concentration matches (e.g. "500MG", "250MG/5ML").
    pub concentration: String,
    /// First recognized dosage-form token (AMPOLA, COMP, FRASCO, ...).
    pub dosage_form: String,
    /// Units per pack extracted from patterns like `C/10` or `X10`.
    pub pack_quantity: String,
    /// Normalized physical-dimension signature; `25X7` and `7.0X25`
    /// produce the same signature.
    pub dimension: String,
    /// Up to five keyword tokens after stopword removal.
    pub keywords: Vec<String>,
}

impl FeatureSet {
    /// True when no component was extracted at all.
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty() && self.keywords.is_empty()
    }
}
