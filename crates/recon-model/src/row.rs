use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Fixed column layout of the result table, in emission order.
pub const OUTPUT_COLUMNS: [&str; 20] = [
    "Date",
    "Origin Unit",
    "Destination Unit",
    "Document",
    "Product (Out)",
    "Product (In)",
    "Species",
    "Value Out",
    "Value In",
    "Value Diff",
    "Qty Out",
    "Qty In",
    "Qty Diff",
    "Date In",
    "Receipt Lead Time (h)",
    "Status",
    "Divergence Type",
    "Match Quality",
    "Observations",
    "Product Match Detail",
];

/// Final classification of one reconciliation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Matched and within value/quantity tolerance.
    Compliant,
    /// Matched but outside tolerance, or received without shipment.
    NonCompliant,
    /// Outgoing record with no acceptable incoming correspondence.
    NotReceived,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Compliant => "Compliant",
            Self::NonCompliant => "Non-compliant",
            Self::NotReceived => "Not received",
        }
    }
}

/// Tier of confidence in a resolved match, derived from the composite
/// score (>= 90 excellent, >= 75 good, else fair).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MatchQuality {
    Fair,
    Good,
    Excellent,
}

impl MatchQuality {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
        }
    }

    /// Classify a composite match score into a quality tier.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::Excellent
        } else if score >= 75.0 {
            Self::Good
        } else {
            Self::Fair
        }
    }
}

/// One row of the reconciliation result table.
///
/// Every outgoing record yields exactly one row; every incoming record
/// backs at most one row as the "in" side, plus one orphan row per
/// incoming record never consumed. Rows are never mutated after emission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationRow {
    pub date: Option<NaiveDateTime>,
    pub origin_unit: String,
    pub destination_unit: String,
    pub document: String,
    pub product_out: String,
    pub product_in: String,
    pub species: String,
    pub value_out: Option<f64>,
    pub value_in: Option<f64>,
    pub value_diff: Option<f64>,
    pub qty_out: Option<f64>,
    pub qty_in: Option<f64>,
    pub qty_diff: Option<f64>,
    pub date_in: Option<NaiveDateTime>,
    /// Hours between shipment and receipt; negative when the incoming
    /// record predates the outgoing one.
    pub lead_time_hours: Option<f64>,
    pub status: Status,
    /// Which dimensions diverged ("-" when compliant).
    pub divergence: String,
    pub quality: Option<MatchQuality>,
    pub observations: String,
    /// Product-similarity rationale for the chosen candidate.
    pub product_detail: String,
}
