use serde::{Deserialize, Serialize};

/// Caller-supplied knobs for one reconciliation run.
///
/// Everything else (guardrail percentages, conformance tolerances, score
/// weights) is business-tuned and lives as constants in the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileOptions {
    /// Global product-similarity threshold applied when no document match
    /// is available (0-100).
    pub similarity_threshold: f64,
    /// Facility-name terms excluded from the run entirely; a record whose
    /// origin or destination contains any of these is dropped during
    /// preparation.
    pub excluded_facility_terms: Vec<String>,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            similarity_threshold: 65.0,
            excluded_facility_terms: vec!["OFTALMOCASA".to_string()],
        }
    }
}
