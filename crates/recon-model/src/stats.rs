use serde::{Deserialize, Serialize};

/// Aggregate counters emitted alongside the result table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub compliant: usize,
    pub non_compliant: usize,
    pub not_found: usize,
    pub value_divergent: usize,
    pub qty_divergent: usize,
    pub excellent_matches: usize,
    pub good_matches: usize,
    pub fair_matches: usize,
}

impl SummaryStats {
    /// Total outgoing records classified (orphans are not counted here;
    /// they appear only as rows).
    pub fn total_classified(&self) -> usize {
        self.compliant + self.non_compliant + self.not_found
    }

    /// Total records resolved to some incoming match.
    pub fn total_matched(&self) -> usize {
        self.excellent_matches + self.good_matches + self.fair_matches
    }
}
