//! Mutable run state, owned by the driver.
//!
//! The consumption set enforces the conservation invariant: each incoming
//! record backs at most one match. Contested incoming records go to the
//! earliest outgoing record in iteration order (greedy first-fit; a
//! globally optimal assignment is explicitly out of scope).

use std::collections::{BTreeMap, BTreeSet};

use crate::aggregate::ResolvedMatch;

/// State threaded through one reconciliation run. No step relies on
/// ambient globals; the driver owns exactly one of these per run.
#[derive(Debug, Default)]
pub struct ReconciliationState {
    consumed: BTreeSet<usize>,
    resolved: BTreeMap<usize, ResolvedMatch>,
}

impl ReconciliationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an incoming record as consumed. Returns false when it already
    /// was (which would violate conservation; callers check first).
    pub fn consume(&mut self, incoming_idx: usize) -> bool {
        self.consumed.insert(incoming_idx)
    }

    pub fn is_consumed(&self, incoming_idx: usize) -> bool {
        self.consumed.contains(&incoming_idx)
    }

    pub fn consumed_count(&self) -> usize {
        self.consumed.len()
    }

    /// Record an aggregation resolution for an outgoing record.
    pub fn resolve(&mut self, outgoing_idx: usize, resolution: ResolvedMatch) {
        self.resolved.insert(outgoing_idx, resolution);
    }

    pub fn is_resolved(&self, outgoing_idx: usize) -> bool {
        self.resolved.contains_key(&outgoing_idx)
    }

    /// Take the aggregation resolution for an outgoing record, if any.
    pub fn take_resolution(&mut self, outgoing_idx: usize) -> Option<ResolvedMatch> {
        self.resolved.remove(&outgoing_idx)
    }
}
