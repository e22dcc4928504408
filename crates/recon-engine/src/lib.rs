//! Matching and reconciliation engine.
//!
//! Reconciles two independently produced transaction ledgers (items
//! shipped vs. items received) and classifies every record as
//! matched-and-compliant, matched-with-discrepancy, not received, or
//! orphan receipt.
//!
//! Pipeline, leaf first: [`features`] decomposes free-text product
//! descriptions into comparable feature sets; [`score`] turns feature
//! pairs and record pairs into weighted similarity scores; [`index`]
//! provides O(1) document-id candidate retrieval; [`aggregate`] resolves
//! many-to-one and one-to-many quantity groupings before the main loop;
//! [`driver`] orchestrates the per-record matching state machine and
//! emits the result table. [`state`] owns the mutable consumption set so
//! no step relies on ambient globals.

pub mod aggregate;
pub mod config;
pub mod driver;
pub mod features;
pub mod index;
pub mod score;
pub mod state;
pub mod tables;

pub use driver::{ProgressFn, reconcile};
pub use features::{annotate_record, extract_features};
pub use tables::is_document_exempt;
