//! Aggregation pre-passes.
//!
//! Two symmetric passes run before the main matching loop to resolve
//! grouped shipments that individual-line matching cannot see:
//!
//! - many-to-one: several outgoing lines sharing (document, product)
//!   whose summed quantity matches one incoming line;
//! - one-to-many: one outgoing line matched by the sum of several
//!   incoming lines sharing its document id.
//!
//! Resolutions are recorded in [`ReconciliationState`] and short-circuit
//! the driver loop with score fixed at 100 and quality "excellent".

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use tracing::debug;

use recon_model::LedgerRecord;

use crate::config;
use crate::index::DocumentIndex;
use crate::score::score_product;
use crate::state::ReconciliationState;

/// How an aggregation resolution was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionKind {
    /// Several outgoing lines summed against one incoming line; the
    /// incoming value is distributed proportionally, and the row is
    /// emitted as compliant directly.
    GroupedOutgoing,
    /// One incoming candidate with exactly the outgoing quantity,
    /// preferred over any aggregate.
    ExactSingle,
    /// A virtual incoming record synthesized from several incoming lines.
    AggregatedIncoming,
}

/// A match resolved ahead of the main loop for one outgoing record.
#[derive(Debug, Clone)]
pub struct ResolvedMatch {
    pub kind: ResolutionKind,
    /// Incoming records backing this resolution (already consumed).
    pub incoming_indices: Vec<usize>,
    pub product_in: String,
    /// Incoming value attributed to this outgoing line (proportional for
    /// grouped resolutions, summed for aggregated ones).
    pub value_in: f64,
    pub qty_in: f64,
    pub date_in: Option<NaiveDateTime>,
    pub product_score: f64,
    pub detail: String,
    pub product_detail: String,
}

/// Many-to-one pre-pass: outgoing groups summed against one incoming
/// record.
pub fn resolve_outgoing_groups(
    outgoing: &[LedgerRecord],
    incoming: &[LedgerRecord],
    index: &DocumentIndex,
    state: &mut ReconciliationState,
) {
    // Group by (document number, exact product text), preserving a
    // deterministic order.
    let mut groups: BTreeMap<(String, String), Vec<usize>> = BTreeMap::new();
    for (idx, record) in outgoing.iter().enumerate() {
        if record.has_document() {
            groups
                .entry((record.doc_num.clone(), record.product.clone()))
                .or_default()
                .push(idx);
        }
    }

    for ((doc_num, _product), members) in groups {
        if members.len() < 2 {
            continue;
        }
        let group_features = &outgoing[members[0]].features;
        let group_total: f64 = members.iter().map(|&i| outgoing[i].quantity).sum();
        let Some(candidates) = index.lookup(&doc_num) else {
            continue;
        };

        for &incoming_idx in candidates {
            if state.is_consumed(incoming_idx) {
                continue;
            }
            let candidate = &incoming[incoming_idx];
            let sum_matches =
                (candidate.quantity - group_total).abs() < config::GROUP_SUM_EPSILON;
            let threshold = if sum_matches {
                config::GROUP_SUM_THRESHOLD
            } else {
                config::GROUP_NO_SUM_THRESHOLD
            };
            let (product_score, product_detail) =
                score_product(group_features, &candidate.features, true);

            if product_score >= threshold && sum_matches {
                debug!(
                    doc = %doc_num,
                    lines = members.len(),
                    total = group_total,
                    "resolved outgoing group against single incoming record"
                );
                state.consume(incoming_idx);
                for &outgoing_idx in &members {
                    let line_qty = outgoing[outgoing_idx].quantity;
                    let share = if group_total > 0.0 {
                        line_qty / group_total
                    } else {
                        0.0
                    };
                    state.resolve(
                        outgoing_idx,
                        ResolvedMatch {
                            kind: ResolutionKind::GroupedOutgoing,
                            incoming_indices: vec![incoming_idx],
                            product_in: candidate.product.clone(),
                            value_in: candidate.value * share,
                            qty_in: line_qty,
                            date_in: candidate.timestamp,
                            product_score,
                            detail: format!("Grouped (sum of {} lines)", members.len()),
                            product_detail: product_detail.clone(),
                        },
                    );
                }
                break;
            }
        }
    }
}

/// One-to-many pre-pass: one outgoing record against the sum of its
/// same-document incoming candidates. An exact-quantity single candidate
/// is preferred over any aggregate.
pub fn resolve_incoming_aggregates(
    outgoing: &[LedgerRecord],
    incoming: &[LedgerRecord],
    index: &DocumentIndex,
    state: &mut ReconciliationState,
) {
    for (outgoing_idx, record) in outgoing.iter().enumerate() {
        if state.is_resolved(outgoing_idx) || !record.has_document() {
            continue;
        }
        let Some(candidates) = index.lookup(&record.doc_num) else {
            continue;
        };

        let mut exact: Option<(usize, f64)> = None;
        let mut plausible: Vec<(usize, f64)> = Vec::new();

        for &incoming_idx in candidates {
            if state.is_consumed(incoming_idx) {
                continue;
            }
            let candidate = &incoming[incoming_idx];
            let qty_exact = (candidate.quantity - record.quantity).abs() < config::QTY_EPSILON;
            let threshold = if qty_exact {
                config::GROUP_SUM_THRESHOLD
            } else {
                config::GROUP_NO_SUM_THRESHOLD
            };
            let (product_score, _) = score_product(&record.features, &candidate.features, true);
            if product_score >= threshold {
                if qty_exact && exact.is_none() {
                    exact = Some((incoming_idx, product_score));
                }
                plausible.push((incoming_idx, product_score));
            }
        }

        if let Some((incoming_idx, product_score)) = exact {
            let candidate = &incoming[incoming_idx];
            state.consume(incoming_idx);
            state.resolve(
                outgoing_idx,
                ResolvedMatch {
                    kind: ResolutionKind::ExactSingle,
                    incoming_indices: vec![incoming_idx],
                    product_in: candidate.product.clone(),
                    value_in: candidate.value,
                    qty_in: candidate.quantity,
                    date_in: candidate.timestamp,
                    product_score,
                    detail: format!("Exact match (doc {})", record.doc_num),
                    product_detail: "Exact quantity".to_string(),
                },
            );
            continue;
        }

        if plausible.is_empty() {
            continue;
        }

        let summed_qty: f64 = plausible.iter().map(|&(i, _)| incoming[i].quantity).sum();
        let first_qty = incoming[plausible[0].0].quantity;
        let deviation_pct = if record.quantity > 0.0 {
            (summed_qty - record.quantity).abs() / record.quantity * 100.0
        } else {
            0.0
        };
        let sum_fits = deviation_pct <= config::AGGREGATE_DEVIATION_PCT;
        let sum_beats_single =
            (summed_qty - record.quantity).abs() < (first_qty - record.quantity).abs();

        if sum_fits && (plausible.len() > 1 || sum_beats_single) {
            let summed_value: f64 = plausible.iter().map(|&(i, _)| incoming[i].value).sum();
            let first = &incoming[plausible[0].0];
            debug!(
                doc = %record.doc_num,
                lines = plausible.len(),
                summed_qty,
                "synthesized aggregated incoming record"
            );
            for &(incoming_idx, _) in &plausible {
                state.consume(incoming_idx);
            }
            state.resolve(
                outgoing_idx,
                ResolvedMatch {
                    kind: ResolutionKind::AggregatedIncoming,
                    incoming_indices: plausible.iter().map(|&(i, _)| i).collect(),
                    product_in: format!(
                        "{} (+ {} more lines)",
                        first.product,
                        plausible.len() - 1
                    ),
                    value_in: summed_value,
                    qty_in: summed_qty,
                    date_in: first.timestamp,
                    product_score: plausible[0].1,
                    detail: format!("Aggregated: {} incoming lines", plausible.len()),
                    product_detail: "Multiple incoming lines summed".to_string(),
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::annotate_record;
    use recon_normalize::parse_date_text;

    fn record(doc: &str, product: &str, qty: f64, value: f64) -> LedgerRecord {
        let mut r = LedgerRecord {
            document: doc.to_string(),
            product: product.to_string(),
            origin_unit: "HOSPITAL A".to_string(),
            destination_unit: "HOSPITAL B".to_string(),
            quantity: qty,
            value,
            timestamp: parse_date_text("01/03/2024"),
            ..LedgerRecord::default()
        };
        annotate_record(&mut r);
        r
    }

    #[test]
    fn outgoing_group_resolves_against_summed_incoming() {
        let product = "DIPIRONA 500MG COMP C/20";
        let outgoing = vec![
            record("200", product, 5.0, 12.5),
            record("200", product, 5.0, 12.5),
            record("200", product, 10.0, 25.0),
        ];
        let incoming = vec![record("200", product, 20.0, 50.0)];
        let index = DocumentIndex::build(&incoming);
        let mut state = ReconciliationState::new();

        resolve_outgoing_groups(&outgoing, &incoming, &index, &mut state);

        assert!(state.is_consumed(0));
        for idx in 0..3 {
            assert!(state.is_resolved(idx), "line {idx} should be resolved");
        }
        // Value splits proportionally to quantity share.
        let r0 = state.take_resolution(0).unwrap();
        let r2 = state.take_resolution(2).unwrap();
        assert!((r0.value_in - 12.5).abs() < 1e-9);
        assert!((r2.value_in - 25.0).abs() < 1e-9);
        assert_eq!(r0.kind, ResolutionKind::GroupedOutgoing);
    }

    #[test]
    fn group_is_skipped_when_sum_differs() {
        let product = "DIPIRONA 500MG COMP C/20";
        let outgoing = vec![record("200", product, 5.0, 12.5), record("200", product, 5.0, 12.5)];
        let incoming = vec![record("200", product, 30.0, 75.0)];
        let index = DocumentIndex::build(&incoming);
        let mut state = ReconciliationState::new();

        resolve_outgoing_groups(&outgoing, &incoming, &index, &mut state);

        assert!(!state.is_consumed(0));
        assert!(!state.is_resolved(0));
    }

    #[test]
    fn exact_single_preferred_over_aggregate() {
        let product = "SORO FISIOLOGICO 500ML FRASCO";
        let outgoing = vec![record("300", product, 10.0, 40.0)];
        let incoming = vec![
            record("300", product, 4.0, 16.0),
            record("300", product, 10.0, 40.0),
            record("300", product, 6.0, 24.0),
        ];
        let index = DocumentIndex::build(&incoming);
        let mut state = ReconciliationState::new();

        resolve_incoming_aggregates(&outgoing, &incoming, &index, &mut state);

        let resolution = state.take_resolution(0).expect("resolved");
        assert_eq!(resolution.kind, ResolutionKind::ExactSingle);
        assert_eq!(resolution.incoming_indices, vec![1]);
        assert!(state.is_consumed(1));
        assert!(!state.is_consumed(0));
        assert!(!state.is_consumed(2));
    }

    #[test]
    fn incoming_lines_summed_when_no_exact_candidate() {
        let product = "SORO FISIOLOGICO 500ML FRASCO";
        let outgoing = vec![record("300", product, 10.0, 40.0)];
        let incoming = vec![
            record("300", product, 4.0, 16.0),
            record("300", product, 6.0, 24.0),
        ];
        let index = DocumentIndex::build(&incoming);
        let mut state = ReconciliationState::new();

        resolve_incoming_aggregates(&outgoing, &incoming, &index, &mut state);

        let resolution = state.take_resolution(0).expect("resolved");
        assert_eq!(resolution.kind, ResolutionKind::AggregatedIncoming);
        assert_eq!(resolution.incoming_indices, vec![0, 1]);
        assert!((resolution.qty_in - 10.0).abs() < 1e-9);
        assert!((resolution.value_in - 40.0).abs() < 1e-9);
        assert!(resolution.product_in.contains("+ 1 more lines"));
    }

    #[test]
    fn aggregate_rejected_when_sum_deviates_too_much() {
        let product = "SORO FISIOLOGICO 500ML FRASCO";
        let outgoing = vec![record("300", product, 10.0, 40.0)];
        let incoming = vec![
            record("300", product, 4.0, 16.0),
            record("300", product, 8.0, 32.0),
        ];
        let index = DocumentIndex::build(&incoming);
        let mut state = ReconciliationState::new();

        resolve_incoming_aggregates(&outgoing, &incoming, &index, &mut state);

        // Sum is 12 (20% off), so nothing is resolved or consumed.
        assert!(!state.is_resolved(0));
        assert!(!state.is_consumed(0));
        assert!(!state.is_consumed(1));
    }
}
