//! Reconciliation driver.
//!
//! Orchestrates one full run: index the incoming side, run the two
//! aggregation pre-passes, walk the outgoing records in order (greedy
//! first-fit), score candidates, apply the quantity guardrail, classify
//! each match, and finally report incoming records that were never
//! consumed. Every outgoing record yields exactly one row.

use chrono::NaiveDateTime;
use tracing::{debug, info};

use recon_model::{
    LedgerRecord, MatchQuality, ReconcileOptions, ReconciliationRow, Status, SummaryStats,
};

use crate::aggregate::{self, ResolutionKind, ResolvedMatch};
use crate::config;
use crate::index::{DocumentIndex, date_window_candidates};
use crate::score::{MatchCandidate, score_pair};
use crate::state::ReconciliationState;

/// Progress callback: completed fraction in [0, 1] plus a phase label.
pub type ProgressFn<'a> = dyn FnMut(f64, &str) + 'a;

/// In-side values of an accepted match, ready for classification. The
/// aggregation pre-passes produce virtual in-sides (summed quantities,
/// composite labels) that no single incoming record carries.
struct MatchOutcome<'a> {
    product_in: &'a str,
    value_in: f64,
    qty_in: f64,
    qty_diff: f64,
    date_in: Option<NaiveDateTime>,
    score: f64,
    detail: &'a str,
    product_detail: &'a str,
}

/// Reconcile outgoing records against incoming ones.
///
/// Pure with respect to its inputs: records are read-only, all mutable
/// state lives in the run. Calling twice with the same inputs yields the
/// same rows and stats.
pub fn reconcile(
    outgoing: &[LedgerRecord],
    incoming: &[LedgerRecord],
    options: &ReconcileOptions,
    mut progress: Option<&mut ProgressFn<'_>>,
) -> (Vec<ReconciliationRow>, SummaryStats) {
    let mut rows: Vec<ReconciliationRow> = Vec::with_capacity(outgoing.len());
    let mut stats = SummaryStats::default();

    report(&mut progress, 0.05, "Indexing incoming records");
    let index = DocumentIndex::build(incoming);
    let mut state = ReconciliationState::new();
    aggregate::resolve_outgoing_groups(outgoing, incoming, &index, &mut state);
    aggregate::resolve_incoming_aggregates(outgoing, incoming, &index, &mut state);
    info!(
        outgoing = outgoing.len(),
        incoming = incoming.len(),
        documents = index.len(),
        pre_resolved = state.consumed_count(),
        "reconciliation started"
    );

    let span = outgoing_date_span(outgoing);
    let total = outgoing.len();

    for (idx, record) in outgoing.iter().enumerate() {
        if total > 0 && idx % config::PROGRESS_INTERVAL == 0 {
            let fraction = 0.05 + 0.90 * idx as f64 / total as f64;
            report(&mut progress, fraction, "Matching outgoing records");
        }

        if let Some(resolution) = state.take_resolution(idx) {
            emit_resolved(record, resolution, &mut rows, &mut stats);
            continue;
        }

        let mut document_missing = false;
        let mut candidates: Vec<usize> = if record.has_document() {
            match index.lookup(&record.doc_num) {
                Some(hits) => hits.to_vec(),
                None if record.exempt_destination => {
                    date_window_candidates(incoming, record.timestamp)
                }
                None => {
                    document_missing = true;
                    Vec::new()
                }
            }
        } else {
            date_window_candidates(incoming, record.timestamp)
        };
        candidates.truncate(config::CANDIDATE_CAP);

        let mut best: Option<MatchCandidate> = None;
        for incoming_idx in candidates {
            if state.is_consumed(incoming_idx) {
                continue;
            }
            if let Some(candidate) = score_pair(
                record,
                &incoming[incoming_idx],
                incoming_idx,
                options.similarity_threshold,
            ) {
                let better = best.as_ref().is_none_or(|current| {
                    (candidate.score, candidate.product_score)
                        > (current.score, current.product_score)
                });
                if better {
                    best = Some(candidate);
                }
            }
            if best
                .as_ref()
                .is_some_and(|c| c.score >= config::EARLY_EXIT_SCORE)
            {
                break;
            }
        }

        match best {
            Some(candidate) => {
                let matched = &incoming[candidate.incoming_idx];
                let doc_match = record.has_document() && record.doc_num == matched.doc_num;
                match validate_quantity(
                    record.quantity,
                    matched.quantity,
                    candidate.product_score,
                    doc_match,
                ) {
                    Some(qty_diff) => {
                        state.consume(candidate.incoming_idx);
                        emit_classified(
                            record,
                            MatchOutcome {
                                product_in: &matched.product,
                                value_in: matched.value,
                                qty_in: matched.quantity,
                                qty_diff,
                                date_in: matched.timestamp,
                                score: candidate.score,
                                detail: &candidate.detail,
                                product_detail: &candidate.product_detail,
                            },
                            &mut rows,
                            &mut stats,
                        );
                    }
                    None => {
                        debug!(
                            doc = %record.doc_num,
                            qty_out = record.quantity,
                            qty_in = matched.quantity,
                            "best candidate failed the quantity guardrail"
                        );
                        emit_unmatched(
                            record,
                            "Quantity incompatible with best candidate".to_string(),
                            &mut rows,
                            &mut stats,
                        );
                    }
                }
            }
            None => {
                let reason = if document_missing {
                    format!("Document {} not found", record.doc_num)
                } else if record.exempt_destination {
                    "No correspondence found (document-exempt destination)".to_string()
                } else {
                    "No correspondence found".to_string()
                };
                emit_unmatched(record, reason, &mut rows, &mut stats);
            }
        }
    }

    report(&mut progress, 0.95, "Collecting orphan receipts");
    emit_orphans(incoming, &state, span, &mut rows);

    info!(
        rows = rows.len(),
        compliant = stats.compliant,
        non_compliant = stats.non_compliant,
        not_found = stats.not_found,
        "reconciliation finished"
    );
    report(&mut progress, 1.0, "Done");
    (rows, stats)
}

fn report(progress: &mut Option<&mut ProgressFn<'_>>, fraction: f64, message: &str) {
    if let Some(callback) = progress.as_mut() {
        callback(fraction, message);
    }
}

/// Quantity guardrail for an otherwise-accepted candidate.
///
/// Returns the signed quantity difference to carry into the row, or
/// `None` when the gap disqualifies the match: with a document match and
/// strong product evidence deviations up to 20% pass, without a document
/// match anything over 10% is rejected.
fn validate_quantity(
    qty_out: f64,
    qty_in: f64,
    product_score: f64,
    doc_match: bool,
) -> Option<f64> {
    if (qty_out - qty_in).abs() < config::QTY_EPSILON {
        return Some(0.0);
    }
    let base = qty_out.max(qty_in);
    if base <= 0.0 {
        return Some(0.0);
    }
    let deviation_pct = (qty_out - qty_in).abs() / base * 100.0;
    if doc_match && product_score >= config::GUARDRAIL_PRODUCT_MIN {
        if deviation_pct <= config::GUARDRAIL_DOC_PCT {
            return Some(qty_out - qty_in);
        }
        return None;
    }
    if !doc_match && deviation_pct > config::GUARDRAIL_NODOC_PCT {
        return None;
    }
    Some(qty_out - qty_in)
}

/// Emit the row for an aggregation resolution. Grouped outgoing lines are
/// compliant by construction (the group sum matched within epsilon);
/// exact and aggregated resolutions still go through value classification.
fn emit_resolved(
    record: &LedgerRecord,
    resolution: ResolvedMatch,
    rows: &mut Vec<ReconciliationRow>,
    stats: &mut SummaryStats,
) {
    match resolution.kind {
        ResolutionKind::GroupedOutgoing => {
            let value_diff = round2(record.value - resolution.value_in);
            let lead = lead_time_hours(record.timestamp, resolution.date_in);
            let mut observations = format!("Score:100 | {}", resolution.detail);
            if lead.is_some_and(|h| h < 0.0) {
                observations.push_str(" | received before shipment");
            }
            stats.compliant += 1;
            stats.excellent_matches += 1;
            rows.push(ReconciliationRow {
                date: record.timestamp,
                origin_unit: record.origin_unit.clone(),
                destination_unit: record.destination_unit.clone(),
                document: record.document.clone(),
                product_out: record.product.clone(),
                product_in: resolution.product_in,
                species: record.species.clone(),
                value_out: Some(round2(record.value)),
                value_in: Some(round2(resolution.value_in)),
                value_diff: Some(value_diff),
                qty_out: Some(record.quantity),
                qty_in: Some(resolution.qty_in),
                qty_diff: Some(0.0),
                date_in: resolution.date_in,
                lead_time_hours: lead,
                status: Status::Compliant,
                divergence: "-".to_string(),
                quality: Some(MatchQuality::Excellent),
                observations,
                product_detail: resolution.product_detail,
            });
        }
        ResolutionKind::ExactSingle | ResolutionKind::AggregatedIncoming => {
            let qty_diff = if (record.quantity - resolution.qty_in).abs() < config::QTY_EPSILON {
                0.0
            } else {
                record.quantity - resolution.qty_in
            };
            emit_classified(
                record,
                MatchOutcome {
                    product_in: &resolution.product_in,
                    value_in: resolution.value_in,
                    qty_in: resolution.qty_in,
                    qty_diff,
                    date_in: resolution.date_in,
                    score: 100.0,
                    detail: &resolution.detail,
                    product_detail: &resolution.product_detail,
                },
                rows,
                stats,
            );
        }
    }
}

/// Classify an accepted match and emit its row.
///
/// Value tolerance depends on quantity agreement: with matching
/// quantities small-value rows (< 10) get an absolute 1.0 band and the
/// rest get max(10, 10%) of the outgoing value; with a quantity gap only
/// a flat absolute 10 applies.
fn emit_classified(
    record: &LedgerRecord,
    outcome: MatchOutcome<'_>,
    rows: &mut Vec<ReconciliationRow>,
    stats: &mut SummaryStats,
) {
    let value_diff = round2(record.value - outcome.value_in);
    let value_pct = if record.value > 0.0 {
        value_diff.abs() / record.value * 100.0
    } else {
        0.0
    };

    let quality = MatchQuality::from_score(outcome.score);
    match quality {
        MatchQuality::Excellent => stats.excellent_matches += 1,
        MatchQuality::Good => stats.good_matches += 1,
        MatchQuality::Fair => stats.fair_matches += 1,
    }

    let qty_conforms = outcome.qty_diff.abs() < config::QTY_EPSILON;
    let value_conforms = if qty_conforms {
        if record.value < config::VALUE_SMALL_CUTOVER {
            value_diff.abs() <= config::VALUE_SMALL_ABS
        } else {
            let limit = config::VALUE_ABS.max(record.value * config::VALUE_PCT / 100.0);
            value_diff.abs() <= limit || value_pct <= config::VALUE_PCT
        }
    } else {
        value_diff.abs() <= config::VALUE_ABS
    };

    let mut divergences: Vec<&str> = Vec::new();
    if !value_conforms {
        divergences.push("Value divergence");
        stats.value_divergent += 1;
    }
    if !qty_conforms {
        divergences.push("Quantity divergence");
        stats.qty_divergent += 1;
    }
    let status = if divergences.is_empty() {
        stats.compliant += 1;
        Status::Compliant
    } else {
        stats.non_compliant += 1;
        Status::NonCompliant
    };

    let lead = lead_time_hours(record.timestamp, outcome.date_in);
    let mut observations = format!("Score:{:.0} | {}", outcome.score, outcome.detail);
    if lead.is_some_and(|h| h < 0.0) {
        observations.push_str(" | received before shipment");
    }

    rows.push(ReconciliationRow {
        date: record.timestamp,
        origin_unit: record.origin_unit.clone(),
        destination_unit: record.destination_unit.clone(),
        document: record.document.clone(),
        product_out: record.product.clone(),
        product_in: outcome.product_in.to_string(),
        species: record.species.clone(),
        value_out: Some(round2(record.value)),
        value_in: Some(round2(outcome.value_in)),
        value_diff: Some(value_diff),
        qty_out: Some(record.quantity),
        qty_in: Some(outcome.qty_in),
        qty_diff: Some(round2(outcome.qty_diff)),
        date_in: outcome.date_in,
        lead_time_hours: lead,
        status,
        divergence: if divergences.is_empty() {
            "-".to_string()
        } else {
            divergences.join(" + ")
        },
        quality: Some(quality),
        observations,
        product_detail: outcome.product_detail.to_string(),
    });
}

fn emit_unmatched(
    record: &LedgerRecord,
    reason: String,
    rows: &mut Vec<ReconciliationRow>,
    stats: &mut SummaryStats,
) {
    stats.not_found += 1;
    stats.non_compliant += 1;
    rows.push(ReconciliationRow {
        date: record.timestamp,
        origin_unit: record.origin_unit.clone(),
        destination_unit: record.destination_unit.clone(),
        document: record.document.clone(),
        product_out: record.product.clone(),
        product_in: "NOT FOUND".to_string(),
        species: record.species.clone(),
        value_out: Some(round2(record.value)),
        value_in: None,
        value_diff: None,
        qty_out: Some(record.quantity),
        qty_in: None,
        qty_diff: None,
        date_in: None,
        lead_time_hours: None,
        status: Status::NotReceived,
        divergence: "Not found".to_string(),
        quality: None,
        observations: reason,
        product_detail: String::new(),
    });
}

/// Report incoming records never consumed by any match. The date filter
/// restricts them to the span covered by the outgoing side, but only when
/// both the span and the record's own timestamp are known; a missing date
/// on either side still yields the orphan row. These rows flag
/// unexplained receipts; they do not feed the summary counters.
fn emit_orphans(
    incoming: &[LedgerRecord],
    state: &ReconciliationState,
    span: Option<(NaiveDateTime, NaiveDateTime)>,
    rows: &mut Vec<ReconciliationRow>,
) {
    for (idx, record) in incoming.iter().enumerate() {
        if state.is_consumed(idx) {
            continue;
        }
        if let (Some((lo, hi)), Some(ts)) = (span, record.timestamp) {
            if ts < lo || ts > hi {
                continue;
            }
        }
        rows.push(ReconciliationRow {
            date: None,
            origin_unit: record.origin_unit.clone(),
            destination_unit: record.destination_unit.clone(),
            document: record.document.clone(),
            product_out: String::new(),
            product_in: record.product.clone(),
            species: record.species.clone(),
            value_out: None,
            value_in: Some(round2(record.value)),
            value_diff: None,
            qty_out: None,
            qty_in: Some(record.quantity),
            qty_diff: None,
            date_in: record.timestamp,
            lead_time_hours: None,
            status: Status::NonCompliant,
            divergence: "Received without shipment".to_string(),
            quality: None,
            observations: "Incoming record without outgoing correspondence in the period"
                .to_string(),
            product_detail: String::new(),
        });
    }
}

fn outgoing_date_span(outgoing: &[LedgerRecord]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let mut timestamps = outgoing.iter().filter_map(|r| r.timestamp);
    let first = timestamps.next()?;
    Some(timestamps.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn lead_time_hours(out: Option<NaiveDateTime>, inc: Option<NaiveDateTime>) -> Option<f64> {
    match (out, inc) {
        (Some(o), Some(i)) => Some(round2((i - o).num_seconds() as f64 / 3600.0)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::annotate_record;
    use recon_normalize::parse_date_text;

    fn record(doc: &str, product: &str, qty: f64, value: f64, date: &str) -> LedgerRecord {
        let mut r = LedgerRecord {
            document: doc.to_string(),
            product: product.to_string(),
            origin_unit: "HOSPITAL A".to_string(),
            destination_unit: "HOSPITAL B".to_string(),
            quantity: qty,
            value,
            timestamp: parse_date_text(date),
            ..LedgerRecord::default()
        };
        annotate_record(&mut r);
        r
    }

    fn run(
        outgoing: &[LedgerRecord],
        incoming: &[LedgerRecord],
    ) -> (Vec<ReconciliationRow>, SummaryStats) {
        reconcile(outgoing, incoming, &ReconcileOptions::default(), None)
    }

    #[test]
    fn exact_match_is_compliant_and_excellent() {
        let outgoing = vec![record("100", "DIPIRONA 500MG COMP C/20", 20.0, 50.0, "01/03/2024")];
        let incoming = vec![record("100", "DIPIRONA 500MG COMP C/20", 20.0, 50.0, "01/03/2024")];
        let (rows, stats) = run(&outgoing, &incoming);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, Status::Compliant);
        assert_eq!(rows[0].quality, Some(MatchQuality::Excellent));
        assert_eq!(rows[0].qty_diff, Some(0.0));
        assert_eq!(rows[0].divergence, "-");
        assert_eq!(stats.compliant, 1);
        assert_eq!(stats.excellent_matches, 1);
        assert_eq!(stats.non_compliant, 0);
    }

    #[test]
    fn missing_document_yields_not_received() {
        let outgoing = vec![record("999", "DIPIRONA 500MG COMP C/20", 20.0, 50.0, "01/03/2024")];
        let incoming = vec![record("100", "LUVA NITRILICA M C/100", 5.0, 30.0, "01/03/2024")];
        let (rows, stats) = run(&outgoing, &incoming);

        let not_received: Vec<_> = rows
            .iter()
            .filter(|r| r.status == Status::NotReceived)
            .collect();
        assert_eq!(not_received.len(), 1);
        assert_eq!(not_received[0].product_in, "NOT FOUND");
        assert!(not_received[0].observations.contains("Document 999 not found"));
        assert_eq!(stats.not_found, 1);
        assert_eq!(stats.non_compliant, 1);
    }

    #[test]
    fn orphan_incoming_reported_without_stats() {
        let outgoing = vec![record("100", "DIPIRONA 500MG COMP C/20", 20.0, 50.0, "01/03/2024")];
        let incoming = vec![
            record("100", "DIPIRONA 500MG COMP C/20", 20.0, 50.0, "01/03/2024"),
            record("555", "LUVA NITRILICA M C/100", 5.0, 30.0, "01/03/2024"),
        ];
        let (rows, stats) = run(&outgoing, &incoming);

        assert_eq!(rows.len(), 2);
        let orphan = rows
            .iter()
            .find(|r| r.divergence == "Received without shipment")
            .expect("orphan row");
        assert_eq!(orphan.status, Status::NonCompliant);
        assert_eq!(orphan.product_in, "LUVA NITRILICA M C/100");
        assert!(orphan.qty_out.is_none());
        // Orphans are reported but never counted in the summary.
        assert_eq!(stats.compliant, 1);
        assert_eq!(stats.non_compliant, 0);
        assert_eq!(stats.not_found, 0);
    }

    #[test]
    fn orphan_outside_outgoing_span_is_ignored() {
        let outgoing = vec![record("100", "DIPIRONA 500MG COMP C/20", 20.0, 50.0, "01/03/2024")];
        let incoming = vec![
            record("100", "DIPIRONA 500MG COMP C/20", 20.0, 50.0, "01/03/2024"),
            record("555", "LUVA NITRILICA M C/100", 5.0, 30.0, "15/04/2024"),
        ];
        let (rows, _) = run(&outgoing, &incoming);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn orphan_with_unparseable_date_is_still_reported() {
        let outgoing = vec![record("100", "DIPIRONA 500MG COMP C/20", 20.0, 50.0, "01/03/2024")];
        let incoming = vec![
            record("100", "DIPIRONA 500MG COMP C/20", 20.0, 50.0, "01/03/2024"),
            record("555", "LUVA NITRILICA M C/100", 5.0, 30.0, "not a date"),
        ];
        let (rows, _) = run(&outgoing, &incoming);

        assert_eq!(rows.len(), 2);
        let orphan = rows
            .iter()
            .find(|r| r.divergence == "Received without shipment")
            .expect("orphan row");
        assert_eq!(orphan.product_in, "LUVA NITRILICA M C/100");
        assert!(orphan.date_in.is_none());
    }

    #[test]
    fn orphans_reported_when_outgoing_has_no_dates() {
        let outgoing = vec![record("100", "DIPIRONA 500MG COMP C/20", 20.0, 50.0, "not a date")];
        let incoming = vec![record("555", "LUVA NITRILICA M C/100", 5.0, 30.0, "15/04/2024")];
        let (rows, _) = run(&outgoing, &incoming);

        // One not-received row for the outgoing record, one orphan for
        // the receipt: no outgoing dates means no span to filter on.
        assert_eq!(rows.len(), 2);
        let orphan = rows
            .iter()
            .find(|r| r.divergence == "Received without shipment")
            .expect("orphan row");
        assert_eq!(orphan.product_in, "LUVA NITRILICA M C/100");
    }

    #[test]
    fn exempt_destination_without_match_gets_dedicated_reason() {
        let mut exempt = record("400", "DIPIRONA 500MG COMP C/20", 20.0, 50.0, "01/03/2024");
        exempt.destination_unit = "CASA DE SAUDE DE PORTUGAL".to_string();
        annotate_record(&mut exempt);
        let incoming = vec![record("555", "LUVA NITRILICA M C/100", 5.0, 30.0, "01/03/2024")];
        let (rows, stats) = run(&[exempt], &incoming);

        let not_received = rows
            .iter()
            .find(|r| r.status == Status::NotReceived)
            .expect("not-received row");
        assert!(
            not_received
                .observations
                .contains("document-exempt destination"),
            "observations: {}",
            not_received.observations
        );
        assert_eq!(stats.not_found, 1);
    }

    #[test]
    fn outgoing_group_aggregates_against_single_receipt() {
        let product = "DIPIRONA 500MG COMP C/20";
        let outgoing = vec![
            record("200", product, 5.0, 12.5, "01/03/2024"),
            record("200", product, 5.0, 12.5, "01/03/2024"),
            record("200", product, 10.0, 25.0, "01/03/2024"),
        ];
        let incoming = vec![record("200", product, 20.0, 50.0, "02/03/2024")];
        let (rows, stats) = run(&outgoing, &incoming);

        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert_eq!(row.status, Status::Compliant);
            assert_eq!(row.quality, Some(MatchQuality::Excellent));
            assert_eq!(row.qty_diff, Some(0.0));
        }
        assert_eq!(stats.compliant, 3);
        // Value splits proportionally and sums back to the receipt total.
        let total: f64 = rows.iter().filter_map(|r| r.value_in).sum();
        assert!((total - 50.0).abs() < 1e-6);
    }

    #[test]
    fn incoming_lines_summed_for_one_outgoing() {
        let product = "SORO FISIOLOGICO 500ML FRASCO";
        let outgoing = vec![record("300", product, 10.0, 40.0, "01/03/2024")];
        let incoming = vec![
            record("300", product, 4.0, 16.0, "02/03/2024"),
            record("300", product, 6.0, 24.0, "02/03/2024"),
        ];
        let (rows, stats) = run(&outgoing, &incoming);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, Status::Compliant);
        assert_eq!(rows[0].qty_in, Some(10.0));
        assert!(rows[0].product_in.contains("more lines"));
        assert_eq!(stats.compliant, 1);
    }

    #[test]
    fn quantity_guardrail_accepts_twenty_percent_with_document() {
        let product = "DIPIRONA 500MG COMP C/20";
        let outgoing = vec![record("100", product, 100.0, 250.0, "01/03/2024")];
        let incoming = vec![record("100", product, 80.0, 200.0, "01/03/2024")];
        let (rows, _) = run(&outgoing, &incoming);

        assert_eq!(rows[0].status, Status::NonCompliant);
        assert_eq!(rows[0].qty_diff, Some(20.0));
        assert!(rows[0].divergence.contains("Quantity divergence"));
    }

    #[test]
    fn quantity_guardrail_rejects_past_twenty_percent() {
        let product = "DIPIRONA 500MG COMP C/20";
        let outgoing = vec![record("100", product, 100.0, 250.0, "01/03/2024")];
        let incoming = vec![record("100", product, 79.0, 200.0, "01/03/2024")];
        let (rows, stats) = run(&outgoing, &incoming);

        assert_eq!(rows[0].status, Status::NotReceived);
        assert!(rows[0].observations.contains("Quantity incompatible"));
        assert_eq!(stats.not_found, 1);
    }

    #[test]
    fn value_divergence_flagged_when_quantities_agree() {
        let product = "DIPIRONA 500MG COMP C/20";
        let outgoing = vec![record("100", product, 20.0, 100.0, "01/03/2024")];
        let incoming = vec![record("100", product, 20.0, 130.0, "01/03/2024")];
        let (rows, stats) = run(&outgoing, &incoming);

        assert_eq!(rows[0].status, Status::NonCompliant);
        assert!(rows[0].divergence.contains("Value divergence"));
        assert_eq!(rows[0].value_diff, Some(-30.0));
        assert_eq!(stats.value_divergent, 1);
    }

    #[test]
    fn each_incoming_backs_at_most_one_match() {
        let product = "DIPIRONA 500MG COMP C/20";
        let outgoing = vec![
            record("100", product, 10.0, 25.0, "01/03/2024"),
            record("100", product, 10.0, 25.0, "01/03/2024"),
        ];
        let incoming = vec![record("100", product, 10.0, 25.0, "01/03/2024")];
        let (rows, stats) = run(&outgoing, &incoming);

        assert_eq!(rows.len(), 2);
        let compliant = rows.iter().filter(|r| r.status == Status::Compliant).count();
        let not_received = rows
            .iter()
            .filter(|r| r.status == Status::NotReceived)
            .count();
        assert_eq!(compliant, 1);
        assert_eq!(not_received, 1);
        assert_eq!(stats.compliant, 1);
        assert_eq!(stats.not_found, 1);
    }

    #[test]
    fn lead_time_and_early_receipt_warning() {
        let product = "DIPIRONA 500MG COMP C/20";
        let outgoing = vec![record("100", product, 20.0, 50.0, "02/03/2024")];
        let incoming = vec![record("100", product, 20.0, 50.0, "01/03/2024")];
        let (rows, _) = run(&outgoing, &incoming);

        assert_eq!(rows[0].lead_time_hours, Some(-24.0));
        assert!(rows[0].observations.contains("received before shipment"));
    }

    #[test]
    fn progress_reports_are_monotonic_and_complete() {
        let product = "DIPIRONA 500MG COMP C/20";
        let outgoing = vec![record("100", product, 20.0, 50.0, "01/03/2024")];
        let incoming = vec![record("100", product, 20.0, 50.0, "01/03/2024")];

        let mut fractions: Vec<f64> = Vec::new();
        let mut callback = |fraction: f64, _phase: &str| fractions.push(fraction);
        reconcile(
            &outgoing,
            &incoming,
            &ReconcileOptions::default(),
            Some(&mut callback),
        );

        assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(fractions.last().copied(), Some(1.0));
    }

    #[test]
    fn deterministic_across_runs() {
        let product = "DIPIRONA 500MG COMP C/20";
        let outgoing = vec![
            record("100", product, 20.0, 50.0, "01/03/2024"),
            record("", "SORO FISIOLOGICO 500ML", 5.0, 20.0, "02/03/2024"),
        ];
        let incoming = vec![
            record("100", product, 20.0, 50.0, "01/03/2024"),
            record("", "SORO FISIOLOGICO 500ML", 5.0, 20.0, "03/03/2024"),
        ];
        let (rows_a, stats_a) = run(&outgoing, &incoming);
        let (rows_b, stats_b) = run(&outgoing, &incoming);

        assert_eq!(rows_a.len(), rows_b.len());
        assert_eq!(stats_a, stats_b);
        for (a, b) in rows_a.iter().zip(&rows_b) {
            assert_eq!(a.status, b.status);
            assert_eq!(a.observations, b.observations);
        }
    }
}
