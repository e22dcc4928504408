//! Similarity scoring.
//!
//! Two layers: [`score_product`] compares two product feature sets on a
//! 0-100 scale with a human-readable rationale, and [`score_pair`] builds
//! the composite score for an (outgoing, incoming) record pair on top of
//! it: document id, units, species, date proximity, and value proximity.
//!
//! `ignore_penalties` is set when the caller already holds independent
//! corroborating evidence (a document match): concentration, dimension,
//! and dosage-form disagreements are then not punished, only rewarded
//! when they agree.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use recon_model::{FeatureSet, LedgerRecord};

use crate::config;
use crate::tables::{SYNONYMS, forms_equivalent};

static NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d*").expect("numeric-token pattern"));

/// Transient scored candidate: one incoming record considered for one
/// outgoing record. Discarded once the best candidate is selected.
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    pub incoming_idx: usize,
    /// Composite match score.
    pub score: f64,
    /// Product-similarity sub-score.
    pub product_score: f64,
    /// Composite rationale (document, product, units, dates, values).
    pub detail: String,
    /// Product-similarity rationale.
    pub product_detail: String,
}

/// Sequence-similarity ratio in [0, 1].
fn seq_ratio(a: &str, b: &str) -> f64 {
    rapidfuzz::fuzz::ratio(a.chars(), b.chars())
}

fn numeric_tokens(text: &str) -> Vec<&str> {
    NUMERIC_TOKEN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Product-similarity score between two feature sets (0-100 with
/// additive bonuses, may exceed 100 when many components agree).
pub fn score_product(f1: &FeatureSet, f2: &FeatureSet, ignore_penalties: bool) -> (f64, String) {
    let mut score = 0.0;
    let mut details: Vec<String> = Vec::new();

    let has_synonym = SYNONYMS.iter().any(|(term, equivalents)| {
        f1.normalized.contains(term)
            && equivalents.iter().any(|syn| f2.normalized.contains(syn))
    });
    if has_synonym {
        score += config::SYNONYM_BONUS;
        details.push("Synonym:+".to_string());
    }

    let text_sim = seq_ratio(&f1.normalized, &f2.normalized);
    score += text_sim * config::TEXT_WEIGHT;
    details.push(format!("Text:{:.0}%", text_sim * 100.0));

    if !f1.ingredient.is_empty() && !f2.ingredient.is_empty() {
        let ingredient_sim = seq_ratio(&f1.ingredient, &f2.ingredient);
        score += ingredient_sim * config::INGREDIENT_WEIGHT;
        details.push(format!("Ingredient:{:.0}%", ingredient_sim * 100.0));
    }

    if !f1.concentration.is_empty() && !f2.concentration.is_empty() {
        let c1: String = f1.concentration.chars().filter(|c| !c.is_whitespace()).collect();
        let c2: String = f2.concentration.chars().filter(|c| !c.is_whitespace()).collect();
        if c1 == c2 {
            score += config::CONCENTRATION_EXACT;
            details.push("Conc:exact".to_string());
        } else {
            let nums1 = numeric_tokens(&c1);
            let nums2 = numeric_tokens(&c2);
            let shared = nums1.iter().filter(|n| nums2.contains(n)).count();
            if shared > 0 && shared as f64 >= nums1.len() as f64 * 0.5 {
                score += config::CONCENTRATION_PARTIAL;
                details.push("Conc:partial".to_string());
            } else {
                let conc_sim = seq_ratio(&c1, &c2);
                if conc_sim > config::CONCENTRATION_SIM_MIN {
                    score += conc_sim * config::CONCENTRATION_SIM_WEIGHT;
                    details.push(format!("Conc:~{:.0}%", conc_sim * 100.0));
                } else if !ignore_penalties {
                    score -= config::CONCENTRATION_PENALTY;
                    details.push("Conc:mismatch".to_string());
                }
            }
        }
    }

    if !f1.dimension.is_empty() && !f2.dimension.is_empty() {
        if f1.dimension == f2.dimension {
            score += config::DIMENSION_EXACT;
            details.push("Dim:exact".to_string());
        } else {
            let d1: BTreeSet<&str> = f1.dimension.split('X').collect();
            let d2: BTreeSet<&str> = f2.dimension.split('X').collect();
            let shared = d1.intersection(&d2).count();
            if shared >= 2 {
                score += config::DIMENSION_TWO_SHARED;
                details.push("Dim:~".to_string());
            } else if shared == 1 {
                score += config::DIMENSION_ONE_SHARED;
                details.push("Dim:partial".to_string());
            } else if !ignore_penalties {
                score -= config::DIMENSION_PENALTY;
                details.push("Dim:mismatch".to_string());
            }
        }
    }

    if !f1.dosage_form.is_empty() && !f2.dosage_form.is_empty() {
        if f1.dosage_form == f2.dosage_form {
            score += config::FORM_MATCH;
            details.push("Form:exact".to_string());
        } else if forms_equivalent(&f1.dosage_form, &f2.dosage_form) {
            score += config::FORM_MATCH;
            details.push("Form:equiv".to_string());
        } else if !ignore_penalties {
            score -= config::FORM_PENALTY;
            details.push("Form:mismatch".to_string());
        }
    }

    let k1: BTreeSet<&String> = f1.keywords.iter().collect();
    let k2: BTreeSet<&String> = f2.keywords.iter().collect();
    let shared_keywords = k1.intersection(&k2).count();
    if shared_keywords > 0 {
        let overlap = shared_keywords as f64 / k1.len().max(k2.len()) as f64;
        score += overlap * config::KEYWORD_WEIGHT;
        details.push(format!("Keywords:{shared_keywords}"));
    }

    (score, details.join(" | "))
}

/// Score one (outgoing, incoming) pair.
///
/// Returns `None` when the candidate is rejected: conflicting document
/// ids on a non-exempt destination, product similarity under the
/// effective threshold, or composite score under the floor. The effective
/// product threshold depends on the evidence at hand: with a document
/// match it drops to 40 when quantities agree within epsilon and rises to
/// 85 otherwise; without one, the caller-supplied global threshold
/// applies.
pub fn score_pair(
    outgoing: &LedgerRecord,
    incoming: &LedgerRecord,
    incoming_idx: usize,
    similarity_threshold: f64,
) -> Option<MatchCandidate> {
    let mut score = 0.0;
    let mut details: Vec<String> = Vec::new();

    let doc_match = if outgoing.exempt_destination {
        score += config::DOC_MATCH_SCORE;
        details.push("Doc:exempt".to_string());
        true
    } else if outgoing.has_document() && incoming.has_document() {
        if outgoing.doc_num == incoming.doc_num {
            score += config::DOC_MATCH_SCORE;
            details.push(format!("Doc:{}", outgoing.doc_num));
            true
        } else {
            // Conflicting ids: this candidate cannot back the record.
            return None;
        }
    } else {
        score += config::DOC_MISSING_SCORE;
        if outgoing.has_document() {
            details.push("Doc:none(in)".to_string());
        } else {
            details.push("Doc:none(out)".to_string());
        }
        false
    };

    let (product_score, product_detail) =
        score_product(&outgoing.features, &incoming.features, doc_match);

    let effective_threshold = if doc_match {
        if (incoming.quantity - outgoing.quantity).abs() < config::QTY_EPSILON {
            config::DOC_EXACT_QTY_THRESHOLD
        } else {
            config::DOC_QTY_MISMATCH_THRESHOLD
        }
    } else {
        similarity_threshold
    };
    if product_score < effective_threshold {
        return None;
    }

    score += product_score * config::PRODUCT_WEIGHT;
    details.push(format!("Prod:{product_score:.0}%"));

    // Units, with the symmetric cross-check for origin<->destination
    // swaps seen in returns.
    let origin_direct = outgoing.origin_norm == incoming.origin_norm;
    let destination_direct = outgoing.destination_norm == incoming.destination_norm;
    let origin_cross = outgoing.origin_norm == incoming.destination_norm;
    let destination_cross = outgoing.destination_norm == incoming.origin_norm;
    if (origin_direct && destination_direct) || (origin_cross && destination_cross) {
        score += config::UNIT_FULL_SCORE;
        details.push("Unit:full".to_string());
    } else if origin_direct || destination_direct || origin_cross || destination_cross {
        score += config::UNIT_PARTIAL_SCORE;
        details.push("Unit:partial".to_string());
    }

    let species_out = outgoing.species.trim().to_uppercase();
    let species_in = incoming.species.trim().to_uppercase();
    if !species_out.is_empty() && !species_in.is_empty() {
        if species_out == species_in {
            score += config::SPECIES_MATCH_SCORE;
            details.push("Species:match".to_string());
        } else {
            details.push("Species:mismatch".to_string());
        }
    } else {
        score += config::SPECIES_UNKNOWN_SCORE;
        details.push("Species:unknown".to_string());
    }

    if let (Some(date_out), Some(date_in)) = (outgoing.timestamp, incoming.timestamp) {
        let day_distance = (date_in - date_out).num_days().abs();
        for (max_days, contribution) in config::DATE_PROXIMITY_TIERS {
            if day_distance <= max_days {
                score += contribution;
                details.push(if day_distance == 0 {
                    "Date:same".to_string()
                } else {
                    format!("Date:{day_distance}d")
                });
                break;
            }
        }
    }

    if outgoing.value > 0.0 {
        let value_pct = (outgoing.value - incoming.value).abs() / outgoing.value * 100.0;
        for (max_pct, contribution) in config::VALUE_PROXIMITY_TIERS {
            if value_pct <= max_pct {
                score += contribution;
                details.push(format!("Value:~{value_pct:.1}%"));
                break;
            }
        }
    }

    if score < config::MIN_COMPOSITE_SCORE {
        return None;
    }

    Some(MatchCandidate {
        incoming_idx,
        score,
        product_score,
        detail: details.join(" | "),
        product_detail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::extract_features;
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
        crate::features::annotate_record(&mut r);
        r
    }

    #[test]
    fn identical_products_score_high() {
        let f = extract_features("DIPIRONA 500MG COMP C/20");
        let (score, detail) = score_product(&f, &f, false);
        assert!(score > 85.0, "identical products should score high: {score} ({detail})");
    }

    #[test]
    fn synonym_bonus_applies() {
        let f1 = extract_features("AVENTAL CIRURGICO DESCARTAVEL");
        let f2 = extract_features("CAPOTE CIRURGICO DESCARTAVEL");
        let (_, detail) = score_product(&f1, &f2, false);
        assert!(detail.contains("Synonym:+"), "detail: {detail}");
    }

    #[test]
    fn concentration_mismatch_penalized_unless_ignored() {
        let f1 = extract_features("DIPIRONA 500MG COMP");
        let f2 = extract_features("DIPIRONA 10MG COMP");
        let (penalized, d1) = score_product(&f1, &f2, false);
        let (ignored, _) = score_product(&f1, &f2, true);
        assert!(d1.contains("Conc:mismatch"));
        assert!(ignored > penalized);
        assert!((ignored - penalized - crate::config::CONCENTRATION_PENALTY).abs() < 1e-9);
    }

    #[test]
    fn dimension_sharing_tiers() {
        let f1 = extract_features("COMPRESSA 25X7");
        let f2 = extract_features("COMPRESSA 7X25");
        let (_, detail) = score_product(&f1, &f2, false);
        assert!(detail.contains("Dim:exact"), "detail: {detail}");

        let f3 = extract_features("COMPRESSA 25X9");
        let (_, detail) = score_product(&f1, &f3, false);
        assert!(detail.contains("Dim:partial"), "detail: {detail}");
    }

    #[test]
    fn form_equivalence_counts_as_match() {
        let f1 = extract_features("CEFTRIAXONA 1G AMPOLA");
        let f2 = extract_features("CEFTRIAXONA 1G AMP");
        let (_, detail) = score_product(&f1, &f2, false);
        assert!(
            detail.contains("Form:exact") || detail.contains("Form:equiv"),
            "detail: {detail}"
        );
    }

    #[test]
    fn conflicting_documents_reject_candidate() {
        let out = record("100", "DIPIRONA 500MG COMP C/20", 20.0, 50.0, "01/03/2024");
        let inc = record("200", "DIPIRONA 500MG COMP C/20", 20.0, 50.0, "01/03/2024");
        assert!(score_pair(&out, &inc, 0, 65.0).is_none());
    }

    #[test]
    fn exempt_destination_never_rejected_for_document_mismatch() {
        let mut out = record("100", "DIPIRONA 500MG COMP C/20", 20.0, 50.0, "01/03/2024");
        out.destination_unit = "HOSPITAL CASA DE PORTUGAL".to_string();
        crate::features::annotate_record(&mut out);
        let inc = record("200", "DIPIRONA 500MG COMP C/20", 20.0, 50.0, "01/03/2024");
        let candidate = score_pair(&out, &inc, 0, 65.0);
        assert!(candidate.is_some(), "exempt unit must not be doc-rejected");
        assert!(candidate.unwrap().detail.contains("Doc:exempt"));
    }

    #[test]
    fn matching_documents_score_forty() {
        let out = record("100-A", "DIPIRONA 500MG COMP C/20", 20.0, 50.0, "01/03/2024");
        let inc = record("100-B", "DIPIRONA 500MG COMP C/20", 20.0, 50.0, "01/03/2024");
        let candidate = score_pair(&out, &inc, 0, 65.0).expect("should match");
        assert!(candidate.detail.contains("Doc:100"));
        assert!(candidate.score >= 90.0, "score: {}", candidate.score);
    }

    #[test]
    fn missing_document_scores_fifteen_and_uses_global_threshold() {
        let out = record("", "DIPIRONA 500MG COMP C/20", 20.0, 50.0, "01/03/2024");
        let inc = record("100", "DIPIRONA 500MG COMP C/20", 20.0, 50.0, "01/03/2024");
        let candidate = score_pair(&out, &inc, 0, 65.0).expect("should match");
        assert!(candidate.detail.contains("Doc:none(out)"));

        // An unrelated product stays under the global threshold.
        let unrelated = record("100", "LUVA NITRILICA M", 20.0, 50.0, "01/03/2024");
        assert!(score_pair(&out, &unrelated, 0, 65.0).is_none());
    }

    #[test]
    fn document_match_with_quantity_gap_requires_high_product_score() {
        // Same document, different quantity, moderately similar product:
        // the 85-point effective threshold rejects it.
        let out = record("100", "DIPIRONA 500MG COMP C/20", 20.0, 50.0, "01/03/2024");
        let inc = record("100", "DIPIRONA SODICA 1G GOTAS FRASCO", 35.0, 50.0, "01/03/2024");
        assert!(score_pair(&out, &inc, 0, 65.0).is_none());
    }
}
