//! Product feature extraction.
//!
//! Decomposes a free-text product description into the structured
//! [`FeatureSet`] the scorer compares: normalized text, concentration,
//! dosage form, pack quantity, dimension signature, keywords, and a
//! coarse active-ingredient guess. Pure and total: any input yields a
//! feature set, with empty sub-fields where nothing was found.

use std::sync::LazyLock;

use regex::Regex;

use recon_model::{FeatureSet, LedgerRecord};
use recon_normalize::normalize_units;

use crate::tables::{CONCENTRATION_UNITS, DOSAGE_FORMS, STOPWORDS, is_document_exempt};

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("digit-run pattern"));

static NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d*").expect("numeric-token pattern"));

/// Ratio concentration: `NUMBER UNIT / NUMBER UNIT`.
static CONCENTRATION_RATIO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(\d+[,.]?\d*)\s*({u}|%)\s*/\s*(\d+[,.]?\d*)\s*({u})",
        u = CONCENTRATION_UNITS.trim_end_matches("|%")
    ))
    .expect("concentration ratio pattern")
});

/// Single concentration: `NUMBER UNIT` (ratios are filtered out by
/// checking the trailing text, since the regex crate has no lookahead).
static CONCENTRATION_SINGLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(\d+[,.]?\d*)\s*({})", CONCENTRATION_UNITS))
        .expect("concentration single pattern")
});

/// Units per pack: `C/10`, `C 10`, `X10`, `COM 10`.
static PACK_QUANTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:C/|C |X|COM )\s*(\d+)").expect("pack-quantity pattern"));

/// Physical dimensions: `25X7`, `0.70 x 25`.
static DIMENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d*\s*[xX]\s*\d+\.?\d*").expect("dimension pattern"));

/// Extract the first digit run from a free-text document field.
pub fn extract_document_number(document: &str) -> String {
    DIGIT_RUN
        .find(document)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Decompose a raw product description into a [`FeatureSet`].
pub fn extract_features(description: &str) -> FeatureSet {
    let upper = normalize_units(description.trim());

    let normalized = normalize_text(&upper);
    let concentration = extract_concentration(&upper);
    let dosage_form = extract_dosage_form(&upper);
    let pack_quantity = PACK_QUANTITY
        .captures(&upper)
        .map(|c| c[1].to_string())
        .unwrap_or_default();
    let dimension = DIMENSION
        .find(&upper)
        .map(|m| dimension_signature(m.as_str()))
        .unwrap_or_default();

    let keywords: Vec<String> = normalized
        .split_whitespace()
        .filter(|token| token.chars().count() > 2 && !STOPWORDS.contains(token))
        .take(5)
        .map(str::to_string)
        .collect();
    let ingredient = keywords
        .iter()
        .take(2)
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");

    FeatureSet {
        normalized,
        ingredient,
        concentration,
        dosage_form,
        pack_quantity,
        dimension,
        keywords,
    }
}

/// Fill a record's derived annotation fields in place: document number,
/// normalized unit names, cached feature set, and the exempt-destination
/// flag.
pub fn annotate_record(record: &mut LedgerRecord) {
    record.doc_num = extract_document_number(&record.document);
    record.origin_norm = record.origin_unit.trim().to_uppercase();
    record.destination_norm = record.destination_unit.trim().to_uppercase();
    record.features = extract_features(&record.product);
    record.exempt_destination = is_document_exempt(&record.destination_unit);
}

/// Strip punctuation into whitespace and collapse runs.
fn normalize_text(upper: &str) -> String {
    let replaced: String = upper
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Concatenate all concentration matches, ratio form first, then single
/// form excluding the numerator of a ratio. Commas become dots.
fn extract_concentration(upper: &str) -> String {
    let mut found: Vec<String> = Vec::new();

    for caps in CONCENTRATION_RATIO.captures_iter(upper) {
        let joined: String = (1..caps.len())
            .filter_map(|i| caps.get(i))
            .map(|m| m.as_str())
            .collect();
        found.push(joined.replace(',', "."));
    }

    for caps in CONCENTRATION_SINGLE.captures_iter(upper) {
        let whole = caps.get(0).expect("capture 0");
        // Skip matches immediately followed by a slash: those are ratio
        // numerators already covered above.
        let rest = upper[whole.end()..].trim_start();
        if rest.starts_with('/') {
            continue;
        }
        let joined = format!("{}{}", &caps[1], &caps[2]);
        found.push(joined.replace(',', "."));
    }

    found.join(" ")
}

fn extract_dosage_form(upper: &str) -> String {
    DOSAGE_FORMS
        .iter()
        .find(|form| upper.contains(**form))
        .map(|form| (*form).to_string())
        .unwrap_or_default()
}

/// Normalize a dimension expression into a comparable signature: strip
/// whitespace, pull out the numeric tokens, drop insignificant trailing
/// zeros by a float round-trip, sort lexically, join with `X`. `25X7` and
/// `7.0X25` produce the same signature.
pub fn dimension_signature(raw: &str) -> String {
    let compact: String = raw
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let mut tokens: Vec<String> = NUMERIC_TOKEN
        .find_iter(&compact)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .map(|n| n.to_string())
        .collect();
    tokens.sort();
    tokens.join("X")
}
