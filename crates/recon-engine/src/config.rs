//! Tuning constants for scoring, guardrails, and conformance.
//!
//! The guardrail percentages and value-tolerance tiers are business-owned
//! calibration values carried over verbatim; recalibration belongs to the
//! business owner, not to this crate.

// --- Product similarity weights (0-100 scale) ---

/// Flat bonus when a registered synonym of a token in one description
/// appears in the other.
pub const SYNONYM_BONUS: f64 = 15.0;
/// Weight of the general text-similarity ratio.
pub const TEXT_WEIGHT: f64 = 30.0;
/// Weight of the active-ingredient-guess similarity (both sides present).
pub const INGREDIENT_WEIGHT: f64 = 35.0;
/// Exact concentration match.
pub const CONCENTRATION_EXACT: f64 = 20.0;
/// At least half of one side's numeric tokens appear in the other.
pub const CONCENTRATION_PARTIAL: f64 = 15.0;
/// Scale for near-miss concentration similarity above [`CONCENTRATION_SIM_MIN`].
pub const CONCENTRATION_SIM_WEIGHT: f64 = 15.0;
pub const CONCENTRATION_SIM_MIN: f64 = 0.7;
pub const CONCENTRATION_PENALTY: f64 = 25.0;
/// Identical dimension signature.
pub const DIMENSION_EXACT: f64 = 15.0;
pub const DIMENSION_TWO_SHARED: f64 = 10.0;
pub const DIMENSION_ONE_SHARED: f64 = 5.0;
pub const DIMENSION_PENALTY: f64 = 15.0;
/// Dosage form identical or in the same equivalence group.
pub const FORM_MATCH: f64 = 10.0;
pub const FORM_PENALTY: f64 = 10.0;
/// Scale for the shared-keyword overlap ratio.
pub const KEYWORD_WEIGHT: f64 = 5.0;

// --- Composite pair scoring ---

/// Document ids agree (or the destination is document-exempt).
pub const DOC_MATCH_SCORE: f64 = 40.0;
/// Either side lacks a document id.
pub const DOC_MISSING_SCORE: f64 = 15.0;
/// Share of the product score in the composite.
pub const PRODUCT_WEIGHT: f64 = 0.45;
/// Both units agree (or the pair is fully swapped origin<->destination).
pub const UNIT_FULL_SCORE: f64 = 5.0;
/// One unit agrees (direct or swapped).
pub const UNIT_PARTIAL_SCORE: f64 = 3.0;
pub const SPECIES_MATCH_SCORE: f64 = 3.0;
/// Either side has no species recorded.
pub const SPECIES_UNKNOWN_SCORE: f64 = 2.0;
/// Date-proximity tiers: (max day distance, contribution).
pub const DATE_PROXIMITY_TIERS: [(i64, f64); 4] = [(0, 5.0), (3, 4.0), (7, 3.0), (15, 1.0)];
/// Value-proximity tiers: (max percent difference, contribution).
pub const VALUE_PROXIMITY_TIERS: [(f64, f64); 4] =
    [(1.0, 2.0), (5.0, 1.5), (15.0, 1.0), (50.0, 0.5)];
/// Candidates under this composite score are dropped.
pub const MIN_COMPOSITE_SCORE: f64 = 50.0;
/// Stop scanning candidates once the best composite reaches this.
pub const EARLY_EXIT_SCORE: f64 = 95.0;

// --- Effective product-similarity thresholds ---

/// With a document match and quantities agreeing within [`QTY_EPSILON`].
pub const DOC_EXACT_QTY_THRESHOLD: f64 = 40.0;
/// With a document match but diverging quantities.
pub const DOC_QTY_MISMATCH_THRESHOLD: f64 = 85.0;
/// Aggregation: group sum matches the incoming quantity exactly.
pub const GROUP_SUM_THRESHOLD: f64 = 70.0;
/// Aggregation: group sum diverges.
pub const GROUP_NO_SUM_THRESHOLD: f64 = 85.0;

// --- Quantity guardrail ---

/// Quantities closer than this are considered equal.
pub const QTY_EPSILON: f64 = 0.01;
/// Max accepted quantity deviation (%) with document match and product
/// score >= [`GUARDRAIL_PRODUCT_MIN`].
pub const GUARDRAIL_DOC_PCT: f64 = 20.0;
/// Max accepted quantity deviation (%) without a document match.
pub const GUARDRAIL_NODOC_PCT: f64 = 10.0;
pub const GUARDRAIL_PRODUCT_MIN: f64 = 85.0;

// --- Value conformance ---

/// Below this outgoing value the absolute tolerance tier applies.
pub const VALUE_SMALL_CUTOVER: f64 = 10.0;
/// Absolute tolerance for small-value lines.
pub const VALUE_SMALL_ABS: f64 = 1.0;
/// Flat absolute tolerance.
pub const VALUE_ABS: f64 = 10.0;
/// Relative tolerance (%) when quantity already conforms.
pub const VALUE_PCT: f64 = 10.0;

// --- Candidate retrieval and aggregation ---

/// Cap on the number of candidates scored per outgoing record.
pub const CANDIDATE_CAP: usize = 100;
/// Date window (days, each side) for index-less candidate search.
pub const DATE_WINDOW_DAYS: i64 = 30;
/// Tolerance when comparing a group sum against one incoming quantity.
pub const GROUP_SUM_EPSILON: f64 = 0.1;
/// Max deviation (%) of a candidate sum from the outgoing quantity for a
/// one-to-many aggregation.
pub const AGGREGATE_DEVIATION_PCT: f64 = 10.0;

/// Records between progress-callback invocations.
pub const PROGRESS_INTERVAL: usize = 20;
