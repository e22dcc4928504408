//! Field normalization for noisy ledger inputs.
//!
//! All functions here are total: unparseable input degrades to a sentinel
//! (0.0, `None`, or the input passed through) rather than an error, so a
//! single bad cell never aborts a batch.

pub mod dates;
pub mod facility;
pub mod numeric;
pub mod units;

pub use dates::{parse_date_text, parse_serial_date};
pub use facility::canonical_facility;
pub use numeric::parse_amount;
pub use units::normalize_units;
