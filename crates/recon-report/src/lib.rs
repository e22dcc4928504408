//! Reporting: result table CSV, JSON statistics sidecar and the terminal
//! summary.

pub mod csv_report;
pub mod stats_json;
pub mod summary;

pub use csv_report::write_result_csv;
pub use stats_json::{stats_sidecar_path, write_stats_json};
pub use summary::print_summary;
