use thiserror::Error;

/// Errors surfaced to callers of the reconciliation pipeline.
///
/// Only input-shape problems are fatal: a required canonical column that
/// cannot be located after header mapping, or an unreadable input file.
/// Cell-level parse failures degrade to sentinels inside the normalizer
/// and never reach this type.
#[derive(Debug, Error)]
pub enum ReconError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("required column '{field}' not found in headers: {headers:?}")]
    MissingColumn {
        field: &'static str,
        headers: Vec<String>,
    },
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, ReconError>;
