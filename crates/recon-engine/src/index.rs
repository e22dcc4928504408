//! Document-number candidate index.
//!
//! Maps the extracted numeric document id to the incoming-record
//! positions sharing it, replacing full cross-product scanning with O(1)
//! amortized retrieval. Also provides the date-window fallback used for
//! id-less records and the document-exempt destination.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};

use recon_model::LedgerRecord;

use crate::config::DATE_WINDOW_DAYS;

/// Lookup from document number to incoming-record positions.
#[derive(Debug, Default)]
pub struct DocumentIndex {
    by_document: BTreeMap<String, Vec<usize>>,
}

impl DocumentIndex {
    /// Index all incoming records carrying a document number.
    pub fn build(incoming: &[LedgerRecord]) -> Self {
        let mut by_document: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (idx, record) in incoming.iter().enumerate() {
            if record.has_document() {
                by_document
                    .entry(record.doc_num.clone())
                    .or_default()
                    .push(idx);
            }
        }
        Self { by_document }
    }

    /// Positions of incoming records sharing the given document number.
    pub fn lookup(&self, doc_num: &str) -> Option<&[usize]> {
        self.by_document.get(doc_num).map(Vec::as_slice)
    }

    pub fn contains(&self, doc_num: &str) -> bool {
        self.by_document.contains_key(doc_num)
    }

    pub fn len(&self) -> usize {
        self.by_document.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_document.is_empty()
    }
}

/// Incoming positions within the +/- 30 day window around a reference
/// date; all positions when the outgoing record carries no date.
pub fn date_window_candidates(
    incoming: &[LedgerRecord],
    reference: Option<NaiveDateTime>,
) -> Vec<usize> {
    match reference {
        Some(ts) => {
            let lo = ts - Duration::days(DATE_WINDOW_DAYS);
            let hi = ts + Duration::days(DATE_WINDOW_DAYS);
            incoming
                .iter()
                .enumerate()
                .filter(|(_, r)| r.timestamp.is_some_and(|t| t >= lo && t <= hi))
                .map(|(idx, _)| idx)
                .collect()
        }
        None => (0..incoming.len()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recon_normalize::parse_date_text;

    fn record(doc: &str, date: &str) -> LedgerRecord {
        LedgerRecord {
            document: doc.to_string(),
            doc_num: doc
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect(),
            timestamp: parse_date_text(date),
            ..LedgerRecord::default()
        }
    }

    #[test]
    fn index_groups_by_document() {
        let incoming = vec![
            record("100", "01/03/2024"),
            record("200", "02/03/2024"),
            record("100", "03/03/2024"),
            record("", "04/03/2024"),
        ];
        let index = DocumentIndex::build(&incoming);
        assert_eq!(index.lookup("100"), Some(&[0, 2][..]));
        assert_eq!(index.lookup("200"), Some(&[1][..]));
        assert!(index.lookup("300").is_none());
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn date_window_filters() {
        let incoming = vec![
            record("1", "01/03/2024"),
            record("2", "15/04/2024"),
            record("3", "20/03/2024"),
        ];
        let reference = parse_date_text("10/03/2024");
        let hits = date_window_candidates(&incoming, reference);
        assert_eq!(hits, vec![0, 2]);
    }

    #[test]
    fn missing_reference_returns_everything() {
        let incoming = vec![record("1", "01/03/2024"), record("2", "bad")];
        let hits = date_window_candidates(&incoming, None);
        assert_eq!(hits, vec![0, 1]);
    }
}
