//! Static domain lookup tables.
//!
//! Synonym families, dosage-form vocabulary and equivalence groups, and
//! the keyword stopword list, loaded once and shared read-only. Terms are
//! Portuguese medical-supply vocabulary as found in the source ledgers.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Domain synonym families: garment terms, solution terms, dosage-form
/// abbreviation families, and common brand/generic active-ingredient
/// pairs. A token on the left matching one description plus any of its
/// equivalents in the other earns the synonym bonus.
pub static SYNONYMS: LazyLock<HashMap<&'static str, &'static [&'static str]>> =
    LazyLock::new(|| {
        HashMap::from([
            (
                "AVENTAL",
                &["CAPOTE", "AVENTAL", "JALECO"] as &[&str],
            ),
            ("CAPOTE", &["AVENTAL", "CAPOTE", "JALECO"]),
            ("JALECO", &["AVENTAL", "CAPOTE", "JALECO"]),
            ("ALGODAO", &["POLYCOT", "ALGODAO", "COTTON"]),
            ("POLYCOT", &["ALGODAO", "POLYCOT", "COTTON"]),
            ("COTTON", &["ALGODAO", "POLYCOT", "COTTON"]),
            ("GAZE", &["COMPRESSA", "GAZE"]),
            ("COMPRESSA", &["GAZE", "COMPRESSA"]),
            ("SORO", &["SOLUCAO", "SORO", "SOL"]),
            ("SOLUCAO", &["SORO", "SOLUCAO", "SOL"]),
            ("SOL", &["SORO", "SOLUCAO", "SOL"]),
            ("SALINA", &["NACL", "CLORETO", "SALINA", "SF"]),
            ("NACL", &["SALINA", "CLORETO", "NACL", "SF"]),
            ("SF", &["SALINA", "NACL", "CLORETO", "SF"]),
            ("AMPOLA", &["AMP", "AMPOLA", "FRAMP", "FRASCOAMPOLA"]),
            ("AMP", &["AMPOLA", "AMP", "FRAMP", "FRASCOAMPOLA"]),
            ("FRAMP", &["AMP", "AMPOLA", "FRAMP", "FRASCOAMPOLA"]),
            ("FRASCOAMPOLA", &["AMP", "AMPOLA", "FRAMP", "FRASCOAMPOLA"]),
            ("COMPRIMIDO", &["COMP", "CP", "COMPRIMIDO", "DRAGEA"]),
            ("COMP", &["COMPRIMIDO", "COMP", "CP", "DRAGEA"]),
            ("CP", &["COMPRIMIDO", "COMP", "CP", "DRAGEA"]),
            ("CAPSULA", &["CAPS", "CAPSULA", "CAP"]),
            ("CAPS", &["CAPSULA", "CAPS", "CAP"]),
            ("CAP", &["CAPSULA", "CAPS", "CAP"]),
            ("INJETAVEL", &["INJ", "INJETAVEL", "IV", "IM", "SC"]),
            ("INJ", &["INJETAVEL", "INJ", "IV", "IM", "SC"]),
            ("ORAL", &["VO", "ORAL", "BUCAL"]),
            ("VO", &["ORAL", "VO", "BUCAL"]),
            ("DIPIRONA", &["METAMIZOL", "DIPIRONA", "NOVALGINA"]),
            ("METAMIZOL", &["DIPIRONA", "METAMIZOL", "NOVALGINA"]),
            ("PARACETAMOL", &["ACETAMINOFENO", "PARACETAMOL"]),
            ("ACETAMINOFENO", &["PARACETAMOL", "ACETAMINOFENO"]),
            ("OMEPRAZOL", &["OMEPRAZOL", "LOSEC"]),
            ("DICLOFENACO", &["DICLOFENACO", "VOLTAREN", "CATAFLAM"]),
            ("GLICOSE", &["DEXTROSE", "GLICOSE"]),
            ("DEXTROSE", &["GLICOSE", "DEXTROSE"]),
        ])
    });

/// Dosage-form vocabulary in recognition order; first substring match in
/// the normalized description wins.
pub const DOSAGE_FORMS: [&str; 26] = [
    "AMPOLA", "AMP", "COMPRIMIDO", "COMP", "CP", "CAPSULA", "CAPS", "FRASCO", "FR", "SERINGA",
    "SER", "BOLSA", "ENVELOPE", "ENV", "TUBO", "BISNAGA", "SACHÊ", "SACHE", "BLISTER", "CARTELA",
    "POTE", "VIDRO", "UNIDADE", "UN", "CAIXA", "CX",
];

/// Dosage-form equivalence groups: two different tokens in the same group
/// still count as a form match.
pub const FORM_EQUIVALENCE: [&[&str]; 6] = [
    &["AMPOLA", "AMP", "FR/AMP", "FRASCO/AMPOLA"],
    &["FR/AMP", "AMP", "AMPOLA", "FRASCO/AMPOLA"],
    &["COMPRIMIDO", "COMP", "CP"],
    &["CAPSULA", "CAPS"],
    &["FRASCO", "FR", "FR/AMP"],
    &["SERINGA", "SER"],
];

/// Context words removed before keyword extraction. Tokens of length <= 2
/// are dropped separately.
pub const STOPWORDS: [&str; 21] = [
    "DE",
    "DA",
    "DO",
    "COM",
    "PARA",
    "EM",
    "A",
    "O",
    "E",
    "C/",
    "SOLUCAO",
    "SOL",
    "INJETAVEL",
    "INJ",
    "ORAL",
    "USO",
    "ADULTO",
    "PEDIATRICO",
    "ESTERIL",
    "DESCARTAVEL",
    "DESC",
];

/// Concentration units recognized by the extractor.
pub const CONCENTRATION_UNITS: &str = "MG|G|ML|MCG|UI|L|%";

/// True when the destination facility is the document-exempt unit: loans
/// to it are known to omit document references, so document-id agreement
/// is never required for its matches.
pub fn is_document_exempt(unit: &str) -> bool {
    let upper = unit.to_uppercase();
    upper.contains("CASA") && upper.contains("PORTUGAL")
}

/// True when two dosage-form tokens fall into the same equivalence group.
pub fn forms_equivalent(a: &str, b: &str) -> bool {
    FORM_EQUIVALENCE
        .iter()
        .any(|group| group.contains(&a) && group.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exempt_unit_detection() {
        assert!(is_document_exempt("HOSPITAL CASA DE PORTUGAL"));
        assert!(is_document_exempt("casa de portugal"));
        assert!(!is_document_exempt("HOSPITAL CASA PREMIUM"));
    }

    #[test]
    fn form_equivalence_groups() {
        assert!(forms_equivalent("AMPOLA", "AMP"));
        assert!(forms_equivalent("COMP", "CP"));
        assert!(!forms_equivalent("AMPOLA", "COMP"));
    }

    #[test]
    fn synonym_families_are_symmetric_for_dipirona() {
        assert!(SYNONYMS["DIPIRONA"].contains(&"METAMIZOL"));
        assert!(SYNONYMS["METAMIZOL"].contains(&"DIPIRONA"));
    }
}
