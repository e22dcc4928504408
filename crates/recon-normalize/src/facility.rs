//! Facility-name canonicalization.
//!
//! The network's facilities appear under several historical name variants
//! across the two ledgers. The alias table collapses the known variants to
//! one canonical name per facility; lookup is exact after case and
//! whitespace normalization, and unmapped names pass through unchanged.

use std::collections::HashMap;
use std::sync::LazyLock;

static FACILITY_ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        // HOSPITAL CASA DE PORTUGAL
        ("CASA DE PORTUGAL", "HOSPITAL CASA DE PORTUGAL"),
        ("CASA DE PORTUGAL - REDE CASA", "HOSPITAL CASA DE PORTUGAL"),
        // HOSPITAL CASA MENSSANA
        (
            "HOSPITAL CASA MENSSANA - REDE CASA",
            "HOSPITAL CASA MENSSANA",
        ),
        (
            "HC MENSSANA PARTICULAR - REDE CASA",
            "HOSPITAL CASA MENSSANA",
        ),
        // HOSPITAL CASA EVANGELICO
        (
            "HOSPITAL EVANGELICO - REDE CASA",
            "HOSPITAL CASA EVANGELICO",
        ),
        (
            "HOSPITAL CASA EVANGÉLICO - REDE CASA",
            "HOSPITAL CASA EVANGELICO",
        ),
        ("HOSP.EVANGELICO - REDE CASA", "HOSPITAL CASA EVANGELICO"),
        (
            "HOSPITAL CASA EVANGELICO - REDE CASA",
            "HOSPITAL CASA EVANGELICO",
        ),
        // HOSPITAL CASA RIO LARANJEIRAS
        (
            "HOSPITAL CASA RIO LARANJEIRAS - REDE CASA",
            "HOSPITAL CASA RIO LARANJEIRAS",
        ),
        (
            "HOSPITAL RIO LARANJEIRAS - REDE CASA",
            "HOSPITAL CASA RIO LARANJEIRAS",
        ),
        (
            "HOSPITAL RIO LARANJEIRAS LTDA - REDE CASA",
            "HOSPITAL CASA RIO LARANJEIRAS",
        ),
        // HOSPITAL CASA RIO BOTAFOGO
        (
            "HOSPITAL CASA RIO BOTAFOGO - REDE CASA",
            "HOSPITAL CASA RIO BOTAFOGO",
        ),
        // HOSPITAL CASA SANTA CRUZ
        (
            "HOSPITAL CASA SANTA CRUZ - REDE CASA",
            "HOSPITAL CASA SANTA CRUZ",
        ),
        (
            "HOSPITAL SANTA CRUZ - REDE CASA",
            "HOSPITAL CASA SANTA CRUZ",
        ),
        ("HOSPITAL SANTA CRUZ", "HOSPITAL CASA SANTA CRUZ"),
        // HOSPITAL CASA SAO BERNARDO
        (
            "HOSPITAL CASA SAO BERNARDO - REDE CASA",
            "HOSPITAL CASA SAO BERNARDO",
        ),
        // HOSPITAL CASA PREMIUM
        ("HOSPITAL DE CANCER", "HOSPITAL CASA PREMIUM"),
        ("HOSPITAL DE CANCER - REDE CASA", "HOSPITAL CASA PREMIUM"),
        (
            "HOSPITAL CASA HOSPITAL DO CANCER – HCHC ADMINISTRACAO E GEST - REDE CASA",
            "HOSPITAL CASA PREMIUM",
        ),
        (
            "HOSPITAL CASA HOSPITAL DO CANCER - REDE CASA",
            "HOSPITAL CASA PREMIUM",
        ),
        // HOSPITAL CASA ILHA DO GOVERNADOR
        (
            "HOSPITAL ILHA DO GOVERNADOR",
            "HOSPITAL CASA ILHA DO GOVERNADOR",
        ),
        (
            "HOSPITAL ILHA DO GOVERNADOR - REDE CASA",
            "HOSPITAL CASA ILHA DO GOVERNADOR",
        ),
        (
            "HOSPITAL ILHA DO GOVERNADOR LTDA - REDE CASA",
            "HOSPITAL CASA ILHA DO GOVERNADOR",
        ),
    ])
});

/// Collapse a facility name to its canonical form.
///
/// Whitespace runs (including invisible characters the exports sometimes
/// carry) are squeezed and the name uppercased before lookup. Names with
/// no registered alias are returned in that normalized form.
pub fn canonical_facility(name: &str) -> String {
    let cleaned = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();
    match FACILITY_ALIASES.get(cleaned.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => cleaned,
    }
}
