//! Numeric parsing with Brazilian/international separator disambiguation.

/// Parse a raw amount cell into a float.
///
/// Disambiguation rules:
/// - both comma and dot present: dot is the thousands separator, comma the
///   decimal point (`1.234,56` -> 1234.56)
/// - comma only: comma is the decimal point (`120,5` -> 120.5)
/// - more than one dot: all dots are thousands separators
///   (`1.200.000` -> 1200000.0)
/// - exactly one dot: a fractional part equal to `000` or longer than
///   three digits marks a thousands separator (`120.000` -> 120000.0,
///   `1.2345` -> 12345.0), otherwise a decimal point (`120.5` -> 120.5)
///
/// Empty or unparseable input yields 0.0.
pub fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw.trim().chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return 0.0;
    }

    let has_comma = cleaned.contains(',');
    let has_dot = cleaned.contains('.');

    let candidate = if has_comma && has_dot {
        cleaned.replace('.', "").replace(',', ".")
    } else if has_comma {
        cleaned.replace(',', ".")
    } else if has_dot {
        let parts: Vec<&str> = cleaned.split('.').collect();
        if parts.len() > 2 {
            cleaned.replace('.', "")
        } else {
            let fraction = parts[1];
            if fraction == "000" || fraction.len() > 3 {
                cleaned.replace('.', "")
            } else {
                cleaned
            }
        }
    } else {
        cleaned
    };

    candidate.parse::<f64>().unwrap_or(0.0)
}
