//! Unit-of-measure canonicalization.

/// Long-form Portuguese unit names and their fixed abbreviations.
/// Singular and plural forms map to the same abbreviation.
const UNIT_ALIASES: [(&str, &str); 19] = [
    ("GR", "G"),
    ("GRAMA", "G"),
    ("GRAMAS", "G"),
    ("MILIGRAMA", "MG"),
    ("MILIGRAMAS", "MG"),
    ("MILILITRO", "ML"),
    ("MILILITROS", "ML"),
    ("MICROGRAMA", "MCG"),
    ("MICROGRAMAS", "MCG"),
    ("UNIDADE", "UI"),
    ("UNIDADES", "UI"),
    ("LITRO", "L"),
    ("LITROS", "L"),
    ("METRO", "M"),
    ("METROS", "M"),
    ("CENTIMETRO", "CM"),
    ("CENTIMETROS", "CM"),
    ("MILIMETRO", "MM"),
    ("MILIMETROS", "MM"),
];

/// Uppercase the text and replace whole-word occurrences of long-form
/// unit names with their abbreviations. Tokens embedded in larger
/// alphanumeric runs (e.g. `500GRAMA`) are left untouched, matching
/// word-boundary semantics.
pub fn normalize_units(text: &str) -> String {
    let upper = text.to_uppercase();
    let mut out = String::with_capacity(upper.len());
    let mut word = String::new();

    for ch in upper.chars() {
        if ch.is_alphanumeric() {
            word.push(ch);
        } else {
            flush_word(&mut out, &mut word);
            out.push(ch);
        }
    }
    flush_word(&mut out, &mut word);
    out
}

fn flush_word(out: &mut String, word: &mut String) {
    if word.is_empty() {
        return;
    }
    let mapped = UNIT_ALIASES
        .iter()
        .find(|(long, _)| long == word)
        .map(|(_, abbr)| *abbr);
    match mapped {
        Some(abbr) => out.push_str(abbr),
        None => out.push_str(word),
    }
    word.clear();
}
