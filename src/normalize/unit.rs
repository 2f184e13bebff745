use std::sync::LazyLock;

use regex::Regex;

/// Fixed priority list of unit families. The first
/// pattern that matches anywhere in the text wins — later families
/// (e.g. flow rate) can be shadowed by an earlier family matching a
/// substring of the same token (e.g. "ml/min" matches the volume
/// pattern's "ml" before the flow pattern is ever tried). This mirrors
/// observed OCR-pipeline behaviour and is intentionally preserved.
static UNIT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)°\s*c\b",
        r"(?i)°\s*f\b",
        r"(?i)\b(psi|bar|kpa|mbar)\b",
        r"(?i)\b(ml|l|liters?|litres?)\b",
        r"(?i)\b(kg|g|mg|grams?|kilograms?)\b",
        r"(?i)\b(hr[s]?|hours?|min|minutes?|sec|seconds?)\b",
        r"(?i)\b(ml/min|l/min|gpm)\b",
        r"%",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static unit pattern"))
    .collect()
});

/// Returns the lower-cased matched unit token, scanning the fixed
/// priority list in order and stopping at the first match.
pub fn extract_unit(text: &str) -> Option<String> {
    for pattern in UNIT_PATTERNS.iter() {
        if let Some(m) = pattern.find(text) {
            return Some(m.as_str().to_lowercase().replace(' ', ""));
        }
    }
    None
}
