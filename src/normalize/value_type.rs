use std::sync::LazyLock;

use regex::Regex;

use crate::model::ValueType;

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b").expect("static date pattern")
});
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d{1,2}:\d{2}(:\d{2})?\s*(am|pm)?\b").expect("static time pattern")
});
static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[+-]?\d+(\.\d+)?").expect("static numeric pattern")
});

const BOOLEAN_WORDS: &[&str] = &["yes", "no", "true", "false", "pass", "fail", "y", "n"];

/// Classify free text into one of the six value types.
pub fn determine_value_type(text: &str) -> ValueType {
    let trimmed = text.trim();

    if DATE_RE.is_match(trimmed) {
        return if TIME_RE.is_match(trimmed) {
            ValueType::Datetime
        } else {
            ValueType::Date
        };
    }

    if TIME_RE.is_match(trimmed) {
        return ValueType::Time;
    }

    if BOOLEAN_WORDS
        .iter()
        .any(|w| w.eq_ignore_ascii_case(trimmed))
    {
        return ValueType::Boolean;
    }

    if NUMERIC_RE.is_match(trimmed) {
        return ValueType::Numeric;
    }

    ValueType::Text
}

/// Extract the first signed/unsigned decimal in the text, if any.
pub fn first_numeric_value(text: &str) -> Option<f64> {
    NUMERIC_RE.find(text).and_then(|m| m.as_str().parse().ok())
}
