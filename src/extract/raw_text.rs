use std::sync::LazyLock;

use regex::Regex;

use crate::model::{ExtractedValue, IdGenerator, PageInput, SourceLocation};
use crate::normalize::{determine_value_type, extract_unit, first_numeric_value};

const RAW_TEXT_CONFIDENCE: f32 = 0.6;
const CONTEXT_RADIUS: usize = 50;

/// Fixed list of labelled regexes applied to raw OCR text. Each
/// captures the value that follows the label, if present, else
/// falls back to the whole match.
static LABELLED_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    vec![
        ("Yield", Regex::new(r"(?i)yield[:\s]+([\d.]+\s*%?)").unwrap()),
        ("Temperature", Regex::new(r"(?i)temp(?:erature)?[:\s]+([\d.]+\s*°?[cf]?)").unwrap()),
        ("Pressure", Regex::new(r"(?i)pressure[:\s]+([\d.]+\s*(?:psi|bar|kpa|mbar)?)").unwrap()),
        ("pH", Regex::new(r"(?i)\bph[:\s]+([\d.]+)").unwrap()),
        ("Volume", Regex::new(r"(?i)volume[:\s]+([\d.]+\s*(?:ml|l)?)").unwrap()),
        ("Weight", Regex::new(r"(?i)weight[:\s]+([\d.]+\s*(?:kg|g|mg)?)").unwrap()),
        ("Duration", Regex::new(r"(?i)(?:time|duration)[:\s]+([\d.]+\s*(?:hrs?|hours?|min(?:utes?)?|secs?|seconds?)?)").unwrap()),
        ("Flow Rate", Regex::new(r"(?i)flow\s*rate[:\s]+([\d.]+\s*(?:ml/min|l/min|gpm)?)").unwrap()),
        ("Batch Number", Regex::new(r"(?i)batch\s*(?:no\.?|number|#)?[:\s]+([A-Za-z0-9\-/]+)").unwrap()),
        ("Lot Number", Regex::new(r"(?i)lot\s*(?:no\.?|number|#)?[:\s]+([A-Za-z0-9\-/]+)").unwrap()),
        ("Equipment ID", Regex::new(r"(?i)equipment\s*(?:id|number|#)?[:\s]+([A-Za-z0-9\-/]+)").unwrap()),
    ]
});

/// Scan raw OCR text for the fixed labelled-regex list, emitting one
/// value per match with a ±50-character surrounding-context window.
pub fn extract_raw_text_values(page: &PageInput, id_gen: &IdGenerator) -> Vec<ExtractedValue> {
    let text = &page.extracted_text;
    let mut values = Vec::new();

    for (label, pattern) in LABELLED_PATTERNS.iter() {
        let Some(captures) = pattern.captures(text) else {
            continue;
        };
        let whole = captures.get(0).unwrap();
        let value_str = captures
            .get(1)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_else(|| whole.as_str().trim().to_string());

        let context = context_window(text, whole.start(), whole.end());

        values.push(ExtractedValue {
            id: id_gen.next_value_id(),
            numeric_value: first_numeric_value(&value_str),
            unit: extract_unit(&value_str),
            value_type: determine_value_type(&value_str),
            source: SourceLocation::new(page.page_number, page.classification.clone(), *label)
                .with_context(context),
            confidence: RAW_TEXT_CONFIDENCE,
            is_handwritten: false,
            raw_value: value_str,
        });
    }

    values
}

fn context_window(text: &str, start: usize, end: usize) -> String {
    let lower = start.saturating_sub(CONTEXT_RADIUS);
    let upper = (end + CONTEXT_RADIUS).min(text.len());
    // Clamp to char boundaries to avoid panicking on multi-byte UTF-8.
    let lower = next_char_boundary(text, lower);
    let upper = prev_char_boundary(text, upper);
    text[lower..upper].to_string()
}

fn next_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

fn prev_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
