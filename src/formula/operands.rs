use regex::Regex;

use crate::model::ExtractedValue;

/// First value (in extraction order) whose field label matches every
/// given pattern and carries a numeric value. Operand selection is by
/// case-insensitive regex against `fieldLabel`; the first match wins.
pub fn first_numeric_matching<'a>(values: &'a [ExtractedValue], patterns: &[&Regex]) -> Option<&'a ExtractedValue> {
    values.iter().find(|v| {
        v.numeric_value.is_some() && patterns.iter().all(|p| p.is_match(&v.source.field_label))
    })
}

/// All values (in extraction order) whose field label matches `include`
/// but not `exclude`, carrying a numeric value.
pub fn all_numeric_matching<'a>(
    values: &'a [ExtractedValue],
    include: &Regex,
    exclude: &Regex,
) -> Vec<&'a ExtractedValue> {
    values
        .iter()
        .filter(|v| {
            v.numeric_value.is_some()
                && include.is_match(&v.source.field_label)
                && !exclude.is_match(&v.source.field_label)
        })
        .collect()
}

pub fn round2(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}
