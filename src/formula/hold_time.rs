use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;

use crate::model::{DetectedFormula, ExtractedValue, FormulaOperand, FormulaType, IdGenerator, OperandRole, PageInput, SourceLocation, ValueType};

use super::operands::round2;

const TOLERANCE_HOURS: f64 = 0.5;

static START_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)start").unwrap());
static END_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)end").unwrap());
static HOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)hold").unwrap());

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M", "%I:%M %p", "%I:%M:%S %p"];

fn parse_time(raw: &str) -> Option<NaiveTime> {
    TIME_FORMATS.iter().find_map(|fmt| NaiveTime::parse_from_str(raw.trim(), fmt).ok())
}

/// Computed for reporting only: hold time never produces a
/// `calculation_error` alert, since no tolerance for it is declared
/// anywhere in the document.
pub fn detect(values: &[ExtractedValue], page: &PageInput, id_gen: &IdGenerator) -> Option<DetectedFormula> {
    let start = values
        .iter()
        .find(|v| matches!(v.value_type, ValueType::Time | ValueType::Datetime) && START_RE.is_match(&v.source.field_label))?;
    let end = values
        .iter()
        .find(|v| matches!(v.value_type, ValueType::Time | ValueType::Datetime) && END_RE.is_match(&v.source.field_label))?;
    let duration = values
        .iter()
        .find(|v| v.numeric_value.is_some() && HOLD_RE.is_match(&v.source.field_label))?;

    let start_time = parse_time(&start.raw_value)?;
    let end_time = parse_time(&end.raw_value)?;

    let mut hours = (end_time - start_time).num_minutes() as f64 / 60.0;
    if hours < 0.0 {
        hours += 24.0;
    }
    let expected = round2(hours);
    let actual = duration.numeric_value;
    let discrepancy = actual.map(|a| round2((expected - a).abs()));

    Some(DetectedFormula {
        id: id_gen.next_formula_id(),
        formula_type: FormulaType::HoldTime,
        expression: format!("{} -> {} = {}h", start.source.field_label, end.source.field_label, expected),
        operands: vec![
            FormulaOperand { role: OperandRole::Base, value_id: start.id.clone(), label: start.source.field_label.clone(), value: 0.0 },
            FormulaOperand { role: OperandRole::Operand, value_id: end.id.clone(), label: end.source.field_label.clone(), value: 0.0 },
            FormulaOperand { role: OperandRole::Operand, value_id: duration.id.clone(), label: duration.source.field_label.clone(), value: duration.numeric_value.unwrap_or(0.0) },
        ],
        expected_result: expected,
        actual_result: actual,
        discrepancy,
        tolerance_percent: TOLERANCE_HOURS,
        is_within_tolerance: true,
        source: SourceLocation::new(page.page_number, page.classification.clone(), "Hold Time"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PageExtractionMetadata, SourceLocation as SL};

    fn time_value(label: &str, raw: &str) -> ExtractedValue {
        ExtractedValue {
            id: "v".into(),
            raw_value: raw.to_string(),
            numeric_value: None,
            unit: None,
            value_type: ValueType::Time,
            source: SL::new(1, "cip_sip_record", label),
            confidence: 0.8,
            is_handwritten: false,
        }
    }

    fn numeric_value(label: &str, n: f64) -> ExtractedValue {
        ExtractedValue {
            id: "v".into(),
            raw_value: n.to_string(),
            numeric_value: Some(n),
            unit: None,
            value_type: ValueType::Numeric,
            source: SL::new(1, "cip_sip_record", label),
            confidence: 0.8,
            is_handwritten: false,
        }
    }

    fn page() -> PageInput {
        PageInput {
            page_number: 1,
            classification: "cip_sip_record".into(),
            extracted_text: String::new(),
            metadata: PageExtractionMetadata::default(),
        }
    }

    #[test]
    fn never_alerts_even_with_large_discrepancy() {
        let values = vec![
            time_value("Start Time", "08:00"),
            time_value("End Time", "10:00"),
            numeric_value("Hold Duration", 100.0),
        ];
        let gen = IdGenerator::default();
        let formula = detect(&values, &page(), &gen).unwrap();
        assert!(formula.is_within_tolerance, "hold_time must never flag tolerance");
        assert_eq!(formula.expected_result, 2.0);
        assert_eq!(formula.discrepancy, Some(98.0));
    }

    #[test]
    fn missing_operand_skips() {
        let values = vec![time_value("Start Time", "08:00")];
        let gen = IdGenerator::default();
        assert!(detect(&values, &page(), &gen).is_none());
    }
}
