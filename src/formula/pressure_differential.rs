use std::sync::LazyLock;

use regex::Regex;

use crate::model::{DetectedFormula, ExtractedValue, FormulaOperand, FormulaType, IdGenerator, OperandRole, PageInput, SourceLocation};

use super::operands::{first_numeric_matching, round2};

const TOLERANCE_PSI: f64 = 0.5;

static PRESSURE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)pressure").unwrap());
static INLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)inlet|input|upstream").unwrap());
static OUTLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)outlet|output|downstream").unwrap());
static DIFF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)diff|delta|drop").unwrap());

pub fn detect(values: &[ExtractedValue], page: &PageInput, id_gen: &IdGenerator) -> Option<DetectedFormula> {
    let inlet = first_numeric_matching(values, &[&INLET_RE, &PRESSURE_RE])?;
    let outlet = first_numeric_matching(values, &[&OUTLET_RE, &PRESSURE_RE])?;
    let diff = first_numeric_matching(values, &[&DIFF_RE, &PRESSURE_RE])?;

    let inlet_val = inlet.numeric_value?;
    let outlet_val = outlet.numeric_value?;
    let diff_val = diff.numeric_value?;

    let expected = round2((inlet_val - outlet_val).abs());
    let discrepancy = round2((expected - diff_val).abs());
    let is_within_tolerance = discrepancy <= TOLERANCE_PSI;

    Some(DetectedFormula {
        id: id_gen.next_formula_id(),
        formula_type: FormulaType::PressureDifferential,
        expression: format!("|{} - {}| = {}", inlet.source.field_label, outlet.source.field_label, expected),
        operands: vec![
            FormulaOperand { role: OperandRole::Operand, value_id: inlet.id.clone(), label: inlet.source.field_label.clone(), value: inlet_val },
            FormulaOperand { role: OperandRole::Operand, value_id: outlet.id.clone(), label: outlet.source.field_label.clone(), value: outlet_val },
        ],
        expected_result: expected,
        actual_result: Some(diff_val),
        discrepancy: Some(discrepancy),
        tolerance_percent: TOLERANCE_PSI,
        is_within_tolerance,
        source: SourceLocation::new(page.page_number, page.classification.clone(), "Pressure Differential"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PageExtractionMetadata, SourceLocation as SL, ValueType};

    fn value(label: &str, numeric: f64) -> ExtractedValue {
        ExtractedValue {
            id: "v".into(),
            raw_value: numeric.to_string(),
            numeric_value: Some(numeric),
            unit: None,
            value_type: ValueType::Numeric,
            source: SL::new(1, "filtration_step", label),
            confidence: 0.8,
            is_handwritten: false,
        }
    }

    fn page() -> PageInput {
        PageInput {
            page_number: 1,
            classification: "filtration_step".into(),
            extracted_text: String::new(),
            metadata: PageExtractionMetadata::default(),
        }
    }

    #[test]
    fn matches_within_tolerance() {
        let values = vec![
            value("Inlet Pressure", 30.0),
            value("Outlet Pressure", 18.2),
            value("Pressure Drop", 12.0),
        ];
        let gen = IdGenerator::default();
        let formula = detect(&values, &page(), &gen).unwrap();
        assert_eq!(formula.expected_result, 11.8);
        assert!(formula.is_within_tolerance);
    }
}
