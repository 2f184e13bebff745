use std::sync::LazyLock;

use regex::Regex;

use crate::model::{DetectedFormula, ExtractedValue, FormulaOperand, FormulaType, IdGenerator, OperandRole, PageInput, SourceLocation};

use super::operands::{first_numeric_matching, round2};

const TOLERANCE_PERCENTAGE_POINTS: f64 = 0.5;

static OUTPUT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)output|product|final|filled").unwrap());
static INPUT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)input|initial|starting|bulk").unwrap());
static YIELD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)yield|recovery").unwrap());

pub fn detect(values: &[ExtractedValue], page: &PageInput, id_gen: &IdGenerator) -> Option<DetectedFormula> {
    let output = first_numeric_matching(values, &[&OUTPUT_RE])?;
    let input = first_numeric_matching(values, &[&INPUT_RE])?;
    let actual_yield = first_numeric_matching(values, &[&YIELD_RE])?;

    let output_val = output.numeric_value?;
    let input_val = input.numeric_value?;
    if input_val == 0.0 {
        return None;
    }

    let expected = round2((output_val / input_val) * 100.0);
    let actual = actual_yield.numeric_value;
    let discrepancy = actual.map(|a| round2((expected - a).abs()));
    let is_within_tolerance = discrepancy.map(|d| d <= TOLERANCE_PERCENTAGE_POINTS).unwrap_or(true);

    Some(DetectedFormula {
        id: id_gen.next_formula_id(),
        formula_type: FormulaType::YieldPercentage,
        expression: format!("({} / {}) * 100 = {}%", output.source.field_label, input.source.field_label, expected),
        operands: vec![
            FormulaOperand { role: OperandRole::Numerator, value_id: output.id.clone(), label: output.source.field_label.clone(), value: output_val },
            FormulaOperand { role: OperandRole::Denominator, value_id: input.id.clone(), label: input.source.field_label.clone(), value: input_val },
        ],
        expected_result: expected,
        actual_result: actual,
        discrepancy,
        tolerance_percent: TOLERANCE_PERCENTAGE_POINTS,
        is_within_tolerance,
        source: SourceLocation::new(page.page_number, page.classification.clone(), "Yield"),
    })
}
