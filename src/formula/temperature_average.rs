use std::sync::LazyLock;

use regex::Regex;

use crate::model::{DetectedFormula, ExtractedValue, FormulaOperand, FormulaType, IdGenerator, OperandRole, PageInput, SourceLocation};

use super::operands::{all_numeric_matching, first_numeric_matching, round2};

const TOLERANCE_DEGREES: f64 = 0.5;
const MIN_TEMPERATURE_READINGS: usize = 2;

static TEMP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)temp").unwrap());
static AVERAGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)avg|average|mean").unwrap());

pub fn detect(values: &[ExtractedValue], page: &PageInput, id_gen: &IdGenerator) -> Option<DetectedFormula> {
    let temps = all_numeric_matching(values, &TEMP_RE, &AVERAGE_RE);
    if temps.len() < MIN_TEMPERATURE_READINGS {
        return None;
    }
    let average_value = first_numeric_matching(values, &[&AVERAGE_RE])?;

    let sum: f64 = temps.iter().filter_map(|v| v.numeric_value).sum();
    let expected = round2(sum / temps.len() as f64);
    let actual = average_value.numeric_value;
    let discrepancy = actual.map(|a| round2((expected - a).abs()));
    let is_within_tolerance = discrepancy.map(|d| d <= TOLERANCE_DEGREES).unwrap_or(true);

    let operands = temps
        .iter()
        .map(|v| FormulaOperand {
            role: OperandRole::Operand,
            value_id: v.id.clone(),
            label: v.source.field_label.clone(),
            value: v.numeric_value.unwrap_or(0.0),
        })
        .collect();

    Some(DetectedFormula {
        id: id_gen.next_formula_id(),
        formula_type: FormulaType::TemperatureAverage,
        expression: format!("mean({} readings) = {}", temps.len(), expected),
        operands,
        expected_result: expected,
        actual_result: actual,
        discrepancy,
        tolerance_percent: TOLERANCE_DEGREES,
        is_within_tolerance,
        source: SourceLocation::new(page.page_number, page.classification.clone(), "Temperature Average"),
    })
}
