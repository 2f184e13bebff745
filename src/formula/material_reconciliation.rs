use std::sync::LazyLock;

use regex::Regex;

use crate::model::{DetectedFormula, ExtractedValue, FormulaOperand, FormulaType, IdGenerator, OperandRole, PageInput, SourceLocation};

use super::operands::{first_numeric_matching, round2};

const TOLERANCE_FRACTION_OF_INPUT: f64 = 0.001;

static INPUT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)input|received|starting|issued").unwrap());
static USED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)used|consumed|filled").unwrap());
static WASTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)waste|reject|discard").unwrap());
static REMAINING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)remaining|balance|returned").unwrap());

pub fn detect(values: &[ExtractedValue], page: &PageInput, id_gen: &IdGenerator) -> Option<DetectedFormula> {
    let input = first_numeric_matching(values, &[&INPUT_RE])?;
    let used = first_numeric_matching(values, &[&USED_RE])?;
    let waste = first_numeric_matching(values, &[&WASTE_RE])?;
    let remaining = first_numeric_matching(values, &[&REMAINING_RE])?;

    let input_val = input.numeric_value?;
    let used_val = used.numeric_value?;
    let waste_val = waste.numeric_value?;
    let remaining_val = remaining.numeric_value?;

    let expected = round2(used_val + waste_val + remaining_val);
    let tolerance = input_val * TOLERANCE_FRACTION_OF_INPUT;
    let discrepancy = round2((expected - input_val).abs());
    let is_within_tolerance = discrepancy <= tolerance;

    Some(DetectedFormula {
        id: id_gen.next_formula_id(),
        formula_type: FormulaType::MaterialReconciliation,
        expression: format!(
            "{} + {} + {} = {} (input {})",
            used.source.field_label, waste.source.field_label, remaining.source.field_label, expected, input_val
        ),
        operands: vec![
            FormulaOperand { role: OperandRole::Base, value_id: input.id.clone(), label: input.source.field_label.clone(), value: input_val },
            FormulaOperand { role: OperandRole::Operand, value_id: used.id.clone(), label: used.source.field_label.clone(), value: used_val },
            FormulaOperand { role: OperandRole::Operand, value_id: waste.id.clone(), label: waste.source.field_label.clone(), value: waste_val },
            FormulaOperand { role: OperandRole::Operand, value_id: remaining.id.clone(), label: remaining.source.field_label.clone(), value: remaining_val },
        ],
        expected_result: expected,
        actual_result: Some(input_val),
        discrepancy: Some(discrepancy),
        tolerance_percent: tolerance,
        is_within_tolerance,
        source: SourceLocation::new(page.page_number, page.classification.clone(), "Material Reconciliation"),
    })
}
