//! Matches operand sets by field-label regex, recomputes the expected
//! result, and compares against the extracted actual within tolerance.

mod hold_time;
mod material_reconciliation;
mod operands;
mod pressure_differential;
mod temperature_average;
mod yield_percentage;

use crate::model::{AlertCategory, DetectedFormula, ExtractedValue, FormulaType, IdGenerator, PageInput, Severity, ValidationAlert};

const HIGH_SEVERITY_DISCREPANCY_THRESHOLD: f64 = 5.0;

/// Run all five formula detectors over one page's extracted values.
/// Each is attempted independently and emitted at most once.
pub fn detect_formulas(
    values: &[ExtractedValue],
    page: &PageInput,
    id_gen: &IdGenerator,
) -> (Vec<DetectedFormula>, Vec<ValidationAlert>) {
    let candidates = [
        yield_percentage::detect(values, page, id_gen),
        material_reconciliation::detect(values, page, id_gen),
        temperature_average::detect(values, page, id_gen),
        hold_time::detect(values, page, id_gen),
        pressure_differential::detect(values, page, id_gen),
    ];

    let mut formulas = Vec::new();
    let mut alerts = Vec::new();

    for formula in candidates.into_iter().flatten() {
        if formula.formula_type != FormulaType::HoldTime && !formula.is_within_tolerance {
            alerts.push(build_alert(&formula, id_gen));
        }
        formulas.push(formula);
    }

    (formulas, alerts)
}

fn build_alert(formula: &DetectedFormula, id_gen: &IdGenerator) -> ValidationAlert {
    let discrepancy = formula.discrepancy.unwrap_or(0.0);
    let severity = if discrepancy.abs() >= HIGH_SEVERITY_DISCREPANCY_THRESHOLD {
        Severity::High
    } else {
        Severity::Medium
    };

    let details = serde_json::json!({
        "expected": formula.expected_result,
        "actual": formula.actual_result,
        "discrepancy": formula.discrepancy,
        "tolerance": formula.tolerance_percent,
    })
    .to_string();

    ValidationAlert {
        id: id_gen.next_alert_id(),
        category: AlertCategory::CalculationError,
        severity,
        title: format!("{:?} discrepancy", formula.formula_type),
        message: format!(
            "{} — expected {:.2}, got discrepancy {:.2}",
            formula.expression,
            formula.expected_result,
            discrepancy
        ),
        details,
        source: formula.source.clone(),
        related_values: formula.operands.iter().map(|o| o.value_id.clone()).collect(),
        suggested_action: Some("Re-verify the recorded values and recalculate.".to_string()),
        rule_id: None,
        formula_id: Some(formula.id.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PageExtractionMetadata, SourceLocation, ValueType};

    fn value(label: &str, numeric: f64) -> ExtractedValue {
        ExtractedValue {
            id: format!("v_{label}"),
            raw_value: numeric.to_string(),
            numeric_value: Some(numeric),
            unit: None,
            value_type: ValueType::Numeric,
            source: SourceLocation::new(1, "filling_log", label),
            confidence: 0.8,
            is_handwritten: false,
        }
    }

    #[test]
    fn s1_yield_discrepancy_produces_one_high_alert() {
        let page = PageInput {
            page_number: 1,
            classification: "filling_log".into(),
            extracted_text: String::new(),
            metadata: PageExtractionMetadata::default(),
        };
        let values = vec![value("Input", 1000.0), value("Output", 900.0), value("Yield", 85.0)];
        let gen = IdGenerator::default();
        let (formulas, alerts) = detect_formulas(&values, &page, &gen);

        assert_eq!(formulas.len(), 1);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::High);
        assert_eq!(alerts[0].category, AlertCategory::CalculationError);
    }
}
