use crate::model::{AlertCategory, ExtractedValue, IdGenerator, Operator, PageInput, SopRule, SourceLocation, ValidationAlert};

/// Whether `value` violates `operator`'s stated intent. A condition
/// that cannot apply (e.g. a numeric operator against a value with no
/// parsed number) is "not applicable", i.e. does not fire.
fn violates(value: &ExtractedValue, operator: &Operator) -> bool {
    match operator {
        Operator::GreaterThan(min) => value.numeric_value.map(|n| n < *min).unwrap_or(false),
        Operator::LessThan(max) => value.numeric_value.map(|n| n > *max).unwrap_or(false),
        Operator::Between(min, max) => value
            .numeric_value
            .map(|n| n < *min || n > *max)
            .unwrap_or(false),
        Operator::Equals(expected) => value.raw_value != *expected,
        Operator::NotEquals(excluded) => value.raw_value == *excluded,
        Operator::Contains(needle) => !value
            .raw_value
            .to_lowercase()
            .contains(&needle.to_lowercase()),
        Operator::Exists => false,
        Operator::NotExists => true,
    }
}

/// Apply every enabled rule's conditions against one page's extracted
/// values, producing rule-violation and presence alerts.
pub fn evaluate_rules(
    rules: &[SopRule],
    values: &[ExtractedValue],
    page: &PageInput,
    id_gen: &IdGenerator,
) -> Vec<ValidationAlert> {
    let mut alerts = Vec::new();

    for rule in rules.iter().filter(|r| r.enabled) {
        for condition in &rule.conditions {
            if !condition.applies_to_section(&page.classification) {
                continue;
            }

            let matching: Vec<&ExtractedValue> = values
                .iter()
                .filter(|v| condition.field_pattern.is_match(&v.source.field_label))
                .collect();

            if matches!(condition.operator, Operator::Exists) {
                if matching.is_empty() {
                    alerts.push(ValidationAlert {
                        id: id_gen.next_alert_id(),
                        category: rule.category,
                        severity: rule.severity,
                        title: format!("Missing required field: {}", condition.field_pattern_source),
                        message: rule.error_message.clone(),
                        details: String::new(),
                        source: SourceLocation::new(page.page_number, page.classification.clone(), condition.field_pattern_source.clone()),
                        related_values: vec![],
                        suggested_action: rule.suggested_action.clone(),
                        rule_id: Some(rule.id.clone()),
                        formula_id: None,
                    });
                }
                continue;
            }

            for value in matching {
                if violates(value, &condition.operator) {
                    alerts.push(ValidationAlert {
                        id: id_gen.next_alert_id(),
                        category: rule.category,
                        severity: rule.severity,
                        title: format!("SOP violation: {}", value.source.field_label),
                        message: rule.error_message.clone(),
                        details: format!("raw_value={}, numeric_value={:?}", value.raw_value, value.numeric_value),
                        source: value.source.clone(),
                        related_values: vec![value.id.clone()],
                        suggested_action: rule.suggested_action.clone(),
                        rule_id: Some(rule.id.clone()),
                        formula_id: None,
                    });
                }
            }
        }
    }

    alerts
}
