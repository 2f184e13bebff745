use crate::model::{AlertCategory, Condition, Operator, Severity, SopRule};

/// The bundled SOP ruleset: storage, cleaning, and process-limit rules
/// drawn from a typical pharmaceutical batch record, plus two presence
/// checks.
pub fn default_ruleset() -> Vec<SopRule> {
    vec![
        SopRule {
            id: "storage_temperature_range".into(),
            category: AlertCategory::RangeViolation,
            severity: Severity::High,
            enabled: true,
            conditions: vec![Condition::new(
                "storage temp",
                vec!["cold_storage", "storage_log"],
                Operator::Between(2.0, 8.0),
            )
            .expect("static pattern")],
            error_message: "Storage temperature is outside the validated 2-8°C range".into(),
            suggested_action: Some("Verify cold-chain logger and escalate to QA.".into()),
        },
        SopRule {
            id: "cip_temperature_minimum".into(),
            category: AlertCategory::RangeViolation,
            severity: Severity::High,
            enabled: true,
            conditions: vec![Condition::new(
                "cip.*temp",
                vec!["cip_sip_record"],
                Operator::GreaterThan(65.0),
            )
            .expect("static pattern")],
            error_message: "CIP cycle did not reach the minimum 65°C wash temperature".into(),
            suggested_action: Some("Repeat the CIP cycle before proceeding.".into()),
        },
        SopRule {
            id: "sip_temperature_minimum".into(),
            category: AlertCategory::RangeViolation,
            severity: Severity::High,
            enabled: true,
            conditions: vec![Condition::new(
                "sip.*temp",
                vec!["cip_sip_record"],
                Operator::GreaterThan(121.0),
            )
            .expect("static pattern")],
            error_message: "SIP cycle did not reach the minimum 121°C sterilization temperature".into(),
            suggested_action: Some("Repeat the SIP cycle before proceeding.".into()),
        },
        SopRule {
            id: "hold_time_maximum".into(),
            category: AlertCategory::RangeViolation,
            severity: Severity::Medium,
            enabled: true,
            conditions: vec![Condition::new(
                "hold.*(duration|time)",
                Vec::<&str>::new(),
                Operator::LessThan(24.0),
            )
            .expect("static pattern")],
            error_message: "Hold duration exceeds the 24-hour SOP limit".into(),
            suggested_action: Some("Confirm product disposition with QA before release.".into()),
        },
        SopRule {
            id: "ph_range".into(),
            category: AlertCategory::RangeViolation,
            severity: Severity::Medium,
            enabled: true,
            conditions: vec![Condition::new(
                "ph",
                vec!["filtration_step"],
                Operator::Between(6.0, 8.0),
            )
            .expect("static pattern")],
            error_message: "pH reading is outside the validated 6.0-8.0 range".into(),
            suggested_action: Some("Retest pH and confirm buffer preparation.".into()),
        },
        SopRule {
            id: "filter_pressure_differential_maximum".into(),
            category: AlertCategory::RangeViolation,
            severity: Severity::High,
            enabled: true,
            conditions: vec![Condition::new(
                "(filter|pressure).*(diff|delta|drop)",
                vec!["filtration_step"],
                Operator::LessThan(15.0),
            )
            .expect("static pattern")],
            error_message: "Filter pressure differential exceeds the 15 psi SOP limit".into(),
            suggested_action: Some("Inspect filter for fouling and replace if required.".into()),
        },
        SopRule {
            id: "yield_minimum".into(),
            category: AlertCategory::RangeViolation,
            severity: Severity::Medium,
            enabled: true,
            conditions: vec![Condition::new(
                "yield",
                Vec::<&str>::new(),
                Operator::GreaterThan(90.0),
            )
            .expect("static pattern")],
            error_message: "Batch yield fell below the 90% SOP threshold".into(),
            suggested_action: Some("Investigate process losses before batch disposition.".into()),
        },
        SopRule {
            id: "flow_rate_range".into(),
            category: AlertCategory::RangeViolation,
            severity: Severity::Low,
            enabled: true,
            conditions: vec![Condition::new(
                "flow.*rate",
                vec!["filtration_step"],
                Operator::Between(0.5, 50.0),
            )
            .expect("static pattern")],
            error_message: "Flow rate is outside the expected operating envelope".into(),
            suggested_action: Some("Confirm pump setpoint against the batch record.".into()),
        },
        SopRule {
            id: "equipment_id_presence".into(),
            category: AlertCategory::MissingValue,
            severity: Severity::Medium,
            enabled: true,
            conditions: vec![Condition::new(
                "equipment (id|number)",
                Vec::<&str>::new(),
                Operator::Exists,
            )
            .expect("static pattern")],
            error_message: "Equipment identifier is missing from this page".into(),
            suggested_action: Some("Confirm with operations which equipment was used.".into()),
        },
        SopRule {
            id: "operator_signature_presence".into(),
            category: AlertCategory::MissingValue,
            severity: Severity::High,
            enabled: true,
            conditions: vec![Condition::new(
                "operator (signature|initials)",
                Vec::<&str>::new(),
                Operator::Exists,
            )
            .expect("static pattern")],
            error_message: "Operator signature is missing from this page".into(),
            suggested_action: Some("Route back to the floor for countersignature.".into()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ruleset_has_ten_rules_all_enabled() {
        let rules = default_ruleset();
        assert_eq!(rules.len(), 10);
        assert!(rules.iter().all(|r| r.enabled));
    }

    #[test]
    fn rule_ids_are_unique() {
        let rules = default_ruleset();
        let mut ids: Vec<&str> = rules.iter().map(|r| r.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), rules.len());
    }
}
