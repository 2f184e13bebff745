use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::RuleError;

use super::types::{AlertCategory, Severity};

/// Closed set of condition operators, each carrying only the payload
/// its comparison needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Operator {
    /// "must be >= value" — fires when the numeric value is below it.
    GreaterThan(f64),
    /// "must be <= value" — fires when the numeric value is above it.
    LessThan(f64),
    /// "must be within [min, max]" — fires outside the range.
    Between(f64, f64),
    Equals(String),
    NotEquals(String),
    Contains(String),
    Exists,
    NotExists,
}

/// One condition within an SOP rule. `field_pattern` is compiled once at
/// rule-registration time and cached here, never per-value.
#[derive(Debug, Clone)]
pub struct Condition {
    pub field_pattern_source: String,
    pub field_pattern: Regex,
    pub section_types: HashSet<String>,
    pub operator: Operator,
    pub unit: Option<String>,
}

impl Condition {
    pub fn new(
        field_pattern: &str,
        section_types: impl IntoIterator<Item = impl Into<String>>,
        operator: Operator,
    ) -> Result<Self, RuleError> {
        let compiled = compile_case_insensitive(field_pattern).map_err(|source| RuleError::InvalidPattern {
            pattern: field_pattern.to_string(),
            source,
        })?;
        Ok(Self {
            field_pattern_source: field_pattern.to_string(),
            field_pattern: compiled,
            section_types: section_types.into_iter().map(Into::into).collect(),
            operator,
            unit: None,
        })
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn applies_to_section(&self, section_type: &str) -> bool {
        self.section_types.is_empty() || self.section_types.contains(section_type)
    }
}

pub(crate) fn compile_case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    regex::RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// A declarative SOP rule: one or more conditions, all sharing a category,
/// severity, and remediation text.
#[derive(Debug, Clone)]
pub struct SopRule {
    pub id: String,
    pub category: AlertCategory,
    pub severity: Severity,
    pub enabled: bool,
    pub conditions: Vec<Condition>,
    pub error_message: String,
    pub suggested_action: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_section_filter() {
        let c = Condition::new(
            "ph",
            vec!["filtration_step"],
            Operator::Between(6.0, 8.0),
        )
        .unwrap();
        assert!(c.applies_to_section("filtration_step"));
        assert!(!c.applies_to_section("equipment_log"));
    }

    #[test]
    fn empty_section_set_applies_everywhere() {
        let c = Condition::new("ph", Vec::<&str>::new(), Operator::Between(6.0, 8.0)).unwrap();
        assert!(c.applies_to_section("anything"));
    }

    #[test]
    fn invalid_regex_rejected_at_construction() {
        let result = Condition::new("(unclosed", Vec::<&str>::new(), Operator::Exists);
        assert!(result.is_err());
    }
}
