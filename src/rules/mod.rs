//! A mutable, regex-backed set of declarative rules evaluated page by
//! page alongside formula detection.

mod default_rules;
mod evaluate;

pub use default_rules::default_ruleset;
pub use evaluate::evaluate_rules;

use tracing::debug;

use crate::error::RuleError;
use crate::model::SopRule;

/// Owns the live SOP rule list. Rules are added, replaced, or removed
/// one at a time; regexes are compiled at that point so a malformed
/// pattern is rejected before it ever reaches validation.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<SopRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Seeded with the bundled default ruleset.
    pub fn with_defaults() -> Self {
        Self { rules: default_ruleset() }
    }

    pub fn list(&self) -> &[SopRule] {
        &self.rules
    }

    pub fn add(&mut self, rule: SopRule) -> Result<(), RuleError> {
        if rule.conditions.is_empty() {
            return Err(RuleError::NoConditions(rule.id));
        }
        if self.rules.iter().any(|r| r.id == rule.id) {
            return Err(RuleError::DuplicateId(rule.id));
        }
        debug!(rule_id = %rule.id, "registering SOP rule");
        self.rules.push(rule);
        Ok(())
    }

    pub fn update(&mut self, rule: SopRule) -> Result<(), RuleError> {
        if rule.conditions.is_empty() {
            return Err(RuleError::NoConditions(rule.id));
        }
        let slot = self
            .rules
            .iter_mut()
            .find(|r| r.id == rule.id)
            .ok_or_else(|| RuleError::NotFound(rule.id.clone()))?;
        *slot = rule;
        Ok(())
    }

    pub fn remove(&mut self, rule_id: &str) -> Result<SopRule, RuleError> {
        let index = self
            .rules
            .iter()
            .position(|r| r.id == rule_id)
            .ok_or_else(|| RuleError::NotFound(rule_id.to_string()))?;
        Ok(self.rules.remove(index))
    }

    pub fn set_enabled(&mut self, rule_id: &str, enabled: bool) -> Result<(), RuleError> {
        let rule = self
            .rules
            .iter_mut()
            .find(|r| r.id == rule_id)
            .ok_or_else(|| RuleError::NotFound(rule_id.to_string()))?;
        rule.enabled = enabled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AlertCategory, Condition, Operator, Severity};

    fn sample_rule(id: &str) -> SopRule {
        SopRule {
            id: id.to_string(),
            category: AlertCategory::RangeViolation,
            severity: Severity::Medium,
            enabled: true,
            conditions: vec![Condition::new("foo", Vec::<&str>::new(), Operator::Exists).unwrap()],
            error_message: "test".into(),
            suggested_action: None,
        }
    }

    #[test]
    fn with_defaults_seeds_ten_rules() {
        assert_eq!(RuleSet::with_defaults().list().len(), 10);
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let mut set = RuleSet::new();
        set.add(sample_rule("r1")).unwrap();
        let err = set.add(sample_rule("r1")).unwrap_err();
        assert!(matches!(err, RuleError::DuplicateId(id) if id == "r1"));
    }

    #[test]
    fn add_rejects_rule_with_no_conditions() {
        let mut rule = sample_rule("r2");
        rule.conditions.clear();
        let mut set = RuleSet::new();
        let err = set.add(rule).unwrap_err();
        assert!(matches!(err, RuleError::NoConditions(id) if id == "r2"));
    }

    #[test]
    fn remove_missing_rule_errors() {
        let mut set = RuleSet::new();
        let err = set.remove("missing").unwrap_err();
        assert!(matches!(err, RuleError::NotFound(id) if id == "missing"));
    }

    #[test]
    fn update_replaces_existing_rule() {
        let mut set = RuleSet::new();
        set.add(sample_rule("r3")).unwrap();
        let mut replacement = sample_rule("r3");
        replacement.severity = Severity::Critical;
        set.update(replacement).unwrap();
        assert_eq!(set.list()[0].severity, Severity::Critical);
    }

    #[test]
    fn set_enabled_toggles_rule() {
        let mut set = RuleSet::new();
        set.add(sample_rule("r4")).unwrap();
        set.set_enabled("r4", false).unwrap();
        assert!(!set.list()[0].enabled);
    }
}
