//! Runs the per-page pipeline, then aggregates cross-page alerts from
//! identifier reconciliation, pagination analysis, and batch date
//! bounds validation.

mod aggregate;

use chrono::Utc;
use tracing::{debug, info};

use crate::dates::{extract_batch_date_bounds, validate_date_window};
use crate::extract::extract_page_values;
use crate::formula::detect_formulas;
use crate::model::{ExtractedValue, IdGenerator, PageExtractionMetadata, PageInput, PageValidationResult};
use crate::pagination::analyze_pagination;
use crate::reconcile::{reconcile_identifiers, IdentifierKind};
use crate::rules::{evaluate_rules, RuleSet};

pub use aggregate::DocumentValidationSummary;

/// Owns the id counters and the mutable SOP rule list across a
/// document's lifetime; holds no other state between
/// `validate_document` invocations.
pub struct ValidationEngine {
    id_gen: IdGenerator,
    rules: RuleSet,
}

impl ValidationEngine {
    /// `wallclock_hint` seeds the id suffix once at construction so the
    /// engine stays a pure function of its inputs.
    pub fn new(wallclock_hint: u64) -> Self {
        Self {
            id_gen: IdGenerator::new(wallclock_hint),
            rules: RuleSet::with_defaults(),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut RuleSet {
        &mut self.rules
    }

    /// Validates one page: extracts typed values, detects and checks
    /// formulas, then evaluates SOP rules, in that order. Pure aside
    /// from this engine's own id counters.
    pub fn validate_page(
        &self,
        page_number: u32,
        classification: impl Into<String>,
        metadata: PageExtractionMetadata,
        text: impl Into<String>,
    ) -> PageValidationResult {
        let page = PageInput {
            page_number,
            classification: classification.into(),
            extracted_text: text.into(),
            metadata,
        };

        let values = extract_page_values(&page, &self.id_gen);
        let (formulas, mut alerts) = detect_formulas(&values, &page, &self.id_gen);
        alerts.extend(evaluate_rules(self.rules.list(), &values, &page, &self.id_gen));

        debug!(page = page_number, alerts = alerts.len(), "page validated");

        PageValidationResult {
            page_number,
            extracted_values: values,
            detected_formulas: formulas,
            alerts,
            validation_timestamp: Utc::now(),
            extracted_text: page.extracted_text,
        }
    }

    /// Aggregates every page's alerts and appends cross-page alerts in
    /// the fixed order: page-completeness, batch-number, lot-number,
    /// chronological.
    pub fn validate_document(
        &self,
        document_id: impl Into<String>,
        page_results: &[PageValidationResult],
    ) -> DocumentValidationSummary {
        let summary = aggregate::build_summary(document_id, page_results, &self.id_gen);
        info!(
            pages = page_results.len(),
            total_alerts = summary.total_alerts,
            cross_page_issues = summary.cross_page_issues.len(),
            "document validated"
        );
        summary
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new(0)
    }
}

pub(crate) fn values_by_page(page_results: &[PageValidationResult]) -> Vec<(u32, &[ExtractedValue], &str)> {
    page_results
        .iter()
        .map(|p| (p.page_number, p.extracted_values.as_slice(), p.extracted_text.as_str()))
        .collect()
}

pub(crate) fn run_batch_date_bounds(
    page_results: &[PageValidationResult],
    id_gen: &IdGenerator,
) -> Vec<crate::model::ValidationAlert> {
    let by_page = values_by_page(page_results);
    let (bounds, mut alerts) = extract_batch_date_bounds(&by_page, id_gen);

    let structured_pages: Vec<(u32, &[ExtractedValue])> = page_results
        .iter()
        .map(|p| (p.page_number, p.extracted_values.as_slice()))
        .collect();
    let text_pages: Vec<(u32, &str)> = page_results.iter().map(|p| (p.page_number, p.extracted_text.as_str())).collect();

    alerts.extend(validate_date_window(&bounds, &structured_pages, &text_pages, id_gen));
    alerts
}

pub(crate) fn run_identifier_reconciliation(page_results: &[PageValidationResult], id_gen: &IdGenerator) -> Vec<crate::model::ValidationAlert> {
    let by_page = values_by_page(page_results);
    let mut alerts = reconcile_identifiers(&by_page, IdentifierKind::Batch, id_gen);
    alerts.extend(reconcile_identifiers(&by_page, IdentifierKind::Lot, id_gen));
    alerts
}

pub(crate) fn run_pagination(page_results: &[PageValidationResult], id_gen: &IdGenerator) -> Vec<crate::model::ValidationAlert> {
    let pages: Vec<(u32, &str)> = page_results.iter().map(|p| (p.page_number, p.extracted_text.as_str())).collect();
    analyze_pagination(&pages, id_gen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FormField;

    fn filling_log_metadata(output: &str, input: &str, yield_pct: &str) -> PageExtractionMetadata {
        PageExtractionMetadata {
            form_fields: vec![
                FormField { field_name: "Input".into(), field_value: input.into(), bounding_box: None, confidence: None },
                FormField { field_name: "Output".into(), field_value: output.into(), bounding_box: None, confidence: None },
                FormField { field_name: "Yield".into(), field_value: yield_pct.into(), bounding_box: None, confidence: None },
            ],
            tables: vec![],
            handwritten: vec![],
        }
    }

    #[test]
    fn s1_yield_discrepancy_end_to_end() {
        let engine = ValidationEngine::default();
        let page = engine.validate_page(1, "filling_log", filling_log_metadata("900 ml", "1000 ml", "85 %"), "");
        assert_eq!(page.detected_formulas.len(), 1);

        let summary = engine.validate_document("doc-1", std::slice::from_ref(&page));
        assert_eq!(summary.formulas_checked, 1);
        assert_eq!(summary.formula_discrepancies, 1);
        // No pagination or batch/lot markers on this page: the only cross-page
        // issues are the batch-date extraction-missing alerts.
        assert!(summary
            .cross_page_issues
            .iter()
            .all(|a| a.rule_id.as_deref() == Some("batch_date_extraction_missing")));
    }

    #[test]
    fn validate_document_counts_are_consistent() {
        let engine = ValidationEngine::default();
        let page = engine.validate_page(1, "filling_log", filling_log_metadata("900 ml", "1000 ml", "85 %"), "");
        let summary = engine.validate_document("doc-2", std::slice::from_ref(&page));

        let severity_sum: usize = summary.alerts_by_severity.values().sum();
        let category_sum: usize = summary.alerts_by_category.values().sum();
        assert_eq!(severity_sum, summary.total_alerts);
        assert_eq!(category_sum, summary.total_alerts);
    }

    #[test]
    fn determinism_same_input_same_alert_sequence() {
        let metadata = filling_log_metadata("900 ml", "1000 ml", "85 %");

        let engine_a = ValidationEngine::new(111);
        let page_a = engine_a.validate_page(1, "filling_log", metadata.clone(), "");
        let summary_a = engine_a.validate_document("doc-a", std::slice::from_ref(&page_a));

        let engine_b = ValidationEngine::new(222);
        let page_b = engine_b.validate_page(1, "filling_log", metadata, "");
        let summary_b = engine_b.validate_document("doc-b", std::slice::from_ref(&page_b));

        assert_eq!(summary_a.total_alerts, summary_b.total_alerts);
        for (a, b) in page_a.alerts.iter().zip(page_b.alerts.iter()) {
            assert_eq!(a.category, b.category);
            assert_eq!(a.severity, b.severity);
            assert_eq!(a.title, b.title);
        }
    }
}
