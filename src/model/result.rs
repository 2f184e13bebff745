use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{AlertCategory, DetectedFormula, ExtractedValue, Severity, ValidationAlert};

/// Result of validating a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageValidationResult {
    pub page_number: u32,
    pub extracted_values: Vec<ExtractedValue>,
    pub detected_formulas: Vec<DetectedFormula>,
    pub alerts: Vec<ValidationAlert>,
    pub validation_timestamp: DateTime<Utc>,
    pub extracted_text: String,
}

/// Document-level aggregation across every page plus cross-page alerts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentValidationSummary {
    pub document_id: String,
    pub total_pages: usize,
    pub pages_validated: usize,
    pub total_alerts: usize,
    pub alerts_by_severity: BTreeMap<String, usize>,
    pub alerts_by_category: BTreeMap<String, usize>,
    pub formulas_checked: usize,
    pub formula_discrepancies: usize,
    pub cross_page_issues: Vec<ValidationAlert>,
    pub validation_timestamp: DateTime<Utc>,
    pub is_complete: bool,
}

/// Build a severity map with every enumerated key initialized to zero.
pub fn zeroed_severity_map() -> BTreeMap<String, usize> {
    Severity::ALL.iter().map(|s| (s.as_str().to_string(), 0)).collect()
}

/// Build a category map with every enumerated key initialized to zero.
pub fn zeroed_category_map() -> BTreeMap<String, usize> {
    AlertCategory::ALL.iter().map(|c| (c.as_str().to_string(), 0)).collect()
}
