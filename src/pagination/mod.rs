//! Recovers `Page X of Y` headers from raw OCR text and flags gaps and
//! duplicates in the declared sequence.

mod ranges;

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{AlertCategory, IdGenerator, Severity, SourceLocation, ValidationAlert};

pub use ranges::format_missing_pages;

const MAX_PLAUSIBLE_TOTAL: u32 = 500;

static PAGE_OF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:page|poge|paqe|pa9e|paye|p\s?age)?\s*(\d{1,4})\s*(?:of|0f|/)\s*(\d{1,4})").unwrap()
});

/// Extracts `(current, total)` from one page's raw text, accepting
/// common OCR-confused spellings of "page" and "of".
fn extract_pagination(text: &str) -> Option<(u32, u32)> {
    for caps in PAGE_OF_RE.captures_iter(text) {
        let current: u32 = caps.get(1)?.as_str().parse().ok()?;
        let total: u32 = caps.get(2)?.as_str().parse().ok()?;
        if total > 0 && total <= MAX_PLAUSIBLE_TOTAL && current >= 1 && current <= total {
            return Some((current, total));
        }
    }
    None
}

/// Runs the pagination analyzer over every page's raw text, producing
/// at most one missing-pages alert and one duplicate alert per
/// repeated declared page number.
pub fn analyze_pagination(pages: &[(u32, &str)], id_gen: &IdGenerator) -> Vec<ValidationAlert> {
    let declared: Vec<(u32, u32, u32)> = pages
        .iter()
        .filter_map(|(page_number, text)| extract_pagination(text).map(|(cur, total)| (*page_number, cur, total)))
        .collect();

    if declared.is_empty() {
        return Vec::new();
    }

    let mut total_votes: HashMap<u32, usize> = HashMap::new();
    for (_, _, total) in &declared {
        *total_votes.entry(*total).or_default() += 1;
    }
    let expected_total = *total_votes.iter().max_by_key(|(_, count)| **count).map(|(total, _)| total).unwrap();

    let mut alerts = Vec::new();

    let seen: std::collections::HashSet<u32> = declared.iter().map(|(_, cur, _)| *cur).collect();
    let missing: Vec<u32> = (1..=expected_total).filter(|x| !seen.contains(x)).collect();
    if !missing.is_empty() {
        let severity = if missing.len() > 5 { Severity::Critical } else { Severity::High };
        let details = serde_json::json!({
            "missingPages": format_missing_pages(&missing),
            "foundCount": seen.len(),
            "expectedCount": expected_total,
            "missingCount": missing.len(),
        })
        .to_string();

        alerts.push(ValidationAlert {
            id: id_gen.next_alert_id(),
            category: AlertCategory::MissingValue,
            severity,
            title: "Batch record is missing pages".to_string(),
            message: format!("{} of {} expected pages are missing", missing.len(), expected_total),
            details,
            source: SourceLocation::new(0, String::new(), "Pagination".to_string()),
            related_values: vec![],
            suggested_action: Some("Confirm the full record was scanned and re-upload any missing pages.".into()),
            rule_id: Some("page_completeness_missing".into()),
            formula_id: None,
        });
    }

    let mut by_declared: HashMap<u32, Vec<u32>> = HashMap::new();
    for (page_number, cur, _) in &declared {
        by_declared.entry(*cur).or_default().push(*page_number);
    }
    for (declared_number, physical_pages) in by_declared {
        if physical_pages.len() > 1 {
            let pages_str = physical_pages.iter().map(u32::to_string).collect::<Vec<_>>().join(", ");
            alerts.push(ValidationAlert {
                id: id_gen.next_alert_id(),
                category: AlertCategory::ConsistencyError,
                severity: Severity::Medium,
                title: format!("Duplicate declared page number {declared_number}"),
                message: format!("Page {declared_number} is declared on physical pages {pages_str}"),
                details: String::new(),
                source: SourceLocation::new(0, String::new(), "Pagination".to_string()),
                related_values: vec![],
                suggested_action: Some("Check for a duplicated scan or a mislabeled page.".into()),
                rule_id: Some("page_completeness_duplicate".into()),
                formula_id: None,
            });
        }
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s4_missing_pages_detected_and_formatted() {
        let pages = vec![
            (1u32, "Page 1 of 5"),
            (2, "Page 2 of 5"),
            (3, "Page 5 of 5"),
        ];
        let gen = IdGenerator::default();
        let alerts = analyze_pagination(&pages, &gen);
        let missing_alert = alerts.iter().find(|a| a.rule_id.as_deref() == Some("page_completeness_missing")).unwrap();
        assert!(missing_alert.details.contains("\"missingPages\":\"3, 4\""));
    }

    #[test]
    fn accepts_ocr_confused_page_and_of_spellings() {
        assert_eq!(extract_pagination("Paqe 2 0f 10"), Some((2, 10)));
        assert_eq!(extract_pagination("pa9e 3 of 10"), Some((3, 10)));
    }

    #[test]
    fn no_pagination_anywhere_yields_no_alerts() {
        let pages = vec![(1u32, "no markers here"), (2, "still none")];
        let gen = IdGenerator::default();
        assert!(analyze_pagination(&pages, &gen).is_empty());
    }

    #[test]
    fn duplicate_declared_number_flagged() {
        let pages = vec![(1u32, "Page 1 of 3"), (2, "Page 1 of 3"), (3, "Page 3 of 3")];
        let gen = IdGenerator::default();
        let alerts = analyze_pagination(&pages, &gen);
        assert!(alerts.iter().any(|a| a.rule_id.as_deref() == Some("page_completeness_duplicate")));
    }

    #[test]
    fn more_than_five_missing_is_critical() {
        let pages = vec![(1u32, "Page 1 of 20")];
        let gen = IdGenerator::default();
        let alerts = analyze_pagination(&pages, &gen);
        let missing_alert = alerts.iter().find(|a| a.rule_id.as_deref() == Some("page_completeness_missing")).unwrap();
        assert_eq!(missing_alert.severity, Severity::Critical);
    }
}
