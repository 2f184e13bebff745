//! Resolves batch and lot numbers across a document via two
//! independent extraction paths per page, then a cross-page majority
//! vote.

mod recognizer;

use std::collections::HashMap;

use tracing::debug;

use crate::model::{AlertCategory, ExtractedValue, IdGenerator, Severity, SourceLocation};
use crate::model::ValidationAlert;
use crate::normalize::normalize_serial_identifier;

pub use recognizer::IdentifierKind;
use recognizer::{first_valid_token, label_matches, match_label_line};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Confidence {
    High,
    Medium,
    Low,
}

struct PageRecord {
    page_number: u32,
    value: Option<String>,
    confidence: Confidence,
    disagreement: Option<(String, String)>,
}

fn extract_path_a(values: &[ExtractedValue], kind: IdentifierKind) -> Option<String> {
    values
        .iter()
        .find(|v| label_matches(&v.source.field_label, kind))
        .map(|v| v.raw_value.clone())
}

enum PathB {
    NotFound,
    Found(Option<String>),
}

fn extract_path_b(text: &str, kind: IdentifierKind) -> PathB {
    let lines: Vec<&str> = text.lines().collect();
    let mut found_label = false;

    for i in 0..lines.len() {
        let Some(end) = match_label_line(lines[i], kind) else { continue };
        found_label = true;
        let tail_same_line = &lines[i][end..];
        let next_line = lines.get(i + 1).copied().unwrap_or("");
        let combined = format!("{tail_same_line} {next_line}");
        if let Some(v) = first_valid_token(&combined, kind) {
            return PathB::Found(Some(v));
        }
    }

    if found_label {
        PathB::Found(None)
    } else {
        PathB::NotFound
    }
}

fn canonical(v: &str) -> String {
    normalize_serial_identifier(v).0
}

/// Applies the per-page decision table. Returns `None`
/// when neither path found any trace of the identifier on this page
/// (the page simply isn't one that carries it).
fn decide_page(page_number: u32, a: Option<String>, b: PathB) -> Option<PageRecord> {
    match (a, b) {
        (Some(va), PathB::Found(Some(vb))) => {
            if canonical(&va) == canonical(&vb) {
                Some(PageRecord { page_number, value: Some(va), confidence: Confidence::High, disagreement: None })
            } else {
                Some(PageRecord {
                    page_number,
                    value: Some(va.clone()),
                    confidence: Confidence::Low,
                    disagreement: Some((va, vb)),
                })
            }
        }
        (Some(va), PathB::Found(None)) => Some(PageRecord { page_number, value: Some(va), confidence: Confidence::Medium, disagreement: None }),
        (Some(va), PathB::NotFound) => Some(PageRecord { page_number, value: Some(va), confidence: Confidence::Medium, disagreement: None }),
        (None, PathB::Found(Some(vb))) => Some(PageRecord { page_number, value: Some(vb), confidence: Confidence::Medium, disagreement: None }),
        (None, PathB::Found(None)) => Some(PageRecord { page_number, value: None, confidence: Confidence::Low, disagreement: None }),
        (None, PathB::NotFound) => None,
    }
}

fn missing_rule_id(kind: IdentifierKind) -> String {
    format!("{}_number_missing", kind.word())
}

fn severity_missing(kind: IdentifierKind) -> Severity {
    match kind {
        IdentifierKind::Batch => Severity::Critical,
        IdentifierKind::Lot => Severity::High,
    }
}

fn severity_majority(kind: IdentifierKind) -> Severity {
    match kind {
        IdentifierKind::Batch => Severity::Critical,
        IdentifierKind::Lot => Severity::High,
    }
}

fn severity_outlier(kind: IdentifierKind) -> Severity {
    match kind {
        IdentifierKind::Batch => Severity::High,
        IdentifierKind::Lot => Severity::Medium,
    }
}

fn confidence_label(fraction: f64) -> &'static str {
    if fraction >= 0.8 {
        "high"
    } else if fraction >= 0.5 {
        "medium"
    } else {
        "low"
    }
}

/// Runs the reconciler for one identifier family over every page of a
/// document, returning the document-level and per-page alerts it
/// produces. `pages` is `(page_number, extracted_values, raw_text)` for
/// every page in the document, in page-number order.
pub fn reconcile_identifiers(
    pages: &[(u32, &[ExtractedValue], &str)],
    kind: IdentifierKind,
    id_gen: &IdGenerator,
) -> Vec<ValidationAlert> {
    let mut alerts = Vec::new();
    let mut records = Vec::new();

    for (page_number, values, text) in pages {
        let a = extract_path_a(values, kind);
        let b = extract_path_b(text, kind);
        if let Some(record) = decide_page(*page_number, a, b) {
            records.push(record);
        }
    }

    for record in &records {
        if let Some((va, vb)) = &record.disagreement {
            alerts.push(ValidationAlert {
                id: id_gen.next_alert_id(),
                category: AlertCategory::ConsistencyError,
                severity: Severity::Medium,
                title: format!("{} number disagreement on page {}", kind.word(), record.page_number),
                message: format!(
                    "Structured extraction read '{va}' but the raw text reads '{vb}' for the {} number",
                    kind.word()
                ),
                details: String::new(),
                source: SourceLocation::new(record.page_number, String::new(), format!("{} number", kind.word())),
                related_values: vec![],
                suggested_action: Some("Re-check the scanned page against both readings.".into()),
                rule_id: Some(format!("{}_number_reconciliation", kind.word())),
                formula_id: None,
            });
        }
        if record.value.is_none() {
            alerts.push(ValidationAlert {
                id: id_gen.next_alert_id(),
                category: AlertCategory::MissingValue,
                severity: severity_missing(kind),
                title: format!("Missing {} number on page {}", kind.word(), record.page_number),
                message: format!("No {} number could be read on this page", kind.word()),
                details: String::new(),
                source: SourceLocation::new(record.page_number, String::new(), format!("{} number", kind.word())),
                related_values: vec![],
                suggested_action: Some(format!("Verify the {} number field against the source document.", kind.word())),
                rule_id: Some(missing_rule_id(kind)),
                formula_id: None,
            });
        }
    }

    let present: Vec<&PageRecord> = records.iter().filter(|r| r.value.is_some()).collect();
    if present.is_empty() {
        debug!(kind = kind.word(), "no {} records present, skipping majority vote", kind.word());
        return alerts;
    }

    let mut groups: HashMap<String, Vec<&PageRecord>> = HashMap::new();
    for record in &present {
        groups.entry(canonical(record.value.as_ref().unwrap())).or_default().push(record);
    }

    let max_count = groups.values().map(Vec::len).max().unwrap_or(0);
    let leaders: Vec<&String> = groups.iter().filter(|(_, v)| v.len() == max_count).map(|(k, _)| k).collect();

    if leaders.len() > 1 {
        let mut detail_parts: Vec<String> = Vec::new();
        for leader in &leaders {
            let pages: Vec<String> = groups[*leader].iter().map(|r| r.page_number.to_string()).collect();
            let original = groups[*leader][0].value.as_ref().unwrap().clone();
            detail_parts.push(format!("{original} (pages {})", pages.join(", ")));
        }
        alerts.push(ValidationAlert {
            id: id_gen.next_alert_id(),
            category: AlertCategory::DataQuality,
            severity: Severity::High,
            title: format!("Tied {} number values across the document", kind.word()),
            message: format!("No clear majority {} number: {}", kind.word(), detail_parts.join("; ")),
            details: String::new(),
            source: SourceLocation::new(0, String::new(), format!("{} number", kind.word())),
            related_values: vec![],
            suggested_action: Some("Resolve which reading is authoritative before release.".into()),
            rule_id: Some(format!("{}_number_tie", kind.word())),
            formula_id: None,
        });
        return alerts;
    }

    let total = present.len();
    if max_count < total {
        let majority_canonical = leaders[0].clone();
        let majority_original = groups[&majority_canonical][0].value.as_ref().unwrap().clone();
        let fraction = max_count as f64 / total as f64;

        alerts.push(ValidationAlert {
            id: id_gen.next_alert_id(),
            category: AlertCategory::ConsistencyError,
            severity: severity_majority(kind),
            title: format!("Inconsistent {} number across the document", kind.word()),
            message: format!(
                "{} of {} pages agree on {} number '{majority_original}' ({} confidence)",
                max_count,
                total,
                kind.word(),
                confidence_label(fraction)
            ),
            details: String::new(),
            source: SourceLocation::new(0, String::new(), format!("{} number", kind.word())),
            related_values: vec![],
            suggested_action: Some("Investigate the outlier pages before batch disposition.".into()),
            rule_id: Some(format!("{}_number_consistency", kind.word())),
            formula_id: None,
        });

        for record in &present {
            if canonical(record.value.as_ref().unwrap()) != majority_canonical {
                alerts.push(ValidationAlert {
                    id: id_gen.next_alert_id(),
                    category: AlertCategory::ConsistencyError,
                    severity: severity_outlier(kind),
                    title: format!("{} number outlier on page {}", kind.word(), record.page_number),
                    message: format!(
                        "Page {} reads {} number '{}', the document majority is '{majority_original}'",
                        record.page_number,
                        kind.word(),
                        record.value.as_ref().unwrap()
                    ),
                    details: String::new(),
                    source: SourceLocation::new(record.page_number, String::new(), format!("{} number", kind.word())),
                    related_values: vec![],
                    suggested_action: Some("Confirm which value matches the physical record.".into()),
                    rule_id: Some(format!("{}_number_outlier", kind.word())),
                    formula_id: None,
                });
            }
        }
    }

    alerts
}
