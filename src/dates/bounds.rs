use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::model::{
    AlertCategory, BatchDateBounds, DateExtractionConfidence, ExtractedValue, IdGenerator, Severity,
    SourceLocation, ValidationAlert, ValueType,
};

use super::patterns::{parse_date, parse_time, COMMENCEMENT_LABEL_RE, COMPLETION_LABEL_RE};

const FIRST_PAGES_SCANNED: u32 = 5;

#[derive(Debug, Default, Clone)]
struct RoleSources {
    structured_date: Option<String>,
    structured_time: Option<String>,
    structured_page: Option<u32>,
    text_date: Option<String>,
    text_time: Option<String>,
    text_page: Option<u32>,
}

impl RoleSources {
    fn any_structured(&self) -> bool {
        self.structured_date.is_some() || self.structured_time.is_some()
    }

    fn any_text(&self) -> bool {
        self.text_date.is_some() || self.text_time.is_some()
    }

    fn fully_populated(&self) -> bool {
        self.structured_date.is_some()
            && self.structured_time.is_some()
            && self.text_date.is_some()
            && self.text_time.is_some()
    }

    fn only_one_source_populated(&self) -> bool {
        self.any_structured() != self.any_text()
    }

    fn reconciled_agreement(&self) -> bool {
        if !(self.any_structured() && self.any_text()) {
            return false;
        }
        let date_ok = match (&self.structured_date, &self.text_date) {
            (Some(a), Some(b)) => parse_date(a) == parse_date(b) && parse_date(a).is_some(),
            _ => true,
        };
        let time_ok = match (&self.structured_time, &self.text_time) {
            (Some(a), Some(b)) => parse_time(a) == parse_time(b) && parse_time(a).is_some(),
            _ => true,
        };
        date_ok && time_ok
    }

    fn final_date(&self) -> Option<&String> {
        self.structured_date.as_ref().or(self.text_date.as_ref())
    }

    fn final_time(&self) -> Option<&String> {
        self.structured_time.as_ref().or(self.text_time.as_ref())
    }

    fn source_page(&self) -> Option<u32> {
        self.structured_page.or(self.text_page)
    }
}

fn gather_structured(
    pages: &[(u32, &[ExtractedValue], &str)],
    label_re: &regex::Regex,
) -> (Option<String>, Option<String>, Option<u32>) {
    let mut date = None;
    let mut time = None;
    let mut page = None;

    'pages: for (page_number, values, _text) in pages.iter().filter(|(n, ..)| *n <= FIRST_PAGES_SCANNED) {
        for value in values.iter() {
            if !label_re.is_match(&value.source.field_label) {
                continue;
            }
            let (d, t) = super::patterns::extract_date_and_time(&value.raw_value);
            if date.is_none() && d.is_some() {
                date = d;
                page.get_or_insert(*page_number);
            }
            if time.is_none() && t.is_some() {
                time = t;
                page.get_or_insert(*page_number);
            }
            if matches!(value.value_type, ValueType::Time) && time.is_none() {
                time = Some(value.raw_value.clone());
                page.get_or_insert(*page_number);
            }
            if date.is_some() && time.is_some() {
                break 'pages;
            }
        }
    }

    (date, time, page)
}

fn gather_text(pages: &[(u32, &[ExtractedValue], &str)], label_re: &regex::Regex) -> (Option<String>, Option<String>, Option<u32>) {
    let mut date = None;
    let mut time = None;
    let mut page = None;

    'pages: for (page_number, _values, text) in pages.iter().filter(|(n, ..)| *n <= FIRST_PAGES_SCANNED) {
        let lines: Vec<&str> = text.lines().collect();
        for (i, line) in lines.iter().enumerate() {
            if !label_re.is_match(line) {
                continue;
            }
            let tail = line.splitn(2, ':').nth(1).unwrap_or("").trim();
            let next_line = lines.get(i + 1).copied().unwrap_or("");
            let haystack = format!("{tail} {next_line}");
            let (d, t) = super::patterns::extract_date_and_time(&haystack);
            if date.is_none() && d.is_some() {
                date = d;
                page.get_or_insert(*page_number);
            }
            if time.is_none() && t.is_some() {
                time = t;
                page.get_or_insert(*page_number);
            }
            if date.is_some() && time.is_some() {
                break 'pages;
            }
        }
    }

    (date, time, page)
}

fn gather_role(pages: &[(u32, &[ExtractedValue], &str)], label_re: &regex::Regex) -> RoleSources {
    let (structured_date, structured_time, structured_page) = gather_structured(pages, label_re);
    let (text_date, text_time, text_page) = gather_text(pages, label_re);
    RoleSources {
        structured_date,
        structured_time,
        structured_page,
        text_date,
        text_time,
        text_page,
    }
}

fn to_iso(date: &str, time: Option<&str>) -> Option<chrono::DateTime<chrono::Utc>> {
    let date = parse_date(date)?;
    let time = time.and_then(parse_time).unwrap_or_else(|| NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    let naive = NaiveDateTime::new(date, time);
    Some(chrono::DateTime::from_naive_utc_and_offset(naive, chrono::Utc))
}

/// Runs extraction and reconciliation over the first five pages,
/// producing the reconciled `BatchDateBounds` and any alerts for
/// missing or low-confidence extraction.
pub fn extract_batch_date_bounds(
    pages: &[(u32, &[ExtractedValue], &str)],
    id_gen: &IdGenerator,
) -> (BatchDateBounds, Vec<ValidationAlert>) {
    let commencement = gather_role(pages, &COMMENCEMENT_LABEL_RE);
    let completion = gather_role(pages, &COMPLETION_LABEL_RE);

    let both_high = commencement.fully_populated()
        && completion.fully_populated()
        && commencement.reconciled_agreement()
        && completion.reconciled_agreement();

    let either_reconciled = commencement.reconciled_agreement() || completion.reconciled_agreement();
    let only_one_source_somewhere = commencement.only_one_source_populated() || completion.only_one_source_populated();
    let nothing_found = !commencement.any_structured()
        && !commencement.any_text()
        && !completion.any_structured()
        && !completion.any_text();

    let confidence = if both_high {
        DateExtractionConfidence::High
    } else if nothing_found {
        DateExtractionConfidence::Low
    } else if either_reconciled || only_one_source_somewhere {
        DateExtractionConfidence::Medium
    } else {
        DateExtractionConfidence::Low
    };

    let commencement_iso = commencement.final_date().and_then(|d| to_iso(d, commencement.final_time().map(String::as_str)));
    let completion_iso = completion.final_date().and_then(|d| to_iso(d, completion.final_time().map(String::as_str)));

    let bounds = BatchDateBounds {
        commencement_date: commencement.final_date().cloned(),
        commencement_time: commencement.final_time().cloned(),
        completion_date: completion.final_date().cloned(),
        completion_time: completion.final_time().cloned(),
        commencement_iso,
        completion_iso,
        extraction_confidence: confidence,
        source_page_number: commencement.source_page().or_else(|| completion.source_page()),
    };

    let mut alerts = Vec::new();

    if commencement_iso.is_none() {
        alerts.push(extraction_missing_alert("commencement", commencement.source_page(), id_gen));
    }
    if completion_iso.is_none() {
        alerts.push(extraction_missing_alert("completion", completion.source_page(), id_gen));
    }

    match confidence {
        DateExtractionConfidence::Low if commencement_iso.is_some() || completion_iso.is_some() => {
            alerts.push(confidence_alert(
                "Batch date extraction confidence is low",
                "Only one extraction source contributed to the batch date window and no cross-check was possible.",
                bounds.source_page_number,
                id_gen,
            ));
        }
        DateExtractionConfidence::Medium if commencement_iso.is_some() && completion_iso.is_some() => {
            alerts.push(reconciliation_alert(bounds.source_page_number, id_gen));
        }
        _ => {}
    }

    (bounds, alerts)
}

fn extraction_missing_alert(role: &str, page: Option<u32>, id_gen: &IdGenerator) -> ValidationAlert {
    ValidationAlert {
        id: id_gen.next_alert_id(),
        category: AlertCategory::MissingValue,
        severity: Severity::Critical,
        title: format!("Batch {role} date could not be extracted"),
        message: format!("No {role} date/time was found on the first {FIRST_PAGES_SCANNED} pages"),
        details: String::new(),
        source: SourceLocation::new(page.unwrap_or(0), String::new(), format!("Batch {role} date")),
        related_values: vec![],
        suggested_action: Some("Confirm the batch header page was scanned and is legible.".into()),
        rule_id: Some("batch_date_extraction_missing".into()),
        formula_id: None,
    }
}

fn confidence_alert(title: &str, message: &str, page: Option<u32>, id_gen: &IdGenerator) -> ValidationAlert {
    ValidationAlert {
        id: id_gen.next_alert_id(),
        category: AlertCategory::DataQuality,
        severity: Severity::Medium,
        title: title.to_string(),
        message: message.to_string(),
        details: String::new(),
        source: SourceLocation::new(page.unwrap_or(0), String::new(), "Batch date window"),
        related_values: vec![],
        suggested_action: Some("Manually verify the batch commencement/completion dates.".into()),
        rule_id: Some("batch_date_confidence".into()),
        formula_id: None,
    }
}

fn reconciliation_alert(page: Option<u32>, id_gen: &IdGenerator) -> ValidationAlert {
    ValidationAlert {
        id: id_gen.next_alert_id(),
        category: AlertCategory::DataQuality,
        severity: Severity::Medium,
        title: "Batch date sources disagree".to_string(),
        message: "The structured extraction and the raw-text scan did not fully agree on the batch date window.".to_string(),
        details: String::new(),
        source: SourceLocation::new(page.unwrap_or(0), String::new(), "Batch date window"),
        related_values: vec![],
        suggested_action: Some("Reconcile the commencement/completion dates against the scanned header.".into()),
        rule_id: Some("batch_date_reconciliation".into()),
        formula_id: None,
    }
}

/// Collects every candidate date/datetime value that is not itself
/// part of the commencement/completion header and validates it falls
/// within `bounds`. Values are deduplicated by `(page, date)` since the
/// same date frequently appears in both the structured extraction and
/// the raw-text sweep.
pub fn validate_date_window(
    bounds: &BatchDateBounds,
    structured_pages: &[(u32, &[ExtractedValue])],
    text_pages: &[(u32, &str)],
    id_gen: &IdGenerator,
) -> Vec<ValidationAlert> {
    let (Some(commencement), Some(completion)) = (bounds.commencement_iso, bounds.completion_iso) else {
        return Vec::new();
    };

    let mut seen: HashSet<(u32, NaiveDate)> = HashSet::new();
    let mut candidates: Vec<(u32, NaiveDate)> = Vec::new();

    for (page_number, values) in structured_pages {
        for value in values.iter() {
            if !matches!(value.value_type, ValueType::Date | ValueType::Datetime) {
                continue;
            }
            if COMMENCEMENT_LABEL_RE.is_match(&value.source.field_label) || COMPLETION_LABEL_RE.is_match(&value.source.field_label) {
                continue;
            }
            if let Some(date) = parse_date(&value.raw_value) {
                if seen.insert((*page_number, date)) {
                    candidates.push((*page_number, date));
                }
            }
        }
    }

    for (page_number, text) in text_pages {
        for line in text.lines() {
            if COMMENCEMENT_LABEL_RE.is_match(line) || COMPLETION_LABEL_RE.is_match(line) {
                continue;
            }
            let (date_str, _) = super::patterns::extract_date_and_time(line);
            let Some(date_str) = date_str else { continue };
            let Some(date) = parse_date(&date_str) else { continue };
            if seen.insert((*page_number, date)) {
                candidates.push((*page_number, date));
            }
        }
    }

    let commencement_date = commencement.date_naive();
    let completion_date = completion.date_naive();

    let mut alerts = Vec::new();
    for (page_number, date) in candidates {
        if date < commencement_date - Duration::days(1) {
            alerts.push(window_alert(page_number, date, "Date Before Batch Commencement", id_gen));
        } else if date > completion_date + Duration::days(1) {
            alerts.push(window_alert(page_number, date, "Date After Batch Completion", id_gen));
        }
    }

    alerts
}

fn window_alert(page_number: u32, date: NaiveDate, title: &str, id_gen: &IdGenerator) -> ValidationAlert {
    ValidationAlert {
        id: id_gen.next_alert_id(),
        category: AlertCategory::SequenceError,
        severity: Severity::High,
        title: title.to_string(),
        message: format!("{date} on page {page_number} falls outside the declared batch manufacturing window"),
        details: String::new(),
        source: SourceLocation::new(page_number, String::new(), "Dated value"),
        related_values: vec![],
        suggested_action: Some("Confirm the date against the batch commencement/completion window.".into()),
        rule_id: Some("batch_date_window_violation".into()),
        formula_id: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceLocation as SL;

    fn value(label: &str, value_type: ValueType, raw: &str) -> ExtractedValue {
        ExtractedValue {
            id: "v".into(),
            raw_value: raw.to_string(),
            numeric_value: None,
            unit: None,
            value_type,
            source: SL::new(1, "batch_header", label),
            confidence: 0.8,
            is_handwritten: false,
        }
    }

    #[test]
    fn high_confidence_when_both_sources_agree_on_both_roles() {
        let commencement = vec![value("Date & Time of Batch Commencement", ValueType::Datetime, "24/04/25 11:07")];
        let completion = vec![value("Date & Time of Batch Completion", ValueType::Datetime, "26/04/25 18:30")];
        let text = "Date & Time of Batch Commencement: 24/04/25 11:07\nDate & Time of Batch Completion: 26/04/25 18:30";
        let pages: Vec<(u32, &[ExtractedValue], &str)> = vec![
            (1, commencement.as_slice(), text),
            (2, completion.as_slice(), ""),
        ];
        let gen = IdGenerator::default();
        let (bounds, alerts) = extract_batch_date_bounds(&pages, &gen);
        assert_eq!(bounds.extraction_confidence, DateExtractionConfidence::High);
        assert!(bounds.is_fully_resolved());
        assert!(alerts.is_empty());
    }

    #[test]
    fn missing_completion_emits_critical_alert() {
        let commencement = vec![value("Commencement Date/Time", ValueType::Datetime, "24/04/25 11:07")];
        let pages: Vec<(u32, &[ExtractedValue], &str)> = vec![(1, commencement.as_slice(), "")];
        let gen = IdGenerator::default();
        let (bounds, alerts) = extract_batch_date_bounds(&pages, &gen);
        assert!(!bounds.is_fully_resolved());
        assert!(alerts.iter().any(|a| a.rule_id.as_deref() == Some("batch_date_extraction_missing") && a.severity == Severity::Critical));
    }

    #[test]
    fn s5_dates_outside_window_are_flagged() {
        let commencement = vec![value("Commencement Date/Time", ValueType::Datetime, "24/04/25 11:07")];
        let completion = vec![value("Completion Date/Time", ValueType::Datetime, "26/04/25 18:30")];
        let pages: Vec<(u32, &[ExtractedValue], &str)> = vec![
            (1, commencement.as_slice(), ""),
            (2, completion.as_slice(), ""),
        ];
        let gen = IdGenerator::default();
        let (bounds, _) = extract_batch_date_bounds(&pages, &gen);

        let before = value("Sampling date", ValueType::Date, "20/04/25");
        let after = value("Review date", ValueType::Date, "01/05/25");
        let structured_pages: Vec<(u32, &[ExtractedValue])> = vec![(7, std::slice::from_ref(&before)), (8, std::slice::from_ref(&after))];
        let text_pages: Vec<(u32, &str)> = vec![(7, ""), (8, "")];

        let alerts = validate_date_window(&bounds, &structured_pages, &text_pages, &gen);
        assert!(alerts.iter().any(|a| a.title == "Date Before Batch Commencement"));
        assert!(alerts.iter().any(|a| a.title == "Date After Batch Completion"));
    }

    #[test]
    fn dates_within_tolerance_never_flagged() {
        let commencement = vec![value("Commencement Date/Time", ValueType::Datetime, "24/04/25 11:07")];
        let completion = vec![value("Completion Date/Time", ValueType::Datetime, "26/04/25 18:30")];
        let pages: Vec<(u32, &[ExtractedValue], &str)> = vec![
            (1, commencement.as_slice(), ""),
            (2, completion.as_slice(), ""),
        ];
        let gen = IdGenerator::default();
        let (bounds, _) = extract_batch_date_bounds(&pages, &gen);

        let within = value("Inspection date", ValueType::Date, "25/04/25");
        let structured_pages: Vec<(u32, &[ExtractedValue])> = vec![(5, std::slice::from_ref(&within))];
        let text_pages: Vec<(u32, &str)> = vec![(5, "")];

        let alerts = validate_date_window(&bounds, &structured_pages, &text_pages, &gen);
        assert!(alerts.is_empty());
    }

    #[test]
    fn nothing_extracted_yields_low_confidence() {
        let pages: Vec<(u32, &[ExtractedValue], &str)> = vec![(1, &[], "no relevant text")];
        let gen = IdGenerator::default();
        let (bounds, _) = extract_batch_date_bounds(&pages, &gen);
        assert_eq!(bounds.extraction_confidence, DateExtractionConfidence::Low);
    }
}
