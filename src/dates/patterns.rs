use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

pub static COMMENCEMENT_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)commencement|manufacturing\s+start|production\s+start|start\s*(?:date|time)").unwrap());

pub static COMPLETION_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)completion|manufacturing\s+end|production\s+end|end\s*(?:date|time)").unwrap());

static NUMERIC_DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{1,2})[/\-.\\](\d{1,2})[/\-.\\](\d{2,4})").unwrap());
static MONTH_NAME_DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(\d{1,2})\s+([A-Za-z]{3,9})\s+(\d{4})").unwrap());
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{1,2})[:.\s](\d{2})").unwrap());

/// OCR digit confusion applied before parsing: `|`, `l`, `I` read as
/// `1`; `O` read as `0`.
fn fix_ocr_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '|' | 'l' | 'I' => '1',
            'O' => '0',
            other => other,
        })
        .collect()
}

fn normalize_year(raw: u32) -> i32 {
    if raw >= 100 {
        raw as i32
    } else if raw > 50 {
        1900 + raw as i32
    } else {
        2000 + raw as i32
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    const NAMES: &[&str] = &[
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    NAMES.iter().position(|n| lower.starts_with(n)).map(|i| i as u32 + 1)
}

/// Parses a `DD/MM/YY[YY]` (any of `/ - . \`) or `DD MMM YYYY` date,
/// after OCR digit-confusion correction.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let fixed = fix_ocr_digits(raw);
    if let Some(caps) = NUMERIC_DATE_RE.captures(&fixed) {
        let day: u32 = caps.get(1)?.as_str().parse().ok()?;
        let month: u32 = caps.get(2)?.as_str().parse().ok()?;
        let year = normalize_year(caps.get(3)?.as_str().parse().ok()?);
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    if let Some(caps) = MONTH_NAME_DATE_RE.captures(&fixed) {
        let day: u32 = caps.get(1)?.as_str().parse().ok()?;
        let month = month_from_name(caps.get(2)?.as_str())?;
        let year: i32 = caps.get(3)?.as_str().parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    None
}

/// Parses `HH:MM`, `HH.MM`, or `HH MM`, after OCR digit-confusion correction.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let fixed = fix_ocr_digits(raw);
    let caps = TIME_RE.captures(&fixed)?;
    let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Extracts `(date substring, time substring)` from free text, either
/// or both may be present. The time is searched for only in the text
/// that follows the matched date span, so a `/`-separated date's own
/// digits (e.g. the year in `"24/04/25 11:07"`) can never be mistaken
/// for a time.
pub fn extract_date_and_time(text: &str) -> (Option<String>, Option<String>) {
    let date_match = NUMERIC_DATE_RE.find(text).or_else(|| MONTH_NAME_DATE_RE.find(text));
    let date = date_match.map(|m| m.as_str().to_string());
    let time_search_start = date_match.map(|m| m.end()).unwrap_or(0);
    let time = TIME_RE
        .find(&text[time_search_start..])
        .map(|m| m.as_str().to_string());
    (date, time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_slash_separated_date() {
        assert_eq!(parse_date("15/03/24"), NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    #[test]
    fn two_digit_year_pivots_at_fifty() {
        assert_eq!(parse_date("01/01/51").unwrap().format("%Y").to_string(), "1951");
        assert_eq!(parse_date("01/01/50").unwrap().format("%Y").to_string(), "2050");
    }

    #[test]
    fn ocr_confused_digits_are_corrected() {
        assert_eq!(parse_date("l5/O3/24"), NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    #[test]
    fn month_name_date_parses() {
        assert_eq!(parse_date("15 Mar 2024"), NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    #[test]
    fn dotted_time_parses() {
        assert_eq!(parse_time("14.30"), NaiveTime::from_hms_opt(14, 30, 0));
    }

    #[test]
    fn extracts_both_date_and_time_from_one_string() {
        let (d, t) = extract_date_and_time("Commencement: 15/03/2024 08:30");
        assert_eq!(d.as_deref(), Some("15/03/2024"));
        assert_eq!(t.as_deref(), Some("08:30"));
    }

    #[test]
    fn time_is_not_confused_with_the_date_s_own_digits() {
        // The year's trailing digits plus the following space used to be
        // mistaken for a time ("25 11" out of "24/04/25 11:07").
        let (d, t) = extract_date_and_time("24/04/25 11:07");
        assert_eq!(d.as_deref(), Some("24/04/25"));
        assert_eq!(t.as_deref(), Some("11:07"));
    }
}
