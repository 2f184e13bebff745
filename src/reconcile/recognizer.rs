/// Shared label-shape recognizer for batch/lot identifiers. Which
/// identifier family we're matching against, so both directions can
/// share one implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Batch,
    Lot,
}

impl IdentifierKind {
    pub fn variants(self) -> &'static [&'static str] {
        match self {
            IdentifierKind::Batch => &["batch", "butch", "betch", "botch", "balch", "bateh", "barch", "8atch", "ba1ch"],
            IdentifierKind::Lot => &["lot", "lat", "lct", "1ot", "l0t", "lo1"],
        }
    }

    pub fn other(self) -> IdentifierKind {
        match self {
            IdentifierKind::Batch => IdentifierKind::Lot,
            IdentifierKind::Lot => IdentifierKind::Batch,
        }
    }

    pub fn word(self) -> &'static str {
        match self {
            IdentifierKind::Batch => "batch",
            IdentifierKind::Lot => "lot",
        }
    }
}

const STOP_WORDS: &[&str] = &["date", "revision", "page", "rev"];

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let mut s_chars = s.char_indices();
    let mut p_chars = prefix.chars();
    loop {
        match (s_chars.next(), p_chars.next()) {
            (Some((_, sc)), Some(pc)) => {
                if sc.to_ascii_lowercase() != pc.to_ascii_lowercase() {
                    return None;
                }
            }
            (Some((idx, _)), None) => return Some(&s[idx..]),
            (None, None) => return Some(""),
            (None, Some(_)) => return None,
        }
    }
}

/// Classifies what follows a matched variant word: either the label
/// ends here (bare, or behind a hard terminator), or it's the opener
/// of a combined field (`Batch No./Date`) with arbitrary trailing text.
fn shape_ends_here(rest: &str) -> bool {
    let rest = rest.trim_start();
    if rest.is_empty() {
        return true;
    }
    match rest.chars().next().unwrap() {
        ':' | '.' => rest[1..].trim().is_empty(),
        '/' | '&' | '(' => true,
        _ => false,
    }
}

/// Path A recognizer: does a *whole* field label (e.g.
/// `"Batch No."`, `"Lot #"`) denote this identifier, as opposed to an
/// unrelated field that happens to start with the same word
/// (`"Batch Notes"`, `"Batch No Verified"`)?
pub fn label_matches(label: &str, kind: IdentifierKind) -> bool {
    let trimmed = label.trim();
    for variant in kind.variants() {
        let Some(rest) = strip_prefix_ci(trimmed, variant) else { continue };
        if rest.chars().next().map(char::is_alphanumeric).unwrap_or(false) {
            continue;
        }
        if shape_ends_here(rest) {
            return true;
        }
        let after_ws = rest.trim_start();
        for marker in ["no.", "no", "number", "#"] {
            if let Some(tail) = strip_prefix_ci(after_ws, marker) {
                if shape_ends_here(tail) {
                    return true;
                }
            }
        }
    }
    false
}

/// Path B line matcher: finds where the label (plus optional marker
/// and separator) ends in a raw-text line, so the caller can harvest
/// tokens after it. Word boundaries prevent partial words like
/// "Notes" being consumed as the `no` marker.
pub fn match_label_line(line: &str, kind: IdentifierKind) -> Option<usize> {
    let trimmed = line.trim_start();
    let leading_ws = line.len() - trimmed.len();

    for variant in kind.variants() {
        let Some(after_word) = strip_prefix_ci(trimmed, variant) else { continue };
        if after_word.chars().next().map(char::is_alphanumeric).unwrap_or(false) {
            continue;
        }
        let mut consumed = variant.chars().count();
        let ws_len = after_word.len() - after_word.trim_start().len();
        let mut cursor = after_word.trim_start();
        consumed += ws_len;

        for marker in ["no.", "no", "number", "#"] {
            if let Some(after_marker) = strip_prefix_ci(cursor, marker) {
                let boundary_ok = after_marker
                    .chars()
                    .next()
                    .map(|c| !c.is_alphanumeric())
                    .unwrap_or(true);
                if boundary_ok {
                    consumed += cursor.len() - after_marker.len();
                    cursor = after_marker;
                    break;
                }
            }
        }

        let after_sep_ws = cursor.trim_start();
        consumed += cursor.len() - after_sep_ws.len();
        cursor = after_sep_ws;

        if let Some(rest) = cursor.strip_prefix(':').or_else(|| cursor.strip_prefix('-')) {
            consumed += cursor.len() - rest.len();
            cursor = rest;
            let after_trailing_ws = cursor.trim_start();
            consumed += cursor.len() - after_trailing_ws.len();
        }

        return Some(leading_ws + consumed);
    }

    None
}

fn is_valid_token_shape(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '/')
}

/// First acceptable token in `text`, stopping at a conflicting label
/// word for `kind` or a generic header word (date/revision/page).
pub fn first_valid_token(text: &str, kind: IdentifierKind) -> Option<String> {
    let conflicting = kind.other().variants();
    for raw in text.split_whitespace() {
        let stripped = raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '-' && c != '/');
        if stripped.is_empty() {
            continue;
        }
        let lower = stripped.to_lowercase();
        if conflicting.iter().any(|w| lower.starts_with(w)) || STOP_WORDS.iter().any(|w| lower.starts_with(w)) {
            break;
        }
        if stripped.chars().any(|c| c.is_ascii_digit()) && is_valid_token_shape(stripped) {
            return Some(stripped.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_and_decorated_labels_match() {
        for label in ["Batch", "Batch:", "Batch No", "Batch No.", "Batch Number", "Batch #", "Batch No./Date"] {
            assert!(label_matches(label, IdentifierKind::Batch), "{label} should match");
        }
    }

    #[test]
    fn unrelated_fields_do_not_match() {
        for label in ["Batch Notes", "Batch No Verified", "Batchelor"] {
            assert!(!label_matches(label, IdentifierKind::Batch), "{label} should not match");
        }
    }

    #[test]
    fn ocr_variant_words_match() {
        assert!(label_matches("8atch No.", IdentifierKind::Batch));
        assert!(label_matches("L0t #", IdentifierKind::Lot));
    }

    #[test]
    fn match_label_line_returns_tail_start() {
        let line = "Batch No.: C251RH4004";
        let end = match_label_line(line, IdentifierKind::Batch).unwrap();
        assert_eq!(&line[end..], "C251RH4004");
    }

    #[test]
    fn match_label_line_skips_unrelated_notes_word() {
        let line = "Batch Notes: see appendix";
        let end = match_label_line(line, IdentifierKind::Batch).unwrap();
        assert_eq!(&line[end..], "Notes: see appendix");
    }

    #[test]
    fn first_valid_token_stops_at_conflicting_word() {
        assert_eq!(first_valid_token("Lot L-4002 see batch above", IdentifierKind::Lot), Some("L-4002".to_string()));
        assert_eq!(first_valid_token("Date 01/02/20 C251RH4004", IdentifierKind::Batch), None);
    }
}
