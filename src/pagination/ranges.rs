/// Formats a sorted list of missing page numbers as run-length ranges:
/// `[1,2,3,5,7,8,9,15] -> "1-3, 5, 7-9, 15"`. A two-element run is
/// spelled out as two singletons (`"5, 6"`, not `"5-6"`).
pub fn format_missing_pages(missing: &[u32]) -> String {
    let mut parts = Vec::new();
    let mut i = 0;
    while i < missing.len() {
        let start = missing[i];
        let mut end = start;
        let mut j = i + 1;
        while j < missing.len() && missing[j] == end + 1 {
            end = missing[j];
            j += 1;
        }
        let run_len = j - i;
        if run_len >= 3 {
            parts.push(format!("{start}-{end}"));
        } else {
            for page in &missing[i..j] {
                parts.push(page.to_string());
            }
        }
        i = j;
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_spec_worked_example() {
        let missing = [1, 2, 3, 5, 7, 8, 9, 15];
        assert_eq!(format_missing_pages(&missing), "1-3, 5, 7-9, 15");
    }

    #[test]
    fn two_element_run_is_two_singletons() {
        assert_eq!(format_missing_pages(&[5, 6]), "5, 6");
    }

    #[test]
    fn single_missing_page() {
        assert_eq!(format_missing_pages(&[42]), "42");
    }

    #[test]
    fn empty_input_is_empty_string() {
        assert_eq!(format_missing_pages(&[]), "");
    }
}
