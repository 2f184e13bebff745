/// Canonicalize a serial identifier (batch/lot number) for OCR-robust
/// comparison. Returns `(canonical, original)`.
///
/// Canonicalization: uppercase, strip all whitespace, replace a leading
/// `(` with `C`, replace every `I` with `1`, every `O` with `0`.
pub fn normalize_serial_identifier(value: &str) -> (String, String) {
    let original = value.to_string();

    let upper: String = value.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_uppercase();

    let mut chars: Vec<char> = upper.chars().collect();
    if chars.first() == Some(&'(') {
        chars[0] = 'C';
    }

    let canonical: String = chars
        .into_iter()
        .map(|c| match c {
            'I' => '1',
            'O' => '0',
            other => other,
        })
        .collect();

    (canonical, original)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idempotent_canonicalization() {
        let (c1, _) = normalize_serial_identifier("C251RH4004");
        let (c2, _) = normalize_serial_identifier(&c1);
        assert_eq!(c1, c2);
    }

    #[test]
    fn ocr_variants_converge() {
        let variants = ["C251RH4004", "C25IRH4004", "(25IRH 4004"];
        let canon: Vec<String> = variants
            .iter()
            .map(|v| normalize_serial_identifier(v).0)
            .collect();
        assert!(canon.windows(2).all(|w| w[0] == w[1]), "{canon:?}");
    }

    #[test]
    fn leading_paren_becomes_c() {
        let (canonical, _) = normalize_serial_identifier("(123");
        assert_eq!(canonical, "C123");
    }

    #[test]
    fn whitespace_is_stripped() {
        let (canonical, _) = normalize_serial_identifier("C 251 RH 4004");
        assert_eq!(canonical, "C251RH4004");
    }

    #[test]
    fn original_preserved_verbatim() {
        let (_, original) = normalize_serial_identifier("c25irh4004");
        assert_eq!(original, "c25irh4004");
    }
}
