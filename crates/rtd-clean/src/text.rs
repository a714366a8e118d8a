//! Primitive string and value normalization.
//!
//! Every function here is total and best-effort: malformed input comes back
//! unchanged rather than raising. The layout operations and the sector
//! vocabulary lookup are built on top of these primitives.

/// Replace accented Latin characters with their ASCII base letter.
///
/// Covers the character set observed in bulletin sector labels; anything
/// else passes through untouched.
pub fn strip_diacritics(value: &str) -> String {
    value
        .chars()
        .map(|ch| match ch {
            'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            'Á' | 'À' | 'Ä' | 'Â' | 'Ã' => 'A',
            'É' | 'È' | 'Ë' | 'Ê' => 'E',
            'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
            'Ó' | 'Ò' | 'Ö' | 'Ô' | 'Õ' => 'O',
            'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
            'Ñ' => 'N',
            'Ç' => 'C',
            other => other,
        })
        .collect()
}

/// Keep only characters accepted by the predicate.
pub fn filter_chars<F>(value: &str, keep: F) -> String
where
    F: Fn(char) -> bool,
{
    value.chars().filter(|ch| keep(*ch)).collect()
}

/// Parse a Roman numeral (subtractive notation, case-insensitive).
///
/// Returns `None` for empty or non-Roman input. Bulletins only use I..XII
/// for quarters and months, but the parser is general.
pub fn roman_to_arabic(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let digit = |ch: char| -> Option<u32> {
        match ch.to_ascii_uppercase() {
            'I' => Some(1),
            'V' => Some(5),
            'X' => Some(10),
            'L' => Some(50),
            'C' => Some(100),
            'D' => Some(500),
            'M' => Some(1000),
            _ => None,
        }
    };
    let values: Option<Vec<u32>> = trimmed.chars().map(digit).collect();
    let values = values?;
    let mut total = 0u32;
    for (idx, value) in values.iter().enumerate() {
        if values.get(idx + 1).is_some_and(|next| next > value) {
            total = total.checked_sub(*value)?;
        } else {
            total += value;
        }
    }
    if total == 0 { None } else { Some(total) }
}

/// Format a number as an uppercase Roman numeral, `None` outside 1..=3999.
pub fn arabic_to_roman(mut value: u32) -> Option<String> {
    if value == 0 || value > 3999 {
        return None;
    }
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for (weight, token) in TABLE {
        while value >= weight {
            out.push_str(token);
            value -= weight;
        }
    }
    Some(out)
}

/// Harmonize the decimal separator of a numeric string to `.`.
///
/// Preserves sign and digit order, removes thousands separators, and leaves
/// non-numeric input untouched. When both `,` and `.` appear, the rightmost
/// one is taken as the decimal separator; a lone separator is always read as
/// decimal, which matches how bulletin cells are printed.
pub fn normalize_decimal(value: &str) -> String {
    let trimmed = value.trim();
    let (sign, body) = match trimmed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => match trimmed.strip_prefix('+') {
            Some(rest) => ("+", rest),
            None => ("", trimmed),
        },
    };
    if body.is_empty()
        || !body
            .chars()
            .all(|ch| ch.is_ascii_digit() || ch == ',' || ch == '.')
        || !body.chars().any(|ch| ch.is_ascii_digit())
    {
        return value.to_string();
    }
    let decimal_pos = body.rfind([',', '.']);
    let mut out = String::with_capacity(body.len() + 1);
    out.push_str(sign);
    for (idx, ch) in body.char_indices() {
        match ch {
            ',' | '.' => {
                if Some(idx) == decimal_pos {
                    out.push('.');
                }
                // Earlier separators are thousands grouping; drop them.
            }
            digit => out.push(digit),
        }
    }
    out
}

/// Normalize a sector label for vocabulary lookup: strip diacritics and
/// footnote markers, lowercase, fold whitespace.
pub fn normalize_label(value: &str) -> String {
    let stripped = strip_diacritics(value);
    let filtered = filter_chars(&stripped, |ch| {
        ch.is_ascii_alphanumeric() || ch.is_whitespace()
    });
    let mut out = String::with_capacity(filtered.len());
    for word in filtered.split_whitespace() {
        // Trailing footnote references like "/1" survive as bare digits.
        if word.chars().all(|ch| ch.is_ascii_digit()) {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&word.to_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strip_diacritics() {
        assert_eq!(strip_diacritics("minería"), "mineria");
        assert_eq!(strip_diacritics("construcción"), "construccion");
        assert_eq!(strip_diacritics("PESCA"), "PESCA");
        assert_eq!(strip_diacritics(""), "");
    }

    #[test]
    fn test_roman_round_trip() {
        for value in 1..=12 {
            let roman = arabic_to_roman(value).unwrap();
            assert_eq!(roman_to_arabic(&roman), Some(value));
        }
        assert_eq!(roman_to_arabic("iv"), Some(4));
        assert_eq!(roman_to_arabic("XIV"), Some(14));
        assert_eq!(roman_to_arabic(""), None);
        assert_eq!(roman_to_arabic("q1"), None);
        assert_eq!(arabic_to_roman(0), None);
    }

    #[test]
    fn test_normalize_decimal() {
        assert_eq!(normalize_decimal("3,5"), "3.5");
        assert_eq!(normalize_decimal("-3,5"), "-3.5");
        assert_eq!(normalize_decimal("1.234,5"), "1234.5");
        assert_eq!(normalize_decimal("1,234.5"), "1234.5");
        assert_eq!(normalize_decimal("3.5"), "3.5");
        assert_eq!(normalize_decimal("  42 "), "42");
        assert_eq!(normalize_decimal("n.d."), "n.d.");
        assert_eq!(normalize_decimal("pesca"), "pesca");
        assert_eq!(normalize_decimal(""), "");
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  Minería /1"), "mineria");
        assert_eq!(normalize_label("Electricidad y Agua*"), "electricidad y agua");
        assert_eq!(normalize_label("PESCA"), "pesca");
        assert_eq!(normalize_label("3.5"), "");
    }

    proptest! {
        #[test]
        fn prop_normalize_decimal_preserves_digits_and_sign(
            sign in prop::sample::select(vec!["", "-", "+"]),
            int_part in "[0-9]{1,4}",
            frac_part in "[0-9]{1,2}",
        ) {
            let input = format!("{sign}{int_part},{frac_part}");
            let out = normalize_decimal(&input);
            let digits_in: String =
                input.chars().filter(char::is_ascii_digit).collect();
            let digits_out: String =
                out.chars().filter(char::is_ascii_digit).collect();
            prop_assert_eq!(digits_in, digits_out);
            prop_assert_eq!(out.starts_with('-'), sign == "-");
            prop_assert!(out.parse::<f64>().is_ok());
        }

        #[test]
        fn prop_strip_diacritics_is_ascii_for_sector_text(
            input in "[a-záéíóúñü ]{0,24}",
        ) {
            prop_assert!(strip_diacritics(&input).is_ascii());
        }
    }
}
