//! Catalogue of table-shape repair operations.
//!
//! Each operation targets one structural defect observed in a production
//! bulletin era and shares the same contract: `Some(modified)` when the
//! precondition matched, `None` when it did not (a silent, safe no-op).
//! Operations are re-appliable; applying one to its own output is a no-op.
//! Pipelines in [`crate::dispatch`] compose them as straight-line sequences
//! with no embedded branching.

pub mod cells;
pub mod columns;
pub mod headers;
pub mod rows;

use rtd_model::{Grid, TargetPeriod};

use crate::text;

/// `Some(candidate)` only when the repair actually changed something.
/// Keeps every operation observable and trivially re-appliable.
pub(crate) fn changed(original: &Grid, candidate: Grid) -> Option<Grid> {
    if candidate == *original {
        None
    } else {
        Some(candidate)
    }
}

/// A standalone 4-digit year token.
pub(crate) fn is_year_token(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.len() == 4 && trimmed.chars().all(|ch| ch.is_ascii_digit())
}

/// A bare sub-period token the header pipeline still has to qualify with a
/// year: `m<n>` or `q<n>`.
pub(crate) fn is_bare_period_token(cell: &str) -> bool {
    bare_period_parts(cell).is_some()
}

pub(crate) fn bare_period_parts(cell: &str) -> Option<(char, u8)> {
    let trimmed = cell.trim();
    let mut chars = trimmed.chars();
    let kind = chars.next()?.to_ascii_lowercase();
    let number: u8 = chars.as_str().parse().ok()?;
    match kind {
        'm' if (1..=12).contains(&number) => Some(('m', number)),
        'q' if (1..=4).contains(&number) => Some(('q', number)),
        _ => None,
    }
}

/// Anything that identifies a period column in some layout era: a canonical
/// period label, a bare `m`/`q` token, a year, a Roman quarter, or a month
/// name in either language.
pub(crate) fn is_period_like(cell: &str) -> bool {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return false;
    }
    trimmed.parse::<TargetPeriod>().is_ok()
        || is_year_token(trimmed)
        || is_bare_period_token(trimmed)
        || text::roman_to_arabic(trimmed).is_some_and(|value| value <= 12)
        || month_number(trimmed).is_some()
}

/// Month number from a localized month name or abbreviation.
pub(crate) fn month_number(cell: &str) -> Option<u8> {
    let key = text::normalize_label(cell);
    let prefix: String = key.chars().take(3).collect();
    let month = match prefix.as_str() {
        "ene" | "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "abr" | "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "ago" | "aug" => 8,
        "set" | "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dic" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// A cell that reads as a number once the decimal separator is harmonized.
pub(crate) fn is_numeric_cell(cell: &str) -> bool {
    text::normalize_decimal(cell).parse::<f64>().is_ok()
}

/// A row that looks like a period header: at least two period-identifying
/// cells and no numeric data cells.
pub(crate) fn is_header_row(row: &[String]) -> bool {
    let period_like = row.iter().filter(|cell| is_period_like(cell)).count();
    let numeric = row
        .iter()
        .filter(|cell| !is_period_like(cell) && is_numeric_cell(cell))
        .count();
    period_like >= 2 && numeric == 0
}

/// A row that looks like estimates: at least two numeric cells.
pub(crate) fn is_data_row(row: &[String]) -> bool {
    row.iter().filter(|cell| is_numeric_cell(cell)).count() >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_like_covers_all_eras() {
        for cell in ["2020m1", "2019q4", "2019", "q4", "m12", "IV", "ene", "Dic."] {
            assert!(is_period_like(cell), "expected period-like: {cell}");
        }
        for cell in ["pesca", "3.5", "", "q5", "m13"] {
            assert!(!is_period_like(cell), "expected not period-like: {cell}");
        }
    }

    #[test]
    fn test_row_classifiers() {
        let header: Vec<String> = ["sector", "sector_en", "2020m1", "2020m2"]
            .map(String::from)
            .to_vec();
        let data: Vec<String> = ["pesca", "fishing", "3,5", "4.2"]
            .map(String::from)
            .to_vec();
        assert!(is_header_row(&header));
        assert!(!is_data_row(&header));
        assert!(is_data_row(&data));
        assert!(!is_header_row(&data));
    }
}
