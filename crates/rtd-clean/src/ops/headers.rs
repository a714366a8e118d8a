//! Header repairs: locating the header row and canonicalizing period names.
//!
//! The goal state is a single header row of the form
//! `sector, sector_en, <period>...` where every period cell parses as a
//! canonical target-period label (`2020m1`, `2019q4`, `2019`).

use rtd_model::{Grid, TargetPeriod};

use super::{bare_period_parts, changed, is_data_row, is_header_row, is_period_like, is_year_token, month_number};
use crate::text;

const HEADER_SEARCH_DEPTH: usize = 6;

fn map_header<F>(grid: &Grid, mut f: F) -> Option<Grid>
where
    F: FnMut(&str) -> String,
{
    let mut rows = grid.rows.clone();
    let header = rows.first_mut()?;
    for cell in header.iter_mut() {
        *cell = f(cell);
    }
    changed(grid, Grid::new(rows))
}

/// Promote the first header-like row to the top, dropping whatever the
/// extractor left above it.
pub fn promote_header_row(grid: &Grid) -> Option<Grid> {
    let idx = grid
        .rows
        .iter()
        .take(HEADER_SEARCH_DEPTH)
        .position(|row| is_header_row(row))?;
    if idx == 0 {
        return None;
    }
    Some(Grid::new(grid.rows[idx..].to_vec()))
}

/// Merge a header split across two physical rows (year tokens above,
/// sub-period tokens below) into one row.
pub fn merge_two_row_header(grid: &Grid) -> Option<Grid> {
    if grid.n_rows() < 3 {
        return None;
    }
    let top = &grid.rows[0];
    let bottom = &grid.rows[1];
    if is_data_row(top) || is_data_row(bottom) {
        return None;
    }
    let top_periods = top.iter().filter(|cell| is_period_like(cell)).count();
    let bottom_periods = bottom.iter().filter(|cell| is_period_like(cell)).count();
    if top_periods == 0 || bottom_periods < 2 {
        return None;
    }
    let width = top.len().max(bottom.len());
    let mut merged = Vec::with_capacity(width);
    for col in 0..width {
        let a = top.get(col).map(String::as_str).unwrap_or("").trim();
        let b = bottom.get(col).map(String::as_str).unwrap_or("").trim();
        merged.push(match (a.is_empty(), b.is_empty()) {
            (true, true) => String::new(),
            (false, true) => a.to_string(),
            (true, false) => b.to_string(),
            (false, false) => format!("{a} {b}"),
        });
    }
    let mut rows = vec![merged];
    rows.extend(grid.rows.iter().skip(2).cloned());
    changed(grid, Grid::new(rows))
}

/// Strip footnote markers from header cells (`2020*`, `ene (p)`).
pub fn strip_header_footnote_marks(grid: &Grid) -> Option<Grid> {
    map_header(grid, |cell| {
        let mut out = cell.trim().to_string();
        for suffix in ["(p)", "(r)", "(e)", "*", "**"] {
            while out.to_lowercase().ends_with(suffix) {
                out.truncate(out.len() - suffix.len());
                out = out.trim_end().to_string();
            }
        }
        if let Some((head, tail)) = out.rsplit_once('/')
            && !tail.is_empty()
            && tail.chars().all(|ch| ch.is_ascii_digit())
            && !is_year_token(head)
            && !head.is_empty()
        {
            out = head.trim_end().to_string();
        }
        out
    })
}

/// Lowercase and trim header cells.
pub fn lowercase_headers(grid: &Grid) -> Option<Grid> {
    map_header(grid, |cell| cell.trim().to_lowercase())
}

/// Convert month-name header tokens to bare `m<n>` tokens.
pub fn month_name_headers(grid: &Grid) -> Option<Grid> {
    map_header(grid, |cell| match month_number(cell) {
        Some(month) => format!("m{month}"),
        None => cell.to_string(),
    })
}

fn map_roman_tokens(cell: &str, max: u32, kind: char) -> String {
    let tokens: Vec<String> = cell
        .split_whitespace()
        .map(|token| match text::roman_to_arabic(token) {
            Some(value) if (1..=max).contains(&value) => format!("{kind}{value}"),
            _ => token.to_string(),
        })
        .collect();
    if tokens.is_empty() {
        cell.to_string()
    } else {
        tokens.join(" ")
    }
}

/// Convert Roman-numeral quarter tokens (`I`..`IV`) in header cells to bare
/// `q<n>` tokens. Token-wise, so a merged `2019 III` cell becomes `2019 q3`.
pub fn roman_quarter_headers(grid: &Grid) -> Option<Grid> {
    map_header(grid, |cell| map_roman_tokens(cell, 4, 'q'))
}

/// Convert Roman-numeral month tokens (`I`..`XII`) in header cells to bare
/// `m<n>` tokens.
pub fn roman_month_headers(grid: &Grid) -> Option<Grid> {
    map_header(grid, |cell| map_roman_tokens(cell, 12, 'm'))
}

fn split_joined(grid: &Grid, sep: char, allow_years: bool) -> Option<Grid> {
    let header = grid.rows.first()?;
    let mut rows = grid.rows.clone();
    let mut touched = false;
    for col in 0..header.len() {
        let cell = rows[0][col].trim().to_string();
        let Some((left, right)) = cell.split_once(sep) else {
            continue;
        };
        let (left, right) = (left.trim(), right.trim());
        let splittable = if allow_years {
            (is_period_like(left) && is_period_like(right))
                || (is_year_token(left) && is_year_token(right))
        } else {
            is_period_like(left)
                && is_period_like(right)
                && !is_year_token(left)
                && !is_year_token(right)
        };
        let next_blank = rows[0]
            .get(col + 1)
            .is_some_and(|next| next.trim().is_empty());
        if splittable && next_blank {
            rows[0][col] = left.to_string();
            rows[0][col + 1] = right.to_string();
            touched = true;
        }
    }
    if !touched {
        return None;
    }
    changed(grid, Grid::new(rows))
}

/// Split a hyphen-joined two-token header (`I-II` over two columns).
pub fn split_hyphen_joined_headers(grid: &Grid) -> Option<Grid> {
    split_joined(grid, '-', false)
}

/// Split a slash-joined two-token header, including year pairs (`2019/2020`).
pub fn split_slash_joined_headers(grid: &Grid) -> Option<Grid> {
    split_joined(grid, '/', true)
}

/// Compact a year and a bare sub-period token sharing one header cell into
/// a canonical label: `2019 q4` (or `2019-q4`) becomes `2019q4`.
pub fn compact_year_period_headers(grid: &Grid) -> Option<Grid> {
    map_header(grid, |cell| {
        let normalized = cell.trim().replace('-', " ");
        let tokens: Vec<&str> = normalized.split_whitespace().collect();
        if tokens.len() != 2 {
            return cell.to_string();
        }
        let (year, token) = if is_year_token(tokens[0]) {
            (tokens[0], tokens[1])
        } else if is_year_token(tokens[1]) {
            (tokens[1], tokens[0])
        } else {
            return cell.to_string();
        };
        match bare_period_parts(token) {
            Some((kind, number)) => format!("{year}{kind}{number}"),
            None => cell.to_string(),
        }
    })
}

/// Qualify bare sub-period tokens with the year most recently seen to their
/// left: `2019, q1, q2` becomes `2019, 2019q1, 2019q2`. A bare token that
/// does not advance past the previous sub-period rolls into the next year
/// (`2019q4, q1` reads as `2019q4, 2020q1`).
pub fn attach_year_to_periods(grid: &Grid) -> Option<Grid> {
    let header = grid.rows.first()?;
    let mut year: Option<i32> = None;
    let mut last_number: Option<u8> = None;
    let mut rewritten = Vec::with_capacity(header.len());
    for cell in header {
        let trimmed = cell.trim();
        if is_year_token(trimmed) {
            year = trimmed.parse().ok();
            last_number = None;
            rewritten.push(cell.clone());
            continue;
        }
        if let Ok(period) = trimmed.parse::<TargetPeriod>() {
            year = Some(period.year());
            last_number = match period {
                TargetPeriod::Month { month, .. } => Some(month),
                TargetPeriod::Quarter { quarter, .. } => Some(quarter),
                TargetPeriod::Year { .. } => None,
            };
            rewritten.push(cell.clone());
            continue;
        }
        match (bare_period_parts(trimmed), year) {
            (Some((kind, number)), Some(current)) => {
                let qualified = if last_number.is_some_and(|prev| number <= prev) {
                    year = Some(current + 1);
                    current + 1
                } else {
                    current
                };
                last_number = Some(number);
                rewritten.push(format!("{qualified}{kind}{number}"));
            }
            _ => rewritten.push(cell.clone()),
        }
    }
    let mut rows = grid.rows.clone();
    rows[0] = rewritten;
    changed(grid, Grid::new(rows))
}

/// Name the two leading label columns `sector` and `sector_en`.
pub fn canonicalize_label_headers(grid: &Grid) -> Option<Grid> {
    let header = grid.rows.first()?;
    if header.len() < 3 {
        return None;
    }
    if is_period_like(&header[0]) || is_period_like(&header[1]) {
        return None;
    }
    if header[0] == "sector" && header[1] == "sector_en" {
        return None;
    }
    let mut rows = grid.rows.clone();
    rows[0][0] = "sector".to_string();
    rows[0][1] = "sector_en".to_string();
    changed(grid, Grid::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promote_header_row() {
        let grid = Grid::from_rows([
            vec!["pbi por sectores", "", ""],
            vec!["variacion porcentual", "", ""],
            vec!["sector", "sector_en", "2020m1", "2020m2"],
            vec!["pesca", "fishing", "3.5", "3.6"],
        ]);
        let out = promote_header_row(&grid).unwrap();
        assert_eq!(out.cell(0, 0), Some("sector"));
        assert!(promote_header_row(&out).is_none());
    }

    #[test]
    fn test_merge_two_row_header() {
        let grid = Grid::from_rows([
            vec!["", "", "2019", "", "2020"],
            vec!["sector", "sector_en", "q3", "q4", "q1"],
            vec!["pesca", "fishing", "3.1", "3.2", "1.1"],
        ]);
        let out = merge_two_row_header(&grid).unwrap();
        assert_eq!(
            out.rows[0],
            vec!["sector", "sector_en", "2019 q3", "q4", "2020 q1"]
        );
        let out = compact_year_period_headers(&out).unwrap();
        let out = attach_year_to_periods(&out).unwrap();
        assert_eq!(
            out.rows[0],
            vec!["sector", "sector_en", "2019q3", "2019q4", "2020q1"]
        );
    }

    #[test]
    fn test_roman_and_month_tokens() {
        let grid = Grid::from_rows([
            vec!["sector", "sector_en", "I", "II", "2019"],
            vec!["pesca", "fishing", "3.1", "3.2", "3.0"],
        ]);
        let out = roman_quarter_headers(&grid).unwrap();
        assert_eq!(out.rows[0][2], "q1");
        assert_eq!(out.rows[0][4], "2019");

        let grid = Grid::from_rows([
            vec!["sector", "sector_en", "Ene.", "Feb."],
            vec!["pesca", "fishing", "3.1", "3.2"],
        ]);
        let out = month_name_headers(&grid).unwrap();
        assert_eq!(out.rows[0][2], "m1");
        assert_eq!(out.rows[0][3], "m2");
    }

    #[test]
    fn test_split_joined_headers() {
        let grid = Grid::from_rows([
            vec!["sector", "sector_en", "q1-q2", "", "2019/2020", ""],
            vec!["pesca", "fishing", "3.1", "3.2", "3.0", "2.8"],
        ]);
        let out = split_hyphen_joined_headers(&grid).unwrap();
        let out = split_slash_joined_headers(&out).unwrap();
        assert_eq!(
            out.rows[0],
            vec!["sector", "sector_en", "q1", "q2", "2019", "2020"]
        );
    }

    #[test]
    fn test_attach_year_rolls_over_at_year_boundary() {
        let grid = Grid::from_rows([
            vec!["sector", "sector_en", "2019q4", "q1", "q2"],
            vec!["pesca", "fishing", "3.2", "1.1", "0.8"],
        ]);
        let out = attach_year_to_periods(&grid).unwrap();
        assert_eq!(out.rows[0][3], "2020q1");
        assert_eq!(out.rows[0][4], "2020q2");
    }

    #[test]
    fn test_canonicalize_label_headers() {
        let grid = Grid::from_rows([
            vec!["sectores", "", "2020m1"],
            vec!["pesca", "fishing", "3.5"],
        ]);
        let out = canonicalize_label_headers(&grid).unwrap();
        assert_eq!(out.rows[0][..2], ["sector", "sector_en"]);
        assert!(canonicalize_label_headers(&out).is_none());
    }
}
