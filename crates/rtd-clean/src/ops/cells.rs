//! Cell-level repairs: value harmonization and fused-cell surgery.
//!
//! "Data region" below means rows after the header row and columns after the
//! two leading label columns, which is where estimates live once the row and
//! column repairs have run.

use rtd_model::Grid;

use super::{changed, is_numeric_cell};
use crate::text;

const DATA_COL_START: usize = 2;

fn map_cells<F>(grid: &Grid, mut f: F) -> Grid
where
    F: FnMut(usize, usize, &str) -> String,
{
    let rows = grid
        .rows
        .iter()
        .enumerate()
        .map(|(row_idx, row)| {
            row.iter()
                .enumerate()
                .map(|(col_idx, cell)| f(row_idx, col_idx, cell))
                .collect()
        })
        .collect();
    Grid::new(rows)
}

fn map_data_cells<F>(grid: &Grid, mut f: F) -> Grid
where
    F: FnMut(&str) -> String,
{
    map_cells(grid, |row, col, cell| {
        if row >= 1 && col >= DATA_COL_START {
            f(cell)
        } else {
            cell.to_string()
        }
    })
}

/// Trim surrounding whitespace from every cell.
pub fn trim_cells(grid: &Grid) -> Option<Grid> {
    changed(grid, map_cells(grid, |_, _, cell| cell.trim().to_string()))
}

/// Collapse runs of inner whitespace to single spaces.
pub fn collapse_inner_whitespace(grid: &Grid) -> Option<Grid> {
    changed(
        grid,
        map_cells(grid, |_, _, cell| {
            cell.split_whitespace().collect::<Vec<_>>().join(" ")
        }),
    )
}

const SENTINELS: [&str; 9] = ["...", "..", "\u{2026}", "n.d.", "nd", "n/d", "s.i.", "-", "--"];

/// Blank out not-available sentinels so they become missing values.
pub fn blank_sentinel_cells(grid: &Grid) -> Option<Grid> {
    changed(
        grid,
        map_data_cells(grid, |cell| {
            let key = cell.trim().to_lowercase();
            if SENTINELS.contains(&key.as_str()) || key == "\u{2014}" {
                String::new()
            } else {
                cell.to_string()
            }
        }),
    )
}

/// Replace typographic minus variants with an ASCII minus when they prefix a
/// digit.
pub fn fix_minus_variants(grid: &Grid) -> Option<Grid> {
    changed(
        grid,
        map_data_cells(grid, |cell| {
            let trimmed = cell.trim();
            for variant in ['\u{2212}', '\u{2013}', '\u{2014}'] {
                if let Some(rest) = trimmed.strip_prefix(variant)
                    && rest.trim_start().starts_with(|ch: char| ch.is_ascii_digit())
                {
                    return format!("-{}", rest.trim_start());
                }
            }
            cell.to_string()
        }),
    )
}

/// Rewrite accountant-style parenthesized negatives: `(3,5)` becomes `-3,5`.
pub fn normalize_parenthesized_negatives(grid: &Grid) -> Option<Grid> {
    changed(
        grid,
        map_data_cells(grid, |cell| {
            let trimmed = cell.trim();
            if let Some(inner) = trimmed
                .strip_prefix('(')
                .and_then(|rest| rest.strip_suffix(')'))
                && is_numeric_cell(inner)
            {
                return format!("-{}", inner.trim());
            }
            cell.to_string()
        }),
    )
}

const FOOTNOTE_SUFFIXES: [&str; 5] = ["(p)", "(r)", "(e)", "*", "**"];

/// Strip revision/preliminary markers trailing a value: `3.5*`, `3.5 (p)`.
pub fn strip_cell_footnote_marks(grid: &Grid) -> Option<Grid> {
    changed(
        grid,
        map_data_cells(grid, |cell| {
            let mut out = cell.trim().to_string();
            loop {
                let lowered = out.to_lowercase();
                let Some(suffix) = FOOTNOTE_SUFFIXES
                    .iter()
                    .find(|suffix| lowered.ends_with(*suffix))
                else {
                    break;
                };
                out.truncate(out.len() - suffix.len());
                out = out.trim_end().to_string();
            }
            // Slash references like "3.5 /1".
            if let Some((head, tail)) = out.rsplit_once('/')
                && tail.chars().all(|ch| ch.is_ascii_digit())
                && !tail.is_empty()
                && is_numeric_cell(head.trim_end())
            {
                out = head.trim_end().to_string();
            }
            out
        }),
    )
}

/// Harmonize decimal separators across the data region.
pub fn harmonize_decimal_cells(grid: &Grid) -> Option<Grid> {
    changed(grid, map_data_cells(grid, text::normalize_decimal))
}

/// Split a value fused onto the end of a label cell (`fishing 3.5`) into the
/// adjacent blank data cell.
pub fn split_fused_label_value(grid: &Grid) -> Option<Grid> {
    let mut rows = grid.rows.clone();
    for row in rows.iter_mut().skip(1) {
        for col in [1usize, 0] {
            if col + 1 >= row.len() || !row[col + 1].trim().is_empty() {
                continue;
            }
            let cell = row[col].trim().to_string();
            let Some((head, tail)) = cell.rsplit_once(' ') else {
                continue;
            };
            if is_numeric_cell(tail) && !is_numeric_cell(head) {
                row[col + 1] = tail.to_string();
                row[col] = head.trim_end().to_string();
            }
        }
    }
    changed(grid, Grid::new(rows))
}

/// Split two estimates fused into one data cell (`3.5 4.2`) when the cell to
/// the right is blank.
pub fn split_fused_value_pair(grid: &Grid) -> Option<Grid> {
    let mut rows = grid.rows.clone();
    for row in rows.iter_mut().skip(1) {
        for col in DATA_COL_START..row.len() {
            if col + 1 >= row.len() || !row[col + 1].trim().is_empty() {
                continue;
            }
            let cell = row[col].trim().to_string();
            let parts: Vec<&str> = cell.split_whitespace().collect();
            if parts.len() == 2 && parts.iter().all(|part| is_numeric_cell(part)) {
                row[col + 1] = parts[1].to_string();
                row[col] = parts[0].to_string();
            }
        }
    }
    changed(grid, Grid::new(rows))
}

/// Re-join a decimal tail spilled into its own cell: `3` followed by `.5`
/// becomes `3.5` with the tail cell blanked.
pub fn merge_spilled_number(grid: &Grid) -> Option<Grid> {
    let mut rows = grid.rows.clone();
    for row in rows.iter_mut().skip(1) {
        for col in (DATA_COL_START + 1)..row.len() {
            let tail = row[col].trim();
            let is_tail = (tail.starts_with('.') || tail.starts_with(','))
                && tail.len() > 1
                && tail[1..].chars().all(|ch| ch.is_ascii_digit());
            let head = row[col - 1].trim();
            let is_head = !head.is_empty() && head.trim_start_matches('-').chars().all(|ch| ch.is_ascii_digit());
            if is_tail && is_head {
                row[col - 1] = format!("{head}{tail}");
                row[col] = String::new();
            }
        }
    }
    changed(grid, Grid::new(rows))
}

/// Fold a misaligned row where the source label spilled into the second
/// cell, pushing the whole row one column right.
pub fn merge_spilled_label_cells(grid: &Grid) -> Option<Grid> {
    let width = grid.rows.first()?.len();
    let mut rows = grid.rows.clone();
    for row in rows.iter_mut().skip(1) {
        if row.len() != width + 1 {
            continue;
        }
        let spilled = !row[1].trim().is_empty()
            && !is_numeric_cell(&row[1])
            && !row[0].trim().is_empty();
        if spilled {
            let tail = row.remove(1);
            row[0] = format!("{} {}", row[0].trim(), tail.trim());
        }
    }
    changed(grid, Grid::new(rows))
}

/// Normalize sector labels in the two leading columns for vocabulary lookup.
pub fn normalize_label_cells(grid: &Grid) -> Option<Grid> {
    changed(
        grid,
        map_cells(grid, |row, col, cell| {
            if row >= 1 && col < DATA_COL_START {
                text::normalize_label(cell)
            } else {
                cell.to_string()
            }
        }),
    )
}
