//! Row-level repairs: pruning junk rows and mending wrapped labels.

use rtd_model::Grid;

use super::{changed, is_header_row, is_period_like};
use crate::text;

/// Drop rows whose cells are all blank.
pub fn drop_blank_rows(grid: &Grid) -> Option<Grid> {
    let rows: Vec<Vec<String>> = grid
        .rows
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .cloned()
        .collect();
    changed(grid, Grid::new(rows))
}

/// Drop leading caption rows: rows above the header with a single non-blank
/// cell (table titles, "cuadro" captions).
pub fn drop_title_rows(grid: &Grid) -> Option<Grid> {
    let mut skip = 0;
    for row in &grid.rows {
        if is_header_row(row) {
            break;
        }
        let non_blank: Vec<&String> = row.iter().filter(|cell| !cell.trim().is_empty()).collect();
        // A lone year band above the period row is a header fragment, not a
        // title.
        if non_blank.len() == 1 && !is_period_like(non_blank[0]) {
            skip += 1;
        } else {
            break;
        }
    }
    if skip == 0 {
        return None;
    }
    Some(Grid::new(grid.rows[skip..].to_vec()))
}

const FOOTNOTE_PREFIXES: [&str; 6] = [
    "nota",
    "fuente",
    "elaboracion",
    "cifras",
    "incluye",
    "preliminar",
];

/// Drop trailing note/source rows below the data.
pub fn drop_footnote_rows(grid: &Grid) -> Option<Grid> {
    let keep = |row: &Vec<String>| {
        let first = row.first().map(String::as_str).unwrap_or("");
        let trimmed = first.trim_start();
        if trimmed.starts_with('*') || trimmed.starts_with('/') {
            return false;
        }
        let label = text::normalize_label(first);
        !FOOTNOTE_PREFIXES
            .iter()
            .any(|prefix| label.starts_with(prefix))
    };
    let mut rows = grid.rows.clone();
    // Header rows are never footnotes, whatever their first cell says.
    rows.retain(|row| is_header_row(row) || keep(row));
    changed(grid, Grid::new(rows))
}

/// Drop section-banner rows where every non-blank cell repeats the first
/// cell's text (a label printed across the full table width).
pub fn drop_repeated_group_rows(grid: &Grid) -> Option<Grid> {
    let rows: Vec<Vec<String>> = grid
        .rows
        .iter()
        .filter(|row| {
            let Some(first) = row.first() else {
                return true;
            };
            if first.trim().is_empty() {
                return true;
            }
            let repeats = row
                .iter()
                .skip(1)
                .filter(|cell| !cell.trim().is_empty())
                .all(|cell| cell.trim() == first.trim());
            let has_others = row.iter().skip(1).any(|cell| !cell.trim().is_empty());
            !(repeats && has_others)
        })
        .cloned()
        .collect();
    changed(grid, Grid::new(rows))
}

/// Drop horizontal-rule rows rendered as runs of dashes or underscores.
pub fn drop_horizontal_rule_rows(grid: &Grid) -> Option<Grid> {
    let is_rule = |cell: &str| {
        let trimmed = cell.trim();
        !trimmed.is_empty() && trimmed.chars().all(|ch| matches!(ch, '-' | '_' | '='))
    };
    let rows: Vec<Vec<String>> = grid
        .rows
        .iter()
        .filter(|row| {
            let ruled = row.iter().filter(|cell| is_rule(cell)).count();
            let non_blank = row.iter().filter(|cell| !cell.trim().is_empty()).count();
            !(non_blank > 0 && ruled == non_blank && ruled >= 2)
        })
        .cloned()
        .collect();
    changed(grid, Grid::new(rows))
}

/// Remove data-region rows identical to the header row (page-break repeats).
pub fn drop_duplicate_header_rows(grid: &Grid) -> Option<Grid> {
    let header = grid.rows.first()?.clone();
    let mut rows = vec![header.clone()];
    rows.extend(grid.rows.iter().skip(1).filter(|row| **row != header).cloned());
    changed(grid, Grid::new(rows))
}

/// Mend a sector label wrapped onto its own line: a row carrying only a
/// label fragment is folded into the first cell of the following row.
pub fn merge_wrapped_label_rows(grid: &Grid) -> Option<Grid> {
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(grid.rows.len());
    let mut pending: Option<String> = None;
    for (idx, row) in grid.rows.iter().enumerate() {
        if idx == 0 || is_header_row(row) {
            rows.push(row.clone());
            continue;
        }
        let first = row.first().map(String::as_str).unwrap_or("").trim();
        let only_label = !first.is_empty()
            && row.iter().skip(1).all(|cell| cell.trim().is_empty())
            && idx + 1 < grid.rows.len();
        if only_label {
            pending = Some(match pending.take() {
                Some(prefix) => format!("{prefix} {first}"),
                None => first.to_string(),
            });
            continue;
        }
        let mut row = row.clone();
        if let Some(prefix) = pending.take() {
            let rest = row.first().map(String::as_str).unwrap_or("").trim();
            let label = if rest.is_empty() {
                prefix
            } else {
                format!("{prefix} {rest}")
            };
            if row.is_empty() {
                row.push(label);
            } else {
                row[0] = label;
            }
        }
        rows.push(row);
    }
    if pending.is_some() {
        // Fragment at the very end of the grid: nothing to merge into.
        return None;
    }
    changed(grid, Grid::new(rows))
}

/// Pad ragged rows with blank cells to the widest row's width.
pub fn pad_ragged_rows(grid: &Grid) -> Option<Grid> {
    let width = grid.n_cols();
    let rows: Vec<Vec<String>> = grid
        .rows
        .iter()
        .map(|row| {
            let mut row = row.clone();
            row.resize(width, String::new());
            row
        })
        .collect();
    changed(grid, Grid::new(rows))
}
