//! Column-level repairs: pruning junk columns and fixing misaligned values.

use rtd_model::Grid;

use super::{changed, is_numeric_cell, is_period_like};

fn remove_columns(grid: &Grid, doomed: &[usize]) -> Grid {
    let rows = grid
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter(|(idx, _)| !doomed.contains(idx))
                .map(|(_, cell)| cell.clone())
                .collect()
        })
        .collect();
    Grid::new(rows)
}

/// Drop columns that are blank in every row.
pub fn drop_blank_columns(grid: &Grid) -> Option<Grid> {
    let doomed: Vec<usize> = (0..grid.n_cols())
        .filter(|col| grid.col_is_blank(*col))
        .collect();
    if doomed.is_empty() {
        return None;
    }
    changed(grid, remove_columns(grid, &doomed))
}

/// Drop headerless columns with at most one non-blank cell, the stray OCR
/// specks that land outside the real table area.
pub fn drop_rare_columns(grid: &Grid) -> Option<Grid> {
    if grid.n_rows() < 3 {
        return None;
    }
    let header = &grid.rows[0];
    let doomed: Vec<usize> = (0..grid.n_cols())
        .filter(|col| {
            let headerless = header.get(*col).is_none_or(|cell| cell.trim().is_empty());
            let populated = grid
                .rows
                .iter()
                .skip(1)
                .filter(|row| row.get(*col).is_some_and(|cell| !cell.trim().is_empty()))
                .count();
            headerless && populated <= 1 && populated > 0
        })
        .collect();
    if doomed.is_empty() {
        return None;
    }
    changed(grid, remove_columns(grid, &doomed))
}

/// Drop a leading row-number column (pure digit sequence under a blank or
/// "n"-style header).
pub fn drop_index_column(grid: &Grid) -> Option<Grid> {
    if grid.n_rows() < 2 {
        return None;
    }
    let header = grid.cell(0, 0).unwrap_or("").trim().to_lowercase();
    if !(header.is_empty() || header == "n" || header == "no" || header == "nro") {
        return None;
    }
    let all_indices = grid.rows.iter().skip(1).all(|row| {
        row.first()
            .is_some_and(|cell| !cell.trim().is_empty() && cell.trim().chars().all(|ch| ch.is_ascii_digit()))
    });
    if !all_indices {
        return None;
    }
    changed(grid, remove_columns(grid, &[0]))
}

const UNIT_TOKENS: [&str; 4] = ["%", "var%", "var. %", "var %"];

/// Drop a trailing units column ("%", "var. %").
pub fn drop_trailing_unit_column(grid: &Grid) -> Option<Grid> {
    let width = grid.n_cols();
    if width < 3 {
        return None;
    }
    let last = width - 1;
    let mut non_blank = 0;
    for row in grid.rows.iter().skip(1) {
        let Some(cell) = row.get(last) else { continue };
        let trimmed = cell.trim().to_lowercase();
        if trimmed.is_empty() {
            continue;
        }
        if !UNIT_TOKENS.contains(&trimmed.as_str()) {
            return None;
        }
        non_blank += 1;
    }
    if non_blank == 0 {
        return None;
    }
    changed(grid, remove_columns(grid, &[last]))
}

/// Insert a blank target-language label column when the layout only carried
/// the source-language one, so the cleaned table keeps its two-label shape.
/// Industry mapping later falls back to the source label for these rows.
pub fn insert_missing_label_column(grid: &Grid) -> Option<Grid> {
    let first = grid.cell(0, 0)?;
    let second = grid.cell(0, 1)?;
    if is_period_like(first) || !is_period_like(second) {
        return None;
    }
    let rows = grid
        .rows
        .iter()
        .map(|row| {
            let mut row = row.clone();
            let insert_at = 1.min(row.len());
            row.insert(insert_at, String::new());
            row
        })
        .collect();
    changed(grid, Grid::new(rows))
}

/// Repair the off-by-one drifted trailing value: a data row one cell wider
/// than the header, with its final value pushed right past a blank slot.
pub fn shift_drifted_trailing_values(grid: &Grid) -> Option<Grid> {
    let width = grid.rows.first()?.len();
    if width < 3 {
        return None;
    }
    let rows: Vec<Vec<String>> = grid
        .rows
        .iter()
        .map(|row| {
            if row.len() != width + 1 {
                return row.clone();
            }
            let mut row = row.clone();
            if row[width].trim().is_empty() {
                row.truncate(width);
            } else if row[width - 1].trim().is_empty() && is_numeric_cell(&row[width]) {
                row.remove(width - 1);
            }
            row
        })
        .collect();
    changed(grid, Grid::new(rows))
}
