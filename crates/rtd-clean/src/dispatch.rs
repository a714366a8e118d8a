//! Per-(table type, era) pipeline selection.
//!
//! Each of the four (frequency, era) quadruples has exactly two hand-curated
//! pipelines: a short one for grids that arrive near the canonical shape and
//! a long full-reconstruction one for grids that need the whole catalogue.
//! A small structural classifier picks the branch; there is no other control
//! flow inside a pipeline.

use rtd_model::{Era, Frequency, Grid, TargetPeriod};
use tracing::debug;

use crate::cleaned::CleanedTable;
use crate::error::CleanError;
use crate::ops::{cells, columns, headers, rows};
use crate::step::{Step, run_steps};

/// Which pipeline a grid was routed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    /// The grid already matches the target layout up to value polish.
    NearCanonical,
    /// The grid needs full structural reconstruction.
    FullRebuild,
}

/// Result of cleaning one raw table.
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub table: CleanedTable,
    pub branch: Branch,
    /// Names of the repair operations that actually fired, in order.
    pub applied: Vec<&'static str>,
}

macro_rules! steps {
    ($($module:ident :: $op:ident),+ $(,)?) => {
        &[$(Step::new(stringify!($op), $module::$op)),+]
    };
}

const MONTHLY_OLDER_NEAR: &[Step] = steps![
    cells::trim_cells,
    rows::drop_blank_rows,
    headers::strip_header_footnote_marks,
    headers::lowercase_headers,
    headers::attach_year_to_periods,
    cells::blank_sentinel_cells,
    cells::strip_cell_footnote_marks,
    cells::harmonize_decimal_cells,
    cells::normalize_label_cells,
    headers::canonicalize_label_headers,
    rows::pad_ragged_rows,
];

const MONTHLY_OLDER_REBUILD: &[Step] = steps![
    cells::trim_cells,
    rows::drop_horizontal_rule_rows,
    rows::drop_blank_rows,
    rows::drop_title_rows,
    headers::merge_two_row_header,
    headers::promote_header_row,
    rows::drop_duplicate_header_rows,
    headers::strip_header_footnote_marks,
    headers::lowercase_headers,
    headers::month_name_headers,
    headers::roman_month_headers,
    headers::split_slash_joined_headers,
    headers::compact_year_period_headers,
    headers::attach_year_to_periods,
    rows::merge_wrapped_label_rows,
    cells::merge_spilled_label_cells,
    rows::pad_ragged_rows,
    columns::drop_index_column,
    columns::drop_trailing_unit_column,
    columns::drop_blank_columns,
    columns::drop_rare_columns,
    columns::insert_missing_label_column,
    cells::split_fused_label_value,
    cells::split_fused_value_pair,
    cells::merge_spilled_number,
    cells::blank_sentinel_cells,
    cells::fix_minus_variants,
    cells::normalize_parenthesized_negatives,
    cells::strip_cell_footnote_marks,
    cells::harmonize_decimal_cells,
    rows::drop_footnote_rows,
    rows::drop_repeated_group_rows,
    cells::collapse_inner_whitespace,
    cells::normalize_label_cells,
    headers::canonicalize_label_headers,
    rows::drop_blank_rows,
    columns::drop_blank_columns,
    rows::pad_ragged_rows,
];

const MONTHLY_NEWER_NEAR: &[Step] = steps![
    cells::trim_cells,
    rows::drop_blank_rows,
    headers::strip_header_footnote_marks,
    headers::lowercase_headers,
    headers::month_name_headers,
    headers::attach_year_to_periods,
    cells::blank_sentinel_cells,
    cells::harmonize_decimal_cells,
    cells::normalize_label_cells,
    headers::canonicalize_label_headers,
    rows::pad_ragged_rows,
];

const MONTHLY_NEWER_REBUILD: &[Step] = steps![
    cells::trim_cells,
    rows::drop_horizontal_rule_rows,
    rows::drop_blank_rows,
    rows::drop_title_rows,
    headers::merge_two_row_header,
    headers::promote_header_row,
    rows::drop_duplicate_header_rows,
    headers::strip_header_footnote_marks,
    headers::lowercase_headers,
    headers::month_name_headers,
    headers::split_hyphen_joined_headers,
    headers::compact_year_period_headers,
    headers::attach_year_to_periods,
    rows::merge_wrapped_label_rows,
    cells::merge_spilled_label_cells,
    columns::shift_drifted_trailing_values,
    rows::pad_ragged_rows,
    columns::drop_trailing_unit_column,
    columns::drop_blank_columns,
    columns::drop_rare_columns,
    columns::insert_missing_label_column,
    cells::split_fused_label_value,
    cells::split_fused_value_pair,
    cells::blank_sentinel_cells,
    cells::fix_minus_variants,
    cells::strip_cell_footnote_marks,
    cells::harmonize_decimal_cells,
    rows::drop_footnote_rows,
    cells::collapse_inner_whitespace,
    cells::normalize_label_cells,
    headers::canonicalize_label_headers,
    rows::drop_blank_rows,
    columns::drop_blank_columns,
    rows::pad_ragged_rows,
];

const QUARTERLY_OLDER_NEAR: &[Step] = steps![
    cells::trim_cells,
    rows::drop_blank_rows,
    headers::strip_header_footnote_marks,
    headers::lowercase_headers,
    headers::compact_year_period_headers,
    headers::attach_year_to_periods,
    cells::blank_sentinel_cells,
    cells::strip_cell_footnote_marks,
    cells::harmonize_decimal_cells,
    cells::normalize_label_cells,
    headers::canonicalize_label_headers,
    rows::pad_ragged_rows,
];

const QUARTERLY_OLDER_REBUILD: &[Step] = steps![
    cells::trim_cells,
    rows::drop_horizontal_rule_rows,
    rows::drop_blank_rows,
    rows::drop_title_rows,
    headers::merge_two_row_header,
    headers::promote_header_row,
    rows::drop_duplicate_header_rows,
    headers::strip_header_footnote_marks,
    headers::lowercase_headers,
    headers::roman_quarter_headers,
    headers::split_hyphen_joined_headers,
    headers::split_slash_joined_headers,
    headers::compact_year_period_headers,
    headers::attach_year_to_periods,
    rows::merge_wrapped_label_rows,
    cells::merge_spilled_label_cells,
    rows::pad_ragged_rows,
    columns::drop_index_column,
    columns::drop_trailing_unit_column,
    columns::drop_blank_columns,
    columns::drop_rare_columns,
    columns::insert_missing_label_column,
    cells::split_fused_label_value,
    cells::split_fused_value_pair,
    cells::merge_spilled_number,
    cells::blank_sentinel_cells,
    cells::fix_minus_variants,
    cells::normalize_parenthesized_negatives,
    cells::strip_cell_footnote_marks,
    cells::harmonize_decimal_cells,
    rows::drop_footnote_rows,
    rows::drop_repeated_group_rows,
    cells::collapse_inner_whitespace,
    cells::normalize_label_cells,
    headers::canonicalize_label_headers,
    rows::drop_blank_rows,
    columns::drop_blank_columns,
    rows::pad_ragged_rows,
];

const QUARTERLY_NEWER_NEAR: &[Step] = steps![
    cells::trim_cells,
    rows::drop_blank_rows,
    headers::strip_header_footnote_marks,
    headers::lowercase_headers,
    headers::compact_year_period_headers,
    headers::attach_year_to_periods,
    cells::blank_sentinel_cells,
    cells::harmonize_decimal_cells,
    cells::normalize_label_cells,
    headers::canonicalize_label_headers,
    rows::pad_ragged_rows,
];

const QUARTERLY_NEWER_REBUILD: &[Step] = steps![
    cells::trim_cells,
    rows::drop_horizontal_rule_rows,
    rows::drop_blank_rows,
    rows::drop_title_rows,
    headers::merge_two_row_header,
    headers::promote_header_row,
    rows::drop_duplicate_header_rows,
    headers::strip_header_footnote_marks,
    headers::lowercase_headers,
    headers::roman_quarter_headers,
    headers::split_hyphen_joined_headers,
    headers::split_slash_joined_headers,
    headers::compact_year_period_headers,
    headers::attach_year_to_periods,
    rows::merge_wrapped_label_rows,
    cells::merge_spilled_label_cells,
    columns::shift_drifted_trailing_values,
    rows::pad_ragged_rows,
    columns::drop_trailing_unit_column,
    columns::drop_blank_columns,
    columns::drop_rare_columns,
    columns::insert_missing_label_column,
    cells::split_fused_label_value,
    cells::split_fused_value_pair,
    cells::blank_sentinel_cells,
    cells::fix_minus_variants,
    cells::strip_cell_footnote_marks,
    cells::harmonize_decimal_cells,
    rows::drop_footnote_rows,
    cells::collapse_inner_whitespace,
    cells::normalize_label_cells,
    headers::canonicalize_label_headers,
    rows::drop_blank_rows,
    columns::drop_blank_columns,
    rows::pad_ragged_rows,
];

/// A period-qualifying year already present in the first row.
fn year_in_first_row(grid: &Grid) -> bool {
    grid.rows.first().is_some_and(|row| {
        row.iter().any(|cell| {
            let trimmed = cell.trim();
            trimmed.parse::<TargetPeriod>().is_ok()
                || (trimmed.len() == 4 && trimmed.chars().all(|ch| ch.is_ascii_digit()))
        })
    })
}

fn has_sentinel_cells(grid: &Grid) -> bool {
    grid.rows.iter().flatten().any(|cell| {
        let trimmed = cell.trim();
        trimmed == "..." || trimmed == "\u{2026}" || trimmed.eq_ignore_ascii_case("n.d.")
    })
}

fn has_roman_header_tokens(grid: &Grid) -> bool {
    grid.rows.iter().take(2).flatten().any(|cell| {
        crate::text::roman_to_arabic(cell.trim()).is_some_and(|value| value <= 12)
    })
}

fn has_caption_cell(grid: &Grid) -> bool {
    grid.cell(0, 0)
        .is_some_and(|cell| cell.trim().to_lowercase().starts_with("cuadro"))
}

fn has_hyphen_joined_headers(grid: &Grid) -> bool {
    grid.rows
        .first()
        .is_some_and(|row| row.iter().any(|cell| cell.trim().contains('-')))
}

fn is_ragged(grid: &Grid) -> bool {
    let width = grid.rows.first().map(Vec::len).unwrap_or(0);
    grid.rows.iter().any(|row| row.len() != width)
}

/// Structural branch classifier for one (frequency, era) quadruple.
fn classify(grid: &Grid, frequency: Frequency, era: Era) -> Branch {
    let near = match (frequency, era) {
        (Frequency::Monthly, Era::Older) => year_in_first_row(grid) && !has_sentinel_cells(grid),
        (Frequency::Monthly, Era::Newer) => year_in_first_row(grid) && !is_ragged(grid),
        (Frequency::Quarterly, Era::Older) => {
            year_in_first_row(grid) && !has_roman_header_tokens(grid) && !has_caption_cell(grid)
        }
        (Frequency::Quarterly, Era::Newer) => {
            year_in_first_row(grid) && !has_hyphen_joined_headers(grid)
        }
    };
    if near {
        Branch::NearCanonical
    } else {
        Branch::FullRebuild
    }
}

fn pipeline(frequency: Frequency, era: Era, branch: Branch) -> &'static [Step] {
    match (frequency, era, branch) {
        (Frequency::Monthly, Era::Older, Branch::NearCanonical) => MONTHLY_OLDER_NEAR,
        (Frequency::Monthly, Era::Older, Branch::FullRebuild) => MONTHLY_OLDER_REBUILD,
        (Frequency::Monthly, Era::Newer, Branch::NearCanonical) => MONTHLY_NEWER_NEAR,
        (Frequency::Monthly, Era::Newer, Branch::FullRebuild) => MONTHLY_NEWER_REBUILD,
        (Frequency::Quarterly, Era::Older, Branch::NearCanonical) => QUARTERLY_OLDER_NEAR,
        (Frequency::Quarterly, Era::Older, Branch::FullRebuild) => QUARTERLY_OLDER_REBUILD,
        (Frequency::Quarterly, Era::Newer, Branch::NearCanonical) => QUARTERLY_NEWER_NEAR,
        (Frequency::Quarterly, Era::Newer, Branch::FullRebuild) => QUARTERLY_NEWER_REBUILD,
    }
}

/// Clean one raw grid into the canonical table shape.
///
/// Structural violations surface as errors; the caller skips the bulletin,
/// keeps it out of the ledger, and continues the batch.
pub fn clean(grid: &Grid, frequency: Frequency, era: Era) -> Result<CleanOutcome, CleanError> {
    if grid.is_empty() {
        return Err(CleanError::Structure("empty grid".to_string()));
    }
    let branch = classify(grid, frequency, era);
    let steps = pipeline(frequency, era, branch);
    let (repaired, applied) = run_steps(grid, steps);
    if repaired.n_rows() < 2 || repaired.n_cols() < 3 {
        return Err(CleanError::Structure(format!(
            "pipeline left {} rows x {} columns",
            repaired.n_rows(),
            repaired.n_cols()
        )));
    }
    let table = CleanedTable::from_grid(&repaired)?;
    debug!(
        frequency = %frequency,
        era = %era,
        branch = ?branch,
        applied = applied.len(),
        "table cleaned"
    );
    Ok(CleanOutcome {
        table,
        branch,
        applied,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical_monthly() -> Grid {
        Grid::from_rows([
            vec!["sector", "sector_en", "2020m1", "2020m2"],
            vec!["pbi", "gdp", "2.2", "2.4"],
            vec!["pesca", "fishing", "3.5", "3.6"],
        ])
    }

    #[test]
    fn test_near_canonical_is_identity() {
        let grid = canonical_monthly();
        for era in Era::ALL {
            let outcome = clean(&grid, Frequency::Monthly, era).unwrap();
            assert_eq!(outcome.branch, Branch::NearCanonical);
            assert!(outcome.applied.is_empty(), "applied: {:?}", outcome.applied);
            assert_eq!(outcome.table.to_grid(), grid);
        }
    }

    #[test]
    fn test_dispatcher_idempotence() {
        // A messy older-era quarterly grid, cleaned twice.
        let raw = Grid::from_rows([
            vec!["Cuadro 12: PBI por sectores", "", "", "", ""],
            vec!["", "", "2019", "", ""],
            vec!["Sector", "", "III", "IV", ""],
            vec!["Pesca /1", "Fishing", "3,1", "3,2", ""],
            vec!["Minería", "Mining", "(2,0)", "1,0", ""],
            vec!["Fuente: boletin", "", "", "", ""],
        ]);
        let first = clean(&raw, Frequency::Quarterly, Era::Older).unwrap();
        assert_eq!(first.branch, Branch::FullRebuild);
        let second = clean(&first.table.to_grid(), Frequency::Quarterly, Era::Older).unwrap();
        assert_eq!(second.branch, Branch::NearCanonical);
        assert!(second.applied.is_empty());
        assert_eq!(second.table, first.table);
    }

    #[test]
    fn test_rebuild_quarterly_older() {
        let raw = Grid::from_rows([
            vec!["Cuadro 12: PBI por sectores", "", "", "", ""],
            vec!["", "", "2019", "", ""],
            vec!["Sector", "", "III", "IV", ""],
            vec!["Pesca /1", "Fishing", "3,1", "3,2", ""],
            vec!["Minería", "Mining", "(2,0)", "1,0", ""],
            vec!["Fuente: boletin", "", "", "", ""],
        ]);
        let outcome = clean(&raw, Frequency::Quarterly, Era::Older).unwrap();
        let table = outcome.table;
        assert_eq!(table.headers, vec!["sector", "sector_en", "2019q3", "2019q4"]);
        assert_eq!(table.rows[0], vec!["pesca", "fishing", "3.1", "3.2"]);
        assert_eq!(table.rows[1], vec!["mineria", "mining", "-2.0", "1.0"]);
    }

    #[test]
    fn test_structural_failure_propagates() {
        // No header-like row and no data: the pipeline cannot reach the
        // contract and the bulletin is rejected.
        let raw = Grid::from_rows([vec!["solo texto", "", ""], vec!["sin datos", "", ""]]);
        assert!(clean(&raw, Frequency::Monthly, Era::Newer).is_err());
    }

    #[test]
    fn test_unknown_sectors_survive_cleaning() {
        let grid = Grid::from_rows([
            vec!["sector", "sector_en", "2020m1"],
            vec!["pesca", "fishing", "3.5"],
            vec!["otros", "unclassified", "9.9"],
        ]);
        let outcome = clean(&grid, Frequency::Monthly, Era::Newer).unwrap();
        assert_eq!(outcome.table.rows.len(), 2);
    }
}
