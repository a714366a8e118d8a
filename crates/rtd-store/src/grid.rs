//! Reading extracted bulletin tables into raw grids.
//!
//! Extractor output is CSV with no reliable header row and frequently ragged
//! records, so the reader is headerless and flexible; all structural
//! interpretation is left to the cleaning pipelines.

use std::path::Path;

use csv::ReaderBuilder;
use rtd_model::Grid;

use crate::error::{Result, StoreError};

fn normalize_cell(raw: &str) -> String {
    raw.trim_matches('\u{feff}').trim().to_string()
}

/// Read one extracted table as a raw grid, cell text untouched apart from
/// BOM stripping and outer whitespace.
pub fn read_grid(path: &Path) -> Result<Grid> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| StoreError::csv(path, source))?;
    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| StoreError::csv(path, source))?;
        rows.push(record.iter().map(normalize_cell).collect());
    }
    Ok(Grid::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_grid_strips_bom_and_keeps_ragged_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("b103_2020.csv");
        std::fs::write(&path, "\u{feff}sector,sector_en,2020m1\npesca,fishing\n").unwrap();
        let grid = read_grid(&path).unwrap();
        assert_eq!(grid.cell(0, 0), Some("sector"));
        assert_eq!(grid.rows[1].len(), 2);
    }

    #[test]
    fn test_read_grid_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(read_grid(&dir.path().join("nope.csv")).is_err());
    }
}
