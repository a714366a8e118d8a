//! The structurally uniform table every cleaning pipeline terminates in.

use rtd_model::{Grid, Industry, TargetPeriod};

use crate::error::CleanError;
use crate::text;

/// Canonical name of the source-language label column.
pub const SECTOR: &str = "sector";
/// Canonical name of the target-language label column.
pub const SECTOR_EN: &str = "sector_en";

/// A repaired table satisfying the cleaning contract:
///
/// - exactly two leading label columns, `sector` and `sector_en`;
/// - every remaining column named by a canonical target-period label;
/// - every non-blank data cell numeric;
/// - no fully blank row or column;
/// - at least one row whose label maps to a canonical industry, and no two
///   rows mapping to the same industry.
///
/// Rows whose labels fall outside the vocabulary may remain; the reshaper
/// drops and counts them.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CleanedTable {
    /// Validate a repaired grid against the contract.
    pub fn from_grid(grid: &Grid) -> Result<CleanedTable, CleanError> {
        let mut rows = grid.rows.iter();
        let headers = rows
            .next()
            .ok_or_else(|| CleanError::Structure("empty grid".to_string()))?
            .clone();
        if headers.len() < 3 {
            return Err(CleanError::Structure(format!(
                "expected two label columns and at least one period column, got {} columns",
                headers.len()
            )));
        }
        if headers[0] != SECTOR || headers[1] != SECTOR_EN {
            return Err(CleanError::Contract(format!(
                "label columns not canonical: {:?}, {:?}",
                headers[0], headers[1]
            )));
        }
        for header in &headers[2..] {
            header.parse::<TargetPeriod>().map_err(|_| {
                CleanError::Contract(format!("non-period column header: {header:?}"))
            })?;
        }

        let data: Vec<Vec<String>> = rows.cloned().collect();
        if data.is_empty() {
            return Err(CleanError::Structure("no data rows".to_string()));
        }
        for (idx, row) in data.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(CleanError::Structure(format!(
                    "row {} has {} cells, header has {}",
                    idx + 1,
                    row.len(),
                    headers.len()
                )));
            }
            if row.iter().all(|cell| cell.trim().is_empty()) {
                return Err(CleanError::Contract(format!("blank row at {}", idx + 1)));
            }
            for (header, cell) in headers.iter().zip(row).skip(2) {
                let trimmed = cell.trim();
                if !trimmed.is_empty() && trimmed.parse::<f64>().is_err() {
                    return Err(CleanError::Contract(format!(
                        "non-numeric cell {trimmed:?} under {header:?}"
                    )));
                }
            }
        }
        for col in 0..headers.len() {
            let blank = headers[col].trim().is_empty()
                && data
                    .iter()
                    .all(|row| row[col].trim().is_empty());
            if blank {
                return Err(CleanError::Contract(format!("blank column at {col}")));
            }
        }

        let table = CleanedTable {
            headers,
            rows: data,
        };
        let mut seen = Vec::new();
        for row in &table.rows {
            if let Some(industry) = table.industry_of(row) {
                if seen.contains(&industry) {
                    return Err(CleanError::Contract(format!(
                        "duplicate industry row: {industry}"
                    )));
                }
                seen.push(industry);
            }
        }
        if seen.is_empty() {
            return Err(CleanError::Contract(
                "no row maps to a canonical industry".to_string(),
            ));
        }
        Ok(table)
    }

    /// Map a row to its canonical industry, preferring the target-language
    /// label and falling back to the source-language one. `None` marks a
    /// data-quality row the reshaper will drop.
    pub fn industry_of(&self, row: &[String]) -> Option<Industry> {
        for cell in row.iter().take(2).rev() {
            let label = text::normalize_label(cell);
            if let Some(industry) = Industry::from_label(&label) {
                return Some(industry);
            }
        }
        None
    }

    /// Period columns as (column index, parsed period).
    pub fn periods(&self) -> Vec<(usize, TargetPeriod)> {
        self.headers
            .iter()
            .enumerate()
            .skip(2)
            .filter_map(|(idx, header)| {
                header.parse::<TargetPeriod>().ok().map(|period| (idx, period))
            })
            .collect()
    }

    /// Back to a grid, e.g. to feed the dispatcher its own output.
    pub fn to_grid(&self) -> Grid {
        let mut rows = vec![self.headers.clone()];
        rows.extend(self.rows.iter().cloned());
        Grid::new(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical_grid() -> Grid {
        Grid::from_rows([
            vec!["sector", "sector_en", "2020m1", "2020m2"],
            vec!["pesca", "fishing", "3.5", ""],
            vec!["mineria", "mining", "-2.0", "1.0"],
        ])
    }

    #[test]
    fn test_accepts_canonical_table() {
        let table = CleanedTable::from_grid(&canonical_grid()).unwrap();
        assert_eq!(table.periods().len(), 2);
        assert_eq!(table.to_grid(), canonical_grid());
    }

    #[test]
    fn test_rejects_bad_label_headers() {
        let grid = Grid::from_rows([
            vec!["sectores", "sector_en", "2020m1"],
            vec!["pesca", "fishing", "3.5"],
        ]);
        assert!(matches!(
            CleanedTable::from_grid(&grid),
            Err(CleanError::Contract(_))
        ));
    }

    #[test]
    fn test_rejects_non_period_header() {
        let grid = Grid::from_rows([
            vec!["sector", "sector_en", "enero"],
            vec!["pesca", "fishing", "3.5"],
        ]);
        assert!(CleanedTable::from_grid(&grid).is_err());
    }

    #[test]
    fn test_rejects_non_numeric_cell() {
        let grid = Grid::from_rows([
            vec!["sector", "sector_en", "2020m1"],
            vec!["pesca", "fishing", "n.d."],
        ]);
        assert!(CleanedTable::from_grid(&grid).is_err());
    }

    #[test]
    fn test_rejects_duplicate_industry_rows() {
        let grid = Grid::from_rows([
            vec!["sector", "sector_en", "2020m1"],
            vec!["pesca", "fishing", "3.5"],
            vec!["pesca", "fishing", "3.6"],
        ]);
        assert!(CleanedTable::from_grid(&grid).is_err());
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let grid = Grid::from_rows([
            vec!["sector", "sector_en", "2020m1"],
            vec!["pesca", "fishing"],
        ]);
        assert!(matches!(
            CleanedTable::from_grid(&grid),
            Err(CleanError::Structure(_))
        ));
    }

    #[test]
    fn test_keeps_unmapped_rows_for_reshaper() {
        let grid = Grid::from_rows([
            vec!["sector", "sector_en", "2020m1"],
            vec!["pesca", "fishing", "3.5"],
            vec!["otros", "unclassified", "1.0"],
        ]);
        let table = CleanedTable::from_grid(&grid).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.industry_of(&table.rows[1]), None);
    }
}
