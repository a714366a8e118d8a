//! From cleaned tables to per-bulletin vintage records.

use std::collections::BTreeMap;

use rtd_clean::CleanedTable;
use rtd_model::{BulletinId, Industry, TargetPeriod, Vintage};
use tracing::warn;

/// One industry's estimates as published in one bulletin.
#[derive(Debug, Clone, PartialEq)]
pub struct VintageObservation {
    pub industry: Industry,
    pub values: BTreeMap<TargetPeriod, f64>,
}

/// Everything one bulletin contributes to the dataset: its identity, its
/// chronological vintage, and one observation per industry it reports.
#[derive(Debug, Clone, PartialEq)]
pub struct VintageRecord {
    pub bulletin: BulletinId,
    pub vintage: Vintage,
    pub observations: Vec<VintageObservation>,
}

impl VintageRecord {
    /// The observation for one industry, if the bulletin reported it.
    pub fn observation(&self, industry: Industry) -> Option<&VintageObservation> {
        self.observations
            .iter()
            .find(|obs| obs.industry == industry)
    }
}

/// Data-quality counters accumulated while reshaping one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReshapeStats {
    /// Rows whose labels map to no canonical industry.
    pub dropped_rows: usize,
    /// Non-blank cells that failed numeric coercion.
    pub coercion_losses: usize,
}

/// Assign each bulletin its vintage by dense-ranking issue numbers within
/// each publication year. Raw issue numbers are not assumed contiguous, and
/// no fixed issues-per-year count is assumed either.
pub fn assign_vintages(bulletins: &[BulletinId]) -> BTreeMap<BulletinId, Vintage> {
    let mut by_year: BTreeMap<i32, Vec<u32>> = BTreeMap::new();
    for bulletin in bulletins {
        by_year.entry(bulletin.year).or_default().push(bulletin.issue);
    }
    for issues in by_year.values_mut() {
        issues.sort_unstable();
        issues.dedup();
    }
    bulletins
        .iter()
        .map(|bulletin| {
            let issues = &by_year[&bulletin.year];
            // Position is always found; the issue was inserted above.
            let rank = issues
                .iter()
                .position(|issue| *issue == bulletin.issue)
                .unwrap_or(0);
            let order = u16::try_from(rank + 1).unwrap_or(u16::MAX);
            (*bulletin, Vintage::new(bulletin.year, order))
        })
        .collect()
}

/// Reshape one cleaned table into a vintage record.
///
/// Rows whose labels fall outside the industry vocabulary are dropped and
/// counted; blank cells become missing values; non-blank cells that resist
/// numeric coercion are nulled and counted.
pub fn reshape(
    table: &CleanedTable,
    bulletin: BulletinId,
    vintage: Vintage,
) -> (VintageRecord, ReshapeStats) {
    let periods = table.periods();
    let mut stats = ReshapeStats::default();
    let mut observations = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let Some(industry) = table.industry_of(row) else {
            stats.dropped_rows += 1;
            warn!(
                bulletin = %bulletin,
                label = row.first().map(String::as_str).unwrap_or(""),
                "row label outside industry vocabulary, dropped"
            );
            continue;
        };
        let mut values = BTreeMap::new();
        for (col, period) in &periods {
            let cell = row.get(*col).map(String::as_str).unwrap_or("").trim();
            if cell.is_empty() {
                continue;
            }
            match cell.parse::<f64>() {
                Ok(value) => {
                    values.insert(*period, value);
                }
                Err(_) => stats.coercion_losses += 1,
            }
        }
        observations.push(VintageObservation { industry, values });
    }
    observations.sort_by_key(|obs| obs.industry);
    (
        VintageRecord {
            bulletin,
            vintage,
            observations,
        },
        stats,
    )
}
