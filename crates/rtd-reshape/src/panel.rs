//! The chronological vintage panel.
//!
//! One row per (industry, vintage); one `tp_` column per target period ever
//! observed, in chronological order. Periods a vintage did not report are
//! null, so every vintage aligns on the same column grid.

use std::collections::BTreeSet;

use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use rtd_model::TargetPeriod;

use crate::error::Result;
use crate::vintage::VintageRecord;

/// Panel column holding the industry code.
pub const INDUSTRY: &str = "industry";
/// Panel column holding the vintage label (`2020m1`).
pub const VINTAGE: &str = "vintage";
/// Panel column holding the source bulletin identifier.
pub const BULLETIN: &str = "bulletin";

/// Target periods observed anywhere in the records, in chronological order.
pub fn observed_periods(records: &[VintageRecord]) -> Vec<TargetPeriod> {
    let periods: BTreeSet<TargetPeriod> = records
        .iter()
        .flat_map(|record| &record.observations)
        .flat_map(|obs| obs.values.keys().copied())
        .collect();
    periods.into_iter().collect()
}

/// Build the vintage panel from the full set of records.
///
/// The panel is always re-derived from scratch; rows sort by industry, then
/// vintage, then bulletin, so output is deterministic for a given input set.
pub fn build_panel(records: &[VintageRecord]) -> Result<DataFrame> {
    let periods = observed_periods(records);

    let mut rows: Vec<(&VintageRecord, usize)> = records
        .iter()
        .flat_map(|record| (0..record.observations.len()).map(move |idx| (record, idx)))
        .collect();
    rows.sort_by_key(|(record, idx)| {
        (
            record.observations[*idx].industry,
            record.vintage,
            record.bulletin,
        )
    });

    let industries: Vec<&str> = rows
        .iter()
        .map(|(record, idx)| record.observations[*idx].industry.as_str())
        .collect();
    let vintages: Vec<String> = rows
        .iter()
        .map(|(record, _)| record.vintage.to_string())
        .collect();
    let bulletins: Vec<String> = rows
        .iter()
        .map(|(record, _)| record.bulletin.to_string())
        .collect();

    let mut columns: Vec<Column> = Vec::with_capacity(3 + periods.len());
    columns.push(Series::new(INDUSTRY.into(), industries).into());
    columns.push(Series::new(VINTAGE.into(), vintages).into());
    columns.push(Series::new(BULLETIN.into(), bulletins).into());
    for period in &periods {
        let values: Vec<Option<f64>> = rows
            .iter()
            .map(|(record, idx)| record.observations[*idx].values.get(period).copied())
            .collect();
        columns.push(Series::new(period.column_name().as_str().into(), values).into());
    }
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vintage::VintageObservation;
    use rtd_model::{BulletinId, Industry, Vintage};
    use std::collections::BTreeMap;

    fn record(
        issue: u32,
        order: u16,
        observations: Vec<(Industry, Vec<(&str, f64)>)>,
    ) -> VintageRecord {
        VintageRecord {
            bulletin: BulletinId::new(issue, 2020),
            vintage: Vintage::new(2020, order),
            observations: observations
                .into_iter()
                .map(|(industry, values)| VintageObservation {
                    industry,
                    values: values
                        .into_iter()
                        .map(|(label, value)| {
                            (label.parse::<TargetPeriod>().unwrap(), value)
                        })
                        .collect::<BTreeMap<_, _>>(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_panel_aligns_vintages_on_period_union() {
        let records = [
            record(103, 1, vec![(Industry::Fishing, vec![("2019q4", 3.2)])]),
            record(
                104,
                2,
                vec![(Industry::Fishing, vec![("2019q4", 3.5), ("2020q1", 1.1)])],
            ),
        ];
        let df = build_panel(&records).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(
            df.get_column_names_str(),
            ["industry", "vintage", "bulletin", "tp_2019q4", "tp_2020q1"]
        );
        let q1 = df.column("tp_2020q1").unwrap().f64().unwrap();
        // The earlier vintage never reported 2020q1.
        assert_eq!(q1.get(0), None);
        assert_eq!(q1.get(1), Some(1.1));
    }

    #[test]
    fn test_panel_period_columns_are_chronological() {
        let records = [record(
            103,
            1,
            vec![(
                Industry::Gdp,
                vec![("2020q1", 1.0), ("2019q4", 3.0), ("2019", 2.2)],
            )],
        )];
        let df = build_panel(&records).unwrap();
        assert_eq!(
            df.get_column_names_str()[3..],
            ["tp_2019q4", "tp_2019", "tp_2020q1"]
        );
    }

    #[test]
    fn test_panel_rows_sort_by_industry_then_vintage() {
        let records = [
            record(
                104,
                2,
                vec![
                    (Industry::Fishing, vec![("2020m1", 1.0)]),
                    (Industry::Gdp, vec![("2020m1", 2.0)]),
                ],
            ),
            record(103, 1, vec![(Industry::Fishing, vec![("2020m1", 0.9)])]),
        ];
        let df = build_panel(&records).unwrap();
        let industry = df.column("industry").unwrap().str().unwrap();
        let vintage = df.column("vintage").unwrap().str().unwrap();
        assert_eq!(industry.get(0), Some("gdp"));
        assert_eq!(industry.get(1), Some("fishing"));
        assert_eq!(vintage.get(1), Some("2020m1"));
        assert_eq!(vintage.get(2), Some("2020m2"));
    }

    #[test]
    fn test_empty_records_make_empty_panel() {
        let df = build_panel(&[]).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 3);
    }
}
