//! The release-indexed revision triangle.
//!
//! Rows are target periods; columns are `<industry>_<k>` where `k` ranks the
//! non-missing values of one (industry, target period) in vintage order.
//! Cell (p, industry_k) holds the k-th estimate ever published for period p,
//! so a column reads as the k-th revision across all periods and a row reads
//! as one period's full revision history, with no placeholder gaps between
//! releases.

use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use rtd_model::Industry;

use crate::error::Result;
use crate::panel::observed_periods;
use crate::vintage::VintageRecord;

/// Index column of the triangle, holding period labels (`2019q4`).
pub const TARGET_PERIOD: &str = "target_period";

/// Build the revision triangle from the full set of records.
///
/// Release ranks are dense per (industry, target period): a bulletin that
/// did not report a period does not consume a rank for it, so earlier
/// bulletins covering fewer periods never push gaps into later releases.
/// Periods nothing ever reported do not appear as rows.
pub fn build_triangle(records: &[VintageRecord]) -> Result<DataFrame> {
    let periods = observed_periods(records);

    let mut sorted: Vec<&VintageRecord> = records.iter().collect();
    sorted.sort_by_key(|record| (record.vintage, record.bulletin));

    let labels: Vec<String> = periods.iter().map(|period| period.label()).collect();
    let mut columns: Vec<Column> =
        vec![Series::new(TARGET_PERIOD.into(), labels).into()];
    for industry in Industry::ALL {
        // Per period, that industry's non-missing values in vintage order.
        let releases: Vec<Vec<f64>> = periods
            .iter()
            .map(|period| {
                sorted
                    .iter()
                    .filter_map(|record| {
                        record
                            .observation(industry)
                            .and_then(|obs| obs.values.get(period).copied())
                    })
                    .collect()
            })
            .collect();
        let depth = releases.iter().map(Vec::len).max().unwrap_or(0);
        for rank in 0..depth {
            let name = format!("{}_{}", industry.as_str(), rank + 1);
            let cells: Vec<Option<f64>> = releases
                .iter()
                .map(|values| values.get(rank).copied())
                .collect();
            columns.push(Series::new(name.as_str().into(), cells).into());
        }
    }
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::build_panel;
    use crate::vintage::VintageObservation;
    use rtd_model::{BulletinId, TargetPeriod, Vintage};
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

    fn fishing_records() -> Vec<VintageRecord> {
        vec![
            record(103, 1, vec![(Industry::Fishing, vec![("2019q4", 3.2)])]),
            record(
                104,
                2,
                vec![(Industry::Fishing, vec![("2019q4", 3.5), ("2020q1", 1.1)])],
            ),
            record(105, 3, vec![(Industry::Fishing, vec![("2020q1", 0.9)])]),
        ]
    }

    #[test]
    fn test_triangle_revision_path() {
        // The first bulletin never reported 2020q1, so its first release is
        // the second bulletin's value, with no gap in front of it.
        let df = build_triangle(&fishing_records()).unwrap();
        assert_eq!(
            df.get_column_names_str(),
            ["target_period", "fishing_1", "fishing_2"]
        );
        let target = df.column("target_period").unwrap().str().unwrap();
        assert_eq!(target.get(0), Some("2019q4"));
        assert_eq!(target.get(1), Some("2020q1"));
        let first = df.column("fishing_1").unwrap().f64().unwrap();
        let second = df.column("fishing_2").unwrap().f64().unwrap();
        assert_eq!(first.get(0), Some(3.2));
        assert_eq!(second.get(0), Some(3.5));
        assert_eq!(first.get(1), Some(1.1));
        assert_eq!(second.get(1), Some(0.9));
    }

    #[test]
    fn test_release_ranks_are_dense_per_industry() {
        // Mining is absent from the middle bulletin, so its second release
        // comes from the third one.
        let records = vec![
            record(
                103,
                1,
                vec![
                    (Industry::Fishing, vec![("2020m1", 1.0)]),
                    (Industry::Mining, vec![("2020m1", 2.0)]),
                ],
            ),
            record(104, 2, vec![(Industry::Fishing, vec![("2020m1", 1.1)])]),
            record(
                105,
                3,
                vec![
                    (Industry::Fishing, vec![("2020m1", 1.2)]),
                    (Industry::Mining, vec![("2020m1", 2.2)]),
                ],
            ),
        ];
        let df = build_triangle(&records).unwrap();
        assert_eq!(
            df.get_column_names_str(),
            [
                "target_period",
                "fishing_1",
                "fishing_2",
                "fishing_3",
                "mining_1",
                "mining_2"
            ]
        );
        let mining_2 = df.column("mining_2").unwrap().f64().unwrap();
        assert_eq!(mining_2.get(0), Some(2.2));
    }

    #[test]
    fn test_triangle_matches_panel_as_of_reconstruction() {
        // Reading one period across the triangle's release columns must
        // reproduce that period's non-missing panel values in vintage order.
        let records = fishing_records();
        let triangle = build_triangle(&records).unwrap();
        let panel = build_panel(&records).unwrap();
        for (row, period) in ["tp_2019q4", "tp_2020q1"].iter().enumerate() {
            let observed: Vec<f64> = panel
                .column(period)
                .unwrap()
                .f64()
                .unwrap()
                .into_iter()
                .flatten()
                .collect();
            for (rank, expected) in observed.iter().enumerate() {
                let name = format!("fishing_{}", rank + 1);
                let column = triangle.column(&name).unwrap().f64().unwrap();
                assert_eq!(column.get(row), Some(*expected));
            }
        }
    }

    #[test]
    fn test_release_counts_grow_monotonically() {
        let records = fishing_records();
        let count = |records: &[VintageRecord]| {
            build_triangle(records)
                .unwrap()
                .get_column_names_str()
                .iter()
                .filter(|name| name.starts_with("fishing_"))
                .count()
        };
        assert_eq!(count(&records[..1]), 1);
        assert_eq!(count(&records), 2);
    }

    #[test]
    fn test_empty_records_make_index_only_triangle() {
        let df = build_triangle(&[]).unwrap();
        assert_eq!(df.width(), 1);
        assert_eq!(df.height(), 0);
    }
}
