//! Persistence of vintage records between runs.
//!
//! The record store is one CSV per table type, `vintages_<frequency>.csv`,
//! with the same column layout as the panel (`industry`, `vintage`,
//! `bulletin`, then `tp_` columns). It is the source of truth for
//! incremental runs: newly processed bulletins append records and the file
//! is rewritten in full, sorted, via temp-then-rename.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rtd_model::{BulletinId, Frequency, Industry, TargetPeriod, Vintage};
use rtd_reshape::{
    format_numeric, observed_periods, parse_f64, VintageObservation, VintageRecord, BULLETIN,
    INDUSTRY, VINTAGE,
};

use crate::error::{Result, StoreError};

/// Path of the record store for one table type.
pub fn records_path(root: &Path, frequency: Frequency) -> PathBuf {
    root.join(format!("vintages_{frequency}.csv"))
}

/// Rewrite the record store from the full set of records.
pub fn save_records(path: &Path, records: &[VintageRecord]) -> Result<()> {
    let periods = observed_periods(records);
    let mut sorted: Vec<&VintageRecord> = records.iter().collect();
    sorted.sort_by_key(|record| (record.vintage, record.bulletin));

    let tmp = path.with_extension("tmp");
    {
        let mut writer =
            csv::Writer::from_path(&tmp).map_err(|source| StoreError::csv(&tmp, source))?;
        let mut header = vec![INDUSTRY.to_string(), VINTAGE.to_string(), BULLETIN.to_string()];
        header.extend(periods.iter().map(|period| period.column_name()));
        writer
            .write_record(&header)
            .map_err(|source| StoreError::csv(&tmp, source))?;
        for record in &sorted {
            for obs in &record.observations {
                let mut row = vec![
                    obs.industry.as_str().to_string(),
                    record.vintage.to_string(),
                    record.bulletin.to_string(),
                ];
                row.extend(periods.iter().map(|period| {
                    obs.values
                        .get(period)
                        .map(|value| format_numeric(*value))
                        .unwrap_or_default()
                }));
                writer
                    .write_record(&row)
                    .map_err(|source| StoreError::csv(&tmp, source))?;
            }
        }
        writer
            .flush()
            .map_err(|source| StoreError::io(&tmp, source))?;
    }
    std::fs::rename(&tmp, path).map_err(|source| StoreError::io(path, source))?;
    Ok(())
}

/// Load the record store; a missing file means no records yet. A file whose
/// leading columns or period headers no longer match the expected layout is
/// schema drift, reported as an error so the caller can skip it.
pub fn load_records(path: &Path) -> Result<Vec<VintageRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::Reader::from_path(path).map_err(|source| StoreError::csv(path, source))?;
    let headers = reader
        .headers()
        .map_err(|source| StoreError::csv(path, source))?
        .clone();
    let leading: Vec<&str> = headers.iter().take(3).collect();
    if leading != [INDUSTRY, VINTAGE, BULLETIN] {
        return Err(StoreError::drift(
            path,
            format!("leading columns are {leading:?}"),
        ));
    }
    let mut periods = Vec::with_capacity(headers.len().saturating_sub(3));
    for header in headers.iter().skip(3) {
        let period = header
            .parse::<TargetPeriod>()
            .map_err(|_| StoreError::drift(path, format!("non-period column {header:?}")))?;
        periods.push(period);
    }

    let mut records: Vec<VintageRecord> = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row.map_err(|source| StoreError::csv(path, source))?;
        let field = |col: usize| row.get(col).unwrap_or("").trim();
        let line = idx + 2;
        let industry = field(0)
            .parse::<Industry>()
            .map_err(|_| StoreError::drift(path, format!("line {line}: bad industry")))?;
        let vintage = field(1)
            .parse::<Vintage>()
            .map_err(|_| StoreError::drift(path, format!("line {line}: bad vintage")))?;
        let bulletin = field(2)
            .parse::<BulletinId>()
            .map_err(|_| StoreError::drift(path, format!("line {line}: bad bulletin")))?;

        let mut values = BTreeMap::new();
        for (offset, period) in periods.iter().enumerate() {
            if let Some(value) = parse_f64(field(3 + offset)) {
                values.insert(*period, value);
            }
        }
        let observation = VintageObservation { industry, values };
        match records.iter_mut().find(|record| record.bulletin == bulletin) {
            Some(record) => record.observations.push(observation),
            None => records.push(VintageRecord {
                bulletin,
                vintage,
                observations: vec![observation],
            }),
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_records() -> Vec<VintageRecord> {
        let mut values = BTreeMap::new();
        values.insert("2019q4".parse::<TargetPeriod>().unwrap(), 3.2);
        values.insert("2020q1".parse::<TargetPeriod>().unwrap(), 1.1);
        let mut later = BTreeMap::new();
        later.insert("2019q4".parse::<TargetPeriod>().unwrap(), 3.5);
        vec![
            VintageRecord {
                bulletin: BulletinId::new(103, 2020),
                vintage: Vintage::new(2020, 1),
                observations: vec![VintageObservation {
                    industry: Industry::Fishing,
                    values,
                }],
            },
            VintageRecord {
                bulletin: BulletinId::new(104, 2020),
                vintage: Vintage::new(2020, 2),
                observations: vec![VintageObservation {
                    industry: Industry::Fishing,
                    values: later,
                }],
            },
        ]
    }

    #[test]
    fn test_records_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = records_path(dir.path(), Frequency::Quarterly);
        let records = sample_records();
        save_records(&path, &records).unwrap();
        let loaded = load_records(&path).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_missing_store_is_empty() {
        let dir = TempDir::new().unwrap();
        let loaded = load_records(&records_path(dir.path(), Frequency::Monthly)).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_schema_drift_is_detected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vintages_monthly.csv");
        std::fs::write(&path, "industry,vintage,bulletin,not_a_period\nfishing,2020m1,b103_2020,3.5\n").unwrap();
        assert!(matches!(
            load_records(&path),
            Err(StoreError::SchemaDrift { .. })
        ));

        std::fs::write(&path, "sector,vintage,bulletin\nfishing,2020m1,b103_2020\n").unwrap();
        assert!(matches!(
            load_records(&path),
            Err(StoreError::SchemaDrift { .. })
        ));
    }
}
