//! Batch orchestration: discover, clean, reshape, persist.
//!
//! Failure handling is fail-closed per bulletin: a table that cannot be
//! cleaned is reported and excluded from the ledger, so the next run retries
//! it; the rest of the batch continues. Datasets are always re-derived from
//! the full record store, never patched incrementally, and the ledger is
//! checkpointed only after the datasets for its table type have been
//! persisted.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, error, info, info_span, warn};

use rtd_clean::{clean, CleanedTable};
use rtd_model::{BulletinId, BulletinOutcome, BulletinStatus, Era, Frequency, RunReport};
use rtd_reshape::{assign_vintages, build_panel, build_triangle, reshape};
use rtd_store::{
    discover_bulletins, ledger_path, load_records, panel_path, read_grid, records_path,
    save_records, triangle_path, write_dataset, Ledger, StoreError,
};

pub struct RunOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub era: Option<Era>,
    pub frequency: Option<Frequency>,
    pub dry_run: bool,
}

pub fn run(options: &RunOptions) -> Result<RunReport> {
    if !options.dry_run {
        std::fs::create_dir_all(&options.output_dir).with_context(|| {
            format!("create output dir: {}", options.output_dir.display())
        })?;
    }
    let eras: Vec<Era> = match options.era {
        Some(era) => vec![era],
        None => Era::ALL.to_vec(),
    };
    let frequencies: Vec<Frequency> = match options.frequency {
        Some(frequency) => vec![frequency],
        None => Frequency::ALL.to_vec(),
    };

    let mut report = RunReport::default();
    for frequency in frequencies {
        let span = info_span!("table_type", frequency = %frequency);
        let _guard = span.enter();
        run_frequency(options, &eras, frequency, &mut report)?;
    }
    Ok(report)
}

fn run_frequency(
    options: &RunOptions,
    eras: &[Era],
    frequency: Frequency,
    report: &mut RunReport,
) -> Result<()> {
    let store = records_path(&options.output_dir, frequency);
    let mut records = match load_records(&store) {
        Ok(records) => records,
        Err(err @ StoreError::SchemaDrift { .. }) => {
            error!(error = %err, "record store unusable, table type skipped");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    let mut ledger = Ledger::load(&ledger_path(&options.output_dir, frequency))
        .context("load ledger")?;

    // Clean every new bulletin before reshaping anything: vintage order is
    // derived from the full set of bulletin identifiers.
    let mut cleaned: Vec<(BulletinId, Era, CleanedTable)> = Vec::new();
    for era in eras {
        let found = discover_bulletins(&options.input_dir, *era, frequency)?;
        info!(era = %era, bulletins = found.len(), "discovered input tables");
        for item in found {
            if ledger.contains(item.bulletin) {
                debug!(bulletin = %item.bulletin, "already in ledger, skipped");
                report.record(outcome(item.bulletin, *era, frequency, BulletinStatus::Skipped));
                continue;
            }
            let grid = match read_grid(&item.path) {
                Ok(grid) => grid,
                Err(err) => {
                    error!(bulletin = %item.bulletin, error = %err, "unreadable input, excluded");
                    report.record(failed(item.bulletin, *era, frequency, &err.to_string()));
                    continue;
                }
            };
            match clean(&grid, frequency, *era) {
                Ok(result) => {
                    debug!(
                        bulletin = %item.bulletin,
                        branch = ?result.branch,
                        repairs = result.applied.len(),
                        "table cleaned"
                    );
                    cleaned.push((item.bulletin, *era, result.table));
                }
                Err(err) => {
                    error!(bulletin = %item.bulletin, error = %err, "cleaning failed, excluded");
                    report.record(failed(item.bulletin, *era, frequency, &err.to_string()));
                }
            }
        }
    }

    // A bulletin in the store but missing from the ledger means a previous
    // run stopped between dataset and ledger writes; its stored records are
    // superseded by this reprocessing.
    let reprocessed: BTreeSet<BulletinId> =
        cleaned.iter().map(|(bulletin, _, _)| *bulletin).collect();
    let stale = records
        .iter()
        .filter(|record| reprocessed.contains(&record.bulletin))
        .count();
    if stale > 0 {
        warn!(records = stale, "stale stored records replaced");
        records.retain(|record| !reprocessed.contains(&record.bulletin));
    }

    // An unchanged source must leave the output directory untouched: no
    // record store rewrite, no dataset rewrite, no ledger write.
    if cleaned.is_empty()
        && panel_path(&options.output_dir, frequency).exists()
        && triangle_path(&options.output_dir, frequency).exists()
    {
        info!("no new bulletins, outputs left untouched");
        return Ok(());
    }

    let mut all_ids: Vec<BulletinId> = records.iter().map(|record| record.bulletin).collect();
    all_ids.extend(cleaned.iter().map(|(bulletin, _, _)| *bulletin));
    let vintages = assign_vintages(&all_ids);
    // A new bulletin can shift the issue ranking of its year, so stored
    // records are re-vintaged too.
    for record in &mut records {
        if let Some(vintage) = vintages.get(&record.bulletin) {
            record.vintage = *vintage;
        }
    }

    let mut newly: Vec<BulletinId> = Vec::new();
    for (bulletin, era, table) in &cleaned {
        let Some(vintage) = vintages.get(bulletin).copied() else {
            continue;
        };
        let (record, stats) = reshape(table, *bulletin, vintage);
        report.record(BulletinOutcome {
            bulletin: bulletin.to_string(),
            era: era.to_string(),
            frequency: frequency.to_string(),
            rows: record.observations.len(),
            dropped_rows: stats.dropped_rows,
            coercion_losses: stats.coercion_losses,
            status: BulletinStatus::Processed,
            error: None,
        });
        newly.push(*bulletin);
        records.push(record);
    }
    info!(new = newly.len(), total = records.len(), "vintage records assembled");

    if options.dry_run {
        info!("dry run, nothing written");
        return Ok(());
    }
    save_records(&store, &records)?;
    let mut panel = build_panel(&records)?;
    write_dataset(&mut panel, &panel_path(&options.output_dir, frequency))?;
    let mut triangle = build_triangle(&records)?;
    write_dataset(&mut triangle, &triangle_path(&options.output_dir, frequency))?;
    for bulletin in newly {
        ledger.record(bulletin);
    }
    ledger.persist()?;
    info!(
        panel = %panel_path(&options.output_dir, frequency).display(),
        triangle = %triangle_path(&options.output_dir, frequency).display(),
        "datasets written"
    );
    Ok(())
}

fn outcome(
    bulletin: BulletinId,
    era: Era,
    frequency: Frequency,
    status: BulletinStatus,
) -> BulletinOutcome {
    BulletinOutcome {
        bulletin: bulletin.to_string(),
        era: era.to_string(),
        frequency: frequency.to_string(),
        rows: 0,
        dropped_rows: 0,
        coercion_losses: 0,
        status,
        error: None,
    }
}

fn failed(bulletin: BulletinId, era: Era, frequency: Frequency, error: &str) -> BulletinOutcome {
    BulletinOutcome {
        error: Some(error.to_string()),
        ..outcome(bulletin, era, frequency, BulletinStatus::Failed)
    }
}
