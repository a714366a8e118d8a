//! End-to-end tests for the batch pipeline against a real directory tree.

use std::path::Path;

use tempfile::TempDir;

use rtd_cli::pipeline::{RunOptions, run};
use rtd_model::Frequency;

fn seed(root: &Path, era: &str, frequency: &str, year: &str, name: &str, contents: &str) {
    let dir = root.join(era).join(frequency).join(year);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(name), contents).unwrap();
}

fn seed_quarterly(root: &Path) {
    seed(
        root,
        "newer",
        "quarterly",
        "2020",
        "b103_2020.csv",
        "sector,sector_en,2019q4\npbi,gdp,2.2\npesca,fishing,3.2\n",
    );
    seed(
        root,
        "newer",
        "quarterly",
        "2020",
        "b110_2020.csv",
        "sector,sector_en,2019q4,2020q1\npbi,gdp,2.5,1.0\npesca,fishing,3.5,1.1\n",
    );
}

fn options(input: &Path, output: &Path, dry_run: bool) -> RunOptions {
    RunOptions {
        input_dir: input.to_path_buf(),
        output_dir: output.to_path_buf(),
        era: None,
        frequency: Some(Frequency::Quarterly),
        dry_run,
    }
}

#[test]
fn test_full_run_writes_datasets_and_ledger() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    seed_quarterly(&input);

    let report = run(&options(&input, &output, false)).unwrap();
    assert_eq!(report.processed, 2);
    assert_eq!(report.failed, 0);
    assert!(!report.has_failures());

    let panel = std::fs::read_to_string(output.join("panel_quarterly.csv")).unwrap();
    assert!(panel.starts_with("industry,vintage,bulletin,tp_2019q4,tp_2020q1"));
    assert!(panel.contains("fishing,2020m1,b103_2020,3.2,"));
    assert!(panel.contains("fishing,2020m2,b110_2020,3.5,1.1"));

    let triangle = std::fs::read_to_string(output.join("triangle_quarterly.csv")).unwrap();
    let header = triangle.lines().next().unwrap();
    assert!(header.starts_with("target_period"));
    assert!(header.contains("gdp_1"));
    assert!(header.contains("fishing_2"));

    let store = std::fs::read_to_string(output.join("vintages_quarterly.csv")).unwrap();
    assert!(store.starts_with("industry,vintage,bulletin,tp_2019q4,tp_2020q1"));

    assert_eq!(
        std::fs::read_to_string(output.join("ledger_quarterly.txt")).unwrap(),
        "b103_2020\nb110_2020\n"
    );
}

#[test]
fn test_rerun_skips_ledgered_bulletins() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    seed_quarterly(&input);

    run(&options(&input, &output, false)).unwrap();
    let before = std::fs::read_to_string(output.join("panel_quarterly.csv")).unwrap();

    let report = run(&options(&input, &output, false)).unwrap();
    assert_eq!(report.processed, 0);
    assert_eq!(report.skipped, 2);
    assert_eq!(
        std::fs::read_to_string(output.join("panel_quarterly.csv")).unwrap(),
        before
    );
}

#[test]
fn test_rerun_performs_zero_writes() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    seed_quarterly(&input);
    run(&options(&input, &output, false)).unwrap();

    let mtime = |name: &str| {
        std::fs::metadata(output.join(name))
            .unwrap()
            .modified()
            .unwrap()
    };
    let names = [
        "ledger_quarterly.txt",
        "vintages_quarterly.csv",
        "panel_quarterly.csv",
        "triangle_quarterly.csv",
    ];
    let before: Vec<_> = names.iter().map(|name| mtime(name)).collect();
    std::thread::sleep(std::time::Duration::from_millis(25));

    let report = run(&options(&input, &output, false)).unwrap();
    assert_eq!(report.skipped, 2);
    for (name, stamp) in names.iter().zip(&before) {
        assert_eq!(mtime(name), *stamp, "{name} was rewritten on a no-op rerun");
    }
}

#[test]
fn test_incremental_bulletin_shifts_vintages() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    seed_quarterly(&input);
    run(&options(&input, &output, false)).unwrap();

    // A bulletin arriving between the two already processed; the later
    // bulletin's stored records must move to the third release slot.
    seed(
        &input,
        "newer",
        "quarterly",
        "2020",
        "b104_2020.csv",
        "sector,sector_en,2019q4,2020q1\npbi,gdp,2.4,0.8\npesca,fishing,3.4,1.0\n",
    );
    let report = run(&options(&input, &output, false)).unwrap();
    assert_eq!(report.processed, 1);
    assert_eq!(report.skipped, 2);

    let store = std::fs::read_to_string(output.join("vintages_quarterly.csv")).unwrap();
    assert!(store.contains("2020m2,b104_2020"));
    assert!(store.contains("2020m3,b110_2020"));
    assert!(!store.contains("2020m2,b110_2020"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    seed_quarterly(&input);

    let report = run(&options(&input, &output, true)).unwrap();
    assert_eq!(report.processed, 2);
    assert!(!output.exists());
}

#[test]
fn test_failed_bulletin_is_excluded_and_retried() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    seed_quarterly(&input);
    seed(
        &input,
        "newer",
        "quarterly",
        "2020",
        "b115_2020.csv",
        "solo texto,,\nsin datos,,\n",
    );

    let report = run(&options(&input, &output, false)).unwrap();
    assert_eq!(report.processed, 2);
    assert_eq!(report.failed, 1);
    assert!(report.has_failures());

    // The broken bulletin stays out of the ledger so a later run retries it.
    let ledger = std::fs::read_to_string(output.join("ledger_quarterly.txt")).unwrap();
    assert!(!ledger.contains("b115_2020"));

    let report = run(&options(&input, &output, false)).unwrap();
    assert_eq!(report.skipped, 2);
    assert_eq!(report.failed, 1);
}
