use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::info;

use rtd_model::{Industry, RunReport};

use crate::cli::RunArgs;
use crate::summary::apply_table_style;
use rtd_cli::pipeline::{run, RunOptions};

pub fn run_batch(args: &RunArgs) -> Result<RunReport> {
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| args.input_dir.join("output"));
    let options = RunOptions {
        input_dir: args.input_dir.clone(),
        output_dir,
        era: args.era.map(Into::into),
        frequency: args.frequency.map(Into::into),
        dry_run: args.dry_run,
    };
    let report = run(&options)?;
    if let Some(path) = &args.json_report {
        let json = serde_json::to_string_pretty(&report).context("serialize run report")?;
        std::fs::write(path, json)
            .with_context(|| format!("write run report: {}", path.display()))?;
        info!(path = %path.display(), "run report written");
    }
    Ok(report)
}

pub fn run_industries() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Code", "Sector"]);
    apply_table_style(&mut table);
    for industry in Industry::ALL {
        table.add_row(vec![industry.as_str(), description(industry)]);
    }
    println!("{table}");
    Ok(())
}

fn description(industry: Industry) -> &'static str {
    match industry {
        Industry::Gdp => "Gross domestic product (headline)",
        Industry::Agriculture => "Agriculture and livestock",
        Industry::Fishing => "Fishing",
        Industry::Mining => "Mining and fuel",
        Industry::Manufacturing => "Manufacturing",
        Industry::Electricity => "Electricity and water",
        Industry::Construction => "Construction",
        Industry::Commerce => "Commerce",
        Industry::Services => "Other services",
    }
}
