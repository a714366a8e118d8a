//! CLI argument definitions for the dataset builder.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use rtd_model::{Era, Frequency};

#[derive(Parser)]
#[command(
    name = "rtd",
    version,
    about = "Real-time dataset builder for GDP growth-rate bulletins",
    long_about = "Build a real-time dataset from extracted bulletin tables.\n\n\
                  Cleans heterogeneously laid-out growth-rate tables, assembles the\n\
                  chronological vintage panel and the release-indexed revision triangle,\n\
                  and tracks processed bulletins in a ledger for incremental runs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process extracted bulletin tables and rebuild the dataset outputs.
    Run(RunArgs),

    /// List the closed industry vocabulary.
    Industries,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Input root holding `<era>/<frequency>/<year>/b<issue>_<year>.csv`.
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Output directory for datasets and the ledger (default: <INPUT_DIR>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Restrict the run to one source era.
    #[arg(long = "era", value_enum)]
    pub era: Option<EraArg>,

    /// Restrict the run to one table type.
    #[arg(long = "frequency", value_enum)]
    pub frequency: Option<FrequencyArg>,

    /// Clean and report without writing datasets or touching the ledger.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Write the machine-readable run report to a JSON file.
    #[arg(long = "json-report", value_name = "PATH")]
    pub json_report: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum EraArg {
    Older,
    Newer,
}

impl From<EraArg> for Era {
    fn from(value: EraArg) -> Era {
        match value {
            EraArg::Older => Era::Older,
            EraArg::Newer => Era::Newer,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Monthly,
    Quarterly,
}

impl From<FrequencyArg> for Frequency {
    fn from(value: FrequencyArg) -> Frequency {
        match value {
            FrequencyArg::Monthly => Frequency::Monthly,
            FrequencyArg::Quarterly => Frequency::Quarterly,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
