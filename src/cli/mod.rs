pub mod analyze;
pub mod compare;
pub mod render;

use std::path::Path;

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::{
    dataset::{CanonicalDataset, LoadReport},
    fs::loader::load_path,
    model::config::AnalysisConfig,
    utils::logging::enable_logging,
};

use analyze::{process_analyze_command, process_summary_command, AnalyzeCommand, SummaryCommand};
use compare::{process_compare_command, CompareCommand};

#[derive(Parser, Debug)]
#[command(name = "Slotwise", version, long_about = None)]
#[command(about = "Cli for analyzing personal time tracking grids", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Analyze one period of tracked time, or everything loaded")]
    Analyze {
        #[command(flatten)]
        command: AnalyzeCommand,
    },
    #[command(about = "Compare multiple periods against each other")]
    Compare {
        #[command(flatten)]
        command: CompareCommand,
    },
    #[command(about = "Summarize every loaded grid")]
    Summary {
        #[command(flatten)]
        command: SummaryCommand,
    },
}

pub fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(logging_level);

    match args.commands {
        Commands::Analyze { command } => process_analyze_command(command),
        Commands::Compare { command } => process_compare_command(command),
        Commands::Summary { command } => process_summary_command(command),
    }
}

/// Reads sources from disk and runs the batch load. Recoverable parse errors
/// ride along inside the report; conflicting slots fail the whole load since
/// the ground truth for those moments is ambiguous.
pub(crate) fn load_dataset(
    path: &Path,
    sheet_year: Option<i32>,
    config: &AnalysisConfig,
) -> Result<LoadReport> {
    let sources = load_path(path, sheet_year)?;
    match CanonicalDataset::load(&sources, config) {
        Ok(report) => Ok(report),
        Err(errors) => {
            render::print_errors(&errors);
            Err(anyhow!("Load failed, sources disagree about tracked slots"))
        }
    }
}

pub(crate) fn value_error(message: impl std::fmt::Display) -> anyhow::Error {
    Args::command()
        .error(clap::error::ErrorKind::ValueValidation, message)
        .into()
}
