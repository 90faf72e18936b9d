use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{
    model::{config::AnalysisConfig, period::TimePeriod},
    stats::analysis::analyze,
    utils::percentage::Percentage,
};

use super::{load_dataset, render, value_error};

#[derive(Debug, Parser)]
pub struct AnalyzeCommand {
    #[arg(help = "Csv file or directory of weekly csv files")]
    path: PathBuf,
    #[arg(
        long,
        num_args = 3,
        value_names = ["YEAR", "MONTH", "WEEK"],
        conflicts_with_all = ["month", "year"],
        help = "Take a specific week, for example --week 2024 1 1"
    )]
    week: Option<Vec<i32>>,
    #[arg(
        long,
        num_args = 2,
        value_names = ["YEAR", "MONTH"],
        conflicts_with = "year",
        help = "Take a specific month, for example --month 2024 1"
    )]
    month: Option<Vec<i32>>,
    #[arg(long, help = "Take a whole year, for example --year 2024")]
    year: Option<i32>,
    #[command(flatten)]
    common: CommonOptions,
}

/// Options shared between `analyze` and `summary`.
#[derive(Debug, clap::Args)]
pub struct CommonOptions {
    #[arg(long, help = "Year to assume for M.W style file names")]
    sheet_year: Option<i32>,
    #[arg(long, default_value_t = 10, help = "How many specific activities to show")]
    top: usize,
    #[arg(
        short = 'p',
        long = "percentage",
        help = "Hide activity types below the specified percentage",
        default_value_t = Percentage::zero()
    )]
    min_percentage: Percentage,
    #[arg(long, help = "Print the result as json")]
    json: bool,
}

pub fn process_analyze_command(command: AnalyzeCommand) -> Result<()> {
    let period = requested_period(&command)?;
    let config = AnalysisConfig {
        top_limit: command.common.top,
        ..AnalysisConfig::default()
    };

    let report = load_dataset(&command.path, command.common.sheet_year, &config)?;
    render::print_errors(&report.errors);

    let result = match period {
        Some(period) => analyze(report.dataset.query(period), period.label(), &config),
        None => analyze(report.dataset.all(), "All tracked time".to_string(), &config),
    };

    if command.common.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        render::print_analysis(&result, command.common.min_percentage);
    }
    Ok(())
}

fn requested_period(command: &AnalyzeCommand) -> Result<Option<TimePeriod>> {
    let period = if let Some(v) = &command.week {
        TimePeriod::week(v[0], v[1] as u32, v[2] as u32)
    } else if let Some(v) = &command.month {
        TimePeriod::month(v[0], v[1] as u32)
    } else if let Some(year) = command.year {
        TimePeriod::year(year)
    } else {
        return Ok(None);
    };
    period.map(Some).map_err(|e| value_error(e.to_string()))
}

#[derive(Debug, Parser)]
pub struct SummaryCommand {
    #[arg(help = "Csv file or directory of weekly csv files")]
    path: PathBuf,
    #[command(flatten)]
    common: CommonOptions,
}

/// Like `analyze` without a period: one result over everything loaded.
pub fn process_summary_command(command: SummaryCommand) -> Result<()> {
    let config = AnalysisConfig {
        top_limit: command.common.top,
        ..AnalysisConfig::default()
    };
    let report = load_dataset(&command.path, command.common.sheet_year, &config)?;
    render::print_errors(&report.errors);

    let result = analyze(report.dataset.all(), "All tracked time".to_string(), &config);
    if command.common.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        render::print_analysis(&result, command.common.min_percentage);
    }
    Ok(())
}
