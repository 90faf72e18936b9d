use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{
    model::{config::AnalysisConfig, period::TimePeriod},
    stats::comparison::compare,
    utils::percentage::Percentage,
};

use super::{load_dataset, render, value_error};

#[derive(Debug, Parser)]
pub struct CompareCommand {
    #[arg(help = "Csv file or directory of weekly csv files")]
    path: PathBuf,
    #[arg(long, help = "Comma separated weeks, for example \"2024-1-1,2024-1-2\"")]
    weeks: Option<String>,
    #[arg(long, help = "Comma separated months, for example \"2024-1,2024-2\"")]
    months: Option<String>,
    #[arg(long, help = "Comma separated years, for example \"2023,2024\"")]
    years: Option<String>,
    #[arg(long, help = "Year to assume for M.W style file names")]
    sheet_year: Option<i32>,
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

pub fn process_compare_command(command: CompareCommand) -> Result<()> {
    let periods = requested_periods(&command)?;
    let config = AnalysisConfig::default();

    let report = load_dataset(&command.path, command.sheet_year, &config)?;
    render::print_errors(&report.errors);

    let comparison = compare(&periods, &report.dataset, &config);
    if command.json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
    } else {
        render::print_comparison(&comparison, command.min_percentage);
    }
    Ok(())
}

fn requested_periods(command: &CompareCommand) -> Result<Vec<TimePeriod>> {
    let mut periods = vec![];

    if let Some(weeks) = &command.weeks {
        for token in weeks.split(',') {
            let parts = int_parts(token)?;
            let [year, month, week] = parts[..] else {
                return Err(value_error(format!(
                    "Expected YEAR-MONTH-WEEK, got {token:?}"
                )));
            };
            periods.push(
                TimePeriod::week(year, month as u32, week as u32)
                    .map_err(|e| value_error(e.to_string()))?,
            );
        }
    }
    if let Some(months) = &command.months {
        for token in months.split(',') {
            let parts = int_parts(token)?;
            let [year, month] = parts[..] else {
                return Err(value_error(format!("Expected YEAR-MONTH, got {token:?}")));
            };
            periods.push(
                TimePeriod::month(year, month as u32).map_err(|e| value_error(e.to_string()))?,
            );
        }
    }
    if let Some(years) = &command.years {
        for token in years.split(',') {
            let parts = int_parts(token)?;
            let [year] = parts[..] else {
                return Err(value_error(format!("Expected YEAR, got {token:?}")));
            };
            periods.push(TimePeriod::year(year).map_err(|e| value_error(e.to_string()))?);
        }
    }

    if periods.is_empty() {
        return Err(value_error(
            "Nothing to compare, pass at least one of --weeks, --months, --years",
        ));
    }
    Ok(periods)
}

fn int_parts(token: &str) -> Result<Vec<i32>> {
    token
        .trim()
        .split('-')
        .map(|part| {
            part.parse::<i32>()
                .map_err(|_| value_error(format!("Can't parse {part:?} in {token:?}")))
        })
        .collect()
}
