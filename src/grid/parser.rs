use chrono::{Duration, NaiveTime};
use tracing::debug;

use crate::{
    error::ParseError,
    model::{
        activity::{Activity, ActivityType},
        config::AnalysisConfig,
        period::{PeriodKey, TimePeriod},
    },
    utils::time::{minutes_from_midnight, parse_time_label, DAY_NAMES},
};

use super::source::RawSource;

/// One time label column plus seven day columns.
pub const GRID_COLUMNS: usize = 8;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Everything extracted from one source: the activities that did parse plus
/// every validation error hit along the way. Human-authored grids usually
/// contain several mistakes at once, so the parser never stops at the first.
#[derive(Debug, Default)]
pub struct ParsedGrid {
    pub activities: Vec<Activity>,
    pub errors: Vec<ParseError>,
}

/// Parses one raw grid into activity records. Pure: the output depends only
/// on the source payload, its name and the config.
pub fn parse_source(source: &RawSource, config: &AnalysisConfig) -> ParsedGrid {
    let mut out = ParsedGrid::default();

    let Some(key) = PeriodKey::parse(&source.name, source.sheet_year) else {
        out.errors.push(ParseError::InvalidNameFormat {
            source_name: source.name.clone(),
        });
        return out;
    };
    let week = match TimePeriod::week(key.year, key.month, key.week) {
        Ok(week) => week,
        Err(e) => {
            out.errors.push(e);
            return out;
        }
    };
    let week_start = week.start();
    let slot_minutes = config.slot.num_minutes();

    let mut previous: Option<NaiveTime> = None;
    for (row_idx, row) in source.rows.iter().enumerate() {
        if row.len() != GRID_COLUMNS {
            out.errors.push(ParseError::InvalidColumnCount {
                source_name: source.name.clone(),
                row: row_idx,
                found: row.len(),
                expected: GRID_COLUMNS,
            });
            continue;
        }

        let label = row[0].trim();
        let Some(time) = parse_time_label(label) else {
            // The first row is allowed to be a header, but only with the
            // seven weekday names in Sunday-first order.
            if row_idx == 0 && is_day_header(&row[1..]) {
                continue;
            }
            out.errors.push(ParseError::InvalidTimeLabel {
                source_name: source.name.clone(),
                row: row_idx,
                label: label.to_string(),
            });
            continue;
        };

        // Labels must be slot-aligned, strictly increasing, and a slot that
        // starts at this label must end within the same day.
        let minutes = minutes_from_midnight(time);
        let misaligned = minutes % slot_minutes != 0;
        let crosses_midnight = minutes + slot_minutes > MINUTES_PER_DAY;
        let not_increasing = previous.is_some_and(|p| time <= p);
        if misaligned || crosses_midnight || not_increasing {
            out.errors.push(ParseError::InvalidTimeLabel {
                source_name: source.name.clone(),
                row: row_idx,
                label: label.to_string(),
            });
            continue;
        }
        previous = Some(time);

        for (day, cell) in row[1..].iter().enumerate() {
            match parse_cell(cell) {
                Cell::Absent => {}
                Cell::Tracked(kind, description) => out.activities.push(Activity {
                    source: source.name.clone(),
                    date: week_start + Duration::days(day as i64),
                    start_time: time,
                    slot: config.slot,
                    kind,
                    description,
                }),
                Cell::Invalid => out.errors.push(ParseError::InvalidActivityCode {
                    source_name: source.name.clone(),
                    row: row_idx,
                    column: day + 1,
                    cell: cell.trim().to_string(),
                }),
            }
        }
    }

    debug!(
        "parsed {}: {} activities, {} errors",
        source.name,
        out.activities.len(),
        out.errors.len()
    );
    out
}

fn is_day_header(cells: &[String]) -> bool {
    cells.len() == DAY_NAMES.len()
        && cells
            .iter()
            .zip(DAY_NAMES)
            .all(|(cell, day)| cell.trim().eq_ignore_ascii_case(day))
}

enum Cell {
    Absent,
    Tracked(ActivityType, String),
    Invalid,
}

/// Cell grammar: `<CODE>: <description>`, code case-insensitive, description
/// optional. Empty or whitespace-only cells are untracked time, not a sixth
/// activity type.
fn parse_cell(raw: &str) -> Cell {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Cell::Absent;
    }
    let Some((code, description)) = trimmed.split_once(':') else {
        return Cell::Invalid;
    };
    let code = code.trim();
    let mut chars = code.chars();
    let (Some(letter), None) = (chars.next(), chars.next()) else {
        return Cell::Invalid;
    };
    match ActivityType::from_code(letter) {
        Some(kind) => Cell::Tracked(kind, description.trim().to_string()),
        None => Cell::Invalid,
    }
}
