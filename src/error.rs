use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

/// Validation errors raised while turning raw grids into activity records.
/// All of these are data problems, not crashes, and each one carries enough
/// context to point at the offending source and cell.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("{source_name}: name doesn't match YYYY_MM_WW, YYYY-MM-WW or M.W")]
    InvalidNameFormat { source_name: Arc<str> },

    #[error("{source_name}: row {row} has {found} columns, expected {expected}")]
    InvalidColumnCount {
        source_name: Arc<str>,
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("{source_name}: bad time label {label:?} at row {row}")]
    InvalidTimeLabel {
        source_name: Arc<str>,
        row: usize,
        label: String,
    },

    #[error("{source_name}: unknown activity code in {cell:?} at row {row}, column {column}")]
    InvalidActivityCode {
        source_name: Arc<str>,
        row: usize,
        column: usize,
        cell: String,
    },

    #[error(
        "no valid period for year {}{}{}",
        .year,
        fmt_component(", month ", .month),
        fmt_component(", week ", .week)
    )]
    InvalidPeriodComponents {
        year: i32,
        month: Option<u32>,
        week: Option<u32>,
    },

    #[error("slot {date} {time} is defined by both {first} and {second}")]
    DuplicateSlot {
        date: NaiveDate,
        time: NaiveTime,
        first: Arc<str>,
        second: Arc<str>,
    },

    #[error("no activities recorded for {period}")]
    NoDataInScope { period: String },
}

fn fmt_component(label: &str, value: &Option<u32>) -> String {
    match value {
        Some(v) => format!("{label}{v}"),
        None => String::new(),
    }
}
