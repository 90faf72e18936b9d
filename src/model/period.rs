use std::cmp::Ordering;
use std::fmt::Display;

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::ParseError;

/// The week a single grid encodes, as written in its file or sheet name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodKey {
    pub year: i32,
    pub month: u32,
    pub week: u32,
}

impl PeriodKey {
    /// Extracts a period key from a source name. Two grammars are accepted:
    /// `YYYY_MM_WW` / `YYYY-MM-WW` (month 01-12, week 01-05), or a bare `M.W`
    /// token whose year has to come from `sheet_year`. A trailing `.csv` is
    /// ignored. Returns [None] when the name fits neither grammar.
    pub fn parse(name: &str, sheet_year: Option<i32>) -> Option<PeriodKey> {
        let name = name.trim();
        let name = name
            .strip_suffix(".csv")
            .or_else(|| name.strip_suffix(".CSV"))
            .unwrap_or(name);

        if let Some(key) = Self::parse_dated(name) {
            return Some(key);
        }
        Self::parse_bare(name, sheet_year?)
    }

    fn parse_dated(name: &str) -> Option<PeriodKey> {
        let normalized = name.replace('-', "_");
        let mut parts = normalized.split('_');
        let year = parts.next()?;
        let month = parts.next()?;
        let week = parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        let year = parse_digits(year, 4)?;
        let month = parse_digits(month, 2)? as u32;
        let week = parse_digits(week, 2)? as u32;
        if !(1..=12).contains(&month) || !(1..=5).contains(&week) {
            return None;
        }
        Some(PeriodKey { year, month, week })
    }

    fn parse_bare(name: &str, year: i32) -> Option<PeriodKey> {
        let (month, week) = name.split_once('.')?;
        if !(1..=2).contains(&month.len()) || !(1..=2).contains(&week.len()) {
            return None;
        }
        let month = parse_digits(month, month.len())? as u32;
        let week = parse_digits(week, week.len())? as u32;
        if !(1..=12).contains(&month) || !(1..=5).contains(&week) {
            return None;
        }
        Some(PeriodKey { year, month, week })
    }
}

/// All digits, exact width.
fn parse_digits(part: &str, width: usize) -> Option<i32> {
    if part.len() != width || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl Display for PeriodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-M{}W{}", self.year, self.month, self.week)
    }
}

/// A query scope over the dataset.
///
/// The calendar convention is not the civil one: weeks are Sunday-first
/// blocks of 7 days, week W of month M starts on the W-th Sunday of calendar
/// month M, and a month runs from its first Sunday up to the first Sunday of
/// the next calendar month. Late weeks therefore roll across calendar month
/// ends, but every week sits in exactly one month and every month in exactly
/// one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePeriod {
    // Non-exhaustive variants keep the validating constructors below the
    // only way to build a period outside this crate.
    #[non_exhaustive]
    Week { year: i32, month: u32, week: u32 },
    #[non_exhaustive]
    Month { year: i32, month: u32 },
    #[non_exhaustive]
    Year { year: i32 },
}

impl TimePeriod {
    pub fn week(year: i32, month: u32, week: u32) -> Result<TimePeriod, ParseError> {
        let invalid = ParseError::InvalidPeriodComponents {
            year,
            month: Some(month),
            week: Some(week),
        };
        if !year_in_range(year) || !(1..=12).contains(&month) {
            return Err(invalid);
        }
        if week < 1 || week > weeks_in_month(year, month) {
            return Err(invalid);
        }
        Ok(TimePeriod::Week { year, month, week })
    }

    pub fn month(year: i32, month: u32) -> Result<TimePeriod, ParseError> {
        if !year_in_range(year) || !(1..=12).contains(&month) {
            return Err(ParseError::InvalidPeriodComponents {
                year,
                month: Some(month),
                week: None,
            });
        }
        Ok(TimePeriod::Month { year, month })
    }

    pub fn year(year: i32) -> Result<TimePeriod, ParseError> {
        if !year_in_range(year) {
            return Err(ParseError::InvalidPeriodComponents {
                year,
                month: None,
                week: None,
            });
        }
        Ok(TimePeriod::Year { year })
    }

    /// First date of the period.
    pub fn start(&self) -> NaiveDate {
        match *self {
            TimePeriod::Week { year, month, week } => {
                first_sunday(year, month) + Duration::days(7 * (week as i64 - 1))
            }
            TimePeriod::Month { year, month } => first_sunday(year, month),
            TimePeriod::Year { year } => first_sunday(year, 1),
        }
    }

    /// First date after the period.
    pub fn end(&self) -> NaiveDate {
        match *self {
            TimePeriod::Week { .. } => self.start() + Duration::days(7),
            TimePeriod::Month { year, month } => {
                let (year, month) = next_month(year, month);
                first_sunday(year, month)
            }
            TimePeriod::Year { year } => first_sunday(year + 1, 1),
        }
    }

    /// Purely a function of the date, never of how an activity was loaded.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start() <= date && date < self.end()
    }

    pub fn label(&self) -> String {
        match *self {
            TimePeriod::Week { year, month, week } => {
                format!("{}, Week {week}", month_label(year, month))
            }
            TimePeriod::Month { year, month } => month_label(year, month),
            TimePeriod::Year { year } => format!("Year {year}"),
        }
    }
}

impl Display for TimePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            TimePeriod::Week { year, month, week } => write!(f, "{year}-M{month}W{week}"),
            TimePeriod::Month { year, month } => write!(f, "{year}-M{month}"),
            TimePeriod::Year { year } => write!(f, "{year}"),
        }
    }
}

/// Chronological order, used to present comparisons regardless of the order
/// periods were requested in. Shorter periods sort before enclosing ones
/// starting on the same date.
impl Ord for TimePeriod {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.start(), self.end()).cmp(&(other.start(), other.end()))
    }
}

impl PartialOrd for TimePeriod {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// How many week rows month M of year Y has: one per Sunday of the calendar
/// month, which is always 4 or 5.
pub fn weeks_in_month(year: i32, month: u32) -> u32 {
    let start = first_sunday(year, month);
    let (next_year, next_month) = next_month(year, month);
    let end = first_sunday(next_year, next_month);
    ((end - start).num_days() / 7) as u32
}

/// Chrono only represents years up to about ±262000, and every period also
/// reaches into the following January for its end date.
fn year_in_range(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 1, 1).is_some()
        && year
            .checked_add(1)
            .and_then(|next| NaiveDate::from_ymd_opt(next, 1, 1))
            .is_some()
}

fn first_sunday(year: i32, month: u32) -> NaiveDate {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .expect("year and month are validated before building a period");
    let days_until_sunday = (7 - first.weekday().num_days_from_sunday()) % 7;
    first + Duration::days(days_until_sunday as i64)
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn month_label(year: i32, month: u32) -> String {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .expect("year and month are validated before building a period");
    first.format("%B %Y").to_string()
}
