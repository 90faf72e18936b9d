use std::fmt::Display;
use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::utils::time::duration_seconds;

/// The closed set of activity categories. The enumeration order is also the
/// tie-break order used when picking a dominant type for a time slot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ActivityType {
    Rest,
    Procrastination,
    GuiltFreePlay,
    MandatoryWork,
    ProductiveWork,
}

impl ActivityType {
    pub const ALL: [ActivityType; 5] = [
        ActivityType::Rest,
        ActivityType::Procrastination,
        ActivityType::GuiltFreePlay,
        ActivityType::MandatoryWork,
        ActivityType::ProductiveWork,
    ];

    /// Single letter code used in grid cells.
    pub fn code(self) -> char {
        match self {
            ActivityType::Rest => 'R',
            ActivityType::Procrastination => 'P',
            ActivityType::GuiltFreePlay => 'G',
            ActivityType::MandatoryWork => 'M',
            ActivityType::ProductiveWork => 'W',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActivityType::Rest => "Rest",
            ActivityType::Procrastination => "Procrastination",
            ActivityType::GuiltFreePlay => "Guilt-free Play",
            ActivityType::MandatoryWork => "Mandatory Work",
            ActivityType::ProductiveWork => "Productive Work",
        }
    }

    pub fn from_code(code: char) -> Option<ActivityType> {
        let code = code.to_ascii_uppercase();
        ActivityType::ALL.into_iter().find(|t| t.code() == code)
    }
}

impl Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One classified time slot. Produced only by the grid parser and never
/// mutated afterwards, only aggregated.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub source: Arc<str>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    #[serde(with = "duration_seconds")]
    pub slot: Duration,
    pub kind: ActivityType,
    pub description: String,
}

impl Activity {
    /// Derived from the date. Matches the Sunday-first column the slot came
    /// from, since week starts are always Sundays.
    pub fn day_of_week(&self) -> Weekday {
        self.date.weekday()
    }
}

impl Display for Activity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.description.is_empty() {
            write!(f, "{}", self.kind.code())
        } else {
            write!(f, "{}: {}", self.kind.code(), self.description)
        }
    }
}
