use chrono::{NaiveTime, Timelike, Weekday};

/// Day columns of a grid, and the only accepted header order.
pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub fn day_name(day: Weekday) -> &'static str {
    DAY_NAMES[day.num_days_from_sunday() as usize]
}

/// Parses a `HH:MM` time label. Widths are exact, "8:00" is not a label.
pub fn parse_time_label(label: &str) -> Option<NaiveTime> {
    let (hours, minutes) = label.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    if !hours.bytes().all(|b| b.is_ascii_digit())
        || !minutes.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    NaiveTime::from_hms_opt(hours.parse().ok()?, minutes.parse().ok()?, 0)
}

/// Minutes since midnight, for arithmetic that must not wrap around the day
/// boundary the way `NaiveTime + Duration` does.
pub fn minutes_from_midnight(time: NaiveTime) -> i64 {
    time.num_seconds_from_midnight() as i64 / 60
}

/// Serializes [chrono::Duration] as whole seconds.
pub mod duration_seconds {
    use chrono::Duration;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(duration.num_seconds())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = i64::deserialize(deserializer)?;
        Ok(Duration::seconds(s))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::parse_time_label;

    #[test]
    fn accepts_exact_width_labels() {
        assert_eq!(
            parse_time_label("06:30"),
            Some(NaiveTime::from_hms_opt(6, 30, 0).unwrap())
        );
        assert_eq!(
            parse_time_label("23:30"),
            Some(NaiveTime::from_hms_opt(23, 30, 0).unwrap())
        );
    }

    #[test]
    fn rejects_everything_else() {
        for label in ["8:00", "08:0", "08-00", "08:00:00", "ab:cd", "24:00", "", "Time"] {
            assert_eq!(parse_time_label(label), None, "{label:?}");
        }
    }
}
