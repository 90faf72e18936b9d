use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::{
    model::{
        activity::{Activity, ActivityType},
        config::AnalysisConfig,
    },
    utils::{
        percentage::{duration_percentage, Percentage},
        time::{duration_seconds, DAY_NAMES},
    },
};

use super::balance::balance_score;

/// Slot count and summed duration for one bucket.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TypeTotals {
    pub slots: usize,
    #[serde(with = "duration_seconds")]
    pub duration: Duration,
}

impl TypeTotals {
    fn zero() -> TypeTotals {
        TypeTotals {
            slots: 0,
            duration: Duration::zero(),
        }
    }

    fn add(&mut self, slot: Duration) {
        self.slots += 1;
        self.duration += slot;
    }
}

/// One activity type's share of the period. Percentages are relative to
/// classified time only, absent slots never enter the denominator.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TypeBreakdown {
    pub slots: usize,
    #[serde(with = "duration_seconds")]
    pub duration: Duration,
    pub percentage: Percentage,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayBreakdown {
    pub day: &'static str,
    pub slots: usize,
    pub by_type: BTreeMap<ActivityType, TypeTotals>,
}

/// A specific activity, grouped by its exact description text.
#[derive(Debug, Clone, Serialize)]
pub struct TopActivity {
    pub description: String,
    pub kind: ActivityType,
    pub slots: usize,
    #[serde(with = "duration_seconds")]
    pub duration: Duration,
    pub first_seen: NaiveDate,
}

/// Dominant activity type per day column at one time label.
#[derive(Debug, Clone, Serialize)]
pub struct SlotPattern {
    pub time: NaiveTime,
    /// Sunday-first. [None] where the slot was never classified.
    pub dominant: [Option<ActivityType>; 7],
}

/// Read-only aggregation snapshot for one scope. Self-describing: holds no
/// reference back to the dataset it came from.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub label: String,
    /// Set when the scope contains zero classified slots. Percentages and the
    /// balance score are reported as zero in that case instead of failing on
    /// a division by zero.
    pub no_data: bool,
    pub total_slots: usize,
    #[serde(with = "duration_seconds")]
    pub total_duration: Duration,
    pub distribution: BTreeMap<ActivityType, TypeBreakdown>,
    /// Sunday-first, one entry per weekday, merging every matching weekday in
    /// the scope (a month's Monday bucket holds all of its Mondays).
    pub daily: Vec<DayBreakdown>,
    pub top_activities: Vec<TopActivity>,
    pub patterns: Vec<SlotPattern>,
    pub balance_score: f64,
}

/// Aggregates a slice of the dataset into an [AnalysisResult]. Cheap enough
/// to recompute on demand, nothing is cached.
pub fn analyze<'a>(
    activities: impl IntoIterator<Item = &'a Activity>,
    label: String,
    config: &AnalysisConfig,
) -> AnalysisResult {
    let activities: Vec<&Activity> = activities.into_iter().collect();
    let no_data = activities.is_empty();
    let total_slots = activities.len();
    let total_duration = activities
        .iter()
        .fold(Duration::zero(), |acc, a| acc + a.slot);

    let mut totals: BTreeMap<ActivityType, TypeTotals> = ActivityType::ALL
        .into_iter()
        .map(|kind| (kind, TypeTotals::zero()))
        .collect();
    let mut daily: Vec<DayBreakdown> = DAY_NAMES
        .iter()
        .map(|&day| DayBreakdown {
            day,
            slots: 0,
            by_type: BTreeMap::new(),
        })
        .collect();
    let mut pattern_counts: BTreeMap<NaiveTime, [[usize; 5]; 7]> = BTreeMap::new();

    for activity in &activities {
        totals
            .get_mut(&activity.kind)
            .expect("totals covers every type")
            .add(activity.slot);

        let day_idx = activity.day_of_week().num_days_from_sunday() as usize;
        let day = &mut daily[day_idx];
        day.slots += 1;
        day.by_type
            .entry(activity.kind)
            .or_insert_with(TypeTotals::zero)
            .add(activity.slot);

        pattern_counts.entry(activity.start_time).or_insert([[0; 5]; 7])[day_idx]
            [activity.kind as usize] += 1;
    }

    let distribution: BTreeMap<ActivityType, TypeBreakdown> = totals
        .into_iter()
        .map(|(kind, t)| {
            (
                kind,
                TypeBreakdown {
                    slots: t.slots,
                    duration: t.duration,
                    percentage: duration_percentage(t.duration, total_duration),
                },
            )
        })
        .collect();

    let shares: BTreeMap<ActivityType, f64> = distribution
        .iter()
        .map(|(&kind, b)| (kind, *b.percentage))
        .collect();
    let balance = if no_data {
        0.
    } else {
        balance_score(&shares, &config.weights)
    };

    let patterns = pattern_counts
        .into_iter()
        .map(|(time, days)| SlotPattern {
            time,
            dominant: days.map(dominant_type),
        })
        .collect();

    AnalysisResult {
        label,
        no_data,
        total_slots,
        total_duration,
        distribution,
        daily,
        top_activities: top_activities(activities.iter().copied(), None, config.top_limit),
        patterns,
        balance_score: balance,
    }
}

/// Ranks specific activities by total duration, ties broken by earliest
/// first occurrence and then alphabetically. Slots with an empty description
/// are skipped, they have nothing to group by. `scope` narrows the ranking
/// to a single activity type.
pub fn top_activities<'a>(
    activities: impl IntoIterator<Item = &'a Activity>,
    scope: Option<ActivityType>,
    limit: usize,
) -> Vec<TopActivity> {
    let mut groups: HashMap<(ActivityType, &str), (TypeTotals, NaiveDate)> = HashMap::new();
    for activity in activities {
        if activity.description.is_empty() {
            continue;
        }
        if scope.is_some_and(|kind| kind != activity.kind) {
            continue;
        }
        let entry = groups
            .entry((activity.kind, activity.description.as_str()))
            .or_insert((TypeTotals::zero(), activity.date));
        entry.0.add(activity.slot);
        entry.1 = entry.1.min(activity.date);
    }

    let mut ranked: Vec<TopActivity> = groups
        .into_iter()
        .map(|((kind, description), (totals, first_seen))| TopActivity {
            description: description.to_string(),
            kind,
            slots: totals.slots,
            duration: totals.duration,
            first_seen,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.duration
            .cmp(&a.duration)
            .then(a.first_seen.cmp(&b.first_seen))
            .then_with(|| a.description.cmp(&b.description))
    });
    ranked.truncate(limit);
    ranked
}

/// Strictly-greater comparison in enumeration order, so ties go to the
/// earlier variant.
fn dominant_type(counts: [usize; 5]) -> Option<ActivityType> {
    let mut best: Option<(usize, ActivityType)> = None;
    for kind in ActivityType::ALL {
        let count = counts[kind as usize];
        if count > 0 && best.map_or(true, |(c, _)| count > c) {
            best = Some((count, kind));
        }
    }
    best.map(|(_, kind)| kind)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, NaiveDate, NaiveTime};

    use super::{analyze, top_activities};
    use crate::{
        grid::{parser::parse_source, source::RawSource},
        model::{
            activity::{Activity, ActivityType},
            config::AnalysisConfig,
        },
    };

    fn slot(date: (i32, u32, u32), time: (u32, u32), kind: ActivityType, descr: &str) -> Activity {
        Activity {
            source: Arc::from("test"),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            start_time: NaiveTime::from_hms_opt(time.0, time.1, 0).unwrap(),
            slot: Duration::minutes(30),
            kind,
            description: descr.to_string(),
        }
    }

    /// 16 rest and 18 work slots in one day column.
    fn rest_work_week() -> Vec<Activity> {
        let mut activities = vec![];
        for i in 0..34u32 {
            let kind = if i < 16 {
                ActivityType::Rest
            } else {
                ActivityType::ProductiveWork
            };
            let descr = if i < 16 { "Sleep" } else { "Work" };
            let minutes = 6 * 60 + i * 30;
            activities.push(slot(
                (2024, 1, 7),
                (minutes / 60, minutes % 60),
                kind,
                descr,
            ));
        }
        activities
    }

    #[test]
    fn rest_work_split_matches_the_slot_counts() {
        let config = AnalysisConfig::default();
        let result = analyze(&rest_work_week(), "week".to_string(), &config);

        assert!(!result.no_data);
        assert_eq!(result.total_slots, 34);
        assert_eq!(result.total_duration, Duration::minutes(34 * 30));

        let rest = &result.distribution[&ActivityType::Rest];
        assert_eq!(rest.slots, 16);
        assert!((*rest.percentage - 1600. / 34.).abs() < 1e-9);

        let work = &result.distribution[&ActivityType::ProductiveWork];
        assert_eq!(work.slots, 18);
        assert!((*work.percentage - 1800. / 34.).abs() < 1e-9);

        for kind in [
            ActivityType::Procrastination,
            ActivityType::GuiltFreePlay,
            ActivityType::MandatoryWork,
        ] {
            assert_eq!(*result.distribution[&kind].percentage, 0.);
        }
    }

    #[test]
    fn percentages_close_to_one_hundred() {
        let config = AnalysisConfig::default();
        let result = analyze(&rest_work_week(), "week".to_string(), &config);
        let sum: f64 = result
            .distribution
            .values()
            .map(|b| *b.percentage)
            .sum();
        assert!((sum - 100.).abs() < 1e-9, "{sum}");
    }

    #[test]
    fn empty_scope_is_flagged_instead_of_dividing_by_zero() {
        let config = AnalysisConfig::default();
        let result = analyze(&[], "empty".to_string(), &config);
        assert!(result.no_data);
        assert_eq!(result.total_slots, 0);
        assert_eq!(result.balance_score, 0.);
        for breakdown in result.distribution.values() {
            assert_eq!(*breakdown.percentage, 0.);
        }
        assert!(result.patterns.is_empty());
        assert!(result.top_activities.is_empty());
    }

    #[test]
    fn parsed_duration_accounts_for_classified_and_absent_slots() {
        // 3 rows x 7 days, 11 classified cells, 10 left blank.
        let rows = vec![
            vec!["08:00", "R: a", "", "R: a", "", "R: a", "", "R: a"],
            vec!["08:30", "", "W: b", "", "W: b", "", "W: b", ""],
            vec!["09:00", "G: c", "G: c", "G: c", "G: c", "", "", ""],
        ];
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(str::to_string).collect())
            .collect();
        let config = AnalysisConfig::default();
        let parsed = parse_source(&RawSource::new("2024_01_01", rows), &config);
        assert!(parsed.errors.is_empty());

        let result = analyze(&parsed.activities, "week".to_string(), &config);
        let classified = result.total_duration;
        let absent = Duration::minutes(10 * 30);
        assert_eq!(classified + absent, Duration::minutes(3 * 7 * 30));
    }

    #[test]
    fn daily_buckets_merge_matching_weekdays() {
        // Two Mondays a week apart plus one Tuesday.
        let activities = vec![
            slot((2024, 1, 8), (8, 0), ActivityType::ProductiveWork, ""),
            slot((2024, 1, 15), (8, 0), ActivityType::ProductiveWork, ""),
            slot((2024, 1, 9), (8, 0), ActivityType::Rest, ""),
        ];
        let result = analyze(&activities, "month".to_string(), &AnalysisConfig::default());
        assert_eq!(result.daily[1].day, "Monday");
        assert_eq!(result.daily[1].slots, 2);
        assert_eq!(
            result.daily[1].by_type[&ActivityType::ProductiveWork].slots,
            2
        );
        assert_eq!(result.daily[2].slots, 1);
        assert_eq!(result.daily[0].slots, 0);
    }

    #[test]
    fn top_activities_rank_by_duration_then_first_seen_then_name() {
        let activities = vec![
            slot((2024, 1, 8), (8, 0), ActivityType::ProductiveWork, "Writing"),
            slot((2024, 1, 8), (8, 30), ActivityType::ProductiveWork, "Writing"),
            slot((2024, 1, 7), (8, 0), ActivityType::GuiltFreePlay, "Chess"),
            slot((2024, 1, 9), (8, 0), ActivityType::Rest, "Nap"),
            // Same duration and day as Nap, alphabetical order decides.
            slot((2024, 1, 9), (9, 0), ActivityType::Rest, "Bath"),
            slot((2024, 1, 9), (10, 0), ActivityType::Rest, ""),
        ];
        let ranked = top_activities(&activities, None, 10);
        let names: Vec<_> = ranked.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(names, vec!["Writing", "Chess", "Bath", "Nap"]);

        let scoped = top_activities(&activities, Some(ActivityType::Rest), 10);
        let names: Vec<_> = scoped.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(names, vec!["Bath", "Nap"]);

        let limited = top_activities(&activities, None, 2);
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn pattern_ties_go_to_the_earlier_enum_variant() {
        // Two Sundays, same slot, one Rest and one ProductiveWork.
        let activities = vec![
            slot((2024, 1, 7), (8, 0), ActivityType::ProductiveWork, ""),
            slot((2024, 1, 14), (8, 0), ActivityType::Rest, ""),
            // A second work slot at 08:30 makes work dominant there.
            slot((2024, 1, 7), (8, 30), ActivityType::ProductiveWork, ""),
            slot((2024, 1, 14), (8, 30), ActivityType::ProductiveWork, ""),
        ];
        let result = analyze(&activities, "month".to_string(), &AnalysisConfig::default());
        assert_eq!(result.patterns.len(), 2);
        assert_eq!(result.patterns[0].dominant[0], Some(ActivityType::Rest));
        assert_eq!(
            result.patterns[1].dominant[0],
            Some(ActivityType::ProductiveWork)
        );
        assert_eq!(result.patterns[0].dominant[1], None);
    }
}
