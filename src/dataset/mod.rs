use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::info;

use crate::{
    error::ParseError,
    grid::{parser::parse_source, source::RawSource},
    model::{activity::Activity, config::AnalysisConfig, period::TimePeriod},
};

/// The validated, deduplicated collection of every parsed activity, indexed
/// by date so period queries walk matching days instead of the whole set.
/// Read-only once built.
#[derive(Debug)]
pub struct CanonicalDataset {
    activities: Vec<Activity>,
    by_date: BTreeMap<NaiveDate, Vec<usize>>,
}

/// A batch load that got far enough to produce a dataset. Sources that
/// failed validation degrade the result, their errors ride along instead of
/// aborting the rest of the batch.
#[derive(Debug)]
pub struct LoadReport {
    pub dataset: CanonicalDataset,
    pub errors: Vec<ParseError>,
}

impl CanonicalDataset {
    /// Parses every source and merges the results. All parse errors across
    /// all sources are accumulated. The one unrecoverable condition is a
    /// `(date, start_time)` collision between sources: that means ambiguous
    /// ground truth for a moment in time, so the whole load fails and no
    /// partial dataset is exposed.
    pub fn load(
        sources: &[RawSource],
        config: &AnalysisConfig,
    ) -> Result<LoadReport, Vec<ParseError>> {
        let mut activities: Vec<Activity> = vec![];
        let mut errors: Vec<ParseError> = vec![];

        // Each parse is independent, merging happens only after all of them.
        for source in sources {
            let parsed = parse_source(source, config);
            activities.extend(parsed.activities);
            errors.extend(parsed.errors);
        }

        // The duplicate check runs once over the merged set, so the merge
        // order can't change whether a load succeeds.
        let mut seen: HashMap<(NaiveDate, NaiveTime), Arc<str>> = HashMap::new();
        let mut duplicates: Vec<ParseError> = vec![];
        for activity in &activities {
            let slot = (activity.date, activity.start_time);
            if let Some(first) = seen.insert(slot, activity.source.clone()) {
                duplicates.push(ParseError::DuplicateSlot {
                    date: activity.date,
                    time: activity.start_time,
                    first,
                    second: activity.source.clone(),
                });
            }
        }
        if !duplicates.is_empty() {
            errors.extend(duplicates);
            return Err(errors);
        }

        info!(
            "loaded {} activities from {} sources ({} errors)",
            activities.len(),
            sources.len(),
            errors.len()
        );
        Ok(LoadReport {
            dataset: CanonicalDataset::from_activities(activities),
            errors,
        })
    }

    fn from_activities(activities: Vec<Activity>) -> CanonicalDataset {
        let mut by_date: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();
        for (idx, activity) in activities.iter().enumerate() {
            by_date.entry(activity.date).or_default().push(idx);
        }
        CanonicalDataset {
            activities,
            by_date,
        }
    }

    pub fn all(&self) -> &[Activity] {
        &self.activities
    }

    /// Activities whose date falls inside the period, via the date index.
    pub fn query(&self, period: TimePeriod) -> Vec<&Activity> {
        self.by_date
            .range(period.start()..period.end())
            .flat_map(|(_, indices)| indices.iter().map(|&i| &self.activities[i]))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}
