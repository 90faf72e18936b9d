use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    dataset::CanonicalDataset,
    model::{activity::ActivityType, config::AnalysisConfig, period::TimePeriod},
};

use super::analysis::{analyze, AnalysisResult};

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonEntry {
    /// Compact period id, e.g. `2024-M1W2`.
    pub period: String,
    pub result: AnalysisResult,
}

/// Percentage-point movement between two consecutive entries.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodDelta {
    pub from: String,
    pub to: String,
    pub change: BTreeMap<ActivityType, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub period: String,
    pub productive_percentage: f64,
}

/// Multiple periods' analyses aligned into one diffable structure.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    /// Chronological, whatever order the periods were requested in.
    pub entries: Vec<ComparisonEntry>,
    /// Between consecutive entries. Empty when fewer than two periods were
    /// supplied, which is not an error.
    pub deltas: Vec<PeriodDelta>,
    /// ProductiveWork share across the entries, in the same order.
    pub productivity_trend: Vec<TrendPoint>,
}

/// Analyzes each period independently against its own scope and lines the
/// results up chronologically. Granularities may be mixed: percentages are
/// already scope-relative, no further normalization is attempted.
pub fn compare(
    periods: &[TimePeriod],
    dataset: &CanonicalDataset,
    config: &AnalysisConfig,
) -> ComparisonResult {
    let mut periods = periods.to_vec();
    periods.sort();

    let entries: Vec<ComparisonEntry> = periods
        .iter()
        .map(|period| ComparisonEntry {
            period: period.to_string(),
            result: analyze(dataset.query(*period), period.label(), config),
        })
        .collect();

    let deltas = entries
        .windows(2)
        .map(|pair| PeriodDelta {
            from: pair[0].period.clone(),
            to: pair[1].period.clone(),
            change: ActivityType::ALL
                .into_iter()
                .map(|kind| (kind, share(&pair[1].result, kind) - share(&pair[0].result, kind)))
                .collect(),
        })
        .collect();

    let productivity_trend = entries
        .iter()
        .map(|entry| TrendPoint {
            period: entry.period.clone(),
            productive_percentage: share(&entry.result, ActivityType::ProductiveWork),
        })
        .collect();

    ComparisonResult {
        entries,
        deltas,
        productivity_trend,
    }
}

fn share(result: &AnalysisResult, kind: ActivityType) -> f64 {
    result
        .distribution
        .get(&kind)
        .map(|b| *b.percentage)
        .unwrap_or(0.)
}

#[cfg(test)]
mod tests {
    use super::compare;
    use crate::{
        dataset::CanonicalDataset,
        grid::{parser::tests::full_week_rows, source::RawSource},
        model::{activity::ActivityType, config::AnalysisConfig, period::TimePeriod},
    };

    fn dataset() -> CanonicalDataset {
        let sources = vec![
            RawSource::new("2024_01_01", full_week_rows("W: Work")),
            RawSource::new("2024_03_01", full_week_rows("R: Sleep")),
        ];
        CanonicalDataset::load(&sources, &AnalysisConfig::default())
            .unwrap()
            .dataset
    }

    #[test]
    fn output_order_is_chronological_not_request_order() {
        let dataset = dataset();
        let periods = vec![
            TimePeriod::month(2024, 3).unwrap(),
            TimePeriod::month(2024, 1).unwrap(),
        ];
        let comparison = compare(&periods, &dataset, &AnalysisConfig::default());

        let ids: Vec<_> = comparison.entries.iter().map(|e| e.period.as_str()).collect();
        assert_eq!(ids, vec!["2024-M1", "2024-M3"]);

        assert_eq!(comparison.deltas.len(), 1);
        let delta = &comparison.deltas[0];
        assert_eq!(delta.from, "2024-M1");
        assert_eq!(delta.to, "2024-M3");
        // All work in January, all rest in March.
        assert_eq!(delta.change[&ActivityType::ProductiveWork], -100.);
        assert_eq!(delta.change[&ActivityType::Rest], 100.);
        assert_eq!(delta.change[&ActivityType::GuiltFreePlay], 0.);
    }

    #[test]
    fn single_period_has_no_deltas() {
        let dataset = dataset();
        let periods = vec![TimePeriod::month(2024, 1).unwrap()];
        let comparison = compare(&periods, &dataset, &AnalysisConfig::default());
        assert_eq!(comparison.entries.len(), 1);
        assert!(comparison.deltas.is_empty());
    }

    #[test]
    fn mixed_granularities_compare_scope_relative() {
        let dataset = dataset();
        let periods = vec![
            TimePeriod::year(2024).unwrap(),
            TimePeriod::week(2024, 1, 1).unwrap(),
        ];
        let comparison = compare(&periods, &dataset, &AnalysisConfig::default());
        // The week starts on the year's first day but is shorter, so it
        // sorts first.
        assert_eq!(comparison.entries[0].period, "2024-M1W1");
        assert_eq!(comparison.entries[1].period, "2024");

        let week_work = comparison.productivity_trend[0].productive_percentage;
        let year_work = comparison.productivity_trend[1].productive_percentage;
        assert_eq!(week_work, 100.);
        assert_eq!(year_work, 50.);
    }

    #[test]
    fn empty_scopes_are_flagged_not_failed() {
        let dataset = dataset();
        let periods = vec![TimePeriod::month(2024, 2).unwrap()];
        let comparison = compare(&periods, &dataset, &AnalysisConfig::default());
        assert!(comparison.entries[0].result.no_data);
        assert_eq!(comparison.productivity_trend[0].productive_percentage, 0.);
    }
}
