use chrono::Duration;

use super::activity::ActivityType;

/// Weight each activity type contributes to the balance score, indexed by
/// [ActivityType] enumeration order. This is policy, not arithmetic: swap the
/// table to evaluate a different idea of "balanced".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceWeights {
    weights: [f64; 5],
}

impl BalanceWeights {
    pub fn new(weights: [f64; 5]) -> BalanceWeights {
        BalanceWeights { weights }
    }

    pub fn get(&self, kind: ActivityType) -> f64 {
        self.weights[kind as usize]
    }

    /// Smallest and largest weight in the table, used to normalize raw
    /// scores onto 0-100.
    pub fn bounds(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for w in self.weights {
            min = min.min(w);
            max = max.max(w);
        }
        (min, max)
    }
}

impl Default for BalanceWeights {
    fn default() -> Self {
        // Rest, Procrastination, Guilt-free Play, Mandatory Work,
        // Productive Work.
        BalanceWeights::new([0.5, -1.0, 0.2, 0.0, 1.0])
    }
}

/// Tunables threaded explicitly into the parser and the statistics engine
/// instead of living in module state.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Fixed granularity of one grid row.
    pub slot: Duration,
    pub weights: BalanceWeights,
    /// How many specific activities to keep in a ranking.
    pub top_limit: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            slot: Duration::minutes(30),
            weights: BalanceWeights::default(),
            top_limit: 10,
        }
    }
}
