use std::collections::BTreeMap;

use crate::model::{activity::ActivityType, config::BalanceWeights};

/// Folds the percentage shares of classified time into one 0-100 scalar.
///
/// The raw score is the weight-weighted sum of the shares, which lands
/// between the smallest and the largest weight in the table whenever shares
/// sum to 100. It's then rescaled onto 0-100 and clamped, so all tracked
/// time in the best-weighted type scores 100 and all of it in the
/// worst-weighted type scores 0.
pub fn balance_score(shares: &BTreeMap<ActivityType, f64>, weights: &BalanceWeights) -> f64 {
    let raw: f64 = ActivityType::ALL
        .into_iter()
        .map(|kind| weights.get(kind) * shares.get(&kind).copied().unwrap_or(0.) / 100.)
        .sum();
    let (min, max) = weights.bounds();
    if max - min < f64::EPSILON {
        // A flat table ranks every distribution the same.
        return 50.;
    }
    ((raw - min) / (max - min) * 100.).clamp(0., 100.)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::balance_score;
    use crate::model::{activity::ActivityType, config::BalanceWeights};

    fn shares(pairs: &[(ActivityType, f64)]) -> BTreeMap<ActivityType, f64> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn extremes_pin_the_scale() {
        let weights = BalanceWeights::default();
        let all_work = shares(&[(ActivityType::ProductiveWork, 100.)]);
        assert_eq!(balance_score(&all_work, &weights), 100.);

        let all_procrastination = shares(&[(ActivityType::Procrastination, 100.)]);
        assert_eq!(balance_score(&all_procrastination, &weights), 0.);
    }

    #[test]
    fn more_productive_work_weakly_raises_the_score() {
        let weights = BalanceWeights::default();
        let mut previous = f64::NEG_INFINITY;
        for work in [0., 25., 50., 75., 100.] {
            let score = balance_score(
                &shares(&[
                    (ActivityType::ProductiveWork, work),
                    (ActivityType::MandatoryWork, 100. - work),
                ]),
                &weights,
            );
            assert!(score >= previous, "{work}: {score} < {previous}");
            previous = score;
        }
    }

    #[test]
    fn more_procrastination_weakly_lowers_the_score() {
        let weights = BalanceWeights::default();
        let mut previous = f64::INFINITY;
        for wasted in [0., 30., 60., 90.] {
            let score = balance_score(
                &shares(&[
                    (ActivityType::Procrastination, wasted),
                    (ActivityType::Rest, 100. - wasted),
                ]),
                &weights,
            );
            assert!(score <= previous, "{wasted}: {score} > {previous}");
            previous = score;
        }
    }

    #[test]
    fn a_custom_table_is_honored() {
        // Rest-maximalist policy.
        let weights = BalanceWeights::new([1., 0., 0., 0., 0.]);
        let rested = shares(&[(ActivityType::Rest, 100.)]);
        assert_eq!(balance_score(&rested, &weights), 100.);
        let working = shares(&[(ActivityType::ProductiveWork, 100.)]);
        assert_eq!(balance_score(&working, &weights), 0.);
    }
}
