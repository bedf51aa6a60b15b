//! Per-trader rating aggregation.
//!
//! Averages are recomputed in full from the stored rating rows on every
//! read; there is no incremental maintenance and no weighting.

use serde::{Deserialize, Serialize};

use crate::types::RatingScores;

/// Aggregated rating statistics for one trader.
///
/// Every average is rounded to one decimal place. A trader with no ratings
/// has all-zero averages and a count of zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RatingStats {
    pub average_rating: f64,
    pub average_strategy: f64,
    pub average_communication: f64,
    pub average_reliability: f64,
    pub average_profitability: f64,
    pub total_ratings: i64,
}

/// Compute aggregate statistics over all ratings for a trader.
pub fn aggregate(scores: &[RatingScores]) -> RatingStats {
    if scores.is_empty() {
        return RatingStats::default();
    }

    let count = scores.len() as f64;
    let mut sums = [0.0f64; 5];
    for s in scores {
        sums[0] += s.overall as f64;
        sums[1] += s.strategy as f64;
        sums[2] += s.communication as f64;
        sums[3] += s.reliability as f64;
        sums[4] += s.profitability as f64;
    }

    RatingStats {
        average_rating: round_one_decimal(sums[0] / count),
        average_strategy: round_one_decimal(sums[1] / count),
        average_communication: round_one_decimal(sums[2] / count),
        average_reliability: round_one_decimal(sums[3] / count),
        average_profitability: round_one_decimal(sums[4] / count),
        total_ratings: scores.len() as i64,
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(overall: i16) -> RatingScores {
        RatingScores {
            overall,
            strategy: overall,
            communication: overall,
            reliability: overall,
            profitability: overall,
        }
    }

    #[test]
    fn test_empty_input_yields_zero_stats() {
        let stats = aggregate(&[]);
        assert_eq!(stats, RatingStats::default());
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.total_ratings, 0);
    }

    #[test]
    fn test_known_scenario() {
        // Trader with overall ratings [5, 5, 4, 3, 5] -> average 4.4, count 5.
        let scores: Vec<RatingScores> = [5, 5, 4, 3, 5].into_iter().map(uniform).collect();
        let stats = aggregate(&scores);
        assert_eq!(stats.average_rating, 4.4);
        assert_eq!(stats.total_ratings, 5);
    }

    #[test]
    fn test_average_is_rounded_mean() {
        // Mean of [4, 5, 5] is 4.666..., rounded to 4.7.
        let scores: Vec<RatingScores> = [4, 5, 5].into_iter().map(uniform).collect();
        assert_eq!(aggregate(&scores).average_rating, 4.7);

        // Mean of [1, 2] is 1.5, stays 1.5.
        let scores: Vec<RatingScores> = [1, 2].into_iter().map(uniform).collect();
        assert_eq!(aggregate(&scores).average_rating, 1.5);
    }

    #[test]
    fn test_dimensions_average_independently() {
        let scores = vec![
            RatingScores {
                overall: 5,
                strategy: 1,
                communication: 3,
                reliability: 2,
                profitability: 4,
            },
            RatingScores {
                overall: 4,
                strategy: 2,
                communication: 3,
                reliability: 5,
                profitability: 5,
            },
        ];
        let stats = aggregate(&scores);
        assert_eq!(stats.average_rating, 4.5);
        assert_eq!(stats.average_strategy, 1.5);
        assert_eq!(stats.average_communication, 3.0);
        assert_eq!(stats.average_reliability, 3.5);
        assert_eq!(stats.average_profitability, 4.5);
        assert_eq!(stats.total_ratings, 2);
    }

    #[test]
    fn test_single_rating() {
        let stats = aggregate(&[uniform(3)]);
        assert_eq!(stats.average_rating, 3.0);
        assert_eq!(stats.total_ratings, 1);
    }
}
