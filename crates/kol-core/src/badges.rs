//! Badge eligibility.
//!
//! Eligibility is pure threshold comparison over a snapshot of counts and
//! averages. Given the same inputs the result is always the same, and the
//! set of earned (kind, tier) pairs never shrinks as counts grow. Awarded
//! badge rows are never mutated or revoked, so a later dip in an average
//! cannot take a badge away.

use serde::{Deserialize, Serialize};

/// Bronze/silver/gold level within a badge kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTier {
    Bronze,
    Silver,
    Gold,
}

impl BadgeTier {
    pub const ALL: [BadgeTier; 3] = [BadgeTier::Bronze, BadgeTier::Silver, BadgeTier::Gold];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
        }
    }

    /// Wire identifier, matching the serde representation.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
        }
    }

    pub fn as_i16(&self) -> i16 {
        match self {
            Self::Bronze => 0,
            Self::Silver => 1,
            Self::Gold => 2,
        }
    }

    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(Self::Bronze),
            1 => Some(Self::Silver),
            2 => Some(Self::Gold),
            _ => None,
        }
    }
}

/// Badge kinds earned by reviewing users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserBadgeKind {
    /// Reviews written.
    Reviewer,
    /// Helpful votes received across own reviews.
    HelpfulVoice,
}

impl UserBadgeKind {
    pub const ALL: [UserBadgeKind; 2] = [UserBadgeKind::Reviewer, UserBadgeKind::HelpfulVoice];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Reviewer => "Reviewer",
            Self::HelpfulVoice => "Helpful Voice",
        }
    }

    /// Wire identifier, matching the serde representation.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Reviewer => "reviewer",
            Self::HelpfulVoice => "helpful_voice",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Reviewer => "Wrote reviews for traders",
            Self::HelpfulVoice => "Reviews marked helpful by the community",
        }
    }

    pub fn as_i16(&self) -> i16 {
        match self {
            Self::Reviewer => 0,
            Self::HelpfulVoice => 1,
        }
    }

    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(Self::Reviewer),
            1 => Some(Self::HelpfulVoice),
            _ => None,
        }
    }

    /// Bronze/silver/gold count thresholds.
    pub fn thresholds(&self) -> [i64; 3] {
        match self {
            Self::Reviewer => [1, 5, 20],
            Self::HelpfulVoice => [5, 25, 100],
        }
    }
}

/// Badge kinds earned by rated traders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraderBadgeKind {
    /// Total reviews received.
    Reviewed,
    /// Average overall rating.
    TopRated,
    /// Five-star reviews received.
    FanFavorite,
    /// Average profitability score.
    ProfitMachine,
}

impl TraderBadgeKind {
    pub const ALL: [TraderBadgeKind; 4] = [
        TraderBadgeKind::Reviewed,
        TraderBadgeKind::TopRated,
        TraderBadgeKind::FanFavorite,
        TraderBadgeKind::ProfitMachine,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Reviewed => "Reviewed",
            Self::TopRated => "Top Rated",
            Self::FanFavorite => "Fan Favorite",
            Self::ProfitMachine => "Profit Machine",
        }
    }

    /// Wire identifier, matching the serde representation.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Reviewed => "reviewed",
            Self::TopRated => "top_rated",
            Self::FanFavorite => "fan_favorite",
            Self::ProfitMachine => "profit_machine",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Reviewed => "Received reviews from the community",
            Self::TopRated => "Maintains a high average rating",
            Self::FanFavorite => "Collected five-star reviews",
            Self::ProfitMachine => "Rated highly for profitability",
        }
    }

    pub fn as_i16(&self) -> i16 {
        match self {
            Self::Reviewed => 0,
            Self::TopRated => 1,
            Self::FanFavorite => 2,
            Self::ProfitMachine => 3,
        }
    }

    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(Self::Reviewed),
            1 => Some(Self::TopRated),
            2 => Some(Self::FanFavorite),
            3 => Some(Self::ProfitMachine),
            _ => None,
        }
    }
}

/// Minimum review count before average-based trader badges apply.
pub const MIN_RATINGS_FOR_AVERAGE_BADGES: i64 = 5;

const COUNT_THRESHOLDS_REVIEWED: [i64; 3] = [5, 25, 100];
const COUNT_THRESHOLDS_FAN_FAVORITE: [i64; 3] = [5, 20, 50];
const AVERAGE_THRESHOLDS: [f64; 3] = [4.0, 4.5, 4.8];

/// Snapshot of the counts a user's badges are computed from.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserBadgeInputs {
    pub reviews_written: i64,
    pub helpful_votes_received: i64,
}

/// Snapshot of the counts and averages a trader's badges are computed from.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraderBadgeInputs {
    pub review_count: i64,
    pub average_rating: f64,
    pub five_star_count: i64,
    pub average_profitability: f64,
}

/// All (kind, tier) pairs the user is currently eligible for.
pub fn eligible_user_badges(inputs: &UserBadgeInputs) -> Vec<(UserBadgeKind, BadgeTier)> {
    let mut earned = Vec::new();
    for kind in UserBadgeKind::ALL {
        let value = match kind {
            UserBadgeKind::Reviewer => inputs.reviews_written,
            UserBadgeKind::HelpfulVoice => inputs.helpful_votes_received,
        };
        for (tier, threshold) in BadgeTier::ALL.into_iter().zip(kind.thresholds()) {
            if value >= threshold {
                earned.push((kind, tier));
            }
        }
    }
    earned
}

/// All (kind, tier) pairs the trader is currently eligible for.
///
/// Average-based kinds only apply once the trader has at least
/// [`MIN_RATINGS_FOR_AVERAGE_BADGES`] reviews, so a single early five-star
/// review does not mint a gold badge.
pub fn eligible_trader_badges(inputs: &TraderBadgeInputs) -> Vec<(TraderBadgeKind, BadgeTier)> {
    let mut earned = Vec::new();
    for kind in TraderBadgeKind::ALL {
        match kind {
            TraderBadgeKind::Reviewed | TraderBadgeKind::FanFavorite => {
                let (value, thresholds) = if kind == TraderBadgeKind::Reviewed {
                    (inputs.review_count, COUNT_THRESHOLDS_REVIEWED)
                } else {
                    (inputs.five_star_count, COUNT_THRESHOLDS_FAN_FAVORITE)
                };
                for (tier, threshold) in BadgeTier::ALL.into_iter().zip(thresholds) {
                    if value >= threshold {
                        earned.push((kind, tier));
                    }
                }
            }
            TraderBadgeKind::TopRated | TraderBadgeKind::ProfitMachine => {
                if inputs.review_count < MIN_RATINGS_FOR_AVERAGE_BADGES {
                    continue;
                }
                let value = if kind == TraderBadgeKind::TopRated {
                    inputs.average_rating
                } else {
                    inputs.average_profitability
                };
                for (tier, threshold) in BadgeTier::ALL.into_iter().zip(AVERAGE_THRESHOLDS) {
                    if value >= threshold {
                        earned.push((kind, tier));
                    }
                }
            }
        }
    }
    earned
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_no_activity_earns_nothing() {
        assert!(eligible_user_badges(&UserBadgeInputs::default()).is_empty());
        assert!(eligible_trader_badges(&TraderBadgeInputs::default()).is_empty());
    }

    #[test]
    fn test_first_review_earns_bronze_reviewer() {
        let earned = eligible_user_badges(&UserBadgeInputs {
            reviews_written: 1,
            helpful_votes_received: 0,
        });
        assert_eq!(earned, vec![(UserBadgeKind::Reviewer, BadgeTier::Bronze)]);
    }

    #[test]
    fn test_threshold_boundaries_are_inclusive() {
        let at = eligible_user_badges(&UserBadgeInputs {
            reviews_written: 5,
            helpful_votes_received: 0,
        });
        assert!(at.contains(&(UserBadgeKind::Reviewer, BadgeTier::Silver)));

        let below = eligible_user_badges(&UserBadgeInputs {
            reviews_written: 4,
            helpful_votes_received: 0,
        });
        assert!(!below.contains(&(UserBadgeKind::Reviewer, BadgeTier::Silver)));
    }

    #[test]
    fn test_gold_implies_lower_tiers() {
        let earned = eligible_user_badges(&UserBadgeInputs {
            reviews_written: 20,
            helpful_votes_received: 0,
        });
        assert!(earned.contains(&(UserBadgeKind::Reviewer, BadgeTier::Bronze)));
        assert!(earned.contains(&(UserBadgeKind::Reviewer, BadgeTier::Silver)));
        assert!(earned.contains(&(UserBadgeKind::Reviewer, BadgeTier::Gold)));
    }

    #[test]
    fn test_eligibility_is_monotonic_in_counts() {
        // Growing any count never removes an earned pair.
        let mut previous: HashSet<(UserBadgeKind, BadgeTier)> = HashSet::new();
        for n in 0..120 {
            let earned: HashSet<_> = eligible_user_badges(&UserBadgeInputs {
                reviews_written: n,
                helpful_votes_received: n,
            })
            .into_iter()
            .collect();
            assert!(previous.is_subset(&earned), "regressed at count {n}");
            previous = earned;
        }
    }

    #[test]
    fn test_average_badges_gated_on_review_count() {
        let few = eligible_trader_badges(&TraderBadgeInputs {
            review_count: 4,
            average_rating: 5.0,
            five_star_count: 4,
            average_profitability: 5.0,
        });
        assert!(!few
            .iter()
            .any(|(kind, _)| matches!(kind, TraderBadgeKind::TopRated | TraderBadgeKind::ProfitMachine)));

        let enough = eligible_trader_badges(&TraderBadgeInputs {
            review_count: 5,
            average_rating: 5.0,
            five_star_count: 5,
            average_profitability: 5.0,
        });
        assert!(enough.contains(&(TraderBadgeKind::TopRated, BadgeTier::Gold)));
        assert!(enough.contains(&(TraderBadgeKind::ProfitMachine, BadgeTier::Gold)));
        assert!(enough.contains(&(TraderBadgeKind::Reviewed, BadgeTier::Bronze)));
        assert!(enough.contains(&(TraderBadgeKind::FanFavorite, BadgeTier::Bronze)));
    }

    #[test]
    fn test_average_tier_boundaries() {
        let inputs = |average_rating| TraderBadgeInputs {
            review_count: 10,
            average_rating,
            five_star_count: 0,
            average_profitability: 0.0,
        };
        let tiers = |avg: f64| -> Vec<BadgeTier> {
            eligible_trader_badges(&inputs(avg))
                .into_iter()
                .filter(|(kind, _)| *kind == TraderBadgeKind::TopRated)
                .map(|(_, tier)| tier)
                .collect()
        };

        assert!(tiers(3.9).is_empty());
        assert_eq!(tiers(4.0), vec![BadgeTier::Bronze]);
        assert_eq!(tiers(4.5), vec![BadgeTier::Bronze, BadgeTier::Silver]);
        assert_eq!(
            tiers(4.8),
            vec![BadgeTier::Bronze, BadgeTier::Silver, BadgeTier::Gold]
        );
    }

    #[test]
    fn test_i16_round_trips() {
        for kind in UserBadgeKind::ALL {
            assert_eq!(UserBadgeKind::from_i16(kind.as_i16()), Some(kind));
        }
        for kind in TraderBadgeKind::ALL {
            assert_eq!(TraderBadgeKind::from_i16(kind.as_i16()), Some(kind));
        }
        for tier in BadgeTier::ALL {
            assert_eq!(BadgeTier::from_i16(tier.as_i16()), Some(tier));
        }
        assert_eq!(BadgeTier::from_i16(7), None);
    }
}
