//! Shared domain types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Valid range for every rating sub-score.
pub const SCORE_MIN: i16 = 1;
/// Valid range for every rating sub-score.
pub const SCORE_MAX: i16 = 5;

/// A rating sub-score was outside the 1-5 range.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{field} score must be between {SCORE_MIN} and {SCORE_MAX}, got {value}")]
pub struct ScoreError {
    pub field: &'static str,
    pub value: i16,
}

/// The five integer sub-scores of one rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingScores {
    pub overall: i16,
    pub strategy: i16,
    pub communication: i16,
    pub reliability: i16,
    pub profitability: i16,
}

impl RatingScores {
    /// Check that every sub-score is within the 1-5 range.
    pub fn validate(&self) -> Result<(), ScoreError> {
        for (field, value) in self.fields() {
            if !(SCORE_MIN..=SCORE_MAX).contains(&value) {
                return Err(ScoreError { field, value });
            }
        }
        Ok(())
    }

    /// Sub-scores paired with their field names, in declaration order.
    pub fn fields(&self) -> [(&'static str, i16); 5] {
        [
            ("overall", self.overall),
            ("strategy", self.strategy),
            ("communication", self.communication),
            ("reliability", self.reliability),
            ("profitability", self.profitability),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(overall: i16) -> RatingScores {
        RatingScores {
            overall,
            strategy: 3,
            communication: 3,
            reliability: 3,
            profitability: 3,
        }
    }

    #[test]
    fn test_valid_scores() {
        assert!(scores(1).validate().is_ok());
        assert!(scores(5).validate().is_ok());
    }

    #[test]
    fn test_out_of_range_scores() {
        let err = scores(0).validate().unwrap_err();
        assert_eq!(err.field, "overall");
        assert_eq!(err.value, 0);

        assert!(scores(6).validate().is_err());

        let mut s = scores(4);
        s.profitability = -1;
        let err = s.validate().unwrap_err();
        assert_eq!(err.field, "profitability");
    }
}
