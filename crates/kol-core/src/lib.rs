//! KOL Core Library
//!
//! Shared domain types, rating aggregation, and badge eligibility for the
//! RateMyKOL platform.

pub mod aggregation;
pub mod badges;
pub mod types;

pub use aggregation::{aggregate, RatingStats};
pub use badges::{
    eligible_trader_badges, eligible_user_badges, BadgeTier, TraderBadgeInputs, TraderBadgeKind,
    UserBadgeInputs, UserBadgeKind,
};
pub use types::{RatingScores, ScoreError};
