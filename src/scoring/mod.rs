mod score;


use serde::{Deserialize, Serialize};

pub use score::{downvote_multiplier, round_to_at_most_one_decimal, score};

/// Upper bound of a community score
pub const MAX_SCORE: f64 = 5.0;

/// How much one written-review vote counts relative to a plain up/down vote
pub const DEFAULT_REVIEW_VOTE_WEIGHT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub review_vote_weight: f64,
}

impl ScoringConfig {
    pub fn new(review_vote_weight: f64) -> Self {
        Self { review_vote_weight }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REVIEW_VOTE_WEIGHT)
    }
}
