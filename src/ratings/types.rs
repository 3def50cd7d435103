use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one rated roll of an item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RatingKey {
    pub reference_id: u32,
    pub roll: String,
}

impl RatingKey {
    pub fn new(reference_id: u32, roll: impl Into<String>) -> Self {
        Self {
            reference_id,
            roll: roll.into(),
        }
    }
}

impl fmt::Display for RatingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.reference_id, self.roll)
    }
}

/// Community rating for one item roll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub reference_id: u32,
    /// Perk signature this rating applies to
    pub roll: String,
    /// Score in `[0, 5]`, one decimal
    pub overall_score: f64,
    pub last_updated: DateTime<Utc>,
    /// Plain votes behind the score
    pub rating_count: u32,
    /// Always 0: the bulk endpoint does not report highlighted reviews
    pub highlighted_rating_count: u32,
}

impl Rating {
    pub fn key(&self) -> RatingKey {
        RatingKey::new(self.reference_id, self.roll.clone())
    }
}

/// Result of folding one set of responses into the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub inserted: usize,
    pub replaced: usize,
    /// Volume the scores were calibrated against
    pub max_total_votes: u32,
}
