use parking_lot::RwLock;
use std::collections::HashMap;

use super::types::{MergeSummary, Rating, RatingKey};

/// Point-in-time copy of every known rating.
#[derive(Debug, Clone, Default)]
pub struct RatingsSnapshot {
    pub ratings: HashMap<RatingKey, Rating>,
    /// Highest `rating_count` seen this session
    pub max_total_votes: u32,
}

impl RatingsSnapshot {
    pub fn get(&self, key: &RatingKey) -> Option<&Rating> {
        self.ratings.get(key)
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}

/// Shared in-memory ratings store.
///
/// Every write goes through a single lock acquisition, so readers see either
/// the whole of a merge or none of it.
#[derive(Debug, Default)]
pub struct RatingsStore {
    inner: RwLock<RatingsSnapshot>,
}

impl RatingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> RatingsSnapshot {
        self.inner.read().clone()
    }

    pub fn get(&self, key: &RatingKey) -> Option<Rating> {
        self.inner.read().ratings.get(key).cloned()
    }

    pub fn max_total_votes(&self) -> u32 {
        self.inner.read().max_total_votes
    }

    pub fn len(&self) -> usize {
        self.inner.read().ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().ratings.is_empty()
    }

    /// Install ratings, replacing any existing rating with the same key.
    pub fn apply(&self, ratings: Vec<Rating>) -> MergeSummary {
        self.update(|_| ratings)
    }

    /// Build ratings from the current max vote count and install them while
    /// holding the write lock, so two merges cannot interleave.
    pub fn update<F>(&self, build: F) -> MergeSummary
    where
        F: FnOnce(u32) -> Vec<Rating>,
    {
        let mut inner = self.inner.write();
        let ratings = build(inner.max_total_votes);

        let mut summary = MergeSummary::default();
        for rating in ratings {
            inner.max_total_votes = inner.max_total_votes.max(rating.rating_count);
            match inner.ratings.insert(rating.key(), rating) {
                Some(_) => summary.replaced += 1,
                None => summary.inserted += 1,
            }
        }
        summary.max_total_votes = inner.max_total_votes;
        summary
    }

    /// Forget every rating and reset the max vote count.
    pub fn clear(&self) {
        *self.inner.write() = RatingsSnapshot::default();
    }
}
