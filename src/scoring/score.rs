use crate::fetcher::FetchResponse;

use super::{MAX_SCORE, ScoringConfig};

/// Round to one decimal place; zero and NaN both come back as `0.0`.
pub fn round_to_at_most_one_decimal(rating: f64) -> f64 {
    if rating == 0.0 || rating.is_nan() {
        return 0.0;
    }

    (rating * 10.0).round() / 10.0
}

/// Downvote weight for an item given how its vote volume compares to the
/// best-known item. Thresholds are exclusive: sitting exactly on 75% of the
/// maximum lands in the 1.5 tier.
pub fn downvote_multiplier(votes_total: u32, max_total_votes: u32) -> f64 {
    let total = f64::from(votes_total);
    let max = f64::from(max_total_votes);

    if total > max * 0.75 {
        1.0
    } else if total > max * 0.5 {
        1.5
    } else if total > max * 0.25 {
        2.0
    } else {
        2.5
    }
}

/// Community score in `[0, 5]` for one fetched item.
pub fn score(response: &FetchResponse, max_total_votes: u32, config: &ScoringConfig) -> f64 {
    let weight = config.review_vote_weight;
    let votes = &response.votes;
    let reviews = &response.review_votes;

    let total_votes = f64::from(votes.total) + f64::from(reviews.total) * weight;
    if total_votes <= 0.0 {
        return 0.0;
    }

    let total_down_votes = f64::from(votes.downvotes) + f64::from(reviews.downvotes) * weight;
    let multiplier = downvote_multiplier(votes.total, max_total_votes);

    let rating = ((total_votes - total_down_votes * multiplier) / total_votes) * MAX_SCORE;

    if rating < 1.0 && votes.total > 0 {
        return 1.0;
    }

    // review-only items can still go negative; `+ 0.0` turns -0.0 into 0.0
    round_to_at_most_one_decimal(rating).clamp(0.0, MAX_SCORE) + 0.0
}
