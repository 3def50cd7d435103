use chrono::Utc;
use tracing::{debug, instrument};

use crate::fetcher::FetchResponse;
use crate::scoring::{ScoringConfig, score};

use super::roll::roll_signature;
use super::store::RatingsStore;
use super::types::{MergeSummary, Rating};

/// Score `responses` and fold them into `store`.
///
/// The downvote tiers are calibrated against the larger of the busiest
/// response and the busiest rating already known, so repeated fetches keep
/// scoring on the same scale.
#[instrument(skip_all, fields(responses = responses.len()))]
pub fn add_scores(
    store: &RatingsStore,
    responses: &[FetchResponse],
    config: &ScoringConfig,
) -> MergeSummary {
    if responses.is_empty() {
        return MergeSummary {
            max_total_votes: store.max_total_votes(),
            ..MergeSummary::default()
        };
    }

    let fetched_max = responses.iter().map(|r| r.votes.total).max().unwrap_or(0);

    let summary = store.update(|known_max| {
        let max_total_votes = fetched_max.max(known_max);
        responses
            .iter()
            .map(|response| make_rating(response, max_total_votes, config))
            .collect()
    });

    debug!(
        inserted = summary.inserted,
        replaced = summary.replaced,
        max_total_votes = summary.max_total_votes,
        "ratings merged"
    );

    summary
}

fn make_rating(response: &FetchResponse, max_total_votes: u32, config: &ScoringConfig) -> Rating {
    Rating {
        reference_id: response.reference_id,
        roll: roll_signature(response.available_perks.as_deref()),
        overall_score: score(response, max_total_votes, config),
        last_updated: Utc::now(),
        rating_count: response.votes.total,
        highlighted_rating_count: 0,
    }
}
