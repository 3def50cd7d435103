use super::*;
use crate::fetcher::{FetchResponse, VoteTally};
use crate::scoring::ScoringConfig;
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

fn response(reference_id: u32, total: u32, downvotes: u32) -> FetchResponse {
    FetchResponse::new(reference_id, VoteTally::new(total, downvotes), VoteTally::default())
}

fn rating(reference_id: u32, roll: &str, count: u32) -> Rating {
    Rating {
        reference_id,
        roll: roll.to_string(),
        overall_score: 3.0,
        last_updated: Utc::now(),
        rating_count: count,
        highlighted_rating_count: 0,
    }
}

// ============================================================================
// RatingsStore
// ============================================================================

#[test]
fn test_key_display() {
    assert_eq!(RatingKey::new(1234, "1,2,3").to_string(), "1234-1,2,3");
    assert_eq!(RatingKey::new(9, FIXED_ROLL).to_string(), "9-fixed");
}

#[test]
fn test_apply_replaces_by_key() {
    let store = RatingsStore::new();

    let first = store.apply(vec![rating(1, "fixed", 10), rating(2, "fixed", 20)]);
    assert_eq!(first.inserted, 2);
    assert_eq!(first.replaced, 0);

    let second = store.apply(vec![rating(1, "fixed", 12), rating(1, "4,5", 3)]);
    assert_eq!(second.inserted, 1);
    assert_eq!(second.replaced, 1);

    assert_eq!(store.len(), 3);
    let key = RatingKey::new(1, "fixed");
    assert_eq!(store.get(&key).map(|r| r.rating_count), Some(12));
}

#[test]
fn test_max_votes_never_regresses() {
    let store = RatingsStore::new();
    store.apply(vec![rating(1, "fixed", 80)]);
    assert_eq!(store.max_total_votes(), 80);

    store.apply(vec![rating(1, "fixed", 5)]);
    assert_eq!(store.max_total_votes(), 80);

    store.clear();
    assert!(store.is_empty());
    assert_eq!(store.max_total_votes(), 0);
}

#[test]
fn test_snapshot_is_detached_copy() {
    let store = RatingsStore::new();
    store.apply(vec![rating(1, "fixed", 1)]);

    let snapshot = store.snapshot();
    store.apply(vec![rating(2, "fixed", 1)]);

    assert_eq!(snapshot.len(), 1);
    assert_eq!(store.len(), 2);
}

// ============================================================================
// add_scores
// ============================================================================

#[test]
fn test_add_scores_empty_is_noop() {
    let store = RatingsStore::new();
    let summary = add_scores(&store, &[], &ScoringConfig::default());

    assert_eq!(summary.inserted + summary.replaced, 0);
    assert!(store.is_empty());
}

#[test]
fn test_add_scores_end_to_end() {
    let store = RatingsStore::new();
    let responses = vec![response(1, 100, 10), response(2, 10, 10)];

    let summary = add_scores(&store, &responses, &ScoringConfig::default());
    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.max_total_votes, 100);

    let established = store.get(&RatingKey::new(1, FIXED_ROLL)).unwrap();
    assert_eq!(established.overall_score, 4.5);
    assert_eq!(established.rating_count, 100);
    assert_eq!(established.highlighted_rating_count, 0);

    let sparse = store.get(&RatingKey::new(2, FIXED_ROLL)).unwrap();
    assert_eq!(sparse.overall_score, 1.0);
    assert_eq!(sparse.rating_count, 10);
}

#[test]
fn test_known_ratings_calibrate_new_scores() {
    let store = RatingsStore::new();
    add_scores(&store, &[response(1, 400, 0)], &ScoringConfig::default());

    // 100 votes alone would be D = 1 (4.5); against 400 known it is D = 2.5
    add_scores(&store, &[response(2, 100, 10)], &ScoringConfig::default());

    let rated = store.get(&RatingKey::new(2, FIXED_ROLL)).unwrap();
    // (100 - 25) / 100 * 5 = 3.75 -> 3.8
    assert_eq!(rated.overall_score, 3.8);
    assert_eq!(store.max_total_votes(), 400);
}

#[test]
fn test_rolls_keep_separate_ratings() {
    let store = RatingsStore::new();
    let mut a = response(7, 20, 0);
    a.available_perks = Some(vec![11, 22]);
    let mut b = response(7, 20, 20);
    b.available_perks = Some(vec![33]);

    add_scores(&store, &[a, b], &ScoringConfig::default());

    assert_eq!(store.len(), 2);
    assert_eq!(store.get(&RatingKey::new(7, "11,22")).unwrap().overall_score, 5.0);
    assert_eq!(store.get(&RatingKey::new(7, "33")).unwrap().overall_score, 1.0);
}

#[test]
fn test_add_scores_is_idempotent() {
    let store = RatingsStore::new();
    let responses = vec![response(1, 100, 10), response(2, 60, 6), response(3, 10, 1)];
    let config = ScoringConfig::default();

    add_scores(&store, &responses, &config);
    let first = store.snapshot();

    let summary = add_scores(&store, &responses, &config);
    let second = store.snapshot();

    assert_eq!(summary.inserted, 0);
    assert_eq!(summary.replaced, 3);
    assert_eq!(first.max_total_votes, second.max_total_votes);

    for (key, before) in &first.ratings {
        let after = second.get(key).unwrap();
        assert_eq!(before.overall_score, after.overall_score);
        assert_eq!(before.rating_count, after.rating_count);
        assert_eq!(before.roll, after.roll);
        assert!(after.last_updated >= before.last_updated);
    }
}

#[test]
fn test_concurrent_merges_do_not_interleave() {
    let store = Arc::new(RatingsStore::new());
    let config = ScoringConfig::default();
    let writers_done = Arc::new(AtomicBool::new(false));

    // every merge installs exactly 50 new keys, so a whole merge is a multiple of 50
    let reader = {
        let store = Arc::clone(&store);
        let writers_done = Arc::clone(&writers_done);
        std::thread::spawn(move || {
            let mut observed = 0usize;
            loop {
                let done = writers_done.load(Ordering::SeqCst);
                let snapshot = store.snapshot();
                assert_eq!(
                    snapshot.len() % 50,
                    0,
                    "saw a partial merge with {} ratings",
                    snapshot.len()
                );
                observed += 1;
                if done {
                    return observed;
                }
            }
        })
    };

    let handles: Vec<_> = (0..8u32)
        .map(|t| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                let responses: Vec<FetchResponse> =
                    (0..50).map(|i| response(t * 1000 + i, i + 1, 0)).collect();
                add_scores(&store, &responses, &config);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    writers_done.store(true, Ordering::SeqCst);

    assert!(reader.join().unwrap() > 0);
    assert_eq!(store.len(), 400);
    assert_eq!(store.max_total_votes(), 50);
}
