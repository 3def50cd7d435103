use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::RatingsConfig;
use crate::fetcher::{
    ActivityMode, BulkFetcher, FetchError, HttpTransport, LoadingTracker, Platform,
    RatingsTransport,
};
use crate::items::{ItemListBuilder, VendorItem, VendorItemList};
use crate::ratings::{MergeSummary, RatingsStore, add_scores};
use crate::scoring::ScoringConfig;

/// What one bulk fetch did to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkFetchOutcome {
    pub fetch_id: Uuid,
    pub requested: usize,
    pub received: usize,
    pub batches_attempted: usize,
    pub batches_failed: usize,
    pub merge: MergeSummary,
}

/// Fetches community ratings and keeps the shared store up to date.
pub struct RatingsService<T> {
    fetcher: BulkFetcher<T>,
    store: Arc<RatingsStore>,
    scoring: ScoringConfig,
}

impl RatingsService<HttpTransport> {
    /// Service talking to the real ratings API
    pub fn from_config(config: &RatingsConfig, store: Arc<RatingsStore>) -> Result<Self, FetchError> {
        let mut transport = HttpTransport::with_timeout(config.endpoint.clone(), config.timeout())?;
        if let Some(key) = &config.api_key {
            transport = transport.api_key(key.clone());
        }

        let fetcher = BulkFetcher::new(transport).batch_size(config.batch_size);
        Ok(Self::new(fetcher, store, config.scoring()))
    }
}

impl<T: RatingsTransport> RatingsService<T> {
    pub fn new(fetcher: BulkFetcher<T>, store: Arc<RatingsStore>, scoring: ScoringConfig) -> Self {
        Self {
            fetcher,
            store,
            scoring,
        }
    }

    pub fn with_tracker(mut self, tracker: Arc<dyn LoadingTracker>) -> Self {
        self.fetcher = self.fetcher.tracker(tracker);
        self
    }

    pub fn store(&self) -> &Arc<RatingsStore> {
        &self.store
    }

    pub fn fetcher(&self) -> &BulkFetcher<T> {
        &self.fetcher
    }

    /// Fetch ratings for everything `source` lists and merge them into the store.
    #[instrument(skip_all, fields(platform = ?platform, mode = ?mode))]
    pub async fn bulk_fetch<S>(
        &self,
        source: &S,
        platform: Platform,
        mode: ActivityMode,
    ) -> BulkFetchOutcome
    where
        S: ItemListBuilder + ?Sized,
    {
        let requests = source.build_requests();
        let report = self
            .fetcher
            .fetch_all_with_report(&requests, platform, mode)
            .await;

        let merge = add_scores(&self.store, &report.responses, &self.scoring);

        let outcome = BulkFetchOutcome {
            fetch_id: report.fetch_id,
            requested: requests.len(),
            received: report.responses.len(),
            batches_attempted: report.batches_attempted,
            batches_failed: report.batches_failed(),
            merge,
        };

        if outcome.requested > 0 {
            info!(
                fetch_id = %outcome.fetch_id,
                requested = outcome.requested,
                received = outcome.received,
                failed_batches = outcome.batches_failed,
                known_ratings = self.store.len(),
                "community ratings updated"
            );
        }

        outcome
    }

    /// Fetch ratings for a vendor's catalog.
    pub async fn bulk_fetch_vendor_items(
        &self,
        vendor_items: &[VendorItem],
        platform: Platform,
        mode: ActivityMode,
    ) -> BulkFetchOutcome {
        let list = VendorItemList::new(vendor_items.to_vec());
        self.bulk_fetch(&list, platform, mode).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::{CountingTracker, FetchRequest, FetchResponse, VoteTally};
    use crate::ratings::{FIXED_ROLL, RatingKey};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Serves canned tallies keyed by reference id; ids it does not know are left out.
    struct CannedTransport {
        tallies: Vec<(u32, VoteTally)>,
        fail_first: bool,
        calls: Mutex<usize>,
    }

    impl CannedTransport {
        fn new(tallies: Vec<(u32, VoteTally)>) -> Self {
            Self {
                tallies,
                fail_first: false,
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl RatingsTransport for CannedTransport {
        async fn fetch_batch(
            &self,
            batch: &[FetchRequest],
            _platform: Platform,
            _mode: ActivityMode,
        ) -> Result<Vec<FetchResponse>, FetchError> {
            let call = {
                let mut calls = self.calls.lock();
                *calls += 1;
                *calls
            };
            if self.fail_first && call == 1 {
                return Err(FetchError::ServerError {
                    status: 503,
                    body: "slow down".into(),
                });
            }

            Ok(batch
                .iter()
                .filter_map(|req| {
                    self.tallies
                        .iter()
                        .find(|(id, _)| *id == req.reference_id)
                        .map(|(id, votes)| FetchResponse::new(*id, *votes, VoteTally::default()))
                })
                .collect())
        }
    }

    fn service(transport: CannedTransport, batch_size: usize) -> RatingsService<CannedTransport> {
        let fetcher = BulkFetcher::new(transport).batch_size(batch_size);
        RatingsService::new(fetcher, Arc::new(RatingsStore::new()), ScoringConfig::default())
    }

    #[tokio::test]
    async fn test_bulk_fetch_populates_store() {
        let svc = service(
            CannedTransport::new(vec![
                (1, VoteTally::new(100, 10)),
                (2, VoteTally::new(10, 10)),
            ]),
            10,
        );

        let requests = vec![FetchRequest::new(1), FetchRequest::new(2), FetchRequest::new(3)];
        let outcome = svc
            .bulk_fetch(&requests, Platform::Steam, ActivityMode::PlayerVersusEnemy)
            .await;

        assert_eq!(outcome.requested, 3);
        // item 3 has no data; that is not an error
        assert_eq!(outcome.received, 2);
        assert_eq!(outcome.batches_failed, 0);
        assert_eq!(outcome.merge.inserted, 2);

        let store = svc.store();
        assert_eq!(store.get(&RatingKey::new(1, FIXED_ROLL)).unwrap().overall_score, 4.5);
        assert_eq!(store.get(&RatingKey::new(2, FIXED_ROLL)).unwrap().overall_score, 1.0);
        assert_eq!(store.max_total_votes(), 100);
    }

    #[tokio::test]
    async fn test_failed_batch_still_merges_the_rest() {
        crate::init_test_tracing();
        let mut transport = CannedTransport::new((0..4).map(|i| (i, VoteTally::new(8, 0))).collect());
        transport.fail_first = true;
        let tracker = Arc::new(CountingTracker::new());
        let svc = service(transport, 2).with_tracker(tracker.clone());

        let requests: Vec<FetchRequest> = (0..4).map(FetchRequest::new).collect();
        let outcome = svc
            .bulk_fetch(&requests, Platform::Xbox, ActivityMode::PlayerVersusPlayer)
            .await;

        assert_eq!(outcome.batches_attempted, 2);
        assert_eq!(outcome.batches_failed, 1);
        assert_eq!(outcome.received, 2);
        assert_eq!(svc.store().len(), 2);
        assert!(svc.store().get(&RatingKey::new(0, FIXED_ROLL)).is_none());
        assert_eq!(tracker.peak_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_empty_vendor_list_short_circuits() {
        let svc = service(CannedTransport::new(vec![]), 10);

        let outcome = svc
            .bulk_fetch_vendor_items(&[], Platform::Psn, ActivityMode::NotSpecified)
            .await;

        assert_eq!(outcome.requested, 0);
        assert_eq!(outcome.batches_attempted, 0);
        assert_eq!(*svc.fetcher().transport().calls.lock(), 0);
        assert!(svc.store().is_empty());
    }

    #[tokio::test]
    async fn test_vendor_items_deduped_before_fetch() {
        let svc = service(CannedTransport::new(vec![(5, VoteTally::new(3, 0))]), 10);
        let items = vec![VendorItem { item_hash: 5 }, VendorItem { item_hash: 5 }];

        let outcome = svc
            .bulk_fetch_vendor_items(&items, Platform::Steam, ActivityMode::Raid)
            .await;

        assert_eq!(outcome.requested, 1);
        assert_eq!(svc.store().len(), 1);
    }

    #[test]
    fn test_from_config_builds_http_service() {
        let config = RatingsConfig {
            endpoint: "http://localhost:1234".into(),
            api_key: Some("secret".into()),
            ..RatingsConfig::default()
        };
        let svc = RatingsService::from_config(&config, Arc::new(RatingsStore::new())).unwrap();
        assert_eq!(svc.fetcher().transport().endpoint(), "http://localhost:1234");
    }
}
