use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::batcher::Batcher;
use super::client::RatingsTransport;
use super::error::FetchError;
use super::tracker::{BatchTicket, LoadingTracker, NoopTracker};
use super::types::{ActivityMode, FetchRequest, FetchResponse, Platform};

/// A batch that contributed nothing because its call failed.
#[derive(Debug)]
pub struct BatchFailure {
    pub batch_index: usize,
    pub batch_len: usize,
    pub error: FetchError,
}

/// Everything one fetch cycle produced, including the batches it gave up on.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub fetch_id: Uuid,
    pub responses: Vec<FetchResponse>,
    pub batches_attempted: usize,
    pub failures: Vec<BatchFailure>,
}

impl FetchReport {
    pub fn batches_failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fetches ratings one batch at a time.
///
/// The ratings service rate-limits callers, so batches are never issued in
/// parallel: batch `i + 1` is sent only after batch `i` settled.
pub struct BulkFetcher<T> {
    transport: T,
    batcher: Batcher,
    tracker: Arc<dyn LoadingTracker>,
}

impl<T: RatingsTransport> BulkFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            batcher: Batcher::default(),
            tracker: Arc::new(NoopTracker),
        }
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.batcher = Batcher::new(size);
        self
    }

    pub fn tracker(mut self, tracker: Arc<dyn LoadingTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch every request, dropping batches that fail.
    ///
    /// An empty result means either nothing was requested or every batch
    /// failed; use [`fetch_all_with_report`](Self::fetch_all_with_report) to tell
    /// them apart.
    pub async fn fetch_all(
        &self,
        requests: &[FetchRequest],
        platform: Platform,
        mode: ActivityMode,
    ) -> Vec<FetchResponse> {
        self.fetch_all_with_report(requests, platform, mode)
            .await
            .responses
    }

    #[instrument(
        skip_all,
        fields(
            fetch_id = tracing::field::Empty,
            requests = requests.len(),
            platform = ?platform,
            mode = ?mode
        )
    )]
    pub async fn fetch_all_with_report(
        &self,
        requests: &[FetchRequest],
        platform: Platform,
        mode: ActivityMode,
    ) -> FetchReport {
        let fetch_id = Uuid::new_v4();
        tracing::Span::current().record("fetch_id", tracing::field::display(fetch_id));

        let mut report = FetchReport {
            fetch_id,
            ..FetchReport::default()
        };

        if requests.is_empty() {
            debug!("no items requested, skipping fetch");
            return report;
        }

        let batches = self.batcher.split(requests);
        let total_batches = batches.len();

        for (index, batch) in batches.into_iter().enumerate() {
            let ticket = BatchTicket {
                index,
                total_batches,
                len: batch.len(),
            };

            self.tracker.begin(&ticket);
            let result = self.transport.fetch_batch(batch, platform, mode).await;
            self.tracker.finish(&ticket);

            report.batches_attempted += 1;
            match result {
                Ok(items) => {
                    debug!(batch = index, received = items.len(), "batch fetched");
                    report.responses.extend(items);
                }
                Err(error) => {
                    warn!(batch = index, size = batch.len(), %error, "ratings batch failed, skipping");
                    report.failures.push(BatchFailure {
                        batch_index: index,
                        batch_len: batch.len(),
                        error,
                    });
                }
            }
        }

        info!(
            batches = report.batches_attempted,
            failed = report.batches_failed(),
            received = report.responses.len(),
            "ratings fetch finished"
        );

        report
    }
}
