use std::sync::atomic::{AtomicUsize, Ordering};

/// Identifies one in-flight batch for progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchTicket {
    pub index: usize,
    pub total_batches: usize,
    pub len: usize,
}

/// Observes batch fetches, e.g. to drive a loading indicator.
///
/// Purely observational: the fetcher behaves identically whatever the tracker does.
pub trait LoadingTracker: Send + Sync {
    /// Called before the batch is awaited
    fn begin(&self, ticket: &BatchTicket);
    /// Called once the batch settled, success or failure
    fn finish(&self, ticket: &BatchTicket);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracker;

impl LoadingTracker for NoopTracker {
    fn begin(&self, _ticket: &BatchTicket) {}
    fn finish(&self, _ticket: &BatchTicket) {}
}

/// Counts batches and remembers the highest number ever in flight at once.
#[derive(Debug, Default)]
pub struct CountingTracker {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    started: AtomicUsize,
    finished: AtomicUsize,
}

impl CountingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

impl LoadingTracker for CountingTracker {
    fn begin(&self, _ticket: &BatchTicket) {
        self.started.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn finish(&self, _ticket: &BatchTicket) {
        self.finished.fetch_add(1, Ordering::SeqCst);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
