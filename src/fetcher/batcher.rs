// batcher.rs - keeps each request under the service's batch limit

use super::types::FetchRequest;

/// Largest batch the ratings service accepts per call.
pub const DEFAULT_BATCH_SIZE: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct Batcher {
    pub batch_size: usize,
}

impl Batcher {
    /// A zero size is bumped to 1 so `split` can never panic.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn split<'a>(&self, items: &'a [FetchRequest]) -> Vec<&'a [FetchRequest]> {
        partition(items, self.batch_size)
    }
}

impl Default for Batcher {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

/// Split `items` into ordered chunks of at most `size`; the last may be shorter.
pub fn partition(items: &[FetchRequest], size: usize) -> Vec<&[FetchRequest]> {
    items.chunks(size.max(1)).collect()
}
