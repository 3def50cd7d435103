pub mod batcher;
pub mod bulk;
pub mod client;
pub mod error;
pub mod tracker;
pub mod types;


pub use batcher::{Batcher, DEFAULT_BATCH_SIZE, partition};
pub use bulk::{BatchFailure, BulkFetcher, FetchReport};
pub use client::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, HttpTransport, RatingsTransport};
pub use error::FetchError;
pub use tracker::{BatchTicket, CountingTracker, LoadingTracker, NoopTracker};
pub use types::{ActivityMode, FetchRequest, FetchResponse, Platform, VoteTally};
