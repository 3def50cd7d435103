mod merger;
mod roll;
mod store;
mod types;

#[cfg(test)]
mod tests;

pub use merger::add_scores;
pub use roll::{FIXED_ROLL, roll_signature};
pub use store::{RatingsSnapshot, RatingsStore};
pub use types::{MergeSummary, Rating, RatingKey};
