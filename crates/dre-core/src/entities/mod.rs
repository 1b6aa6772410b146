//! Entity structs for the estimation flow.
//!
//! Field names follow the historical repair-record JSON format so that records
//! written to the ledger and read from the vector index line up without
//! renaming layers.

mod damage;
mod estimate;
mod feedback;
mod matching;
mod upload;

pub use damage::{DamageRecord, DescribedRecord};
pub use estimate::CostEstimate;
pub use feedback::{FeedbackEntry, FeedbackForm};
pub use matching::{EmbeddingVector, MatchCount, MatchResult};
pub use upload::UploadedImage;
