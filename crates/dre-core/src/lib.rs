//! # dre-core
//!
//! Core types shared across all damage repair estimator crates:
//! - Damage record, described record, match and estimate entities
//! - Selection enums (damage area, damage type, severity, feedback polarity)
//! - Per-session state with an explicit reset lifecycle
//! - Image format sniffing for uploads and model requests
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod media;
pub mod session;

pub use entities::{
    CostEstimate, DamageRecord, DescribedRecord, EmbeddingVector, FeedbackEntry, FeedbackForm,
    MatchCount, MatchResult, UploadedImage,
};
pub use enums::{DamageArea, DamageType, FeedbackPolarity, Severity, UploadPolicy};
pub use errors::CoreError;
pub use media::ImageFormat;
pub use session::Session;
