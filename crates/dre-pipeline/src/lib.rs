//! # dre-pipeline
//!
//! Orchestration for the damage repair estimator:
//!
//! ```text
//! upload ─▶ detect ─▶ describe ─▶ embed ─▶ kNN search ─▶ synthesize (stream) ─▶ estimate
//!              │
//!              └─▶ rejected (no vehicle)
//! ```
//!
//! plus the [`FeedbackRecorder`] that appends one ledger entry per session.

mod error;
mod feedback;
mod pipeline;

pub mod parse;
pub mod prompts;
pub mod streaming;
pub mod summary;

pub use error::{PipelineError, Step};
pub use feedback::{FeedbackOutcome, FeedbackRecorder};
pub use pipeline::{
    Estimate, EstimateOutcome, EstimateRequest, EstimationPipeline, EstimationPipelineBuilder,
    NeighborMatch, PipelineSettings,
};
pub use summary::NeighborSummary;
