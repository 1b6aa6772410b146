//! Pipeline error types.

use std::fmt;
use std::time::Duration;

use dre_services::ServiceError;
use dre_store::StoreError;
use thiserror::Error;

/// Pipeline stage that talks to an external collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Detection,
    Description,
    Embedding,
    Search,
    Synthesis,
    NeighborImages,
}

impl Step {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Detection => "vehicle detection",
            Self::Description => "damage description",
            Self::Embedding => "embedding",
            Self::Search => "similarity search",
            Self::Synthesis => "cost synthesis",
            Self::NeighborImages => "neighbor image fetch",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    /// An external collaborator failed.
    #[error("{step} failed: {source}")]
    Service {
        step: Step,
        #[source]
        source: ServiceError,
    },

    /// Upload or ledger storage failed.
    #[error("storage failed: {0}")]
    Store(#[from] StoreError),

    /// A generative model answered outside the required format.
    #[error("model output rejected: {0}")]
    ModelOutput(String),

    /// The index returned no historical records to estimate from.
    #[error("no similar historical repairs found")]
    NoMatches,

    /// The synthesis stream went silent for longer than the idle timeout.
    #[error("no synthesis output for {}s", .0.as_secs())]
    StreamTimeout(Duration),

    /// The synthesis producer stopped without finishing the stream.
    #[error("synthesis stream closed unexpectedly")]
    StreamClosed,

    /// Caller input is unusable.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The pipeline was built without one of its collaborators.
    #[error("pipeline is missing its {0}")]
    MissingCollaborator(&'static str),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    /// Adapter for `map_err` on collaborator calls.
    pub(crate) fn at(step: Step) -> impl FnOnce(ServiceError) -> Self {
        move |source| Self::Service { step, source }
    }
}

impl From<dre_core::CoreError> for PipelineError {
    fn from(error: dre_core::CoreError) -> Self {
        Self::Validation(error.to_string())
    }
}
