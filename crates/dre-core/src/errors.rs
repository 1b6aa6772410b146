//! Cross-cutting error types.
//!
//! Domain-specific errors (`StoreError`, `ServiceError`, `PipelineError`) live
//! in their own crates and converge in `dre-cli` through `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any crate working with core types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Lookup returned no result.
    #[error("Not found: {kind} {id}")]
    NotFound { kind: String, id: String },

    /// Data failed validation (missing fields, out-of-range values).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
