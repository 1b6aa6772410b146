//! Storage error types.

/// Errors from the object store and the feedback ledger.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Object does not exist.
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// A conditional write lost against a concurrent writer.
    #[error("Precondition failed writing {bucket}/{key}")]
    PreconditionFailed { bucket: String, key: String },

    /// Ledger append gave up after repeated write conflicts.
    #[error("Ledger {key} still conflicting after {attempts} attempts")]
    Conflict { key: String, attempts: u32 },

    /// Backend client could not be built from configuration.
    #[error("Store configuration error: {0}")]
    Configuration(String),

    /// Any other object store failure.
    #[error("Object store error: {0}")]
    Backend(#[from] object_store::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
