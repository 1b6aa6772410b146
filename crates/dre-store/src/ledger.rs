//! Append-only feedback ledger stored as one JSON list object.
//!
//! Appends are read-modify-write cycles guarded by a conditional put, so two
//! sessions appending at once cannot drop each other's entries: the loser of
//! the race re-reads and retries.

use bytes::Bytes;
use dre_config::StorageConfig;
use dre_core::FeedbackEntry;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{BlobStore, StoreError};

const CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone)]
pub struct FeedbackLedger {
    store: BlobStore,
    key: String,
    max_attempts: u32,
}

impl FeedbackLedger {
    #[must_use]
    pub fn new(store: BlobStore, key: impl Into<String>, max_attempts: u32) -> Self {
        Self {
            store,
            key: key.into(),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Ledger in the configured S3 bucket.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StoreError> {
        let store = BlobStore::s3(config, &config.ledger_bucket)?;
        Ok(Self::new(
            store,
            config.ledger_key.clone(),
            config.ledger_max_attempts,
        ))
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// All entries currently in the ledger, oldest first.
    ///
    /// An absent ledger is empty. Content that is not a JSON list is treated
    /// as empty as well.
    pub async fn entries(&self) -> Result<Vec<Value>, StoreError> {
        Ok(match self.store.get_versioned(&self.key).await? {
            Some(found) => self.decode(&found.bytes),
            None => Vec::new(),
        })
    }

    /// Append `entry` as the last element and return the new ledger length.
    ///
    /// Existing elements are written back exactly as read.
    pub async fn append(&self, entry: &FeedbackEntry) -> Result<usize, StoreError> {
        let new_entry = serde_json::to_value(entry)?;

        for attempt in 1..=self.max_attempts {
            let current = self.store.get_versioned(&self.key).await?;
            let (mut entries, version) = match current {
                Some(found) => (self.decode(&found.bytes), Some(found.version)),
                None => (Vec::new(), None),
            };
            entries.push(new_entry.clone());
            let body = Bytes::from(serde_json::to_vec_pretty(&entries)?);

            match self
                .store
                .put_if(&self.key, body, CONTENT_TYPE, version.as_ref())
                .await
            {
                Ok(()) => {
                    info!(key = %self.key, len = entries.len(), attempt, "feedback appended");
                    return Ok(entries.len());
                }
                Err(StoreError::PreconditionFailed { .. }) => {
                    warn!(key = %self.key, attempt, "ledger changed during append, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(StoreError::Conflict {
            key: self.key.clone(),
            attempts: self.max_attempts,
        })
    }

    fn decode(&self, bytes: &[u8]) -> Vec<Value> {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Array(entries)) => {
                debug!(key = %self.key, len = entries.len(), "ledger read");
                entries
            }
            Ok(other) => {
                warn!(key = %self.key, kind = json_kind(&other), "ledger is not a list, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "ledger is not valid JSON, starting empty");
                Vec::new()
            }
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
