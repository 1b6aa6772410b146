//! # dre-store
//!
//! Object storage for uploaded damage photos and the feedback ledger.
//!
//! [`BlobStore`] scopes an [`object_store::ObjectStore`] to one bucket and
//! adds versioned reads and conditional writes. [`FeedbackLedger`] builds the
//! append-only JSON list on top of those.

mod blob;
mod error;
mod ledger;

pub use blob::{BlobStore, Versioned};
pub use error::StoreError;
pub use ledger::FeedbackLedger;
