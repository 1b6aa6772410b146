//! At-most-once feedback per session.

use chrono::Utc;
use dre_core::{FeedbackEntry, FeedbackPolarity, Session};
use dre_store::FeedbackLedger;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::error::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FeedbackOutcome {
    /// Entry appended; the ledger now holds `ledger_len` entries.
    Recorded { ledger_len: usize },
    /// This session already submitted feedback. Nothing was written.
    AlreadyGiven,
    /// No completed estimate in this session to attach feedback to.
    NoEstimate,
}

#[derive(Debug, Clone)]
pub struct FeedbackRecorder {
    ledger: FeedbackLedger,
}

impl FeedbackRecorder {
    #[must_use]
    pub const fn new(ledger: FeedbackLedger) -> Self {
        Self { ledger }
    }

    #[must_use]
    pub const fn ledger(&self) -> &FeedbackLedger {
        &self.ledger
    }

    /// Append one entry built from the session's last estimate and form.
    ///
    /// The session flag is set only after the ledger write succeeds, so a
    /// failed write can be retried.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Store`] if the ledger cannot be read or
    /// written.
    #[instrument(skip_all, fields(session = %session.id, feedback = %polarity))]
    pub async fn submit(
        &self,
        session: &mut Session,
        polarity: FeedbackPolarity,
    ) -> Result<FeedbackOutcome, PipelineError> {
        if session.feedback_given {
            debug!("feedback already given; ignoring");
            return Ok(FeedbackOutcome::AlreadyGiven);
        }
        let (Some(upload), Some(described)) = (&session.last_upload, &session.last_described)
        else {
            return Ok(FeedbackOutcome::NoEstimate);
        };

        let entry = FeedbackEntry::new(
            &described.record,
            &described.damage_description,
            &session.form,
            &upload.url,
            polarity,
            Utc::now(),
        );
        let ledger_len = self.ledger.append(&entry).await?;
        session.feedback_given = true;
        info!(ledger_len, "feedback recorded");
        Ok(FeedbackOutcome::Recorded { ledger_len })
    }
}
