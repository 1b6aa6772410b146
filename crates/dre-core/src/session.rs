//! Per-user session state.
//!
//! One [`Session`] spans a user's interaction from the first upload until an
//! explicit [`Session::reset`]. The feedback guard lives here so a second
//! submission in the same session is detectable without global state.

use chrono::{DateTime, Utc};

use crate::entities::{DescribedRecord, FeedbackForm, UploadedImage};
use crate::errors::CoreError;

const MAX_FILENAME_CHARS: usize = 96;

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub upload_counter: u32,
    pub feedback_given: bool,
    pub last_upload: Option<UploadedImage>,
    pub last_described: Option<DescribedRecord>,
    pub form: FeedbackForm,
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// Start a session with a random `ses-xxxxxxxx` id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Other`] if the OS random source is unavailable.
    pub fn start() -> Result<Self, CoreError> {
        Ok(Self::with_id(random_session_id()?))
    }

    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            upload_counter: 0,
            feedback_given: false,
            last_upload: None,
            last_described: None,
            form: FeedbackForm::default(),
            started_at: Utc::now(),
        }
    }

    /// Reserve the object key for the next upload in this session.
    pub fn next_upload_key(&mut self, filename: &str) -> String {
        self.upload_counter += 1;
        format!(
            "{}/{:04}-{}",
            self.id,
            self.upload_counter,
            sanitize_filename(filename)
        )
    }

    /// Whether a completed estimate exists that feedback can refer to.
    #[must_use]
    pub const fn has_estimate(&self) -> bool {
        self.last_upload.is_some() && self.last_described.is_some()
    }

    /// Discard all per-session state and start over with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Other`] if the OS random source is unavailable.
    pub fn reset(&mut self) -> Result<(), CoreError> {
        *self = Self::start()?;
        Ok(())
    }
}

fn random_session_id() -> Result<String, CoreError> {
    let mut bytes = [0u8; 4];
    getrandom::fill(&mut bytes)
        .map_err(|e| anyhow::anyhow!("failed to generate session id: {e}"))?;
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    Ok(format!("ses-{hex}"))
}

/// Reduce a client-supplied filename to a safe single key segment.
///
/// The stem and extension are cleaned separately, so a stem with no safe
/// characters becomes `upload` and keeps its extension.
fn sanitize_filename(input: &str) -> String {
    let base = input.rsplit(['/', '\\']).next().unwrap_or(input);
    let (stem, ext) = match base.rsplit_once('.') {
        Some((stem, ext)) => (stem, clean_segment(ext)),
        None => (base, String::new()),
    };

    let stem = clean_segment(stem);
    let stem = if stem.is_empty() { "upload" } else { stem.as_str() };
    let name = if ext.is_empty() {
        stem.to_string()
    } else {
        format!("{stem}.{ext}")
    };
    name.chars().take(MAX_FILENAME_CHARS).collect()
}

/// Keep `[A-Za-z0-9._-]`, collapse other runs to one `_`, and trim `_` and
/// `.` from both ends.
fn clean_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
            out.push(ch);
            prev_underscore = false;
        } else if !prev_underscore {
            out.push('_');
            prev_underscore = true;
        }
    }

    out.trim_matches(|c| c == '_' || c == '.').to_string()
}
