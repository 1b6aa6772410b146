//! Producer/consumer drain of the synthesis stream.
//!
//! ```text
//!  TextStream ──▶ producer task ──▶ bounded channel ──▶ drain()
//!                                                        ├─▶ raw text (returned)
//!                                                        └─▶ escaped fragment ──▶ display sender
//! ```

use std::time::Duration;

use dre_services::{ServiceError, TextStream};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::debug;

use crate::error::{PipelineError, Step};
use crate::parse::escape_markup;

/// Consume `stream` to the end and return the assembled raw text.
///
/// Each non-empty fragment is forwarded to `display` in its escaped form as
/// soon as it arrives. A display receiver that has gone away does not stop
/// the drain. Waiting longer than `idle` for any single fragment aborts the
/// producer.
///
/// # Errors
///
/// - [`PipelineError::StreamTimeout`] when no fragment arrives within `idle`.
/// - [`PipelineError::Service`] when the stream yields an error.
/// - [`PipelineError::StreamClosed`] when the producer task dies.
pub async fn drain(
    stream: TextStream,
    display: &mpsc::Sender<String>,
    idle: Duration,
    buffer: usize,
) -> Result<String, PipelineError> {
    let (tx, mut rx) = mpsc::channel::<Result<String, ServiceError>>(buffer.max(1));

    let producer = tokio::spawn(async move {
        let mut stream = stream;
        while let Some(item) = stream.next().await {
            let failed = item.is_err();
            if tx.send(item).await.is_err() || failed {
                break;
            }
        }
    });

    let mut text = String::new();
    let mut fragments = 0usize;
    loop {
        match timeout(idle, rx.recv()).await {
            Err(_) => {
                producer.abort();
                return Err(PipelineError::StreamTimeout(idle));
            }
            Ok(None) => break,
            Ok(Some(Err(error))) => {
                producer.abort();
                return Err(PipelineError::at(Step::Synthesis)(error));
            }
            Ok(Some(Ok(fragment))) => {
                if fragment.is_empty() {
                    continue;
                }
                fragments += 1;
                text.push_str(&fragment);
                if display.send(escape_markup(&fragment)).await.is_err() {
                    debug!("display receiver dropped; continuing without it");
                }
            }
        }
    }

    producer.await.map_err(|_| PipelineError::StreamClosed)?;
    debug!(fragments, chars = text.len(), "synthesis stream drained");
    Ok(text)
}
