//! Streamed synthesis over `InvokeModelWithResponseStream`.

use async_trait::async_trait;
use aws_sdk_bedrockruntime::operation::invoke_model_with_response_stream::InvokeModelWithResponseStreamOutput;
use aws_sdk_bedrockruntime::types::ResponseStream;
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::messages::{ContentBlock, MessagesRequest};
use super::{BedrockClient, JSON, json_blob};
use crate::aws::sdk_error;
use crate::{ServiceError, SynthesisModel, TextStream};

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamEvent {
    ContentBlockDelta {
        delta: BlockDelta,
    },
    MessageDelta {
        delta: MessageDeltaBody,
        #[serde(default)]
        usage: Option<Usage>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum BlockDelta {
    TextDelta {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct MessageDeltaBody {
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    stop_sequence: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    output_tokens: u64,
}

/// Text carried by one decoded response chunk.
///
/// `Ok(None)` for events without text (message start/stop, block start/stop,
/// message deltas).
///
/// # Errors
///
/// Returns [`ServiceError::Parse`] when the chunk is not a messages event.
pub fn chunk_text(chunk: &[u8]) -> Result<Option<String>, ServiceError> {
    match serde_json::from_slice::<StreamEvent>(chunk)? {
        StreamEvent::ContentBlockDelta {
            delta: BlockDelta::TextDelta { text },
        } => Ok(Some(text)),
        StreamEvent::MessageDelta { delta, usage } => {
            debug!(
                stop_reason = ?delta.stop_reason,
                stop_sequence = ?delta.stop_sequence,
                output_tokens = usage.map_or(0, |u| u.output_tokens),
                "synthesis finished"
            );
            Ok(None)
        }
        StreamEvent::ContentBlockDelta { .. } | StreamEvent::Other => Ok(None),
    }
}

/// Payload chunks of a response stream, in arrival order. Modeled stream
/// exceptions arrive as [`ServiceError::Aws`].
fn response_chunks(
    output: InvokeModelWithResponseStreamOutput,
) -> BoxStream<'static, Result<Bytes, ServiceError>> {
    stream::unfold(output.body, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(Some(ResponseStream::Chunk(part))) => {
                    if let Some(blob) = part.bytes {
                        return Some((Ok(Bytes::from(blob.into_inner())), receiver));
                    }
                }
                Ok(Some(other)) => debug!(event = ?other, "skipping stream event"),
                Ok(None) => return None,
                Err(e) => return Some((Err(sdk_error("bedrock", e)), receiver)),
            }
        }
    })
    .boxed()
}

/// Turn payload chunks into text fragments. The stream ends after the first
/// error.
fn text_fragments(chunks: BoxStream<'static, Result<Bytes, ServiceError>>) -> TextStream {
    stream::unfold(Some(chunks), |state| async move {
        let mut chunks = state?;
        loop {
            let text = match chunks.next().await? {
                Ok(chunk) => chunk_text(&chunk),
                Err(e) => Err(e),
            };
            match text {
                Ok(Some(text)) => return Some((Ok(text), Some(chunks))),
                Ok(None) => {}
                Err(e) => return Some((Err(e), None)),
            }
        }
    })
    .boxed()
}

#[async_trait]
impl SynthesisModel for BedrockClient {
    #[instrument(skip_all, fields(model = %self.synthesis_model_id, prompt_len = prompt.len()))]
    async fn stream(&self, prompt: &str) -> Result<TextStream, ServiceError> {
        let body = MessagesRequest::user(
            self.synthesis_max_tokens,
            vec![ContentBlock::Text { text: prompt }],
        );
        let output = self
            .client
            .invoke_model_with_response_stream()
            .model_id(&self.synthesis_model_id)
            .content_type(JSON)
            .accept(JSON)
            .body(json_blob(&body)?)
            .send()
            .await
            .map_err(|e| sdk_error("bedrock", e))?;
        Ok(text_fragments(response_chunks(output)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn text_delta(text: &str) -> Bytes {
        Bytes::from(
            json!({
                "type": "content_block_delta",
                "index": 0,
                "delta": {"type": "text_delta", "text": text}
            })
            .to_string(),
        )
    }

    fn chunks(
        items: Vec<Result<Bytes, ServiceError>>,
    ) -> BoxStream<'static, Result<Bytes, ServiceError>> {
        stream::iter(items).boxed()
    }

    #[test]
    fn text_delta_yields_text() {
        assert_eq!(chunk_text(&text_delta("$600")).unwrap().as_deref(), Some("$600"));
    }

    #[test]
    fn non_text_events_are_skipped() {
        let start = json!({"type": "message_start", "message": {"id": "m"}}).to_string();
        let stop = json!({
            "type": "message_delta",
            "delta": {"stop_reason": "end_turn", "stop_sequence": null},
            "usage": {"output_tokens": 42}
        })
        .to_string();
        let input_json = json!({
            "type": "content_block_delta",
            "delta": {"type": "input_json_delta", "partial_json": "{"}
        })
        .to_string();
        assert_eq!(chunk_text(start.as_bytes()).unwrap(), None);
        assert_eq!(chunk_text(stop.as_bytes()).unwrap(), None);
        assert_eq!(chunk_text(input_json.as_bytes()).unwrap(), None);
    }

    #[test]
    fn garbage_chunk_is_parse_error() {
        assert!(matches!(chunk_text(b"not json"), Err(ServiceError::Parse(_))));
    }

    #[tokio::test]
    async fn fragments_keep_order_and_skip_silent_events() {
        let start = Bytes::from(json!({"type": "message_start"}).to_string());
        let fragments: Vec<String> = text_fragments(chunks(vec![
            Ok(start),
            Ok(text_delta("Average ")),
            Ok(text_delta("cost is ")),
            Ok(text_delta("$600.")),
        ]))
        .map(Result::unwrap)
        .collect()
        .await;
        assert_eq!(fragments, vec!["Average ", "cost is ", "$600."]);
    }

    #[tokio::test]
    async fn stream_stops_after_first_error() {
        let results: Vec<Result<String, ServiceError>> = text_fragments(chunks(vec![
            Ok(text_delta("partial")),
            Err(ServiceError::Aws {
                service: "bedrock",
                code: Some("throttlingException".into()),
                message: "Too many requests".into(),
            }),
            Ok(text_delta("never seen")),
        ]))
        .collect()
        .await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_deref().unwrap(), "partial");
        assert_eq!(
            results[1].as_ref().unwrap_err().to_string(),
            "bedrock error (throttlingException): Too many requests"
        );
    }
}
