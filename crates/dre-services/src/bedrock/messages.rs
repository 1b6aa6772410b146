//! Anthropic messages bodies and the description model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::BedrockClient;
use crate::{DescriptionModel, ImageInput, ServiceError};

pub(super) const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

#[derive(Debug, Serialize)]
pub(super) struct MessagesRequest<'a> {
    anthropic_version: &'static str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    messages: Vec<Message<'a>>,
}

impl<'a> MessagesRequest<'a> {
    /// Single user turn with the given blocks and no sampling overrides.
    pub(super) fn user(max_tokens: u32, content: Vec<ContentBlock<'a>>) -> Self {
        Self {
            anthropic_version: ANTHROPIC_VERSION,
            max_tokens,
            temperature: None,
            top_p: None,
            top_k: None,
            messages: vec![Message {
                role: "user",
                content,
            }],
        }
    }

    const fn with_sampling(mut self, temperature: f32, top_p: f32, top_k: u32) -> Self {
        self.temperature = Some(temperature);
        self.top_p = Some(top_p);
        self.top_k = Some(top_k);
        self
    }
}

#[derive(Debug, Serialize)]
pub(super) struct Message<'a> {
    role: &'static str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(super) enum ContentBlock<'a> {
    Image { source: ImageSource },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
pub(super) struct ImageSource {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'static str,
    data: String,
}

impl ContentBlock<'_> {
    fn image(image: &ImageInput) -> Self {
        Self::Image {
            source: ImageSource {
                kind: "base64",
                media_type: image.format.media_type(),
                data: image.base64(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Text of the first text block.
fn first_text(response: MessagesResponse) -> Result<String, ServiceError> {
    response
        .content
        .into_iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text)
        .ok_or_else(|| ServiceError::Parse("model response has no text content".to_string()))
}

#[async_trait]
impl DescriptionModel for BedrockClient {
    #[instrument(skip_all, fields(model = %self.description_model_id, image_bytes = image.bytes.len()))]
    async fn describe(&self, image: &ImageInput, prompt: &str) -> Result<String, ServiceError> {
        let body = MessagesRequest::user(
            self.description_max_tokens,
            vec![ContentBlock::image(image), ContentBlock::Text { text: prompt }],
        )
        .with_sampling(1.0, 1.0, 250);

        let raw = self.invoke(&self.description_model_id, &body).await?;
        let data: MessagesResponse = serde_json::from_slice(&raw)?;
        debug!(stop_reason = ?data.stop_reason, "description received");
        first_text(data)
    }
}
