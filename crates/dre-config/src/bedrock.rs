//! Bedrock model runtime configuration.

use serde::{Deserialize, Serialize};

use crate::endpoint_override;

fn default_claude_model() -> String {
    String::from("anthropic.claude-3-haiku-20240307-v1:0")
}

fn default_embedding_model() -> String {
    String::from("amazon.titan-embed-image-v1")
}

const fn default_embedding_dimension() -> usize {
    1024
}

const fn default_description_max_tokens() -> u32 {
    2000
}

const fn default_synthesis_max_tokens() -> u32 {
    1000
}

const fn default_request_timeout_secs() -> u64 {
    60
}

const fn default_stream_idle_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BedrockConfig {
    /// Runtime endpoint override. Empty means the regional AWS endpoint.
    #[serde(default)]
    pub endpoint: String,

    #[serde(default = "default_claude_model")]
    pub description_model_id: String,

    #[serde(default = "default_claude_model")]
    pub synthesis_model_id: String,

    #[serde(default = "default_embedding_model")]
    pub embedding_model_id: String,

    /// Expected embedding length; must match the vector index mapping.
    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: usize,

    #[serde(default = "default_description_max_tokens")]
    pub description_max_tokens: u32,

    #[serde(default = "default_synthesis_max_tokens")]
    pub synthesis_max_tokens: u32,

    /// Per-operation timeout in seconds, shared by all remote calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum silence between streamed fragments, in seconds.
    #[serde(default = "default_stream_idle_timeout_secs")]
    pub stream_idle_timeout_secs: u64,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            description_model_id: default_claude_model(),
            synthesis_model_id: default_claude_model(),
            embedding_model_id: default_embedding_model(),
            embedding_dimension: default_embedding_dimension(),
            description_max_tokens: default_description_max_tokens(),
            synthesis_max_tokens: default_synthesis_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
            stream_idle_timeout_secs: default_stream_idle_timeout_secs(),
        }
    }
}

impl BedrockConfig {
    pub fn is_configured(&self) -> bool {
        !self.description_model_id.is_empty()
            && !self.synthesis_model_id.is_empty()
            && !self.embedding_model_id.is_empty()
            && self.embedding_dimension > 0
    }

    /// Custom runtime endpoint without a trailing slash, if one is set.
    pub fn endpoint_override(&self) -> Option<String> {
        endpoint_override(&self.endpoint)
    }
}
