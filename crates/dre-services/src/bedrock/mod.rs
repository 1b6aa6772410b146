//! Bedrock runtime client.
//!
//! One client serves three collaborators: the description model
//! ([`DescriptionModel`](crate::DescriptionModel), single invoke), the
//! synthesis model ([`SynthesisModel`](crate::SynthesisModel), streamed
//! invoke) and the embedder ([`Embedder`](crate::Embedder), Titan multimodal).
//! Requests go through the AWS SDK, so they are SigV4-signed with the shared
//! credential chain.

mod messages;
mod stream;
mod titan;

use aws_config::SdkConfig;
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::primitives::Blob;
use dre_config::BedrockConfig;
use serde::Serialize;
use tracing::debug;

use crate::aws::sdk_error;
use crate::error::ServiceError;

pub use stream::chunk_text;

const JSON: &str = "application/json";

/// Client for the Bedrock model runtime.
#[derive(Debug, Clone)]
pub struct BedrockClient {
    client: Client,
    description_model_id: String,
    synthesis_model_id: String,
    embedding_model_id: String,
    embedding_dimension: usize,
    description_max_tokens: u32,
    synthesis_max_tokens: u32,
}

impl BedrockClient {
    /// Build a client on the shared SDK configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotConfigured`] when a model id is missing.
    pub fn new(sdk: &SdkConfig, config: &BedrockConfig) -> Result<Self, ServiceError> {
        if !config.is_configured() {
            return Err(ServiceError::NotConfigured { service: "bedrock" });
        }
        let mut builder = aws_sdk_bedrockruntime::config::Builder::from(sdk);
        if let Some(endpoint) = config.endpoint_override() {
            builder = builder.endpoint_url(endpoint);
        }
        Ok(Self {
            client: Client::from_conf(builder.build()),
            description_model_id: config.description_model_id.clone(),
            synthesis_model_id: config.synthesis_model_id.clone(),
            embedding_model_id: config.embedding_model_id.clone(),
            embedding_dimension: config.embedding_dimension,
            description_max_tokens: config.description_max_tokens,
            synthesis_max_tokens: config.synthesis_max_tokens,
        })
    }

    /// Invoke `model_id` with a JSON body and return the raw JSON answer.
    async fn invoke<B: Serialize + Sync>(
        &self,
        model_id: &str,
        body: &B,
    ) -> Result<Vec<u8>, ServiceError> {
        debug!(model_id, "invoking model");
        let output = self
            .client
            .invoke_model()
            .model_id(model_id)
            .content_type(JSON)
            .accept(JSON)
            .body(json_blob(body)?)
            .send()
            .await
            .map_err(|e| sdk_error("bedrock", e))?;
        Ok(output.body().as_ref().to_vec())
    }
}

fn json_blob<B: Serialize>(body: &B) -> Result<Blob, ServiceError> {
    Ok(Blob::new(serde_json::to_vec(body)?))
}
