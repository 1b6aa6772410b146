//! Titan multimodal embeddings.

use async_trait::async_trait;
use dre_core::EmbeddingVector;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::BedrockClient;
use crate::{Embedder, ImageInput, ServiceError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TitanRequest<'a> {
    input_image: String,
    input_text: &'a str,
    embedding_config: EmbeddingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbeddingConfig {
    output_embedding_length: usize,
}

#[derive(Debug, Deserialize)]
struct TitanResponse {
    #[serde(default)]
    embedding: Option<Vec<f32>>,
    #[serde(default)]
    message: Option<String>,
}

fn to_vector(data: TitanResponse, expected: usize) -> Result<EmbeddingVector, ServiceError> {
    let Some(values) = data.embedding else {
        return Err(ServiceError::Parse(format!(
            "embedding response has no vector{}",
            data.message.map(|m| format!(": {m}")).unwrap_or_default()
        )));
    };
    let vector = EmbeddingVector::new(values);
    vector
        .check_dimension(expected)
        .map_err(|e| ServiceError::Parse(e.to_string()))?;
    Ok(vector)
}

#[async_trait]
impl Embedder for BedrockClient {
    #[instrument(skip_all, fields(model = %self.embedding_model_id, text_len = text.len()))]
    async fn embed(
        &self,
        image: &ImageInput,
        text: &str,
    ) -> Result<EmbeddingVector, ServiceError> {
        let body = TitanRequest {
            input_image: image.base64(),
            input_text: text,
            embedding_config: EmbeddingConfig {
                output_embedding_length: self.embedding_dimension,
            },
        };
        let raw = self.invoke(&self.embedding_model_id, &body).await?;
        let vector = to_vector(serde_json::from_slice(&raw)?, self.embedding_dimension)?;
        debug!(dimension = vector.dimension(), "embedding received");
        Ok(vector)
    }
}
