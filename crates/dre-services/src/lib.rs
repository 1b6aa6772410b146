//! # dre-services
//!
//! Clients for the external collaborators of the estimation pipeline:
//! - vehicle detector (Rekognition `DetectLabels` via the AWS SDK)
//! - description and synthesis models (Bedrock runtime, Anthropic messages)
//! - multimodal embedder (Bedrock runtime, Titan image embeddings)
//! - vector index (OpenSearch kNN, SigV4-signed HTTP)
//! - neighbor image fetcher (CDN)
//!
//! Each collaborator is a narrow async trait so the pipeline can be exercised
//! with in-memory fakes.

pub mod aws;
pub mod bedrock;
pub mod cdn;
pub mod opensearch;
pub mod rekognition;
pub mod sigv4;

mod error;
mod http;

pub use bedrock::BedrockClient;
pub use cdn::CdnImageFetcher;
pub use error::ServiceError;
pub use opensearch::OpenSearchIndex;
pub use rekognition::RekognitionDetector;
pub use sigv4::RequestSigner;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use dre_core::{EmbeddingVector, ImageFormat};
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Types ──────────────────────────────────────────────────────────

/// Image bytes with their detected format.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub bytes: Bytes,
    pub format: ImageFormat,
}

impl ImageInput {
    /// Sniff the format of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`dre_core::CoreError::Validation`] for unsupported formats.
    pub fn new(bytes: Bytes) -> Result<Self, dre_core::CoreError> {
        let format = ImageFormat::sniff(&bytes)?;
        Ok(Self { bytes, format })
    }

    /// Standard base64 encoding of the image, as the model APIs expect.
    #[must_use]
    pub fn base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// One label reported by the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    /// Confidence in percent (0-100).
    pub confidence: f32,
}

/// Whether `labels` contain `required` (case-insensitive) at or above
/// `min_confidence`.
#[must_use]
pub fn contains_label(labels: &[Label], required: &str, min_confidence: f32) -> bool {
    labels
        .iter()
        .any(|l| l.name.eq_ignore_ascii_case(required) && l.confidence >= min_confidence)
}

/// One raw hit from the vector index, before ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub score: f64,
    pub metadata: Map<String, Value>,
}

/// Incremental text fragments of a streamed model answer.
pub type TextStream = BoxStream<'static, Result<String, ServiceError>>;

// ── Collaborators ──────────────────────────────────────────────────

#[async_trait]
pub trait VehicleDetector: Send + Sync {
    async fn detect(&self, image: &ImageInput) -> Result<Vec<Label>, ServiceError>;
}

#[async_trait]
pub trait DescriptionModel: Send + Sync {
    /// Send the image and prompt in one request and return the text answer.
    async fn describe(&self, image: &ImageInput, prompt: &str) -> Result<String, ServiceError>;
}

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Joint embedding of an image and a text.
    async fn embed(&self, image: &ImageInput, text: &str)
    -> Result<EmbeddingVector, ServiceError>;
}

#[async_trait]
pub trait SynthesisModel: Send + Sync {
    /// Start a streamed completion for `prompt`.
    async fn stream(&self, prompt: &str) -> Result<TextStream, ServiceError>;
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Up to `k` nearest stored records for `vector`.
    async fn query(&self, vector: &EmbeddingVector, k: usize)
    -> Result<Vec<SearchHit>, ServiceError>;
}

#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Download the image stored at `location`.
    async fn fetch(&self, location: &str) -> Result<Bytes, ServiceError>;
}
