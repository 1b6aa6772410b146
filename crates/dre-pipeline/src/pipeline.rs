//! One upload in, one cost estimate out.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use dre_config::DreConfig;
use dre_core::{
    CostEstimate, DamageRecord, DescribedRecord, MatchCount, MatchResult, Session, UploadPolicy,
    UploadedImage,
};
use dre_services::{
    DescriptionModel, Embedder, ImageFetcher, ImageInput, SynthesisModel, VectorIndex,
    VehicleDetector, contains_label,
};
use dre_store::BlobStore;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

use crate::error::{PipelineError, Step};
use crate::summary::{NeighborSummary, rank_hits};
use crate::{parse, prompts, streaming};

/// Capacity of the channel between the synthesis producer and the drain.
const DEFAULT_FRAGMENT_BUFFER: usize = 32;

// ── Inputs and outputs ─────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct EstimateRequest {
    pub image: Bytes,
    /// Client-side filename; only used to name the stored object.
    pub filename: String,
    pub record: DamageRecord,
    pub matches: MatchCount,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EstimateOutcome {
    /// The presence check failed. Not an error: the user should upload
    /// another image.
    Rejected {
        reason: String,
        upload: UploadedImage,
    },
    Estimated(Box<Estimate>),
}

#[derive(Debug, Clone, Serialize)]
pub struct Estimate {
    pub upload: UploadedImage,
    pub described: DescribedRecord,
    pub matches: Vec<NeighborMatch>,
    pub estimate: CostEstimate,
    pub summary: NeighborSummary,
}

/// A ranked neighbor with its stored image.
#[derive(Debug, Clone, Serialize)]
pub struct NeighborMatch {
    #[serde(flatten)]
    pub result: MatchResult,
    #[serde(skip)]
    pub image: Bytes,
    pub image_bytes: usize,
}

// ── Settings ───────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub required_label: String,
    pub min_confidence: f32,
    pub embedding_dimension: usize,
    pub upload_policy: UploadPolicy,
    pub stream_idle_timeout: Duration,
    pub fragment_buffer: usize,
}

impl PipelineSettings {
    #[must_use]
    pub fn from_config(config: &DreConfig) -> Self {
        Self {
            required_label: config.detector.required_label.clone(),
            min_confidence: config.detector.min_confidence,
            embedding_dimension: config.bedrock.embedding_dimension,
            upload_policy: config.general.upload_policy,
            stream_idle_timeout: Duration::from_secs(config.bedrock.stream_idle_timeout_secs),
            fragment_buffer: DEFAULT_FRAGMENT_BUFFER,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from_config(&DreConfig::default())
    }
}

// ── Builder ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct EstimationPipelineBuilder {
    detector: Option<Arc<dyn VehicleDetector>>,
    describer: Option<Arc<dyn DescriptionModel>>,
    embedder: Option<Arc<dyn Embedder>>,
    index: Option<Arc<dyn VectorIndex>>,
    synthesizer: Option<Arc<dyn SynthesisModel>>,
    images: Option<Arc<dyn ImageFetcher>>,
    uploads: Option<BlobStore>,
    settings: PipelineSettings,
}

impl EstimationPipelineBuilder {
    #[must_use]
    pub fn detector(mut self, detector: Arc<dyn VehicleDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    #[must_use]
    pub fn describer(mut self, describer: Arc<dyn DescriptionModel>) -> Self {
        self.describer = Some(describer);
        self
    }

    #[must_use]
    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    #[must_use]
    pub fn index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    #[must_use]
    pub fn synthesizer(mut self, synthesizer: Arc<dyn SynthesisModel>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    #[must_use]
    pub fn images(mut self, images: Arc<dyn ImageFetcher>) -> Self {
        self.images = Some(images);
        self
    }

    #[must_use]
    pub fn uploads(mut self, uploads: BlobStore) -> Self {
        self.uploads = Some(uploads);
        self
    }

    #[must_use]
    pub fn settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// # Errors
    ///
    /// Returns [`PipelineError::MissingCollaborator`] naming the first
    /// collaborator that was never set.
    pub fn build(self) -> Result<EstimationPipeline, PipelineError> {
        Ok(EstimationPipeline {
            detector: self
                .detector
                .ok_or(PipelineError::MissingCollaborator("vehicle detector"))?,
            describer: self
                .describer
                .ok_or(PipelineError::MissingCollaborator("description model"))?,
            embedder: self
                .embedder
                .ok_or(PipelineError::MissingCollaborator("embedder"))?,
            index: self
                .index
                .ok_or(PipelineError::MissingCollaborator("vector index"))?,
            synthesizer: self
                .synthesizer
                .ok_or(PipelineError::MissingCollaborator("synthesis model"))?,
            images: self
                .images
                .ok_or(PipelineError::MissingCollaborator("image fetcher"))?,
            uploads: self
                .uploads
                .ok_or(PipelineError::MissingCollaborator("upload store"))?,
            settings: self.settings,
        })
    }
}

// ── Pipeline ───────────────────────────────────────────────────────

pub struct EstimationPipeline {
    detector: Arc<dyn VehicleDetector>,
    describer: Arc<dyn DescriptionModel>,
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    synthesizer: Arc<dyn SynthesisModel>,
    images: Arc<dyn ImageFetcher>,
    uploads: BlobStore,
    settings: PipelineSettings,
}

impl EstimationPipeline {
    #[must_use]
    pub fn builder() -> EstimationPipelineBuilder {
        EstimationPipelineBuilder::default()
    }

    #[must_use]
    pub const fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Run every step for one upload, strictly in order.
    ///
    /// Synthesis fragments are sent to `fragments` in display form while the
    /// stream is drained. On success the session remembers the upload and
    /// the described record so feedback can refer to them.
    ///
    /// # Errors
    ///
    /// Any collaborator failure, unusable model output, or storage failure.
    /// An empty search result stops before synthesis with
    /// [`PipelineError::NoMatches`]. A synthesis answer whose provider is not
    /// listed by a matched record is [`PipelineError::ModelOutput`]. A missing
    /// vehicle is not an error; see [`EstimateOutcome::Rejected`].
    #[instrument(skip_all, fields(session = %session.id, k = request.matches.get()))]
    pub async fn estimate(
        &self,
        session: &mut Session,
        request: EstimateRequest,
        fragments: mpsc::Sender<String>,
    ) -> Result<EstimateOutcome, PipelineError> {
        session.last_described = None;
        request.record.validate()?;
        let image = ImageInput::new(request.image)?;

        let key = session.next_upload_key(&request.filename);
        let mut upload = UploadedImage {
            url: self.uploads.object_url(&key),
            key,
            format: image.format,
            size_bytes: image.bytes.len(),
            stored: false,
        };

        let policy = self.settings.upload_policy;
        if policy.stores_before_validation() {
            self.store_upload(&mut upload, &image).await?;
        }
        session.last_upload = Some(upload.clone());

        // 1. presence check
        let labels = self
            .detector
            .detect(&image)
            .await
            .map_err(PipelineError::at(Step::Detection))?;
        debug!(labels = labels.len(), "detector answered");
        if !contains_label(
            &labels,
            &self.settings.required_label,
            self.settings.min_confidence,
        ) {
            info!(policy = %policy, stored = upload.stored, "no vehicle detected");
            let reason = format!(
                "No {} detected in the uploaded image. Please upload an image containing a vehicle.",
                self.settings.required_label.to_lowercase()
            );
            return Ok(EstimateOutcome::Rejected { reason, upload });
        }
        if !policy.stores_before_validation() {
            self.store_upload(&mut upload, &image).await?;
            session.last_upload = Some(upload.clone());
        }

        // 2. description
        let described = self.describe(&image, &request.record).await?;

        // 3. embedding
        let described_json = serde_json::to_string(&described)?;
        let vector = self
            .embedder
            .embed(&image, &described_json)
            .await
            .map_err(PipelineError::at(Step::Embedding))?;
        vector.check_dimension(self.settings.embedding_dimension)?;

        // 4. similarity search
        let k = request.matches.get();
        let hits = self
            .index
            .query(&vector, k)
            .await
            .map_err(PipelineError::at(Step::Search))?;
        let ranked = rank_hits(hits, k)?;
        info!(matches = ranked.len(), "similarity search complete");
        if ranked.is_empty() {
            return Err(PipelineError::NoMatches);
        }

        // 5. synthesis
        let current = serde_json::to_string_pretty(&described)?;
        let prompt = prompts::synthesis_prompt(&current, &ranked);
        let stream = self
            .synthesizer
            .stream(&prompt)
            .await
            .map_err(PipelineError::at(Step::Synthesis))?;
        let text = streaming::drain(
            stream,
            &fragments,
            self.settings.stream_idle_timeout,
            self.settings.fragment_buffer,
        )
        .await?;

        // 6. answer validation
        let named = parse::recommended_provider(&text).ok_or_else(|| {
            PipelineError::ModelOutput(format!(
                "synthesis answer has no '{}' line",
                prompts::PROVIDER_LINE_PREFIX
            ))
        })?;
        let recommended_provider = parse::matched_provider(&named, &ranked).ok_or_else(|| {
            PipelineError::ModelOutput(format!(
                "recommended provider '{named}' is not among the matched records"
            ))
        })?;

        // 7. assembly
        let matches = self.fetch_neighbor_images(ranked).await?;
        let estimate = CostEstimate {
            display_text: parse::escape_markup(&text),
            text,
            recommended_provider,
        };
        let results: Vec<MatchResult> = matches.iter().map(|m| m.result.clone()).collect();
        let summary = NeighborSummary::from_matches(&results, &described.record.state);

        session.last_described = Some(described.clone());
        info!(provider = %estimate.recommended_provider, "estimate ready");

        Ok(EstimateOutcome::Estimated(Box::new(Estimate {
            upload,
            described,
            matches,
            estimate,
            summary,
        })))
    }

    async fn store_upload(
        &self,
        upload: &mut UploadedImage,
        image: &ImageInput,
    ) -> Result<(), PipelineError> {
        self.uploads
            .put(&upload.key, image.bytes.clone(), image.format.media_type())
            .await?;
        upload.stored = true;
        debug!(key = %upload.key, bytes = upload.size_bytes, "upload stored");
        Ok(())
    }

    #[instrument(skip_all)]
    async fn describe(
        &self,
        image: &ImageInput,
        record: &DamageRecord,
    ) -> Result<DescribedRecord, PipelineError> {
        let prompt = prompts::description_prompt(record)?;
        let raw = self
            .describer
            .describe(image, &prompt)
            .await
            .map_err(PipelineError::at(Step::Description))?;
        let described = parse::described_record(&raw, record)?;
        debug!(description = %described.damage_description, "description accepted");
        Ok(described)
    }

    async fn fetch_neighbor_images(
        &self,
        ranked: Vec<MatchResult>,
    ) -> Result<Vec<NeighborMatch>, PipelineError> {
        let mut out = Vec::with_capacity(ranked.len());
        for result in ranked {
            let image = self
                .images
                .fetch(&result.image_location)
                .await
                .map_err(PipelineError::at(Step::NeighborImages))?;
            out.push(NeighborMatch {
                image_bytes: image.len(),
                image,
                result,
            });
        }
        Ok(out)
    }
}
