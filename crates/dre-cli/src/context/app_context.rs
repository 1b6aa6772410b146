use std::sync::Arc;

use anyhow::Context;
use dre_config::DreConfig;
use dre_pipeline::{EstimationPipeline, FeedbackRecorder, PipelineSettings};
use dre_services::aws::load_sdk_config;
use dre_services::{BedrockClient, CdnImageFetcher, OpenSearchIndex, RekognitionDetector};
use dre_store::{BlobStore, FeedbackLedger};

/// Shared application resources initialized once at startup.
///
/// Remote clients are built on demand so `dre options` works without any
/// service configured.
pub struct AppContext {
    pub config: DreConfig,
}

impl AppContext {
    pub fn init(config: DreConfig) -> anyhow::Result<Self> {
        config
            .general
            .match_count()
            .context("invalid general settings")?;
        Ok(Self { config })
    }

    /// Wire the estimation pipeline against the configured services.
    ///
    /// AWS region and credentials resolve once here and are shared by the
    /// detector, model runtime, and index clients.
    pub async fn pipeline(&self) -> anyhow::Result<EstimationPipeline> {
        let config = &self.config;
        config.require(&["storage", "bedrock", "detector", "search", "cdn"])?;
        let timeout = config.bedrock.request_timeout_secs;
        let sdk = load_sdk_config(&config.aws, timeout).await;

        let bedrock = Arc::new(
            BedrockClient::new(&sdk, &config.bedrock).context("failed to create bedrock client")?,
        );
        let detector = RekognitionDetector::new(&sdk, &config.detector);
        let index = OpenSearchIndex::from_config(&config.search, &sdk, timeout)
            .context("failed to create search client")?;
        let images = CdnImageFetcher::from_config(&config.cdn, timeout)
            .context("failed to create CDN client")?;
        let uploads = BlobStore::s3(&config.storage, &config.storage.uploads_bucket)?;

        EstimationPipeline::builder()
            .detector(Arc::new(detector))
            .describer(bedrock.clone())
            .embedder(bedrock.clone())
            .synthesizer(bedrock)
            .index(Arc::new(index))
            .images(Arc::new(images))
            .uploads(uploads)
            .settings(PipelineSettings::from_config(config))
            .build()
            .map_err(anyhow::Error::from)
    }

    pub fn ledger(&self) -> anyhow::Result<FeedbackLedger> {
        self.config.require(&["storage"])?;
        FeedbackLedger::from_config(&self.config.storage).context("failed to open feedback ledger")
    }

    pub fn recorder(&self) -> anyhow::Result<FeedbackRecorder> {
        Ok(FeedbackRecorder::new(self.ledger()?))
    }
}
