//! Neighbor image downloads from the CDN distribution.

use async_trait::async_trait;
use bytes::Bytes;
use dre_config::CdnConfig;
use tracing::instrument;

use crate::error::ServiceError;
use crate::http::{build_client, check_response};
use crate::ImageFetcher;

pub struct CdnImageFetcher {
    http: reqwest::Client,
    config: CdnConfig,
}

impl CdnImageFetcher {
    /// Build a fetcher from config.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotConfigured`] without a distribution domain.
    pub fn from_config(config: &CdnConfig, timeout_secs: u64) -> Result<Self, ServiceError> {
        if !config.is_configured() {
            return Err(ServiceError::NotConfigured { service: "cdn" });
        }
        Ok(Self {
            http: build_client(timeout_secs)?,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl ImageFetcher for CdnImageFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, location: &str) -> Result<Bytes, ServiceError> {
        let url = self.config.image_url(location);
        let resp = check_response(self.http.get(&url).send().await?).await?;
        Ok(resp.bytes().await?)
    }
}
