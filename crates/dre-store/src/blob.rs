//! Bucket-scoped object access over [`object_store`].

use std::sync::Arc;

use bytes::Bytes;
use dre_config::StorageConfig;
use object_store::aws::{AmazonS3Builder, S3ConditionalPut};
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{
    Attribute, Attributes, ObjectStore, PutMode, PutOptions, PutPayload, UpdateVersion,
};
use tracing::debug;

use crate::StoreError;

/// Object contents plus the version token needed for a conditional overwrite.
#[derive(Debug, Clone)]
pub struct Versioned {
    pub bytes: Bytes,
    pub version: UpdateVersion,
}

/// One bucket in an object store.
#[derive(Debug, Clone)]
pub struct BlobStore {
    bucket: String,
    url_prefix: String,
    inner: Arc<dyn ObjectStore>,
}

impl BlobStore {
    /// S3 (or S3-compatible) bucket with `ETag` conditional puts.
    ///
    /// Explicit keys from config win; otherwise the ambient `AWS_*`
    /// credential chain is used.
    pub fn s3(config: &StorageConfig, bucket: &str) -> Result<Self, StoreError> {
        Self::s3_from(AmazonS3Builder::from_env(), config, bucket)
    }

    /// Config is applied on top of `base`, so explicit settings win over
    /// whatever `base` picked up.
    fn s3_from(
        base: AmazonS3Builder,
        config: &StorageConfig,
        bucket: &str,
    ) -> Result<Self, StoreError> {
        let mut builder = base
            .with_bucket_name(bucket)
            .with_region(&config.region)
            .with_conditional_put(S3ConditionalPut::ETagMatch);

        if !config.endpoint.is_empty() {
            builder = builder.with_endpoint(&config.endpoint);
            if config.endpoint.starts_with("http://") {
                builder = builder.with_allow_http(true);
            }
        }

        if !config.access_key_id.is_empty() && !config.secret_access_key.is_empty() {
            debug!(bucket, "using explicit S3 credentials from config");
            builder = builder
                .with_access_key_id(&config.access_key_id)
                .with_secret_access_key(&config.secret_access_key);
        }

        let store = builder.build().map_err(|e| {
            StoreError::Configuration(format!(
                "failed to create S3 client for bucket '{bucket}' in region '{}': {e}",
                config.region
            ))
        })?;

        Ok(Self {
            bucket: bucket.to_string(),
            url_prefix: config.object_url(bucket, "").trim_end_matches('/').to_string(),
            inner: Arc::new(store),
        })
    }

    /// Process-local bucket for tests and offline runs.
    #[must_use]
    pub fn in_memory(bucket: &str) -> Self {
        Self::with_store(bucket, Arc::new(InMemory::new()))
    }

    /// Wrap an existing store. Object URLs use the `memory://` scheme.
    #[must_use]
    pub fn with_store(bucket: &str, inner: Arc<dyn ObjectStore>) -> Self {
        Self {
            bucket: bucket.to_string(),
            url_prefix: format!("memory://{bucket}"),
            inner,
        }
    }

    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Public URL for `key`.
    #[must_use]
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{key}", self.url_prefix)
    }

    /// Unconditional write.
    pub async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), StoreError> {
        self.write(key, bytes, content_type, PutMode::Overwrite).await
    }

    /// Read an object's contents.
    pub async fn get(&self, key: &str) -> Result<Bytes, StoreError> {
        match self.get_versioned(key).await? {
            Some(found) => Ok(found.bytes),
            None => Err(self.not_found(key)),
        }
    }

    /// Read an object with its version, or `None` if it does not exist.
    pub async fn get_versioned(&self, key: &str) -> Result<Option<Versioned>, StoreError> {
        let result = match self.inner.get(&ObjectPath::from(key)).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let version = UpdateVersion {
            e_tag: result.meta.e_tag.clone(),
            version: result.meta.version.clone(),
        };
        let bytes = result.bytes().await?;
        Ok(Some(Versioned { bytes, version }))
    }

    /// Conditional write.
    ///
    /// With `expected = None` the object must not exist yet; otherwise it must
    /// still be at `expected`. A lost race is [`StoreError::PreconditionFailed`].
    pub async fn put_if(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
        expected: Option<&UpdateVersion>,
    ) -> Result<(), StoreError> {
        let mode = expected.map_or(PutMode::Create, |v| PutMode::Update(v.clone()));
        match self.write(key, bytes, content_type, mode).await {
            Err(StoreError::Backend(
                object_store::Error::Precondition { .. } | object_store::Error::AlreadyExists { .. },
            )) => Err(StoreError::PreconditionFailed {
                bucket: self.bucket.clone(),
                key: key.to_string(),
            }),
            other => other,
        }
    }

    async fn write(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
        mode: PutMode,
    ) -> Result<(), StoreError> {
        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let options = PutOptions {
            mode,
            attributes,
            ..Default::default()
        };
        let size = bytes.len();
        self.inner
            .put_opts(&ObjectPath::from(key), PutPayload::from(bytes), options)
            .await?;
        debug!(bucket = %self.bucket, key, size, "object written");
        Ok(())
    }

    fn not_found(&self, key: &str) -> StoreError {
        StoreError::NotFound {
            bucket: self.bucket.clone(),
            key: key.to_string(),
        }
    }
}
