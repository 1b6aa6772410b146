//! SigV4 signing for plain HTTP requests to AWS endpoints without an SDK
//! client (OpenSearch Serverless collections and managed domains).

use std::time::SystemTime;

use aws_config::SdkConfig;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sigv4::http_request::{
    PayloadChecksumKind, SignableBody, SignableRequest, SigningParams, SigningSettings, sign,
};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;

use crate::error::ServiceError;

/// Signs requests with credentials from the shared SDK configuration.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: SharedCredentialsProvider,
    region: String,
    service: String,
}

impl RequestSigner {
    /// # Errors
    ///
    /// Returns [`ServiceError::NotConfigured`] when the SDK configuration has
    /// no credentials provider or no region.
    pub fn from_sdk_config(sdk: &SdkConfig, service: &str) -> Result<Self, ServiceError> {
        let credentials = sdk.credentials_provider().ok_or(ServiceError::NotConfigured {
            service: "aws credentials",
        })?;
        let region = sdk
            .region()
            .map(ToString::to_string)
            .ok_or(ServiceError::NotConfigured {
                service: "aws region",
            })?;
        Ok(Self {
            credentials,
            region,
            service: service.to_string(),
        })
    }

    /// Headers to add to the request: `authorization`, `x-amz-date`,
    /// `x-amz-content-sha256`, and `x-amz-security-token` for temporary
    /// credentials.
    ///
    /// `headers` must list every header the request will carry besides
    /// `host`, which is taken from `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Signing`] when credentials cannot be resolved
    /// or the request cannot be signed.
    pub async fn sign(
        &self,
        method: &str,
        url: &str,
        headers: &[(&str, &str)],
        body: &[u8],
    ) -> Result<Vec<(String, String)>, ServiceError> {
        let credentials = self
            .credentials
            .provide_credentials()
            .await
            .map_err(|e| ServiceError::Signing(e.to_string()))?;
        let identity: Identity = credentials.into();

        let mut settings = SigningSettings::default();
        // Serverless collections reject requests without a payload hash header.
        settings.payload_checksum_kind = PayloadChecksumKind::XAmzSha256;

        let params: SigningParams<'_> = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(&self.service)
            .time(SystemTime::now())
            .settings(settings)
            .build()
            .map_err(|e| ServiceError::Signing(e.to_string()))?
            .into();
        let request = SignableRequest::new(
            method,
            url,
            headers.iter().copied(),
            SignableBody::Bytes(body),
        )
        .map_err(|e| ServiceError::Signing(e.to_string()))?;

        let (instructions, _signature) = sign(request, &params)
            .map_err(|e| ServiceError::Signing(e.to_string()))?
            .into_parts();
        Ok(instructions
            .headers()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect())
    }
}
