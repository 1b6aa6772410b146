//! Shared AWS SDK configuration and error mapping.
//!
//! One [`SdkConfig`] is loaded at startup and handed to every AWS-backed
//! client, so region, credentials and timeouts resolve once.

use std::time::Duration;

use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;
use dre_config::AwsConfig;
use tracing::info;

use crate::error::ServiceError;

/// Load the SDK configuration used by the detector, model runtime and index.
///
/// Explicit keys in `config` win; otherwise the default AWS credential chain
/// applies (environment, shared profile, web identity, instance role).
pub async fn load_sdk_config(config: &AwsConfig, timeout_secs: u64) -> SdkConfig {
    let timeouts = TimeoutConfig::builder()
        .operation_timeout(Duration::from_secs(timeout_secs))
        .build();
    let mut loader = aws_config::defaults(BehaviorVersion::latest()).timeout_config(timeouts);

    if !config.region.is_empty() {
        loader = loader.region(Region::new(config.region.clone()));
    }
    if config.has_static_credentials() {
        info!("using explicit AWS credentials from config");
        loader = loader.credentials_provider(Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            config.session_token().map(str::to_owned),
            None,
            "dre-config",
        ));
    }
    loader.load().await
}

/// Convert an SDK failure into [`ServiceError::Aws`], keeping the modeled
/// error code and the full source chain.
pub(crate) fn sdk_error<E, R>(service: &'static str, error: SdkError<E, R>) -> ServiceError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    ServiceError::Aws {
        service,
        code: error.code().map(str::to_owned),
        message: DisplayErrorContext(&error).to_string(),
    }
}
