//! Content delivery network configuration for neighbor images.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CdnConfig {
    /// Distribution domain serving historical images, e.g. `d111.cloudfront.net`.
    #[serde(default)]
    pub distribution_domain: String,
}

impl CdnConfig {
    pub fn is_configured(&self) -> bool {
        !self.distribution_domain.is_empty()
    }

    /// URL of `location` on the distribution. A bare domain gets `https://`.
    pub fn image_url(&self, location: &str) -> String {
        let domain = self.distribution_domain.trim().trim_end_matches('/');
        let location = location.trim_start_matches('/');
        if domain.starts_with("http://") || domain.starts_with("https://") {
            format!("{domain}/{location}")
        } else {
            format!("https://{domain}/{location}")
        }
    }
}
