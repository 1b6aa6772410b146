//! Object storage configuration (uploads bucket and feedback ledger).

use serde::{Deserialize, Serialize};

fn default_region() -> String {
    String::from("us-east-1")
}

fn default_uploads_bucket() -> String {
    String::from("uploaded-images-bucket-for-blog")
}

fn default_ledger_bucket() -> String {
    String::from("meet-harsh-vatsal-blog-store")
}

fn default_ledger_key() -> String {
    String::from("vatsal.json")
}

const fn default_ledger_max_attempts() -> u32 {
    5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// AWS region of both buckets.
    #[serde(default = "default_region")]
    pub region: String,

    /// Custom endpoint for S3-compatible stores. Empty means AWS S3.
    #[serde(default)]
    pub endpoint: String,

    /// Access key ID. Empty falls back to the ambient AWS credential chain.
    #[serde(default)]
    pub access_key_id: String,

    #[serde(default)]
    pub secret_access_key: String,

    /// Bucket receiving uploaded damage photos.
    #[serde(default = "default_uploads_bucket")]
    pub uploads_bucket: String,

    /// Bucket holding the feedback ledger.
    #[serde(default = "default_ledger_bucket")]
    pub ledger_bucket: String,

    /// Object key of the feedback ledger (a JSON list).
    #[serde(default = "default_ledger_key")]
    pub ledger_key: String,

    /// Conditional-write attempts before a ledger append gives up.
    #[serde(default = "default_ledger_max_attempts")]
    pub ledger_max_attempts: u32,

    /// Base URL for public object links. Empty means the virtual-hosted S3 URL.
    #[serde(default)]
    pub public_base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            endpoint: String::new(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            uploads_bucket: default_uploads_bucket(),
            ledger_bucket: default_ledger_bucket(),
            ledger_key: default_ledger_key(),
            ledger_max_attempts: default_ledger_max_attempts(),
            public_base_url: String::new(),
        }
    }
}

impl StorageConfig {
    /// Check if explicit credentials and both buckets are set.
    pub fn is_configured(&self) -> bool {
        !self.access_key_id.is_empty()
            && !self.secret_access_key.is_empty()
            && !self.uploads_bucket.is_empty()
            && !self.ledger_bucket.is_empty()
    }

    /// Public URL of `key` inside `bucket`.
    pub fn object_url(&self, bucket: &str, key: &str) -> String {
        if self.public_base_url.is_empty() {
            format!("https://{bucket}.s3.{}.amazonaws.com/{key}", self.region)
        } else {
            format!("{}/{key}", self.public_base_url.trim_end_matches('/'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = StorageConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.ledger_key, "vatsal.json");
        assert_eq!(config.ledger_max_attempts, 5);
    }

    #[test]
    fn configured_when_credentials_set() {
        let config = StorageConfig {
            access_key_id: "AKIA".into(),
            secret_access_key: "secret".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
    }

    #[test]
    fn object_url_defaults_to_virtual_hosted_s3() {
        let config = StorageConfig::default();
        assert_eq!(
            config.object_url("uploads", "ses-1/0001-car.jpg"),
            "https://uploads.s3.us-east-1.amazonaws.com/ses-1/0001-car.jpg"
        );
    }

    #[test]
    fn object_url_uses_public_base_when_set() {
        let config = StorageConfig {
            public_base_url: "http://localhost:9000/uploads/".into(),
            ..Default::default()
        };
        assert_eq!(
            config.object_url("uploads", "a.png"),
            "http://localhost:9000/uploads/a.png"
        );
    }
}
