//! AWS account settings shared by the detector, model runtime, and vector index clients.

use serde::{Deserialize, Serialize};

fn default_region() -> String {
    String::from("us-east-1")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AwsConfig {
    /// Region for request signing. Empty defers to the ambient AWS region chain.
    #[serde(default = "default_region")]
    pub region: String,

    /// Access key ID. Empty falls back to the ambient AWS credential chain
    /// (environment, profile, web identity, instance role).
    #[serde(default)]
    pub access_key_id: String,

    #[serde(default)]
    pub secret_access_key: String,

    /// Session token for temporary credentials.
    #[serde(default)]
    pub session_token: String,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            session_token: String::new(),
        }
    }
}

impl AwsConfig {
    /// Whether explicit keys replace the ambient credential chain.
    pub fn has_static_credentials(&self) -> bool {
        !self.access_key_id.is_empty() && !self.secret_access_key.is_empty()
    }

    pub fn session_token(&self) -> Option<&str> {
        (!self.session_token.is_empty()).then_some(self.session_token.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_ambient_credentials() {
        let config = AwsConfig::default();
        assert_eq!(config.region, "us-east-1");
        assert!(!config.has_static_credentials());
        assert_eq!(config.session_token(), None);
    }

    #[test]
    fn static_credentials_need_both_keys() {
        let config = AwsConfig {
            access_key_id: "AKID".into(),
            ..Default::default()
        };
        assert!(!config.has_static_credentials());

        let config = AwsConfig {
            access_key_id: "AKID".into(),
            secret_access_key: "secret".into(),
            session_token: "token".into(),
            ..Default::default()
        };
        assert!(config.has_static_credentials());
        assert_eq!(config.session_token(), Some("token"));
    }
}
