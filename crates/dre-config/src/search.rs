//! Vector search index configuration.

use serde::{Deserialize, Serialize};

fn default_index() -> String {
    String::from("repair-cost-data")
}

fn default_vector_field() -> String {
    String::from("damage_vector")
}

fn default_signing_service() -> String {
    String::from("aoss")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Collection host. The `https://` scheme is added when missing.
    #[serde(default)]
    pub endpoint: String,

    #[serde(default = "default_index")]
    pub index: String,

    /// kNN vector field in the index mapping.
    #[serde(default = "default_vector_field")]
    pub vector_field: String,

    /// SigV4 service name: `aoss` for serverless collections, `es` for domains.
    #[serde(default = "default_signing_service")]
    pub signing_service: String,

    /// Basic-auth user for self-managed clusters. Empty means SigV4 signing.
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            index: default_index(),
            vector_field: default_vector_field(),
            signing_service: default_signing_service(),
            username: String::new(),
            password: String::new(),
        }
    }
}

impl SearchConfig {
    pub fn is_configured(&self) -> bool {
        !self.endpoint.is_empty() && !self.index.is_empty()
    }

    pub fn uses_basic_auth(&self) -> bool {
        !self.username.is_empty()
    }

    /// Endpoint with scheme and without a trailing slash.
    pub fn endpoint_url(&self) -> String {
        let trimmed = self.endpoint.trim().trim_end_matches('/');
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_repair_index() {
        let config = SearchConfig::default();
        assert_eq!(config.index, "repair-cost-data");
        assert_eq!(config.vector_field, "damage_vector");
        assert_eq!(config.signing_service, "aoss");
        assert!(!config.uses_basic_auth());
        assert!(!config.is_configured());
    }

    #[test]
    fn scheme_added_to_bare_host() {
        let config = SearchConfig {
            endpoint: "abc123.us-east-1.aoss.amazonaws.com/".into(),
            ..Default::default()
        };
        assert_eq!(
            config.endpoint_url(),
            "https://abc123.us-east-1.aoss.amazonaws.com"
        );
    }

    #[test]
    fn explicit_scheme_kept() {
        let config = SearchConfig {
            endpoint: "http://localhost:9200".into(),
            ..Default::default()
        };
        assert_eq!(config.endpoint_url(), "http://localhost:9200");
    }
}
