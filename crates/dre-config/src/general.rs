//! General application configuration.

use dre_core::{MatchCount, UploadPolicy};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default state for new damage records.
fn default_state() -> String {
    String::from("FL")
}

/// Default number of historical matches to retrieve.
const fn default_matches() -> u8 {
    3
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Two-letter state attached to every damage record unless overridden.
    #[serde(default = "default_state")]
    pub state: String,

    /// Number of nearest neighbors requested when the caller does not choose.
    #[serde(default = "default_matches")]
    pub default_matches: u8,

    /// Whether uploads are stored before or after the vehicle presence check.
    #[serde(default)]
    pub upload_policy: UploadPolicy,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            state: default_state(),
            default_matches: default_matches(),
            upload_policy: UploadPolicy::default(),
        }
    }
}

impl GeneralConfig {
    /// The configured default match count as a validated [`MatchCount`].
    pub fn match_count(&self) -> Result<MatchCount, ConfigError> {
        MatchCount::try_from(self.default_matches).map_err(|e| ConfigError::InvalidValue {
            field: "general.default_matches".into(),
            reason: e.to_string(),
        })
    }
}
