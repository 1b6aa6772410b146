//! # dre-config
//!
//! Layered configuration loading for the damage repair estimator using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DRE_*` prefix, `__` as separator)
//! 2. Project-level `.dre/config.toml`
//! 3. User-level `~/.config/dre/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `DRE_AWS__REGION` -> `aws.region`,
//! `DRE_STORAGE__LEDGER_KEY` -> `storage.ledger_key`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use dre_config::DreConfig;
//!
//! let config = DreConfig::load_with_dotenv().expect("config");
//!
//! if !config.search.is_configured() {
//!     eprintln!("set DRE_SEARCH__ENDPOINT");
//! }
//! ```

mod aws;
mod bedrock;
mod catalog;
mod cdn;
mod detector;
mod error;
mod general;
mod search;
mod storage;

pub use aws::AwsConfig;
pub use bedrock::BedrockConfig;
pub use catalog::CatalogConfig;
pub use cdn::CdnConfig;
pub use detector::DetectorConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use search::SearchConfig;
pub use storage::StorageConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DreConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub aws: AwsConfig,
    #[serde(default)]
    pub bedrock: BedrockConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub cdn: CdnConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl DreConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`DreConfig::load_with_dotenv`] for `.env` loading.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration after reading `.env` from the workspace root or
    /// current directory.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can add providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path().filter(|p| p.exists()) {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".dre/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("DRE_").split("__"))
    }

    /// Names of service sections that still lack required fields.
    pub fn unconfigured_sections(&self) -> Vec<&'static str> {
        [
            ("storage", self.storage.is_configured()),
            ("bedrock", self.bedrock.is_configured()),
            ("detector", self.detector.is_configured()),
            ("search", self.search.is_configured()),
            ("cdn", self.cdn.is_configured()),
            ("catalog", self.catalog.is_configured()),
        ]
        .into_iter()
        .filter_map(|(name, ok)| (!ok).then_some(name))
        .collect()
    }

    /// Fail with [`ConfigError::NotConfigured`] for the first incomplete section
    /// in `required`.
    pub fn require(&self, required: &[&str]) -> Result<(), ConfigError> {
        let missing = self.unconfigured_sections();
        match required.iter().find(|name| missing.contains(name)) {
            Some(section) => Err(ConfigError::NotConfigured {
                section: (*section).to_string(),
            }),
            None => Ok(()),
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dre").join("config.toml"))
    }

    /// Walks up from `CARGO_MANIFEST_DIR` (at most 3 levels) looking for
    /// `.env`, then falls back to the current directory.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

/// Trimmed custom endpoint, or `None` for the regional AWS default.
pub(crate) fn endpoint_override(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = DreConfig::default();
        assert!(config.bedrock.is_configured());
        assert!(!config.search.is_configured());
        assert!(!config.storage.is_configured());
        assert_eq!(config.general.state, "FL");
    }

    #[test]
    fn unconfigured_sections_listed_for_defaults() {
        let config = DreConfig::default();
        let missing = config.unconfigured_sections();
        assert!(missing.contains(&"storage"));
        assert!(missing.contains(&"search"));
        assert!(!missing.contains(&"bedrock"));
        assert!(!missing.contains(&"catalog"));
    }

    #[test]
    fn require_reports_first_missing_section() {
        let config = DreConfig::default();
        assert!(config.require(&["catalog"]).is_ok());
        let err = config.require(&["catalog", "search"]).unwrap_err();
        assert!(matches!(err, ConfigError::NotConfigured { section } if section == "search"));
    }
}
