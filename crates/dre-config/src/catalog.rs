//! Vehicle make/model catalog offered for selection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ConfigError;

fn default_makes() -> BTreeMap<String, Vec<String>> {
    (1..=3)
        .map(|n| (format!("Make_{n}"), vec![format!("Model_{n}")]))
        .collect()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Make name to the models selectable for it.
    #[serde(default = "default_makes")]
    pub makes: BTreeMap<String, Vec<String>>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            makes: default_makes(),
        }
    }
}

impl CatalogConfig {
    pub fn is_configured(&self) -> bool {
        !self.makes.is_empty()
    }

    /// Models listed for `make`, if the make is known.
    pub fn models(&self, make: &str) -> Option<&[String]> {
        self.makes.get(make).map(Vec::as_slice)
    }

    /// Check that `model` is offered for `make`.
    pub fn validate(&self, make: &str, model: &str) -> Result<(), ConfigError> {
        let models = self.models(make).ok_or_else(|| ConfigError::InvalidValue {
            field: "make".into(),
            reason: format!("unknown make '{make}'"),
        })?;
        if models.iter().any(|m| m == model) {
            Ok(())
        } else {
            Err(ConfigError::InvalidValue {
                field: "model".into(),
                reason: format!("'{model}' is not a model of '{make}'"),
            })
        }
    }
}
