use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::CoreError;

/// Joint image + text embedding. Length is fixed by the embedding model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmbeddingVector(Vec<f32>);

impl EmbeddingVector {
    #[must_use]
    pub const fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Ensure the vector has the dimension the index expects.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] on a length mismatch.
    pub fn check_dimension(&self, expected: usize) -> Result<(), CoreError> {
        if self.dimension() == expected {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "embedding has {} dimensions; expected {expected}",
                self.dimension()
            )))
        }
    }
}

/// Number of nearest neighbors requested from the index (1..=3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MatchCount(u8);

impl MatchCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 3;

    #[must_use]
    pub const fn get(self) -> usize {
        self.0 as usize
    }
}

impl Default for MatchCount {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl TryFrom<u8> for MatchCount {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::Validation(format!(
                "match count must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )))
        }
    }
}

impl From<MatchCount> for u8 {
    fn from(value: MatchCount) -> Self {
        value.0
    }
}

/// Metadata keys that name the repair shop in historical records.
const PROVIDER_KEYS: [&str; 3] = ["service_provider_name", "service_provider", "service_center"];

/// One historical repair record returned by the similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// 1-based position in the result list.
    pub rank: usize,
    /// Similarity score reported by the index (higher is closer).
    pub score: f64,
    /// Stored record metadata, passed to the synthesis prompt verbatim.
    pub metadata: Map<String, Value>,
    /// Storage location of the record's image (`s3_location` in metadata).
    pub image_location: String,
}

impl MatchResult {
    /// Historical repair cost, when the record carries a numeric one.
    ///
    /// Accepts JSON numbers and strings such as `"$1,250.00"`.
    #[must_use]
    pub fn repair_cost(&self) -> Option<f64> {
        match self.metadata.get("repair_cost")? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s
                .trim()
                .trim_start_matches('$')
                .replace(',', "")
                .parse::<f64>()
                .ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.metadata.get("state").and_then(Value::as_str)
    }

    #[must_use]
    pub fn service_provider(&self) -> Option<&str> {
        PROVIDER_KEYS
            .iter()
            .find_map(|key| self.metadata.get(*key).and_then(Value::as_str))
            .filter(|name| !name.trim().is_empty())
    }

    /// Pretty-printed metadata, as shown to the user and the synthesis model.
    #[must_use]
    pub fn metadata_json(&self) -> String {
        serde_json::to_string_pretty(&self.metadata).unwrap_or_else(|_| String::from("{}"))
    }
}
