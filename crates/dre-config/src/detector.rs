//! Vehicle detector (label detection) configuration.

use serde::{Deserialize, Serialize};

use crate::endpoint_override;

fn default_required_label() -> String {
    String::from("Vehicle")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DetectorConfig {
    /// Rekognition endpoint override. Empty means the regional AWS endpoint.
    #[serde(default)]
    pub endpoint: String,

    /// Label that must be present for an image to count as a vehicle.
    #[serde(default = "default_required_label")]
    pub required_label: String,

    /// Minimum label confidence (0-100). Zero accepts any confidence.
    #[serde(default)]
    pub min_confidence: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            required_label: default_required_label(),
            min_confidence: 0.0,
        }
    }
}

impl DetectorConfig {
    pub fn is_configured(&self) -> bool {
        !self.required_label.is_empty()
    }

    pub fn endpoint_override(&self) -> Option<String> {
        endpoint_override(&self.endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_requires_vehicle_label() {
        let config = DetectorConfig::default();
        assert_eq!(config.required_label, "Vehicle");
        assert!(config.min_confidence.abs() < f32::EPSILON);
        assert!(config.is_configured());
        assert_eq!(config.endpoint_override(), None);
    }
}
