//! Vehicle detector over Rekognition `DetectLabels`.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_rekognition::Client;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::{Image, Label as RawLabel};
use dre_config::DetectorConfig;
use tracing::{debug, instrument};

use crate::aws::sdk_error;
use crate::error::ServiceError;
use crate::{ImageInput, Label, VehicleDetector};

pub struct RekognitionDetector {
    client: Client,
}

impl RekognitionDetector {
    /// Build a detector on the shared SDK configuration, honoring the
    /// configured endpoint override.
    #[must_use]
    pub fn new(sdk: &SdkConfig, config: &DetectorConfig) -> Self {
        let mut builder = aws_sdk_rekognition::config::Builder::from(sdk);
        if let Some(endpoint) = config.endpoint_override() {
            builder = builder.endpoint_url(endpoint);
        }
        Self {
            client: Client::from_conf(builder.build()),
        }
    }
}

/// Named labels with their confidence. Unnamed labels are dropped.
fn to_labels(raw: &[RawLabel]) -> Vec<Label> {
    raw.iter()
        .filter_map(|l| {
            l.name().map(|name| Label {
                name: name.to_string(),
                confidence: l.confidence().unwrap_or_default(),
            })
        })
        .collect()
}

#[async_trait]
impl VehicleDetector for RekognitionDetector {
    #[instrument(skip_all, fields(image_bytes = image.bytes.len()))]
    async fn detect(&self, image: &ImageInput) -> Result<Vec<Label>, ServiceError> {
        let output = self
            .client
            .detect_labels()
            .image(Image::builder().bytes(Blob::new(image.bytes.to_vec())).build())
            .send()
            .await
            .map_err(|e| sdk_error("rekognition", e))?;

        let labels = to_labels(output.labels());
        debug!(count = labels.len(), "labels detected");
        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn raw(name: Option<&str>, confidence: Option<f32>) -> RawLabel {
        RawLabel::builder()
            .set_name(name.map(str::to_owned))
            .set_confidence(confidence)
            .build()
    }

    #[test]
    fn labels_keep_name_and_confidence() {
        let labels = to_labels(&[
            raw(Some("Car"), Some(99.53)),
            raw(Some("Vehicle"), Some(99.53)),
            raw(Some("Bumper"), None),
        ]);
        assert_eq!(labels.len(), 3);
        assert_eq!(labels[1].name, "Vehicle");
        assert!(labels[2].confidence.abs() < f32::EPSILON);
        assert!(crate::contains_label(&labels, "Vehicle", 90.0));
    }

    #[test]
    fn unnamed_labels_are_dropped() {
        assert!(to_labels(&[raw(None, Some(80.0))]).is_empty());
        assert!(to_labels(&[]).is_empty());
    }
}
