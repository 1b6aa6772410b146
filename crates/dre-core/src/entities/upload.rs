use serde::{Deserialize, Serialize};

use crate::media::ImageFormat;

/// An uploaded damage photo and where it was (or will be) stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    /// Object key inside the uploads bucket.
    pub key: String,
    /// Public URL of the stored object, recorded in feedback entries.
    pub url: String,
    pub format: ImageFormat,
    pub size_bytes: usize,
    /// Whether the bytes were actually written to the object store.
    pub stored: bool,
}
