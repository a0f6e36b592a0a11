//! Domain types for photo handling.

use std::sync::Arc;

/// Unique identifier for a cached photo, derived from a hash of its URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageId(pub String);

impl ImageId {
    /// Creates a new `ImageId` from any string-like input.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates an `ImageId` from a URL by hashing it.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let result = hasher.finalize();
        Self(hex::encode(&result[..16]))
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ImageId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ImageId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Status of a photo in the loading pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageStatus {
    /// Loading has not started.
    #[default]
    NotStarted,
    /// Photo is being downloaded from the network.
    Downloading,
    /// Photo is fully loaded and ready for display.
    Ready,
    /// Loading failed with an error message.
    Failed(String),
}

impl ImageStatus {
    /// Returns true if the photo is ready for rendering.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Returns true if the photo is currently being loaded.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Downloading)
    }

    /// Returns true if loading failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns true if loading hasn't started yet.
    #[must_use]
    pub const fn is_not_started(&self) -> bool {
        matches!(self, Self::NotStarted)
    }
}

/// Where a loaded photo came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Served from the in-memory cache.
    MemoryCache,
    /// Served from the on-disk cache.
    DiskCache,
    /// Downloaded from the network.
    Network,
}

/// A decoded photo together with its provenance.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Cache identifier.
    pub id: ImageId,
    /// The decoded image, shared between caches and renderers.
    pub image: Arc<image::DynamicImage>,
    /// Which tier satisfied the load.
    pub source: ImageSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_id_from_url_is_stable() {
        let a = ImageId::from_url("https://example.com/photo.jpg");
        let b = ImageId::from_url("https://example.com/photo.jpg");
        assert_eq!(a, b);
    }

    #[test]
    fn test_image_id_differs_per_url() {
        let a = ImageId::from_url("https://example.com/a.jpg");
        let b = ImageId::from_url("https://example.com/b.jpg");
        assert_ne!(a, b);
    }

    #[test]
    fn test_status_predicates() {
        assert!(ImageStatus::NotStarted.is_not_started());
        assert!(ImageStatus::Downloading.is_loading());
        assert!(ImageStatus::Ready.is_ready());
        assert!(ImageStatus::Failed("boom".into()).is_failed());
    }
}
