//! Port definition for photo caching.

use std::sync::Arc;

use crate::domain::entities::ImageId;

/// Result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Errors that can occur during cache operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    /// Photo not found in cache.
    #[error("Photo not found: {0}")]
    NotFound(String),
    /// Failed to decode photo.
    #[error("Decode error: {0}")]
    DecodeError(String),
    /// I/O error during cache operation.
    #[error("IO error: {0}")]
    IoError(String),
    /// Network error during download.
    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Port for photo caching operations.
/// Implementations must be thread-safe.
#[async_trait::async_trait]
pub trait ImageCachePort: Send + Sync {
    /// Attempts to get a photo from the cache.
    /// Returns None if not cached.
    async fn get(&self, id: &ImageId) -> Option<Arc<image::DynamicImage>>;

    /// Stores a photo in the cache.
    async fn put(&self, id: ImageId, image: Arc<image::DynamicImage>);

    /// Removes a photo from the cache.
    async fn evict(&self, id: &ImageId);

    /// Returns the current number of cached photos.
    fn len(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all photos from the cache.
    async fn clear(&self);
}
