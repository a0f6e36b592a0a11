//! Disk-based photo cache for persistence across sessions.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, trace, warn};

use crate::domain::entities::ImageId;
use crate::domain::ports::{CacheError, CacheResult};
use crate::infrastructure::config::AppConfig;

/// Maximum disk cache size in bytes (200 MB default).
pub const DEFAULT_MAX_CACHE_SIZE: u64 = 200 * 1024 * 1024;

/// Disk-based photo cache that persists raw image bytes.
pub struct DiskPhotoCache {
    cache_dir: PathBuf,
    max_size: u64,
    current_size: AtomicU64,
    item_count: AtomicUsize,
}

impl DiskPhotoCache {
    /// Creates a new disk cache in the specified directory.
    ///
    /// # Errors
    /// Returns error if cache directory cannot be created.
    pub async fn new(cache_dir: PathBuf, max_size: u64) -> CacheResult<Self> {
        fs::create_dir_all(&cache_dir)
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to create cache dir: {e}")))?;
        let mut total_size = 0u64;
        let mut count = 0usize;

        let mut entries = fs::read_dir(&cache_dir)
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to read cache dir: {e}")))?;

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "img")
                && let Ok(meta) = entry.metadata().await
            {
                total_size += meta.len();
                count += 1;
            }
        }

        let cache = Self {
            cache_dir,
            max_size,
            current_size: AtomicU64::new(total_size),
            item_count: AtomicUsize::new(count),
        };

        cache.cleanup_if_needed().await;

        Ok(cache)
    }

    /// Creates a cache in the default location (~/.cache/emberdeck/photos/).
    ///
    /// # Errors
    /// Returns error if cache directory cannot be created.
    pub async fn default_location() -> CacheResult<Self> {
        let cache_dir = AppConfig::default_photo_cache_dir()
            .unwrap_or_else(|| std::env::temp_dir().join("emberdeck").join("photos"));
        Self::new(cache_dir, DEFAULT_MAX_CACHE_SIZE).await
    }

    /// Returns the path for a cached photo.
    fn cache_path(&self, id: &ImageId) -> PathBuf {
        self.cache_dir.join(format!("{}.img", id.as_str()))
    }

    /// Returns the directory this cache writes into.
    #[must_use]
    pub fn cache_dir(&self) -> &std::path::Path {
        &self.cache_dir
    }

    /// Gets raw photo bytes from disk cache.
    pub async fn get_bytes(&self, id: &ImageId) -> Option<Vec<u8>> {
        let path = self.cache_path(id);
        if let Ok(bytes) = fs::read(&path).await {
            trace!(id = %id, path = %path.display(), "Disk cache hit");
            Some(bytes)
        } else {
            trace!(id = %id, "Disk cache miss");
            None
        }
    }

    /// Loads and decodes a photo from disk cache.
    pub async fn get(&self, id: &ImageId) -> Option<Arc<image::DynamicImage>> {
        let bytes = self.get_bytes(id).await?;

        let result = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes)).await;

        match result {
            Ok(Ok(img)) => {
                debug!(id = %id, "Decoded photo from disk cache");
                Some(Arc::new(img))
            }
            Ok(Err(e)) => {
                warn!(id = %id, error = %e, "Failed to decode cached photo");
                None
            }
            Err(e) => {
                error!(id = %id, error = %e, "Decode task panicked");
                None
            }
        }
    }

    /// Stores raw bytes in the disk cache.
    ///
    /// # Errors
    /// Returns error if file cannot be created or written.
    pub async fn put_bytes(&self, id: &ImageId, bytes: &[u8]) -> CacheResult<()> {
        let path = self.cache_path(id);

        let old_size = fs::metadata(&path).await.map(|m| m.len()).ok();

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to create cache file: {e}")))?;

        file.write_all(bytes)
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to write cache file: {e}")))?;

        file.flush()
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to flush cache file: {e}")))?;
        let new_size = bytes.len() as u64;
        if let Some(old) = old_size {
            if new_size > old {
                self.current_size
                    .fetch_add(new_size - old, Ordering::Relaxed);
            } else {
                self.current_size
                    .fetch_sub(old - new_size, Ordering::Relaxed);
            }
        } else {
            self.current_size.fetch_add(new_size, Ordering::Relaxed);
            self.item_count.fetch_add(1, Ordering::Relaxed);
        }

        debug!(id = %id, path = %path.display(), size = bytes.len(), "Stored photo in disk cache");

        self.cleanup_if_needed().await;

        Ok(())
    }

    /// Removes a photo from disk cache.
    pub async fn evict(&self, id: &ImageId) {
        let path = self.cache_path(id);
        let size = fs::metadata(&path).await.map(|m| m.len()).ok();
        if let Err(e) = fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(id = %id, error = %e, "Failed to evict from disk cache");
            }
        } else if let Some(s) = size {
            self.current_size.fetch_sub(s, Ordering::Relaxed);
            self.item_count.fetch_sub(1, Ordering::Relaxed);
            debug!(id = %id, "Evicted from disk cache");
        }
    }

    /// Clears the entire disk cache.
    ///
    /// # Errors
    /// Returns error if cache directory cannot be read.
    pub async fn clear(&self) -> CacheResult<()> {
        let mut entries = fs::read_dir(&self.cache_dir)
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to read cache dir: {e}")))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to read entry: {e}")))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "img")
                && fs::remove_file(&path).await.is_err()
            {
                warn!(path = %path.display(), "Failed to remove cache file");
            }
        }
        self.current_size.store(0, Ordering::Relaxed);
        self.item_count.store(0, Ordering::Relaxed);
        debug!("Cleared disk cache");
        Ok(())
    }

    /// Returns the current cache size in bytes.
    pub fn current_size(&self) -> u64 {
        self.current_size.load(Ordering::Relaxed)
    }

    /// Returns the number of cached files.
    pub fn len(&self) -> usize {
        self.item_count.load(Ordering::Relaxed)
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks if a photo is cached.
    pub async fn contains(&self, id: &ImageId) -> bool {
        let path = self.cache_path(id);
        fs::try_exists(&path).await.unwrap_or(false)
    }

    /// Cleans up old cache entries if over size limit.
    async fn cleanup_if_needed(&self) {
        let current_size = self.current_size();
        if current_size <= self.max_size {
            return;
        }

        debug!(
            current_size = current_size,
            max_size = self.max_size,
            "Disk cache over limit, cleaning up"
        );

        let Ok(mut entries) = fs::read_dir(&self.cache_dir).await else {
            return;
        };

        let mut files: Vec<(PathBuf, std::time::SystemTime, u64)> = Vec::new();

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "img") {
                continue;
            }

            if let Ok(meta) = entry.metadata().await {
                let accessed = meta.accessed().unwrap_or(std::time::SystemTime::UNIX_EPOCH);
                files.push((path, accessed, meta.len()));
            }
        }

        files.sort_by_key(|(_, time, _)| *time);

        let mut freed_size = 0u64;
        let mut freed_count = 0usize;
        let target = current_size - self.max_size + (self.max_size / 10);

        for (path, _, size) in files {
            if freed_size >= target {
                break;
            }

            if let Err(e) = fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %e, "Failed to remove old cache file");
            } else {
                debug!(path = %path.display(), "Removed old cache file");
                freed_size += size;
                freed_count += 1;
            }
        }
        self.current_size.fetch_sub(freed_size, Ordering::Relaxed);
        self.item_count.fetch_sub(freed_count, Ordering::Relaxed);

        debug!(
            freed_size = freed_size,
            freed_count = freed_count,
            "Disk cache cleanup complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_cache() -> (DiskPhotoCache, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let cache = DiskPhotoCache::new(temp_dir.path().to_path_buf(), 1024 * 1024)
            .await
            .unwrap();
        (cache, temp_dir)
    }

    #[tokio::test]
    async fn test_put_and_get_bytes() {
        let (cache, _dir) = create_test_cache().await;
        let id = ImageId::new("photo1");
        let bytes = vec![1u8, 2, 3, 4];

        cache.put_bytes(&id, &bytes).await.unwrap();

        assert!(cache.contains(&id).await);
        assert_eq!(cache.get_bytes(&id).await, Some(bytes));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.current_size(), 4);
    }

    #[tokio::test]
    async fn test_evict_updates_accounting() {
        let (cache, _dir) = create_test_cache().await;
        let id = ImageId::new("photo1");

        cache.put_bytes(&id, &[0u8; 16]).await.unwrap();
        cache.evict(&id).await;

        assert!(!cache.contains(&id).await);
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.current_size(), 0);
    }

    #[tokio::test]
    async fn test_overwrite_same_id_keeps_single_entry() {
        let (cache, _dir) = create_test_cache().await;
        let id = ImageId::new("photo1");

        cache.put_bytes(&id, &[0u8; 16]).await.unwrap();
        cache.put_bytes(&id, &[0u8; 8]).await.unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.current_size(), 8);
    }

    #[tokio::test]
    async fn test_clear_empties_cache() {
        let (cache, _dir) = create_test_cache().await;

        cache
            .put_bytes(&ImageId::new("a"), &[0u8; 8])
            .await
            .unwrap();
        cache
            .put_bytes(&ImageId::new("b"), &[0u8; 8])
            .await
            .unwrap();

        cache.clear().await.unwrap();

        assert!(cache.is_empty());
        assert_eq!(cache.current_size(), 0);
    }

    #[tokio::test]
    async fn test_cleanup_evicts_when_over_limit() {
        let temp_dir = TempDir::new().unwrap();
        // Limit of 32 bytes, each entry is 16.
        let cache = DiskPhotoCache::new(temp_dir.path().to_path_buf(), 32)
            .await
            .unwrap();

        cache
            .put_bytes(&ImageId::new("a"), &[0u8; 16])
            .await
            .unwrap();
        cache
            .put_bytes(&ImageId::new("b"), &[0u8; 16])
            .await
            .unwrap();
        cache
            .put_bytes(&ImageId::new("c"), &[0u8; 16])
            .await
            .unwrap();

        assert!(cache.current_size() <= 32);
    }

    #[tokio::test]
    async fn test_reopen_recounts_existing_entries() {
        let temp_dir = TempDir::new().unwrap();
        {
            let cache = DiskPhotoCache::new(temp_dir.path().to_path_buf(), 1024)
                .await
                .unwrap();
            cache
                .put_bytes(&ImageId::new("a"), &[0u8; 16])
                .await
                .unwrap();
        }

        let reopened = DiskPhotoCache::new(temp_dir.path().to_path_buf(), 1024)
            .await
            .unwrap();

        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.current_size(), 16);
    }
}
