//! Async photo loading orchestrator.
//!
//! Implements a three-tier cache: Memory -> Disk -> Network

use std::collections::HashSet;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::{RwLock, Semaphore, mpsc};
use tracing::{debug, error, info, warn};

use crate::domain::entities::{ImageId, ImageSource, LoadedImage};
use crate::domain::ports::{CacheError, CacheResult, ImageCachePort};

use super::disk_cache::DiskPhotoCache;
use super::memory_cache::MemoryPhotoCache;
use super::photo_cdn::optimize_photo_url_default;

/// Largest decoded width kept in memory; larger photos are downscaled.
const MAX_DECODED_WIDTH: u32 = 800;

/// Message sent when a photo finishes loading.
#[derive(Debug, Clone)]
pub struct PhotoLoadedEvent {
    /// The photo ID.
    pub id: ImageId,
    /// The loaded photo, or the failure message.
    pub result: Result<LoadedImage, String>,
}

/// Configuration for the photo loader.
#[derive(Debug, Clone)]
pub struct PhotoLoaderConfig {
    /// Maximum photos in memory cache.
    pub memory_cache_size: usize,
    /// Maximum concurrent downloads.
    pub max_concurrent_downloads: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for PhotoLoaderConfig {
    fn default() -> Self {
        Self {
            memory_cache_size: 50,
            max_concurrent_downloads: 4,
            timeout_secs: 30,
        }
    }
}

/// Orchestrates photo loading from memory, disk, and network.
pub struct PhotoLoader {
    memory_cache: Arc<MemoryPhotoCache>,
    disk_cache: Arc<DiskPhotoCache>,
    pending_loads: Arc<RwLock<HashSet<ImageId>>>,
    request_tx: mpsc::UnboundedSender<LoaderCommand>,
    config: PhotoLoaderConfig,
    http_client: reqwest::Client,
}

#[derive(Debug)]
enum LoaderCommand {
    Load { id: ImageId, url: String },
    CancelAll,
}

impl std::fmt::Debug for PhotoLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoLoader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// State for the background worker loop.
struct WorkerState {
    memory_cache: Arc<MemoryPhotoCache>,
    disk_cache: Arc<DiskPhotoCache>,
    pending_loads: Arc<RwLock<HashSet<ImageId>>>,
    event_tx: mpsc::UnboundedSender<PhotoLoadedEvent>,
    http_client: reqwest::Client,
    semaphore: Arc<Semaphore>,
    request_rx: mpsc::UnboundedReceiver<LoaderCommand>,
}

impl PhotoLoader {
    /// Creates a new photo loader with the given configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(
        config: PhotoLoaderConfig,
        event_tx: &mpsc::UnboundedSender<PhotoLoadedEvent>,
        disk_cache: Arc<DiskPhotoCache>,
    ) -> CacheResult<Self> {
        let memory_cache = Arc::new(MemoryPhotoCache::new(config.memory_cache_size));

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CacheError::NetworkError(format!("Failed to create HTTP client: {e}")))?;

        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let semaphore = Arc::new(Semaphore::new(config.max_concurrent_downloads));
        let pending_loads = Arc::new(RwLock::new(HashSet::new()));

        let worker_state = WorkerState {
            memory_cache: memory_cache.clone(),
            disk_cache: disk_cache.clone(),
            pending_loads: pending_loads.clone(),
            event_tx: event_tx.clone(),
            http_client: http_client.clone(),
            semaphore,
            request_rx,
        };

        tokio::spawn(Self::run_worker_loop(worker_state));

        Ok(Self {
            memory_cache,
            disk_cache,
            pending_loads,
            request_tx,
            config,
            http_client,
        })
    }

    /// Creates a loader with default configuration and cache location.
    ///
    /// # Errors
    /// Returns error if disk cache or HTTP client cannot be created.
    pub async fn with_defaults(
        event_tx: mpsc::UnboundedSender<PhotoLoadedEvent>,
    ) -> CacheResult<Self> {
        let disk_cache = Arc::new(DiskPhotoCache::default_location().await?);
        Self::new(PhotoLoaderConfig::default(), &event_tx, disk_cache)
    }

    /// Worker loop to handle download requests and throttling.
    async fn run_worker_loop(mut state: WorkerState) {
        let mut queue: std::collections::VecDeque<(ImageId, String)> =
            std::collections::VecDeque::new();

        loop {
            tokio::select! {
                cmd = state.request_rx.recv() => {
                    match cmd {
                        Some(LoaderCommand::Load { id, url }) => {
                            if !queue.iter().any(|(qid, _)| *qid == id) {
                                queue.push_front((id, url));
                            }
                        }
                        Some(LoaderCommand::CancelAll) => {
                            queue.clear();
                        }
                        None => break,
                    }
                }
                Ok(permit) = state.semaphore.clone().acquire_owned(), if !queue.is_empty() => {
                    if let Some((id, url)) = queue.pop_front() {
                        let task = LoadTask {
                            memory_cache: state.memory_cache.clone(),
                            disk_cache: state.disk_cache.clone(),
                            http_client: state.http_client.clone(),
                        };
                        let pending_loads = state.pending_loads.clone();
                        let event_tx = state.event_tx.clone();

                        tokio::spawn(async move {
                            {
                                let mut pending = pending_loads.write().await;
                                if pending.contains(&id) {
                                    return;
                                }
                                pending.insert(id.clone());
                            }

                            let result = task.load(&id, &url).await;

                            {
                                let mut pending = pending_loads.write().await;
                                pending.remove(&id);
                            }

                            let _ = event_tx.send(PhotoLoadedEvent {
                                id: id.clone(),
                                result,
                            });
                            drop(permit);
                        });
                    }
                }
            }
        }
    }

    /// Checks memory cache without promoting the entry.
    pub async fn check_memory_cache(&self, id: &ImageId) -> Option<Arc<image::DynamicImage>> {
        self.memory_cache.peek(id).await
    }

    /// Starts loading a photo asynchronously.
    /// The result will be sent via the event channel.
    pub fn load_async(&self, id: ImageId, url: String) {
        if let Err(e) = self.request_tx.send(LoaderCommand::Load { id, url }) {
            error!("Failed to send load request: {}", e);
        }
    }

    /// Prefetches multiple photos into cache.
    pub fn prefetch_batch(&self, photos: Vec<(ImageId, String)>) {
        for (id, url) in photos {
            self.load_async(id, url);
        }
    }

    /// Drops every queued load; in-flight downloads still complete.
    pub fn cancel_all_queued(&self) {
        if let Err(e) = self.request_tx.send(LoaderCommand::CancelAll) {
            error!("Failed to send cancel all request: {}", e);
        }
        debug!("Cancelled all queued photo loads");
    }

    /// Returns true if a photo is currently loading.
    pub async fn is_loading(&self, id: &ImageId) -> bool {
        let pending = self.pending_loads.read().await;
        pending.contains(id)
    }

    /// Returns the number of pending loads.
    pub async fn pending_count(&self) -> usize {
        let pending = self.pending_loads.read().await;
        pending.len()
    }

    /// Exports a photo to a file for external viewing.
    ///
    /// Ensures the original bytes are cached, then copies them to a `view`
    /// subdirectory of the cache with an extension derived from the content
    /// type or URL.
    ///
    /// # Errors
    /// Returns error if download fails or file I/O fails.
    pub async fn export_for_viewing(
        &self,
        id: &ImageId,
        url: &str,
    ) -> CacheResult<std::path::PathBuf> {
        let (bytes, content_type) = if let Some(cached_bytes) = self.disk_cache.get_bytes(id).await
        {
            (Bytes::from(cached_bytes), None)
        } else {
            let (bytes, ctype) = download(&self.http_client, url).await?;
            let _ = self.disk_cache.put_bytes(id, &bytes).await;
            (bytes, ctype)
        };

        let ext = if let Some(ctype) = content_type {
            match ctype.as_str() {
                "image/jpeg" => "jpg",
                "image/webp" => "webp",
                _ => "png",
            }
        } else if url.contains(".png") {
            "png"
        } else if url.contains(".webp") {
            "webp"
        } else {
            "jpg"
        };

        let view_dir = self.disk_cache.cache_dir().join("view");
        tokio::fs::create_dir_all(&view_dir)
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to create view dir: {e}")))?;

        let filename = format!("{}.{}", id.as_str(), ext);
        let path = view_dir.join(filename);

        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to write export file: {e}")))?;

        Ok(path)
    }

    /// Returns memory cache statistics.
    #[must_use]
    pub fn memory_cache_stats(&self) -> super::memory_cache::CacheStats {
        self.memory_cache.stats()
    }

    /// Clears all caches.
    pub async fn clear_all(&self) {
        self.memory_cache.clear().await;
        if let Err(e) = self.disk_cache.clear().await {
            warn!(error = %e, "Failed to clear disk cache");
        }
        info!("Cleared all photo caches");
    }
}

/// Downloads photo bytes from a URL.
async fn download(
    client: &reqwest::Client,
    url: &str,
) -> CacheResult<(Bytes, Option<String>)> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| CacheError::NetworkError(format!("Request failed: {e}")))?;

    if !response.status().is_success() {
        return Err(CacheError::NetworkError(format!(
            "HTTP {}: {}",
            response.status(),
            response.status().canonical_reason().unwrap_or("Unknown")
        )));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let bytes = response
        .bytes()
        .await
        .map_err(|e| CacheError::NetworkError(format!("Failed to read body: {e}")))?;

    Ok((bytes, content_type))
}

/// Per-request loading state shared into spawned tasks.
struct LoadTask {
    memory_cache: Arc<MemoryPhotoCache>,
    disk_cache: Arc<DiskPhotoCache>,
    http_client: reqwest::Client,
}

impl LoadTask {
    async fn load(&self, id: &ImageId, url: &str) -> Result<LoadedImage, String> {
        if let Some(img) = self.memory_cache.get(id).await {
            return Ok(LoadedImage {
                id: id.clone(),
                image: img,
                source: ImageSource::MemoryCache,
            });
        }

        if let Some(img) = self.disk_cache.get(id).await {
            self.memory_cache.put(id.clone(), img.clone()).await;
            return Ok(LoadedImage {
                id: id.clone(),
                image: img,
                source: ImageSource::DiskCache,
            });
        }

        let optimized_url = optimize_photo_url_default(url);
        debug!(id = %id, "Downloading photo: {}", optimized_url);

        let (bytes, _content_type) = download(&self.http_client, &optimized_url)
            .await
            .map_err(|e| e.to_string())?;

        let bytes_for_decode = bytes.clone();
        let decoded =
            tokio::task::spawn_blocking(move || -> Result<image::DynamicImage, String> {
                let img = image::load_from_memory(&bytes_for_decode)
                    .map_err(|e| format!("Decode failed: {e}"))?;

                if img.width() > MAX_DECODED_WIDTH {
                    Ok(img.resize(
                        MAX_DECODED_WIDTH,
                        MAX_DECODED_WIDTH * 3 / 4,
                        image::imageops::FilterType::Lanczos3,
                    ))
                } else {
                    Ok(img)
                }
            })
            .await
            .map_err(|e| format!("Decode task panicked: {e}"))??;

        let img = Arc::new(decoded);

        self.memory_cache.put(id.clone(), img.clone()).await;

        let disk_cache = self.disk_cache.clone();
        let id_clone = id.clone();
        tokio::spawn(async move {
            if let Err(e) = disk_cache.put_bytes(&id_clone, &bytes).await {
                warn!(id = %id_clone, error = %e, "Failed to cache to disk");
            }
        });

        debug!(id = %id, source = "network", "Photo loaded successfully");

        Ok(LoadedImage {
            id: id.clone(),
            image: img,
            source: ImageSource::Network,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_loader_creation() -> Result<(), Box<dyn std::error::Error>> {
        let (tx, _rx) = mpsc::unbounded_channel();
        let temp_dir = tempfile::TempDir::new()?;
        let disk_cache =
            Arc::new(DiskPhotoCache::new(temp_dir.path().to_path_buf(), 1024 * 1024).await?);

        let loader = PhotoLoader::new(PhotoLoaderConfig::default(), &tx, disk_cache);
        assert!(loader.is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn test_pending_tracking_starts_empty() -> Result<(), Box<dyn std::error::Error>> {
        let (tx, _rx) = mpsc::unbounded_channel();
        let temp_dir = tempfile::TempDir::new()?;
        let disk_cache =
            Arc::new(DiskPhotoCache::new(temp_dir.path().to_path_buf(), 1024 * 1024).await?);
        let loader = PhotoLoader::new(PhotoLoaderConfig::default(), &tx, disk_cache)?;

        assert_eq!(loader.pending_count().await, 0);
        assert!(!loader.is_loading(&ImageId::new("nope")).await);
        Ok(())
    }

    #[tokio::test]
    async fn test_memory_cache_starts_cold() -> Result<(), Box<dyn std::error::Error>> {
        let (tx, _rx) = mpsc::unbounded_channel();
        let temp_dir = tempfile::TempDir::new()?;
        let disk_cache =
            Arc::new(DiskPhotoCache::new(temp_dir.path().to_path_buf(), 1024 * 1024).await?);
        let loader = PhotoLoader::new(PhotoLoaderConfig::default(), &tx, disk_cache)?;

        assert!(loader.check_memory_cache(&ImageId::new("x")).await.is_none());
        Ok(())
    }
}
