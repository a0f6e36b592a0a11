//! Photo CDN URL optimization.

/// Default target width for optimized photos.
pub const DEFAULT_WIDTH: u32 = 800;

/// Default target height for optimized photos.
pub const DEFAULT_HEIGHT: u32 = 600;

/// Hosts that honor Imgix-style resize query parameters.
const RESIZABLE_HOSTS: &[&str] = &["images.unsplash.com", "plus.unsplash.com"];

/// Optimizes a photo URL by adding resize query parameters.
/// This significantly reduces bandwidth usage and RAM consumption.
///
/// Only URLs on known resize-capable hosts are touched; anything else is
/// returned unchanged.
#[must_use]
pub fn optimize_photo_url(url: &str, width: u32, height: u32) -> String {
    if !RESIZABLE_HOSTS.iter().any(|host| url.contains(host)) {
        return url.to_string();
    }

    let (base_url, existing_params) = if let Some(idx) = url.find('?') {
        (&url[..idx], Some(&url[idx + 1..]))
    } else {
        (url, None)
    };

    let mut params = vec![
        format!("w={width}"),
        format!("h={height}"),
        "fit=crop".to_string(),
        "q=80".to_string(),
    ];

    // Preserve existing parameters we don't override
    if let Some(existing) = existing_params {
        for param in existing.split('&') {
            let key = param.split('=').next().unwrap_or("");
            if !["w", "h", "fit", "q"].contains(&key) {
                params.push(param.to_string());
            }
        }
    }

    format!("{}?{}", base_url, params.join("&"))
}

/// Optimizes a URL with default dimensions.
#[must_use]
pub fn optimize_photo_url_default(url: &str) -> String {
    optimize_photo_url(url, DEFAULT_WIDTH, DEFAULT_HEIGHT)
}
