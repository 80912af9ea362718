//! Bouncer sprite loading
//!
//! The sprite is read from disk on native and fetched over HTTP in the
//! browser. Either way the bytes are decoded into tightly packed RGBA8.

use glam::Vec2;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode sprite: {0}")]
    Decode(#[from] image::ImageError),
    #[error("failed to fetch {path}: {reason}")]
    Fetch { path: String, reason: String },
}

/// Decoded sprite pixels
#[derive(Debug, Clone)]
pub struct SpriteImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8, `width * height * 4` bytes
    pub rgba: Vec<u8>,
}

impl SpriteImage {
    /// Decode any format the `image` features enable (GIF, PNG)
    pub fn decode(bytes: &[u8]) -> Result<Self, ResourceError> {
        let img = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            width,
            height,
            rgba: img.into_raw(),
        })
    }

    /// 1x1 opaque white, used when there is nothing to texture with
    pub fn blank() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        }
    }

    /// Natural size in scene units
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Read and decode a sprite from the filesystem
#[cfg(not(target_arch = "wasm32"))]
pub fn load_sprite(path: &str) -> Result<SpriteImage, ResourceError> {
    let bytes = std::fs::read(path).map_err(|source| ResourceError::Io {
        path: path.to_string(),
        source,
    })?;
    let sprite = SpriteImage::decode(&bytes)?;
    log::info!("Loaded sprite {} ({}x{})", path, sprite.width, sprite.height);
    Ok(sprite)
}

/// Fetch and decode a sprite relative to the page
#[cfg(target_arch = "wasm32")]
pub async fn fetch_sprite(path: &str) -> Result<SpriteImage, ResourceError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let fetch_err = |reason: String| ResourceError::Fetch {
        path: path.to_string(),
        reason,
    };

    let window = web_sys::window().ok_or_else(|| fetch_err("no window".into()))?;
    let response = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(|e| fetch_err(format!("{:?}", e)))?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|_| fetch_err("not a Response".into()))?;
    if !response.ok() {
        return Err(fetch_err(format!("HTTP {}", response.status())));
    }

    let buffer = response
        .array_buffer()
        .map_err(|e| fetch_err(format!("{:?}", e)))?;
    let buffer = JsFuture::from(buffer)
        .await
        .map_err(|e| fetch_err(format!("{:?}", e)))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    let sprite = SpriteImage::decode(&bytes)?;
    log::info!("Fetched sprite {} ({}x{})", path, sprite.width, sprite.height);
    Ok(sprite)
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_load_bundled_ball() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/resources/ball.gif");
        let sprite = load_sprite(path).unwrap();
        assert_eq!((sprite.width, sprite.height), (20, 20));
        assert_eq!(sprite.rgba.len(), 20 * 20 * 4);
        // Corner pixel is the transparent palette entry
        assert_eq!(sprite.rgba[3], 0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_sprite("resources/does-not-exist.gif").unwrap_err();
        assert!(matches!(err, ResourceError::Io { .. }));
        assert!(err.to_string().contains("does-not-exist.gif"));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = SpriteImage::decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ResourceError::Decode(_)));
    }

    #[test]
    fn test_blank_sprite() {
        let blank = SpriteImage::blank();
        assert_eq!(blank.size(), Vec2::ONE);
        assert_eq!(blank.rgba, vec![255, 255, 255, 255]);
    }
}
