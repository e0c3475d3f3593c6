use super::ImageMeta;
use image::RgbaImage;
use std::sync::Arc;

/// Decoded source raster shared by the session and the preview surface.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: Arc<RgbaImage>,
    meta: ImageMeta,
}

impl SourceImage {
    pub fn new(pixels: RgbaImage, meta: ImageMeta) -> Self {
        Self {
            pixels: Arc::new(pixels),
            meta,
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Shared handle to the pixels, for surfaces that outlive a borrow.
    pub fn shared_pixels(&self) -> Arc<RgbaImage> {
        Arc::clone(&self.pixels)
    }

    pub const fn meta(&self) -> &ImageMeta {
        &self.meta
    }

    pub fn natural_width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn natural_height(&self) -> u32 {
        self.pixels.height()
    }
}
