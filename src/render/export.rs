use crate::config::PngCompression;
use crate::edit::{AffineTransform, ColorFilter};
use crate::error::EditorError;
use crate::image::{SourceImage, draw_transformed};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

/// Rasterizes the source at its natural size through the render descriptors
/// and encodes the result as PNG.
#[derive(Debug, Clone, Copy)]
pub struct ExportRenderer {
    compression: PngCompression,
}

impl Default for ExportRenderer {
    fn default() -> Self {
        Self::new(PngCompression::Default)
    }
}

impl ExportRenderer {
    pub const fn new(compression: PngCompression) -> Self {
        Self { compression }
    }

    /// Draw onto a natural-size canvas: translate to the centre, rotate,
    /// mirror, filter, then draw the source at `(-W/2, -H/2)` with size `W x H`.
    pub fn rasterize(
        &self,
        source: &SourceImage,
        filter: ColorFilter,
        transform: AffineTransform,
    ) -> RgbaImage {
        draw_transformed(source.pixels(), filter, transform)
    }

    /// Rasterize and encode in one go.
    pub fn render_png(
        &self,
        source: &SourceImage,
        filter: ColorFilter,
        transform: AffineTransform,
    ) -> Result<Vec<u8>, EditorError> {
        let canvas = self.rasterize(source, filter, transform);
        self.encode_png(&canvas)
    }

    pub fn encode_png(&self, canvas: &RgbaImage) -> Result<Vec<u8>, EditorError> {
        let mut bytes = Vec::new();
        let encoder =
            PngEncoder::new_with_quality(&mut bytes, self.compression_type(), FilterType::Adaptive);
        encoder
            .write_image(
                canvas.as_raw(),
                canvas.width(),
                canvas.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|err| EditorError::Encode(err.to_string()))?;
        Ok(bytes)
    }

    const fn compression_type(&self) -> CompressionType {
        match self.compression {
            PngCompression::Fast => CompressionType::Fast,
            PngCompression::Default => CompressionType::Default,
            PngCompression::Best => CompressionType::Best,
        }
    }
}
