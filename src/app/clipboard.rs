use super::EditorApp;
use crate::config::ImageLimits;
use crate::controller::ImageRequest;
use crate::image::{ImageMeta, human_readable_bytes};
use arboard::{Clipboard, Error as ClipboardError};
use image::RgbaImage;

struct ClipboardCapture {
    pixels: RgbaImage,
    byte_len: usize,
}

#[derive(Debug, PartialEq, Eq)]
struct ValidatedClipboardSize {
    width: u32,
    height: u32,
    expected_len: usize,
}

impl EditorApp {
    pub(crate) fn paste_image_from_clipboard(&mut self) {
        let limits = self.config.effective_image_limits();
        match capture_clipboard_image(&limits) {
            Ok(captured) => {
                let meta = ImageMeta::from_clipboard(u64::try_from(captured.byte_len).ok());
                self.start_image_load(ImageRequest::Decoded {
                    pixels: captured.pixels,
                    meta,
                });
            }
            Err(err) => {
                tracing::warn!(%err, "clipboard paste failed");
                self.set_status(err);
            }
        }
    }
}

fn capture_clipboard_image(limits: &ImageLimits) -> Result<ClipboardCapture, String> {
    let mut clipboard = Clipboard::new().map_err(format_clipboard_error)?;
    let data = clipboard.get_image().map_err(format_clipboard_error)?;
    let size = validate_clipboard_image(limits, data.width, data.height)?;
    let mut bytes = data.bytes.into_owned();
    if bytes.len() < size.expected_len {
        return Err("Paste failed: clipboard image data is truncated.".to_string());
    }
    bytes.truncate(size.expected_len);
    let pixels = RgbaImage::from_raw(size.width, size.height, bytes)
        .ok_or_else(|| "Paste failed: clipboard image data is malformed.".to_string())?;
    Ok(ClipboardCapture {
        pixels,
        byte_len: size.expected_len,
    })
}

fn validate_clipboard_image(
    limits: &ImageLimits,
    width: usize,
    height: usize,
) -> Result<ValidatedClipboardSize, String> {
    if width == 0 || height == 0 {
        return Err("Paste failed: clipboard image is empty.".to_string());
    }
    let width_u32 = u32::try_from(width).unwrap_or(u32::MAX);
    let height_u32 = u32::try_from(height).unwrap_or(u32::MAX);
    if width_u32 > limits.image_dim || height_u32 > limits.image_dim {
        return Err(format!(
            "Paste failed: clipboard image {width}x{height} exceeds the per-side limit ({} px).",
            limits.image_dim
        ));
    }

    let total_pixels = u64::from(width_u32) * u64::from(height_u32);
    if total_pixels > limits.total_pixels {
        return Err(format!(
            "Paste failed: clipboard image too large: {width}x{height} (~{} MP) exceeds limit (~{} MP).",
            total_pixels / 1_000_000,
            limits.total_pixels / 1_000_000
        ));
    }

    let rgba_bytes = total_pixels.checked_mul(4).ok_or_else(|| {
        "Paste failed: clipboard image is too large to fit in memory.".to_string()
    })?;
    if rgba_bytes > limits.alloc_bytes {
        return Err(format!(
            "Paste failed: clipboard image needs about {} of RGBA data, over the configured limit ({}).",
            human_readable_bytes(rgba_bytes),
            human_readable_bytes(limits.alloc_bytes)
        ));
    }

    let expected_len = usize::try_from(rgba_bytes).map_err(|_| {
        "Paste failed: clipboard image does not fit in available memory.".to_string()
    })?;

    Ok(ValidatedClipboardSize {
        width: width_u32,
        height: height_u32,
        expected_len,
    })
}

fn format_clipboard_error(err: ClipboardError) -> String {
    match err {
        ClipboardError::ContentNotAvailable => {
            "Paste failed: clipboard does not contain an image.".to_string()
        }
        ClipboardError::ClipboardNotSupported => {
            "Paste failed: clipboard access is not supported in this environment.".to_string()
        }
        ClipboardError::ClipboardOccupied => {
            "Paste failed: clipboard is busy; try again in a moment.".to_string()
        }
        ClipboardError::ConversionFailure => {
            "Paste failed: clipboard image could not be converted.".to_string()
        }
        ClipboardError::Unknown { description } => format!("Paste failed: {description}"),
        _ => format!("Paste failed: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(image_dim: u32, total_pixels: u64, alloc_bytes: u64) -> ImageLimits {
        ImageLimits {
            image_dim,
            total_pixels,
            alloc_bytes,
        }
    }

    #[test]
    fn accepts_image_within_limits() {
        let size = validate_clipboard_image(&ImageLimits::default(), 640, 480).expect("fits");
        assert_eq!(
            size,
            ValidatedClipboardSize {
                width: 640,
                height: 480,
                expected_len: 640 * 480 * 4,
            }
        );
    }

    #[test]
    fn rejects_empty_and_oversized_images() {
        let cfg = limits(100, 5_000, 1 << 20);
        assert!(validate_clipboard_image(&cfg, 0, 10).is_err());
        let side = validate_clipboard_image(&cfg, 101, 10).expect_err("side limit");
        assert!(side.contains("per-side limit (100 px)"));
        assert!(validate_clipboard_image(&cfg, 100, 100).is_err());
        let tight = limits(100, 10_000, 1_000);
        let alloc = validate_clipboard_image(&tight, 20, 20).expect_err("alloc limit");
        assert!(alloc.contains("RGBA data"));
    }
}
