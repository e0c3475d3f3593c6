use std::path::{Path, PathBuf};

/// Describes where the current image data originated.
#[derive(Debug, Clone)]
pub enum ImageOrigin {
    File(PathBuf),
    DroppedBytes { suggested_name: Option<String> },
    Clipboard,
}

/// Metadata describing a loaded image and its provenance.
#[derive(Debug, Clone)]
pub struct ImageMeta {
    origin: ImageOrigin,
    byte_len: Option<u64>,
}

impl ImageMeta {
    /// Build metadata from a filesystem path (size when available).
    pub fn from_path(path: &Path) -> Self {
        let byte_len = std::fs::metadata(path).ok().map(|meta| meta.len());
        Self {
            origin: ImageOrigin::File(path.to_owned()),
            byte_len,
        }
    }

    /// Build metadata for dropped bytes with an optional name.
    pub fn from_dropped_bytes(name: Option<&str>, byte_len: usize) -> Self {
        Self {
            origin: ImageOrigin::DroppedBytes {
                suggested_name: name.filter(|s| !s.is_empty()).map(ToOwned::to_owned),
            },
            byte_len: u64::try_from(byte_len).ok(),
        }
    }

    /// Build metadata for a clipboard image.
    pub const fn from_clipboard(byte_len: Option<u64>) -> Self {
        Self {
            origin: ImageOrigin::Clipboard,
            byte_len,
        }
    }

    /// Best-effort display name for the image source.
    pub fn display_name(&self) -> String {
        match &self.origin {
            ImageOrigin::File(path) => path
                .file_name()
                .and_then(|s| s.to_str())
                .map_or_else(|| path.display().to_string(), ToOwned::to_owned),
            ImageOrigin::DroppedBytes { suggested_name } => suggested_name
                .as_deref()
                .map_or_else(|| "Unnamed drop".to_string(), str::to_owned),
            ImageOrigin::Clipboard => "Clipboard image".to_string(),
        }
    }

    /// Filesystem path when the image originated from disk.
    pub fn path(&self) -> Option<&Path> {
        match &self.origin {
            ImageOrigin::File(path) => Some(path.as_path()),
            ImageOrigin::DroppedBytes { .. } | ImageOrigin::Clipboard => None,
        }
    }

    /// Byte length of the encoded image data when known.
    pub const fn byte_len(&self) -> Option<u64> {
        self.byte_len
    }
}

/// Format a byte count with binary units (KiB, MiB, ...).
pub fn human_readable_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64;
    let mut unit_idx = 0;
    while value >= 1024.0 && unit_idx < UNITS.len() - 1 {
        value /= 1024.0;
        unit_idx += 1;
    }
    if unit_idx == 0 {
        format!("{bytes} {}", UNITS[unit_idx])
    } else {
        format!("{value:.2} {}", UNITS[unit_idx])
    }
}
