use std::fs;
use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};
use serde::Deserialize;

const CONFIG_FILE_NAME: &str = "imgtweak.toml";

/// PNG compression preset used when exporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PngCompression {
    Fast,
    #[default]
    Default,
    Best,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Suggested file name handed to the download sink.
    pub file_name: String,
    pub compression: PngCompression,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: "image.png".to_string(),
            compression: PngCompression::Default,
        }
    }
}

impl ExportConfig {
    /// Non-empty file name ending in `.png`.
    pub fn effective_file_name(&self) -> String {
        let trimmed = self.file_name.trim();
        if trimmed.is_empty() {
            return "image.png".to_string();
        }
        let has_png_ext = Path::new(trimmed)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if has_png_ext {
            trimmed.to_string()
        } else {
            format!("{trimmed}.png")
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Empty space kept around the preview, in points.
    pub padding: f32,
    /// Paint a checkerboard behind the preview so transparency is visible.
    pub checkerboard: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            padding: 16.0,
            checkerboard: true,
        }
    }
}

impl PreviewConfig {
    pub const fn padding(&self) -> f32 {
        self.padding.clamp(0.0, 256.0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub image_limits: ImageLimits,
    pub export: ExportConfig,
    pub preview: PreviewConfig,
}

impl AppConfig {
    /// Load the first parseable config among the candidate locations.
    pub fn load() -> Self {
        for path in Self::candidate_paths() {
            if let Ok(contents) = fs::read_to_string(&path) {
                match toml::from_str::<Self>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "loaded config");
                        return cfg;
                    }
                    Err(err) => {
                        tracing::warn!(path = %path.display(), %err, "failed to parse config");
                    }
                }
            }
        }
        Self::default()
    }

    /// Load an explicitly requested config file.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context as _;
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn effective_image_limits(&self) -> ImageLimits {
        self.image_limits.sanitized()
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(exe_path) = std::env::current_exe()
            && let Some(dir) = exe_path.parent()
        {
            paths.push(dir.join(CONFIG_FILE_NAME));
        }

        if let Some(proj_dirs) = ProjectDirs::from("dev", "Imgtweak", "Imgtweak") {
            paths.push(proj_dirs.config_dir().join(CONFIG_FILE_NAME));
        }

        if let Some(base_dirs) = BaseDirs::new() {
            paths.push(base_dirs.config_dir().join("imgtweak").join(CONFIG_FILE_NAME));
        }

        paths
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageLimits {
    pub image_dim: u32,
    pub total_pixels: u64,
    pub alloc_bytes: u64,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            image_dim: 12_000,
            total_pixels: 80_000_000,       // ~80 MP
            alloc_bytes: 512 * 1024 * 1024, // 512 MiB
        }
    }
}

impl ImageLimits {
    pub fn sanitized(&self) -> Self {
        // Clamp to reasonable operating bounds to avoid pathological configs.
        let dim = self.image_dim.clamp(64, 100_000);
        let pixels = self.total_pixels.clamp(1_000_000, 5_000_000_000); // 1 MP .. 5 GP
        let alloc = self
            .alloc_bytes
            .clamp(8 * 1024 * 1024, 8 * 1024 * 1024 * 1024); // 8 MiB .. 8 GiB
        Self {
            image_dim: dim,
            total_pixels: pixels,
            alloc_bytes: alloc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [export]
            compression = "best"

            [image_limits]
            image_dim = 10
            "#,
        )
        .expect("parse config");
        assert_eq!(cfg.export.compression, PngCompression::Best);
        assert_eq!(cfg.export.file_name, "image.png");
        assert_eq!(cfg.effective_image_limits().image_dim, 64);
        assert!(cfg.preview.checkerboard);
    }

    #[test]
    fn export_file_name_gets_png_extension() {
        let mut export = ExportConfig::default();
        assert_eq!(export.effective_file_name(), "image.png");
        export.file_name = "edited".to_string();
        assert_eq!(export.effective_file_name(), "edited.png");
        export.file_name = "  Shot.PNG ".to_string();
        assert_eq!(export.effective_file_name(), "Shot.PNG");
        export.file_name = "   ".to_string();
        assert_eq!(export.effective_file_name(), "image.png");
    }

    #[test]
    fn unknown_compression_is_rejected() {
        let parsed = toml::from_str::<AppConfig>("[export]\ncompression = \"ultra\"\n");
        assert!(parsed.is_err());
    }
}
