//! Command-line entry: `imgtweak [IMAGE]` opens the editor, adding
//! `--output FILE` exports a single edited image without opening a window.
//!
//! ```text
//! imgtweak photo.jpg
//! imgtweak photo.jpg --output out.png --grayscale 100 --rotate-right 1 --flip-h
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context as _, bail};
use clap::{ArgAction, Parser};

use crate::config::AppConfig;
use crate::controller::{Controller, Download, DownloadSink, ImageRequest, Intent, Loaded};
use crate::edit::{AffineTransform, Channel, ColorFilter};
use crate::image::SourceImage;
use crate::render::PreviewSurface;
use crate::util::write_atomic;

const LOAD_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Minimal image editor: brightness, saturation, inversion, grayscale,
/// quarter-turn rotation and mirroring, exported as PNG.
#[derive(Parser, Debug)]
#[command(name = "imgtweak", version)]
pub struct Args {
    /// Image to open. Required when exporting with --output.
    #[arg(value_name = "IMAGE")]
    pub image: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Read settings from this file instead of searching for imgtweak.toml.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Export the edited IMAGE as PNG to FILE and exit without a window.
    #[arg(short, long, value_name = "FILE", requires = "image")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub adjust: Adjustments,
}

/// Edits applied in headless mode, in the order they are listed.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct Adjustments {
    /// Brightness percent (0-200, default 100).
    #[arg(long, value_name = "PERCENT", allow_negative_numbers = true)]
    pub brightness: Option<i32>,

    /// Saturation percent (0-200, default 100).
    #[arg(long, value_name = "PERCENT", allow_negative_numbers = true)]
    pub saturation: Option<i32>,

    /// Inversion percent (0-100, default 0).
    #[arg(long, value_name = "PERCENT", allow_negative_numbers = true)]
    pub inversion: Option<i32>,

    /// Grayscale percent (0-100, default 0).
    #[arg(long, value_name = "PERCENT", allow_negative_numbers = true)]
    pub grayscale: Option<i32>,

    /// Quarter turns clockwise.
    #[arg(long, value_name = "TURNS", default_value_t = 0)]
    pub rotate_right: u32,

    /// Quarter turns counter-clockwise.
    #[arg(long, value_name = "TURNS", default_value_t = 0)]
    pub rotate_left: u32,

    /// Mirror left to right.
    #[arg(long)]
    pub flip_h: bool,

    /// Mirror top to bottom.
    #[arg(long)]
    pub flip_v: bool,
}

impl Adjustments {
    /// The adjustments as controller intents: channels, then rotations, then flips.
    pub fn intents(&self) -> Vec<Intent> {
        let mut intents = Vec::new();
        let channels = [
            (Channel::Brightness, self.brightness),
            (Channel::Saturation, self.saturation),
            (Channel::Inversion, self.inversion),
            (Channel::GrayScale, self.grayscale),
        ];
        for (channel, value) in channels {
            if let Some(value) = value {
                intents.push(Intent::SelectChannel(channel));
                intents.push(Intent::SetSliderValue(value));
            }
        }
        // Four turns in one direction are a no-op on the output.
        for _ in 0..self.rotate_right % 4 {
            intents.push(Intent::RotateRight);
        }
        for _ in 0..self.rotate_left % 4 {
            intents.push(Intent::RotateLeft);
        }
        if self.flip_h {
            intents.push(Intent::FlipHorizontal);
        }
        if self.flip_v {
            intents.push(Intent::FlipVertical);
        }
        intents
    }
}

/// Preview surface for headless runs; nothing is shown.
#[derive(Debug, Default)]
pub struct HeadlessPreview;

impl PreviewSurface for HeadlessPreview {
    fn attach(&mut self, _source: &SourceImage) {}

    fn present(&mut self, _filter: &ColorFilter, _transform: &AffineTransform) {}
}

/// Keeps the last export so the caller can write it out.
#[derive(Debug, Default)]
pub struct CapturedDownload(Option<Download>);

impl CapturedDownload {
    pub const fn take(&mut self) -> Option<Download> {
        self.0.take()
    }
}

impl DownloadSink for CapturedDownload {
    fn deliver(&mut self, download: Download) {
        self.0 = Some(download);
    }
}

/// Outcome of one headless export.
#[derive(Debug)]
pub struct HeadlessReport {
    pub loaded: Loaded,
    pub filter: ColorFilter,
    pub transform: AffineTransform,
    pub bytes_written: usize,
}

/// Load `input`, apply `adjust`, and write the PNG export to `output`.
pub fn run_headless(
    input: &Path,
    output: &Path,
    adjust: &Adjustments,
    config: &AppConfig,
) -> anyhow::Result<HeadlessReport> {
    let mut controller = Controller::new(HeadlessPreview, CapturedDownload::default(), config);
    controller.load_image(ImageRequest::Path(input.to_path_buf()));
    let loaded = loop {
        match controller.wait_for_load(LOAD_POLL_INTERVAL) {
            Some(result) => break result?,
            None if controller.is_loading() => {}
            None => bail!("Loading {} was abandoned", input.display()),
        }
    };

    for intent in adjust.intents() {
        controller.dispatch(intent)?;
    }
    let (filter, transform) = controller.descriptors();
    controller.save()?;
    let Some(download) = controller.sink_mut().take() else {
        bail!("Export of {} produced no output", input.display());
    };
    write_atomic(output, &download.bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(HeadlessReport {
        loaded,
        filter,
        transform,
        bytes_written: download.bytes.len(),
    })
}

/// Run headless mode and map the outcome to an exit code.
pub fn run(args: &Args, config: &AppConfig) -> ExitCode {
    let (Some(input), Some(output)) = (args.image.as_deref(), args.output.as_deref()) else {
        eprintln!("error: --output needs an input IMAGE");
        return ExitCode::FAILURE;
    };
    let started = Instant::now();
    match run_headless(input, output, &args.adjust, config) {
        Ok(report) => {
            tracing::info!(
                input = %input.display(),
                output = %output.display(),
                width = report.loaded.width,
                height = report.loaded.height,
                filter = %report.filter,
                transform = %report.transform,
                bytes = report.bytes_written,
                elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                "headless export finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(input = %input.display(), "headless export failed: {err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
