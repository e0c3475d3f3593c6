use crate::config::ImageLimits;
use crate::image::{ImageMeta, SourceImage, decode_image_from_bytes, decode_image_from_path};
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;

/// Where the next source image comes from.
#[derive(Debug)]
pub enum ImageRequest {
    Path(PathBuf),
    Bytes {
        name: Option<String>,
        bytes: Vec<u8>,
    },
    /// Pixels that are already decoded (clipboard paste).
    Decoded { pixels: RgbaImage, meta: ImageMeta },
}

impl ImageRequest {
    pub fn description(&self) -> String {
        match self {
            Self::Path(path) => path
                .file_name()
                .and_then(|s| s.to_str())
                .map_or_else(|| path.display().to_string(), str::to_string),
            Self::Bytes { name, .. } => name
                .as_deref()
                .filter(|s| !s.is_empty())
                .map_or_else(|| "dropped bytes".to_string(), str::to_string),
            Self::Decoded { meta, .. } => meta.display_name(),
        }
    }
}

/// Completion message of one decode job.
pub struct LoadCompletion {
    pub generation: u64,
    pub result: Result<SourceImage, String>,
}

/// Decode job in flight; dropping it abandons the worker's result.
pub struct PendingLoad {
    pub(super) generation: u64,
    pub(super) description: String,
    rx: Receiver<LoadCompletion>,
}

pub enum PollState {
    Ready(LoadCompletion),
    Waiting,
    Disconnected,
}

impl PendingLoad {
    /// A load whose worker is already gone.
    #[cfg(test)]
    pub(super) fn detached(generation: u64, description: &str) -> Self {
        let (_, rx) = mpsc::channel();
        Self {
            generation,
            description: description.to_string(),
            rx,
        }
    }

    pub(super) fn try_poll(&self) -> PollState {
        match self.rx.try_recv() {
            Ok(done) => PollState::Ready(done),
            Err(TryRecvError::Empty) => PollState::Waiting,
            Err(TryRecvError::Disconnected) => PollState::Disconnected,
        }
    }

    pub(super) fn poll_timeout(&self, timeout: Duration) -> PollState {
        match self.rx.recv_timeout(timeout) {
            Ok(done) => PollState::Ready(done),
            Err(RecvTimeoutError::Timeout) => PollState::Waiting,
            Err(RecvTimeoutError::Disconnected) => PollState::Disconnected,
        }
    }
}

/// Decode `request` on a worker thread and tag the result with `generation`.
pub fn spawn_decode(limits: ImageLimits, request: ImageRequest, generation: u64) -> PendingLoad {
    let description = request.description();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = match request {
            ImageRequest::Path(path) => decode_image_from_path(&limits, &path)
                .map(|pixels| SourceImage::new(pixels, ImageMeta::from_path(&path))),
            ImageRequest::Bytes { name, bytes } => {
                let byte_len = bytes.len();
                decode_image_from_bytes(&limits, bytes).map(|pixels| {
                    SourceImage::new(pixels, ImageMeta::from_dropped_bytes(name.as_deref(), byte_len))
                })
            }
            ImageRequest::Decoded { pixels, meta } => Ok(SourceImage::new(pixels, meta)),
        };
        let msg = LoadCompletion {
            generation,
            result: result.map_err(|err| format!("{err:#}")),
        };
        let _ = tx.send(msg);
    });
    PendingLoad {
        generation,
        description,
        rx,
    }
}
