//! Editing session: turns user intents into edit-state changes and re-renders.

use crate::config::{AppConfig, ImageLimits};
use crate::edit::{AffineTransform, Channel, ColorFilter, EditState, compile};
use crate::error::EditorError;
use crate::image::SourceImage;
use crate::render::{ExportRenderer, PreviewSurface};
use std::time::Duration;

mod loader;

pub use loader::{ImageRequest, LoadCompletion};
use loader::{PendingLoad, PollState, spawn_decode};

/// A user-originated action.
#[derive(Debug)]
pub enum Intent {
    LoadImage(ImageRequest),
    SelectChannel(Channel),
    SetSliderValue(i32),
    RotateLeft,
    RotateRight,
    FlipHorizontal,
    FlipVertical,
    Reset,
    Save,
}

/// Whether an intent changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Applied,
    /// No image is loaded; the intent was a silent no-op.
    Ignored,
}

/// Channel selection, `Disabled` until the first image finishes loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Disabled,
    Channel(Channel),
}

/// What the slider widget should show for the selected channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderModel {
    pub channel: Channel,
    pub max: u16,
    pub value: u16,
}

impl SliderModel {
    pub fn label(&self) -> String {
        format!("{}%", self.value)
    }
}

/// Encoded export handed to the download sink.
#[derive(Debug, Clone)]
pub struct Download {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Receives finished exports (save dialog, file writer, test recorder).
pub trait DownloadSink {
    fn deliver(&mut self, download: Download);
}

/// Summary of a completed load for status reporting.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub byte_len: Option<u64>,
}

impl Loaded {
    fn describe(source: &SourceImage) -> Self {
        Self {
            name: source.meta().display_name(),
            width: source.natural_width(),
            height: source.natural_height(),
            byte_len: source.meta().byte_len(),
        }
    }
}

/// Owns the edit session and the injected preview surface and download sink.
pub struct Controller<P, D> {
    state: EditState,
    source: Option<SourceImage>,
    preview: P,
    sink: D,
    exporter: ExportRenderer,
    export_name: String,
    limits: ImageLimits,
    generation: u64,
    pending: Option<PendingLoad>,
}

impl<P: PreviewSurface, D: DownloadSink> Controller<P, D> {
    pub fn new(preview: P, sink: D, config: &AppConfig) -> Self {
        Self {
            state: EditState::default(),
            source: None,
            preview,
            sink,
            exporter: ExportRenderer::new(config.export.compression),
            export_name: config.export.effective_file_name(),
            limits: config.effective_image_limits(),
            generation: 0,
            pending: None,
        }
    }

    pub fn dispatch(&mut self, intent: Intent) -> Result<Dispatch, EditorError> {
        match intent {
            Intent::LoadImage(request) => {
                self.load_image(request);
                Ok(Dispatch::Applied)
            }
            Intent::SelectChannel(channel) => Ok(self.select_channel(channel)),
            Intent::SetSliderValue(value) => Ok(self.set_slider_value(value)),
            Intent::RotateLeft => Ok(self.rotate_left()),
            Intent::RotateRight => Ok(self.rotate_right()),
            Intent::FlipHorizontal => Ok(self.flip_h()),
            Intent::FlipVertical => Ok(self.flip_v()),
            Intent::Reset => Ok(self.reset()),
            Intent::Save => self.save(),
        }
    }

    /// Start decoding a new source; any load still in flight is abandoned.
    /// Returns the generation tag of the new load.
    pub fn load_image(&mut self, request: ImageRequest) -> u64 {
        self.generation += 1;
        if let Some(previous) = self.pending.take() {
            tracing::debug!(
                abandoned = previous.generation,
                "superseding image load in flight"
            );
        }
        let pending = spawn_decode(self.limits.clone(), request, self.generation);
        tracing::info!(
            source = %pending.description,
            generation = self.generation,
            "loading image"
        );
        self.pending = Some(pending);
        self.generation
    }

    /// Apply the in-flight load if it has finished. Never blocks.
    pub fn poll_loads(&mut self) -> Option<Result<Loaded, EditorError>> {
        let pending = self.pending.take()?;
        let state = pending.try_poll();
        self.finish_poll(pending, state)
    }

    /// Block up to `timeout` for the in-flight load.
    pub fn wait_for_load(&mut self, timeout: Duration) -> Option<Result<Loaded, EditorError>> {
        let pending = self.pending.take()?;
        let state = pending.poll_timeout(timeout);
        self.finish_poll(pending, state)
    }

    fn finish_poll(
        &mut self,
        pending: PendingLoad,
        state: PollState,
    ) -> Option<Result<Loaded, EditorError>> {
        match state {
            PollState::Waiting => {
                self.pending = Some(pending);
                None
            }
            PollState::Ready(done) => self.complete_load(done, &pending.description).transpose(),
            PollState::Disconnected => {
                tracing::warn!(source = %pending.description, "image decoder worker disconnected");
                Some(Err(EditorError::LoaderDisconnected {
                    source_name: pending.description,
                }))
            }
        }
    }

    /// Apply a finished decode. Completions from superseded loads are dropped
    /// and yield `Ok(None)`.
    pub fn complete_load(
        &mut self,
        completion: LoadCompletion,
        description: &str,
    ) -> Result<Option<Loaded>, EditorError> {
        if completion.generation != self.generation {
            tracing::debug!(
                stale = completion.generation,
                latest = self.generation,
                "dropping stale image load"
            );
            return Ok(None);
        }
        match completion.result {
            Ok(source) => {
                let loaded = Loaded::describe(&source);
                self.preview.attach(&source);
                self.source = Some(source);
                self.state.reset();
                self.render();
                tracing::info!(
                    name = %loaded.name,
                    width = loaded.width,
                    height = loaded.height,
                    "image loaded"
                );
                Ok(Some(loaded))
            }
            Err(message) => {
                tracing::warn!(source = %description, %message, "image decode failed");
                Err(EditorError::Decode {
                    source_name: description.to_string(),
                    message,
                })
            }
        }
    }

    pub fn select_channel(&mut self, channel: Channel) -> Dispatch {
        self.mutate("select_channel", |state| state.select(channel))
    }

    pub fn set_slider_value(&mut self, value: i32) -> Dispatch {
        self.mutate("set_slider_value", |state| {
            state.set_selected_value(value);
        })
    }

    pub fn rotate_left(&mut self) -> Dispatch {
        self.mutate("rotate_left", EditState::rotate_left)
    }

    pub fn rotate_right(&mut self) -> Dispatch {
        self.mutate("rotate_right", EditState::rotate_right)
    }

    pub fn flip_h(&mut self) -> Dispatch {
        self.mutate("flip_horizontal", EditState::flip_h)
    }

    pub fn flip_v(&mut self) -> Dispatch {
        self.mutate("flip_vertical", EditState::flip_v)
    }

    pub fn reset(&mut self) -> Dispatch {
        self.mutate("reset", EditState::reset)
    }

    /// Export the current edit as PNG and hand it to the download sink.
    pub fn save(&mut self) -> Result<Dispatch, EditorError> {
        let Some(source) = self.source.as_ref() else {
            tracing::debug!(intent = "save", "ignored: no image loaded");
            return Ok(Dispatch::Ignored);
        };
        let (filter, transform) = compile(&self.state);
        let bytes = self.exporter.render_png(source, filter, transform)?;
        tracing::info!(
            file_name = %self.export_name,
            bytes = bytes.len(),
            %filter,
            %transform,
            "exported png"
        );
        self.sink.deliver(Download {
            file_name: self.export_name.clone(),
            bytes,
        });
        Ok(Dispatch::Applied)
    }

    fn mutate(&mut self, intent: &'static str, apply: impl FnOnce(&mut EditState)) -> Dispatch {
        if self.source.is_none() {
            tracing::debug!(intent, "ignored: no image loaded");
            return Dispatch::Ignored;
        }
        apply(&mut self.state);
        tracing::debug!(intent, "applied");
        self.render();
        Dispatch::Applied
    }

    fn render(&mut self) {
        let (filter, transform) = compile(&self.state);
        self.preview.present(&filter, &transform);
    }

    pub const fn state(&self) -> &EditState {
        &self.state
    }

    pub const fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn selection(&self) -> Selection {
        if self.source.is_some() {
            Selection::Channel(self.state.selected())
        } else {
            Selection::Disabled
        }
    }

    pub fn slider(&self) -> Option<SliderModel> {
        let Selection::Channel(channel) = self.selection() else {
            return None;
        };
        Some(SliderModel {
            channel,
            max: channel.max(),
            value: self.state.value(channel),
        })
    }

    pub fn descriptors(&self) -> (ColorFilter, AffineTransform) {
        compile(&self.state)
    }

    pub const fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn loading_description(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.description.as_str())
    }

    pub const fn preview(&self) -> &P {
        &self.preview
    }

    #[cfg(test)]
    pub const fn sink(&self) -> &D {
        &self.sink
    }

    pub const fn sink_mut(&mut self) -> &mut D {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests;
