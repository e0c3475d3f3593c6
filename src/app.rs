//! egui/eframe shell around the editing controller.

use crate::config::AppConfig;
use crate::controller::{Controller, Dispatch, Download, ImageRequest, Intent, Loaded};
use crate::image::human_readable_bytes;
use crate::render::PreviewRenderer;
use egui::{Context, Key};
use egui_file_dialog::{DialogState, FileDialog};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod clipboard;
mod download;
mod ui;

use download::{PendingWrite, SaveQueue};

const LOADING_REPAINT_INTERVAL: Duration = Duration::from_millis(16);

enum NativeDialog {
    Open(FileDialog),
    Save { dialog: FileDialog, download: Download },
}

pub struct EditorApp {
    controller: Controller<PreviewRenderer, SaveQueue>,
    config: AppConfig,
    status: Option<String>,
    active_dialog: Option<NativeDialog>,
    pending_write: Option<PendingWrite>,
    last_image_dir: Option<PathBuf>,
    last_export_dir: Option<PathBuf>,
}

impl EditorApp {
    pub fn new(ctx: &Context, config: AppConfig, initial_path: Option<&Path>) -> Self {
        let controller = Controller::new(PreviewRenderer::new(ctx), SaveQueue::default(), &config);
        let mut app = Self {
            controller,
            config,
            status: None,
            active_dialog: None,
            pending_write: None,
            last_image_dir: None,
            last_export_dir: None,
        };
        if let Some(path) = initial_path {
            app.start_loading_image_from_path(path.to_path_buf());
        }
        app
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    fn has_image(&self) -> bool {
        self.controller.source().is_some()
    }

    pub(crate) fn start_loading_image_from_path(&mut self, path: PathBuf) {
        if let Some(dir) = path.parent() {
            self.last_image_dir = Some(dir.to_path_buf());
        }
        self.start_image_load(ImageRequest::Path(path));
    }

    pub(crate) fn start_loading_image_from_bytes(&mut self, name: Option<String>, bytes: Vec<u8>) {
        self.start_image_load(ImageRequest::Bytes { name, bytes });
    }

    fn start_image_load(&mut self, request: ImageRequest) {
        let description = request.description();
        self.apply_intent(Intent::LoadImage(request));
        self.set_status(format!("Loading {description}…"));
    }

    fn poll_image_loader(&mut self, ctx: &Context) {
        match self.controller.poll_loads() {
            Some(Ok(loaded)) => self.set_status(loaded_status(&loaded)),
            Some(Err(err)) => self.set_status(err.to_string()),
            None => {}
        }
        if self.controller.is_loading() {
            ctx.request_repaint_after(LOADING_REPAINT_INTERVAL);
        }
    }

    /// Forward an editing intent; intents without an image are dropped quietly.
    pub(crate) fn apply_intent(&mut self, intent: Intent) {
        match self.controller.dispatch(intent) {
            Ok(Dispatch::Applied | Dispatch::Ignored) => {}
            Err(err) => self.set_status(err.to_string()),
        }
    }

    pub(crate) fn save_image(&mut self) {
        match self.controller.save() {
            Ok(Dispatch::Applied) => {
                if let Some(download) = self.controller.sink_mut().take() {
                    self.open_save_dialog(download);
                }
            }
            Ok(Dispatch::Ignored) => self.set_status("Load an image before saving."),
            Err(err) => self.set_status(format!("Save failed: {err}")),
        }
    }

    fn handle_hotkeys(&mut self, ctx: &Context) {
        if ctx.wants_keyboard_input() || self.active_dialog.is_some() {
            return;
        }
        let (open, paste, save, reset, rotate_left, rotate_right) = ctx.input(|i| {
            let cmd = i.modifiers.command;
            (
                cmd && i.key_pressed(Key::O),
                cmd && i.key_pressed(Key::V),
                cmd && i.key_pressed(Key::S),
                cmd && i.key_pressed(Key::R),
                !cmd && i.key_pressed(Key::OpenBracket),
                !cmd && i.key_pressed(Key::CloseBracket),
            )
        });
        if open {
            self.open_image_dialog();
        }
        if paste {
            self.paste_image_from_clipboard();
        }
        if save {
            self.save_image();
        }
        if reset {
            self.apply_intent(Intent::Reset);
        }
        if rotate_left {
            self.apply_intent(Intent::RotateLeft);
        }
        if rotate_right {
            self.apply_intent(Intent::RotateRight);
        }
    }

    fn update_dialogs(&mut self, ctx: &Context) {
        let Some(dialog_state) = self.active_dialog.as_mut() else {
            return;
        };
        let mut close_dialog = false;
        let mut picked_image: Option<PathBuf> = None;
        let mut picked_export: Option<(PathBuf, Vec<u8>)> = None;
        let mut cancelled: Option<&'static str> = None;

        match dialog_state {
            NativeDialog::Open(dialog) => {
                dialog.update(ctx);
                if let Some(path) = dialog.take_picked() {
                    picked_image = Some(path);
                    close_dialog = true;
                } else {
                    match dialog.state() {
                        DialogState::Cancelled => {
                            cancelled = Some("Open canceled.");
                            close_dialog = true;
                        }
                        DialogState::Closed => close_dialog = true,
                        _ => {}
                    }
                }
            }
            NativeDialog::Save { dialog, download } => {
                dialog.update(ctx);
                if let Some(path) = dialog.take_picked() {
                    picked_export = Some((path, std::mem::take(&mut download.bytes)));
                    close_dialog = true;
                } else {
                    match dialog.state() {
                        DialogState::Cancelled => {
                            cancelled = Some("Save canceled.");
                            close_dialog = true;
                        }
                        DialogState::Closed => close_dialog = true,
                        _ => {}
                    }
                }
            }
        }

        if close_dialog {
            self.active_dialog = None;
        }
        if let Some(msg) = cancelled {
            self.set_status(msg);
        }
        if let Some(path) = picked_image {
            self.start_loading_image_from_path(path);
        }
        if let Some((path, bytes)) = picked_export {
            self.start_export_write(path, bytes);
        }
    }
}

fn loaded_status(loaded: &Loaded) -> String {
    let size = loaded
        .byte_len
        .map(|bytes| format!(", {}", human_readable_bytes(bytes)))
        .unwrap_or_default();
    format!(
        "Loaded {} ({}×{}{size})",
        loaded.name, loaded.width, loaded.height
    )
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_image_loader(ctx);
        self.poll_export_write(ctx);
        self.handle_hotkeys(ctx);

        egui::TopBottomPanel::top("top").show(ctx, |ui| self.ui_top(ui));
        egui::SidePanel::right("side")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| self.ui_side(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.ui_status_bar(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.ui_central_image(ui));

        self.update_dialogs(ctx);
    }

    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loaded_status_mentions_size_when_known() {
        let loaded = Loaded {
            name: "cat.png".to_string(),
            width: 640,
            height: 480,
            byte_len: Some(2048),
        };
        assert_eq!(loaded_status(&loaded), "Loaded cat.png (640×480, 2.00 KiB)");
        let pasted = Loaded {
            byte_len: None,
            ..loaded
        };
        assert_eq!(loaded_status(&pasted), "Loaded cat.png (640×480)");
    }

    #[test]
    fn intents_before_first_image_leave_status_untouched() {
        let ctx = Context::default();
        let mut app = EditorApp::new(&ctx, AppConfig::default(), None);
        app.apply_intent(Intent::RotateRight);
        app.apply_intent(Intent::SetSliderValue(50));
        assert!(app.status.is_none());
        assert!(!app.has_image());
        app.save_image();
        assert_eq!(app.status.as_deref(), Some("Load an image before saving."));
    }
}
