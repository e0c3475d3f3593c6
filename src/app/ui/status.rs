use super::super::EditorApp;
use crate::image::human_readable_bytes;
use egui::{Color32, RichText};

impl EditorApp {
    pub(crate) fn ui_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let summary = self.controller.source().map_or_else(
                || "No image".to_string(),
                |source| {
                    let meta = source.meta();
                    let mut text = format!(
                        "{} · {}×{}",
                        meta.display_name(),
                        source.natural_width(),
                        source.natural_height()
                    );
                    if let Some(bytes) = meta.byte_len() {
                        text.push_str(&format!(" · {}", human_readable_bytes(bytes)));
                    }
                    text
                },
            );
            ui.label(
                RichText::new(summary)
                    .small()
                    .color(Color32::from_gray(180)),
            )
            .on_hover_text(
                self.controller
                    .source()
                    .and_then(|s| s.meta().path())
                    .map_or_else(String::new, |p| p.display().to_string()),
            );
            if let Some(loading) = self.controller.loading_description() {
                ui.separator();
                ui.spinner();
                ui.label(RichText::new(format!("Loading {loading}")).small());
            }
            if let Some(msg) = &self.status {
                ui.separator();
                ui.label(
                    RichText::new(msg.as_str())
                        .small()
                        .color(Color32::from_gray(200)),
                );
            }
        });
    }
}
