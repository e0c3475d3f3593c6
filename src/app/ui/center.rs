use super::super::EditorApp;
use egui::{Align2, Color32, FontId, Painter, Rect, Sense, Stroke, StrokeKind, Vec2, pos2};

const CHECKER_CELL: f32 = 12.0;

impl EditorApp {
    pub(crate) fn ui_central_image(&mut self, ui: &mut egui::Ui) {
        self.handle_dropped_files(ui);

        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::hover());
        let available = response.rect.shrink(self.config.preview.padding());

        let hovering_files = ui.input(|i| !i.raw.hovered_files.is_empty());
        if hovering_files {
            painter.rect_stroke(
                response.rect.shrink(2.0),
                4.0,
                Stroke::new(2.0, ui.visuals().selection.stroke.color),
                StrokeKind::Inside,
            );
        }

        if !self.has_image() {
            let hint = if self.controller.is_loading() {
                "Loading…"
            } else {
                "Choose, drop, or paste an image"
            };
            painter.text(
                response.rect.center(),
                Align2::CENTER_CENTER,
                hint,
                FontId::proportional(18.0),
                ui.visuals().weak_text_color(),
            );
            return;
        }

        let preview = self.controller.preview();
        if self.config.preview.checkerboard
            && let Some(footprint) = preview.footprint(available)
        {
            paint_checkerboard(&painter, footprint);
        }
        preview.paint(&painter, available);
    }

    fn handle_dropped_files(&mut self, ui: &egui::Ui) {
        let dropped_files = ui.input(|i| i.raw.dropped_files.clone());
        if dropped_files.is_empty() {
            return;
        }
        for file in dropped_files {
            if let Some(path) = file.path {
                tracing::debug!(path = %path.display(), "image dropped");
                self.start_loading_image_from_path(path);
                return;
            }
            if let Some(bytes) = file.bytes {
                tracing::debug!(name = %file.name, bytes = bytes.len(), "image bytes dropped");
                self.start_loading_image_from_bytes(
                    (!file.name.is_empty()).then_some(file.name),
                    bytes.to_vec(),
                );
                return;
            }
        }
        self.set_status("Drop failed: no readable bytes/path");
    }
}

fn paint_checkerboard(painter: &Painter, area: Rect) {
    let painter = painter.with_clip_rect(area.intersect(painter.clip_rect()));
    let light = Color32::from_gray(204);
    let dark = Color32::from_gray(153);
    painter.rect_filled(area, 0.0, light);
    let mut row = 0u32;
    let mut y = area.top();
    while y < area.bottom() {
        let mut x = area.left() + if row % 2 == 0 { CHECKER_CELL } else { 0.0 };
        while x < area.right() {
            let cell = Rect::from_min_size(pos2(x, y), Vec2::splat(CHECKER_CELL));
            painter.rect_filled(cell, 0.0, dark);
            x += CHECKER_CELL * 2.0;
        }
        y += CHECKER_CELL;
        row += 1;
    }
    painter.rect_stroke(
        area,
        0.0,
        Stroke::new(1.0, Color32::from_gray(120)),
        StrokeKind::Outside,
    );
}
