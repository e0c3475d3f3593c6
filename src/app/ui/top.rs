use super::super::EditorApp;
use super::icons;
use crate::controller::Intent;

impl EditorApp {
    pub(crate) fn ui_top(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            egui::widgets::global_theme_preference_switch(ui);
            ui.separator();

            let has_image = self.has_image();
            let edited = has_image && self.controller.state().can_reset();
            self.ui_source_buttons(ui);
            ui.separator();

            self.ui_transform_buttons(ui, has_image);
            ui.separator();

            if ui
                .add_enabled(
                    edited,
                    egui::Button::new(format!("{} Reset", icons::ICON_RESET)).shortcut_text("Ctrl+R"),
                )
                .on_hover_text("Restore every adjustment to its default (Ctrl+R)")
                .clicked()
            {
                self.apply_intent(Intent::Reset);
            }
            if ui
                .add_enabled(
                    has_image,
                    egui::Button::new(format!("{} Save", icons::ICON_SAVE)).shortcut_text("Ctrl+S"),
                )
                .on_hover_text("Export the edited image as PNG (Ctrl+S)")
                .clicked()
            {
                self.save_image();
            }
        });
    }

    fn ui_source_buttons(&mut self, ui: &mut egui::Ui) {
        if ui
            .add(egui::Button::new(format!("{} Choose image…", icons::ICON_OPEN)).shortcut_text("Ctrl+O"))
            .on_hover_text("Open an image (Ctrl+O). You can also drag & drop into the center.")
            .clicked()
        {
            self.open_image_dialog();
        }
        if ui
            .add(egui::Button::new(format!("{} Paste", icons::ICON_PASTE)).shortcut_text("Ctrl+V"))
            .on_hover_text("Paste image from clipboard (Ctrl+V)")
            .clicked()
        {
            self.paste_image_from_clipboard();
        }
    }

    fn ui_transform_buttons(&mut self, ui: &mut egui::Ui, has_image: bool) {
        let buttons = [
            (
                format!("{} 90°", icons::ICON_ROTATE_CCW),
                "Rotate 90° counter-clockwise ([).",
                Intent::RotateLeft,
            ),
            (
                format!("{} 90°", icons::ICON_ROTATE_CW),
                "Rotate 90° clockwise (]).",
                Intent::RotateRight,
            ),
            (
                format!("{} Flip H", icons::ICON_FLIP_H),
                "Mirror left to right.",
                Intent::FlipHorizontal,
            ),
            (
                format!("{} Flip V", icons::ICON_FLIP_V),
                "Mirror top to bottom.",
                Intent::FlipVertical,
            ),
        ];
        for (label, hover, intent) in buttons {
            if ui
                .add_enabled(has_image, egui::Button::new(label))
                .on_hover_text(hover)
                .clicked()
            {
                self.apply_intent(intent);
            }
        }
    }
}
