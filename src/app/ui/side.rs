//! Side panel: channel selector, slider, and the live render descriptors.

use super::super::EditorApp;
use crate::controller::{Intent, Selection};
use crate::edit::Channel;
use egui::RichText;

impl EditorApp {
    pub(crate) fn ui_side(&mut self, ui: &mut egui::Ui) {
        ui.heading("Adjust");
        ui.add_space(4.0);

        let selection = self.controller.selection();
        let enabled = selection != Selection::Disabled;
        ui.add_enabled_ui(enabled, |ui| {
            ui.horizontal_wrapped(|ui| {
                for channel in Channel::ALL {
                    let selected = selection == Selection::Channel(channel);
                    if ui.selectable_label(selected, channel.label()).clicked() {
                        self.apply_intent(Intent::SelectChannel(channel));
                    }
                }
            });
            ui.add_space(6.0);
            self.ui_slider(ui);
        });

        ui.add_space(12.0);
        ui.separator();
        ui.label(RichText::new("Filter").strong());
        let (filter, transform) = self.controller.descriptors();
        ui.label(RichText::new(filter.to_string()).monospace().small());
        ui.label(RichText::new("Transform").strong());
        ui.label(RichText::new(transform.to_string()).monospace().small());
    }

    fn ui_slider(&mut self, ui: &mut egui::Ui) {
        let Some(slider) = self.controller.slider() else {
            let mut placeholder = 0;
            ui.add(egui::Slider::new(&mut placeholder, 0..=100).show_value(false));
            ui.label("–");
            return;
        };
        let mut value = i32::from(slider.value);
        let response = ui.add(
            egui::Slider::new(&mut value, 0..=i32::from(slider.max))
                .show_value(false)
                .text(slider.channel.label()),
        );
        ui.label(slider.label());
        if response.changed() {
            self.apply_intent(Intent::SetSliderValue(value));
        }
    }
}
