use eframe::egui::{self, Ui};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_notes(&mut self, ui: &mut Ui) {
        ui.heading("Notes");
        ui.separator();

        let current = self.scene.navigation().current();
        let Some(label) = self.scene.graph().label(current).map(str::to_owned) else {
            return;
        };

        ui.label(format!("Node: {label}"));
        let mut text = self.notebook.note(&label).unwrap_or_default().to_owned();
        let response = ui.add(
            egui::TextEdit::multiline(&mut text)
                .desired_rows(8)
                .desired_width(f32::INFINITY)
                .hint_text("Write a note for this node"),
        );
        if response.changed() {
            self.notebook.set_note(&label, &text);
        }

        ui.add_space(6.0);
        if self.notebook.is_empty() {
            ui.label("No notes yet");
        } else {
            ui.label(format!(
                "{} notes{}",
                self.notebook.len(),
                if self.notebook.is_dirty() { " (unsaved)" } else { "" }
            ));
        }

        if self.notes_client.is_none() {
            ui.weak("No notes server configured; notes stay in this window.");
            return;
        }

        let idle = !self.notes_busy();
        ui.horizontal(|ui| {
            let save = ui.add_enabled(
                idle && self.notebook.is_dirty(),
                egui::Button::new("Save notes"),
            );
            if save.clicked() {
                self.request_notes_save();
            }

            if ui
                .add_enabled(idle, egui::Button::new("Reload notes"))
                .on_hover_text("Fetch the stored notes. Unsaved edits are kept.")
                .clicked()
            {
                self.request_notes_load();
            }
        });
    }
}
