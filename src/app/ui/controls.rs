use eframe::egui::{self, Ui};

use crate::config::BusyPolicy;
use crate::util::short_label;

use super::super::ViewModel;

const KEY_LEGEND: [(&str, &str); 5] = [
    ("A / ←", "previous neighbor"),
    ("D / →", "next neighbor"),
    ("W / ↑", "move to neighbor"),
    ("S / ↓", "go back"),
    ("N", "toggle notes"),
];

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search labels")
            .on_hover_text("Fuzzy-highlight matching nodes without moving the camera.");
        ui.text_edit_singleline(&mut self.search)
            .on_hover_text("Navigation keys are paused while this field has focus.");

        ui.separator();

        let mut layout_enabled = self.scene.layout_enabled();
        if ui
            .checkbox(&mut layout_enabled, "Live layout")
            .on_hover_text("Keep running the force simulation every frame.")
            .changed()
        {
            self.scene.set_layout_enabled(layout_enabled);
        }

        let layout = self.scene.layout_mut().config_mut();
        ui.checkbox(&mut layout.pause_while_typing, "Pause layout while typing")
            .on_hover_text("Freeze node positions while a text field has keyboard focus.");

        ui.collapsing("Layout tuning", |ui| {
            ui.add(
                egui::Slider::new(&mut layout.repulsion, 0.0..=400.0)
                    .text("Repulsion")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("How strongly every pair of nodes pushes apart.");
            ui.add(
                egui::Slider::new(&mut layout.spring, 0.0..=0.2)
                    .text("Edge spring")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("How strongly connected nodes pull together.");
            ui.add(
                egui::Slider::new(&mut layout.center_pull, 0.0..=0.3)
                    .text("Center pull")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Horizontal pull toward the vertical axis.");
            ui.add(
                egui::Slider::new(&mut layout.damping, 0.5..=0.99)
                    .text("Damping")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Fraction of velocity kept each step.");
            ui.add(
                egui::Slider::new(&mut layout.min_distance, 0.0..=10.0)
                    .text("Jitter distance")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Pairs closer than this get a small random nudge.");
        });

        let camera = self.scene.camera_mut().config_mut();
        ui.collapsing("Camera", |ui| {
            ui.add(
                egui::Slider::new(&mut camera.move_duration, 0.1..=3.0)
                    .text("Move seconds")
                    .clamping(egui::SliderClamping::Always),
            );
            ui.add(
                egui::Slider::new(&mut camera.rotate_duration, 0.1..=3.0)
                    .text("Rotate seconds")
                    .clamping(egui::SliderClamping::Always),
            );
            ui.add(
                egui::Slider::new(&mut camera.height, 1.0..=40.0)
                    .text("Height")
                    .clamping(egui::SliderClamping::Always),
            );
            ui.add(
                egui::Slider::new(&mut camera.fov_degrees, 30.0..=110.0)
                    .text("Field of view")
                    .clamping(egui::SliderClamping::Always),
            );
        });

        ui.separator();

        let mut policy = self.scene.navigation().policy();
        ui.label("While the camera moves");
        ui.horizontal(|ui| {
            ui.selectable_value(&mut policy, BusyPolicy::IgnoreCommits, "Finish first")
                .on_hover_text("Ignore forward/back until the camera arrives.");
            ui.selectable_value(&mut policy, BusyPolicy::Supersede, "Interrupt")
                .on_hover_text("Every key restarts the camera from where it is.");
        });
        if policy != self.scene.navigation().policy() {
            self.scene.set_policy(policy);
        }

        ui.separator();

        let layout = self.scene.layout();
        ui.label(format!("Max speed: {:.3}", layout.max_speed()));
        ui.label(format!("Max step: {:.4}", layout.max_step()));
        if let Some(anchor) = layout.anchor().and_then(|id| self.scene.graph().label(id)) {
            ui.label(format!("Anchor: {}", short_label(anchor)));
        }
        if let Some(progress) = self.scene.camera().progress() {
            ui.add(egui::ProgressBar::new(progress).text("camera"));
        }

        ui.separator();

        egui::CollapsingHeader::new("Keys")
            .default_open(true)
            .show(ui, |ui| {
                egui::Grid::new("key_legend").striped(true).show(ui, |ui| {
                    for (keys, action) in KEY_LEGEND {
                        ui.monospace(keys);
                        ui.label(action);
                        ui.end_row();
                    }
                });
            });
    }
}
