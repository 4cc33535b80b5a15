use std::sync::mpsc::{self, TryRecvError};
use std::thread;

use eframe::egui::{self, Align, Context, Layout};
use log::{info, warn};

use crate::config::Config;
use crate::graph::{GraphOrigin, LoadedGraph};
use crate::notes::{Notebook, NotesClient};
use crate::util::short_label;

use super::super::scene::Scene;
use super::super::{NotesEvent, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(
        loaded: LoadedGraph,
        config: &Config,
        notes_client: Option<NotesClient>,
    ) -> Self {
        let mut model = Self {
            scene: Scene::new(loaded.graph, config),
            origin: loaded.origin,
            search: String::new(),
            search_match_cache: None,
            show_notes: notes_client.is_some(),
            notebook: Notebook::default(),
            notes_client,
            notes_rx: None,
            status: None,
        };
        model.request_notes_load();
        model
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        self.scene.set_input_captured(ctx.wants_keyboard_input());
        self.handle_keys(ctx);

        let dt = ctx.input(|input| input.stable_dt).clamp(1.0 / 240.0, 1.0 / 20.0);
        self.scene.tick(dt);
        self.poll_notes();

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("node-orbit");
                    ui.separator();

                    let graph = self.scene.graph();
                    ui.label(format!("nodes: {}", graph.len()));
                    ui.label(format!("edges: {}", graph.edge_count()));
                    ui.label(origin_text(&self.origin));
                    ui.separator();

                    let navigation = self.scene.navigation();
                    let current = graph.label(navigation.current()).unwrap_or("?");
                    ui.label(format!("at: {}", short_label(current)));
                    if let Some(target) = self.scene.target().and_then(|id| graph.label(id)) {
                        ui.label(format!("next: {}", short_label(target)));
                    }
                    ui.label(format!("depth: {}", navigation.history().len()));

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(status) = &self.status {
                            ui.label(status.as_str());
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        if self.show_notes {
            egui::SidePanel::right("notes")
                .resizable(true)
                .default_width(300.0)
                .show(ctx, |ui| self.draw_notes(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| self.draw_scene(ui));

        if self.scene.is_animating() || self.notes_rx.is_some() {
            ctx.request_repaint();
        }
    }

    pub(in crate::app) fn notes_busy(&self) -> bool {
        self.notes_rx.is_some()
    }

    pub(in crate::app) fn request_notes_load(&mut self) {
        let Some(client) = self.notes_client.clone() else {
            return;
        };
        if self.notes_busy() {
            return;
        }

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = client.load().map_err(|error| format!("{error:#}"));
            let _ = tx.send(NotesEvent::Loaded(result));
        });
        self.notes_rx = Some(rx);
        self.status = Some("Loading notes...".to_owned());
    }

    pub(in crate::app) fn request_notes_save(&mut self) {
        let Some(client) = self.notes_client.clone() else {
            return;
        };
        if self.notes_busy() {
            return;
        }

        let snapshot = self.notebook.clone();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = client.save(&snapshot).map_err(|error| format!("{error:#}"));
            let _ = tx.send(NotesEvent::Saved {
                record: snapshot.to_record(),
                result,
            });
        });
        self.notes_rx = Some(rx);
        self.status = Some("Saving notes...".to_owned());
    }

    fn poll_notes(&mut self) {
        let Some(rx) = self.notes_rx.take() else {
            return;
        };

        let event = match rx.try_recv() {
            Ok(event) => event,
            Err(TryRecvError::Empty) => {
                self.notes_rx = Some(rx);
                return;
            }
            Err(TryRecvError::Disconnected) => {
                warn!("notes worker stopped without reporting");
                self.status = Some("Notes sync failed".to_owned());
                return;
            }
        };

        match event {
            NotesEvent::Loaded(Ok(notebook)) => {
                if self.notebook.is_dirty() {
                    warn!("keeping local note edits over the server copy");
                    self.status = Some("Kept local note edits".to_owned());
                } else {
                    info!("loaded {} notes", notebook.len());
                    self.status = Some(format!("Loaded {} notes", notebook.len()));
                    self.notebook = notebook;
                }
            }
            NotesEvent::Saved {
                record,
                result: Ok(()),
            } => {
                info!("notes saved");
                if self.notebook.to_record() == record {
                    self.notebook.mark_clean();
                }
                self.status = Some("Notes saved".to_owned());
            }
            NotesEvent::Loaded(Err(error)) | NotesEvent::Saved { result: Err(error), .. } => {
                warn!("notes sync failed: {error}");
                self.status = Some(format!("Notes sync failed: {error}"));
            }
        }
    }
}

fn origin_text(origin: &GraphOrigin) -> String {
    match origin {
        GraphOrigin::Generated => "generated".to_owned(),
        GraphOrigin::Loaded => "loaded".to_owned(),
        GraphOrigin::Fallback(reason) => format!("fallback: {reason}"),
    }
}
