use std::collections::HashSet;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use log::info;
use serde_json::Value;

use crate::config::Config;
use crate::graph::{GraphOrigin, GraphSource, LoadedGraph, NodeId, load_graph};
use crate::notes::{Notebook, NotesClient};

mod camera;
mod graph;
mod highlight;
mod navigation;
mod physics;
mod render_utils;
mod scene;
mod ui;

use self::scene::Scene;

pub struct NodeOrbitApp {
    source: GraphSource,
    config: Config,
    notes_client: Option<NotesClient>,
    state: AppState,
}

enum AppState {
    Loading { rx: Receiver<LoadedGraph> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    scene: Scene,
    origin: GraphOrigin,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    show_notes: bool,
    notebook: Notebook,
    notes_client: Option<NotesClient>,
    notes_rx: Option<Receiver<NotesEvent>>,
    status: Option<String>,
}

struct SearchMatchCache {
    query: String,
    matches: Arc<HashSet<NodeId>>,
}

enum NotesEvent {
    Loaded(Result<Notebook, String>),
    Saved {
        record: Value,
        result: Result<(), String>,
    },
}

impl NodeOrbitApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: GraphSource,
        config: Config,
        notes_client: Option<NotesClient>,
    ) -> Self {
        let state = Self::start_load(&source, &config);
        Self {
            source,
            config,
            notes_client,
            state,
        }
    }

    /// The graph is loaded once; a failed source already degrades to the
    /// fallback graph inside the loader.
    fn start_load(source: &GraphSource, config: &Config) -> AppState {
        info!("loading graph from {source}");
        let (tx, rx) = mpsc::channel();
        let source = source.clone();
        let fallback_label = config.graph.fallback_label.clone();

        thread::spawn(move || {
            let loaded = load_graph(&source, &fallback_label);
            let _ = tx.send(loaded);
        });

        AppState::Loading { rx }
    }

    fn ready(
        config: &Config,
        notes_client: Option<&NotesClient>,
        loaded: LoadedGraph,
    ) -> AppState {
        info!(
            "graph ready: {} nodes, {} edges ({:?})",
            loaded.graph.len(),
            loaded.graph.edge_count(),
            loaded.origin
        );
        AppState::Ready(Box::new(ViewModel::new(
            loaded,
            config,
            notes_client.cloned(),
        )))
    }
}

impl eframe::App for NodeOrbitApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(loaded) => {
                        transition = Some(Self::ready(
                            &self.config,
                            self.notes_client.as_ref(),
                            loaded,
                        ));
                    }
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Graph loader stopped unexpectedly".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading(format!("Loading graph from {}...", self.source));
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                });
            }
            AppState::Ready(model) => model.show(ctx),
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_loader_delivers_a_single_graph() {
        let source = GraphSource::Random {
            count: 4,
            probability: 1.0,
            seed: 3,
        };
        let AppState::Loading { rx } = NodeOrbitApp::start_load(&source, &Config::default()) else {
            panic!("expected the loading state");
        };

        let loaded = rx.recv().unwrap();
        assert_eq!(loaded.graph.len(), 4);
        assert_eq!(loaded.origin, GraphOrigin::Generated);
        assert!(rx.recv().is_err());
    }
}
