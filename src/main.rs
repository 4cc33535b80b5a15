mod app;
mod config;
mod graph;
mod notes;
mod util;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use clap::{Args as ClapArgs, Parser, Subcommand};
use log::info;

use crate::config::Config;
use crate::graph::GraphSource;
use crate::notes::{FileStorage, MemoryStorage, NotesClient, SharedStorage};

#[derive(Debug, Parser)]
#[command(author, version, about, args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    view: ViewArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open the graph viewer (the default).
    View(ViewArgs),
    /// Serve per-node notes over HTTP.
    Serve(ServeArgs),
}

#[derive(Debug, Default, ClapArgs)]
struct ViewArgs {
    /// JSON config file; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Node count of the generated graph.
    #[arg(long)]
    nodes: Option<usize>,

    /// Connection probability of the generated graph.
    #[arg(long)]
    probability: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,

    /// Load `{"nodes": [...], "connections": [[a, b], ...]}` from a file.
    #[arg(long, conflicts_with = "graph_url")]
    graph_file: Option<PathBuf>,

    /// Fetch the same JSON document over HTTP.
    #[arg(long)]
    graph_url: Option<String>,

    /// Base URL of a notes server, e.g. http://127.0.0.1:3000
    #[arg(long)]
    notes_url: Option<String>,

    /// Label of the node whose height the layout pins.
    #[arg(long)]
    anchor: Option<String>,
}

#[derive(Debug, ClapArgs)]
struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Where notes are kept; in memory when omitted.
    #[arg(long)]
    data: Option<PathBuf>,
}

impl ViewArgs {
    fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(nodes) = self.nodes {
            config.graph.node_count = nodes;
        }
        if let Some(probability) = self.probability {
            config.graph.connection_probability = probability.clamp(0.0, 1.0);
        }
        if let Some(seed) = self.seed {
            config.graph.seed = seed;
        }
        if let Some(anchor) = &self.anchor {
            config.graph.anchor = Some(anchor.clone());
        }

        Ok(config)
    }

    fn graph_source(&self, config: &Config) -> GraphSource {
        if let Some(path) = &self.graph_file {
            GraphSource::File(path.clone())
        } else if let Some(url) = &self.graph_url {
            GraphSource::Remote(url.clone())
        } else {
            GraphSource::Random {
                count: config.graph.node_count,
                probability: config.graph.connection_probability,
                seed: config.graph.seed,
            }
        }
    }
}

fn run_viewer(view: ViewArgs) -> Result<()> {
    let config = view.config()?;
    let source = view.graph_source(&config);
    let notes_client = view.notes_url.as_deref().map(NotesClient::new);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 820.0]),
        ..Default::default()
    };

    eframe::run_native(
        "node-orbit",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::NodeOrbitApp::new(
                cc,
                source,
                config,
                notes_client,
            )))
        }),
    )
    .map_err(|error| anyhow!("viewer failed: {error}"))
}

fn run_server(serve: ServeArgs) -> Result<()> {
    let storage: SharedStorage = match &serve.data {
        Some(path) => {
            let storage = FileStorage::open(path)?;
            info!("storing notes in {}", storage.path().display());
            Arc::new(storage)
        }
        None => {
            info!("storing notes in memory; they are lost on exit");
            Arc::new(MemoryStorage::default())
        }
    };

    notes::serve(serve.bind, storage)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match args.command.unwrap_or(Command::View(args.view)) {
        Command::View(view) => run_viewer(view),
        Command::Serve(serve) => run_server(serve),
    }
}
