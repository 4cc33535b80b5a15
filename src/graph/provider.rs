use std::fmt;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use log::{info, warn};

use super::fetch::fetch_graph_spec;
use super::model::Graph;
use super::parse::{GraphSpec, parse_graph_spec};

#[derive(Clone, Debug, PartialEq)]
pub enum GraphSource {
    Random {
        count: usize,
        probability: f64,
        seed: u64,
    },
    File(PathBuf),
    Remote(String),
}

impl fmt::Display for GraphSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random {
                count,
                probability,
                seed,
            } => write!(f, "random ({count} nodes, p={probability}, seed {seed})"),
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::Remote(url) => write!(f, "{url}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphOrigin {
    Generated,
    Loaded,
    Fallback(String),
}

pub struct LoadedGraph {
    pub graph: Graph,
    pub origin: GraphOrigin,
}

fn graph_from_spec(spec: &GraphSpec) -> Graph {
    let connections = spec
        .connections
        .iter()
        .map(|(a, b)| (a.as_str(), b.as_str()))
        .collect::<Vec<_>>();
    let labels = spec.nodes.iter().map(String::as_str).collect::<Vec<_>>();
    Graph::from_labels(&labels, &connections)
}

fn read_graph_spec(source: &GraphSource) -> Result<GraphSpec> {
    match source {
        GraphSource::File(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read graph file {}", path.display()))?;
            parse_graph_spec(&raw)
                .with_context(|| format!("failed to parse graph file {}", path.display()))
        }
        GraphSource::Remote(url) => fetch_graph_spec(url),
        GraphSource::Random { .. } => Err(anyhow!("random graph with zero nodes")),
    }
}

/// Produces the startup graph. Never fails: any transport, I/O or parse error
/// degrades to a single node labeled `fallback_label`.
pub fn load_graph(source: &GraphSource, fallback_label: &str) -> LoadedGraph {
    if let GraphSource::Random {
        count,
        probability,
        seed,
    } = source
        && *count > 0
    {
        let graph = Graph::random(*count, *probability, *seed);
        info!(
            "generated graph: {} nodes, {} edges",
            graph.len(),
            graph.edge_count()
        );
        return LoadedGraph {
            graph,
            origin: GraphOrigin::Generated,
        };
    }

    match read_graph_spec(source) {
        Ok(spec) => {
            let graph = graph_from_spec(&spec);
            info!(
                "loaded graph from {source}: {} nodes, {} edges",
                graph.len(),
                graph.edge_count()
            );
            LoadedGraph {
                graph,
                origin: GraphOrigin::Loaded,
            }
        }
        Err(error) => {
            warn!("falling back to a single node: {error:#}");
            LoadedGraph {
                graph: Graph::fallback(fallback_label),
                origin: GraphOrigin::Fallback(format!("{error:#}")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn random_source_generates() {
        let loaded = load_graph(
            &GraphSource::Random {
                count: 11,
                probability: 0.3,
                seed: 7,
            },
            "Home",
        );
        assert_eq!(loaded.origin, GraphOrigin::Generated);
        assert_eq!(loaded.graph.len(), 11);
    }

    #[test]
    fn empty_random_source_falls_back() {
        let loaded = load_graph(
            &GraphSource::Random {
                count: 0,
                probability: 0.3,
                seed: 7,
            },
            "Home",
        );
        assert!(matches!(loaded.origin, GraphOrigin::Fallback(_)));
        assert_eq!(loaded.graph.len(), 1);
    }

    #[test]
    fn file_source_loads_spec() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"nodes": ["A", "B", "C"], "connections": [["A", "B"], ["B", "C"]]}}"#
        )
        .unwrap();

        let loaded = load_graph(&GraphSource::File(file.path().to_path_buf()), "Home");
        assert_eq!(loaded.origin, GraphOrigin::Loaded);
        assert_eq!(loaded.graph.len(), 3);
        assert_eq!(loaded.graph.edge_count(), 2);
    }

    #[test]
    fn missing_file_falls_back_to_single_node() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_graph(&GraphSource::File(dir.path().join("absent.json")), "Home");
        assert!(matches!(loaded.origin, GraphOrigin::Fallback(_)));
        assert_eq!(loaded.graph.len(), 1);
        assert_eq!(loaded.graph.nodes()[0].label, "Home");
        assert_eq!(loaded.graph.edge_count(), 0);
    }

    #[test]
    fn malformed_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"nodes\": 3}}").unwrap();
        let loaded = load_graph(&GraphSource::File(file.path().to_path_buf()), "Home");
        assert!(matches!(loaded.origin, GraphOrigin::Fallback(_)));
    }

    #[test]
    fn unreachable_remote_falls_back() {
        let loaded = load_graph(&GraphSource::Remote("http://[not-a-host".to_owned()), "Home");
        assert!(matches!(loaded.origin, GraphOrigin::Fallback(_)));
        assert_eq!(loaded.graph.len(), 1);
    }
}
