mod fetch;
mod model;
mod parse;
mod provider;

pub use model::{Graph, NodeId};
pub use provider::{GraphOrigin, GraphSource, LoadedGraph, load_graph};
