use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Wire shape of a graph: node labels plus label pairs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSpec {
    pub nodes: Vec<String>,
    #[serde(default)]
    pub connections: Vec<(String, String)>,
}

pub(super) fn parse_graph_spec(raw: &str) -> Result<GraphSpec> {
    let spec: GraphSpec = serde_json::from_str(raw).context("invalid graph JSON")?;
    validate(spec)
}

pub(super) fn validate(spec: GraphSpec) -> Result<GraphSpec> {
    if spec.nodes.is_empty() {
        return Err(anyhow!("graph JSON contains no nodes"));
    }
    Ok(spec)
}
