use crate::graph::{Graph, NodeId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NodeRole {
    Current,
    Target,
    Neighbor,
    Unconnected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EdgeRole {
    /// Between the current node and the previewed neighbor.
    Focused,
    /// Touches the current node.
    Adjacent,
    Distant,
}

pub(crate) struct HighlightState {
    current: NodeId,
    target: Option<NodeId>,
    node_roles: Vec<NodeRole>,
}

impl HighlightState {
    pub(crate) fn node_role(&self, id: NodeId) -> NodeRole {
        self.node_roles
            .get(id.index())
            .copied()
            .unwrap_or(NodeRole::Unconnected)
    }

    pub(crate) fn edge_role(&self, a: NodeId, b: NodeId) -> EdgeRole {
        let touches_current = a == self.current || b == self.current;
        let touches_target = self.target.is_some_and(|target| a == target || b == target);

        if touches_current && touches_target {
            EdgeRole::Focused
        } else if touches_current {
            EdgeRole::Adjacent
        } else {
            EdgeRole::Distant
        }
    }
}

pub(crate) fn build_highlight_state(
    graph: &Graph,
    current: NodeId,
    target: Option<NodeId>,
) -> HighlightState {
    let mut node_roles = vec![NodeRole::Unconnected; graph.len()];

    for neighbor in graph.neighbors(current) {
        if let Some(role) = node_roles.get_mut(neighbor.index()) {
            *role = NodeRole::Neighbor;
        }
    }
    if let Some(target) = target
        && let Some(role) = node_roles.get_mut(target.index())
    {
        *role = NodeRole::Target;
    }
    if let Some(role) = node_roles.get_mut(current.index()) {
        *role = NodeRole::Current;
    }

    HighlightState {
        current,
        target,
        node_roles,
    }
}
