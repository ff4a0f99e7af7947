//! Canvas State
//!
//! The `(nodes, edges)` pair every transition maps over. Sequence order is
//! append order and doubles as render z-order, so the container is a plain
//! vector with explicit id lookups — parent/child relations are id
//! references, never embedded pointers.

use crate::edge::Edge;
use crate::node::Node;
use serde::{Deserialize, Serialize};

/// The full canvas: nodes plus connections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasState {
    /// Diagram elements in append order
    #[serde(default)]
    pub nodes: Vec<Node>,

    /// Connections in append order
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl CanvasState {
    /// Create an empty canvas
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a canvas from existing parts
    #[must_use]
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// Look up a node by id
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Look up a node by id, mutably
    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Look up an edge by id
    #[must_use]
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Whether a node with the given id exists
    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Whether an edge with the given id exists
    #[must_use]
    pub fn contains_edge(&self, id: &str) -> bool {
        self.edges.iter().any(|e| e.id == id)
    }

    /// Ids of the blocks owned by the given lane
    #[must_use]
    pub fn children_of(&self, lane_id: &str) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|n| n.parent_id.as_deref() == Some(lane_id))
            .collect()
    }

    /// Whether the canvas holds no nodes and no edges
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}
