//! Editable process-flow graph: typed nodes, directed edges and a single selection.
//!
//! Layout is the renderer's job; positions here are whatever the host last reported.
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type NodeId = u64;
pub type EdgeId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Start,
    Step,
    Inspection,
    Decision,
    End,
}

impl NodeKind {
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Start,
        NodeKind::Step,
        NodeKind::Inspection,
        NodeKind::Decision,
        NodeKind::End,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::Step => "step",
            NodeKind::Inspection => "inspection",
            NodeKind::Decision => "decision",
            NodeKind::End => "end",
        }
    }

    /// Fill colour used when rendering nodes of this kind.
    pub fn color(self) -> &'static str {
        match self {
            NodeKind::Start => "#4caf50",
            NodeKind::Step => "#2196f3",
            NodeKind::Inspection => "#ff9800",
            NodeKind::Decision => "#9c27b0",
            NodeKind::End => "#f44336",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for NodeKind {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.tag().eq_ignore_ascii_case(tag))
            .ok_or_else(|| FlowError::UnknownNodeKind(tag.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub label: String,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Node(NodeId),
    Edge(EdgeId),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("unknown node type '{0}'")]
    UnknownNodeKind(String),
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    #[error("edge {0} does not exist")]
    UnknownEdge(EdgeId),
    #[error("node {0} cannot connect to itself")]
    SelfLoop(NodeId),
    #[error("nodes {from} and {to} are already connected")]
    DuplicateEdge { from: NodeId, to: NodeId },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessFlow {
    nodes: BTreeMap<NodeId, FlowNode>,
    edges: BTreeMap<EdgeId, FlowEdge>,
    selection: Selection,
    next_node_id: NodeId,
    next_edge_id: EdgeId,
}

impl ProcessFlow {
    pub fn new() -> Self {
        Self {
            next_node_id: 1,
            next_edge_id: 1,
            ..Self::default()
        }
    }

    pub fn add_node(&mut self, kind: NodeKind, label: impl Into<String>, x: i32, y: i32) -> NodeId {
        let id = self.next_node_id.max(1);
        self.next_node_id = id + 1;
        self.nodes.insert(
            id,
            FlowNode {
                id,
                kind,
                label: label.into(),
                x,
                y,
            },
        );
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&FlowNode> {
        self.nodes.get(&id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&FlowEdge> {
        self.edges.get(&id)
    }

    /// Nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &FlowNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &FlowEdge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn rename_node(&mut self, id: NodeId, label: impl Into<String>) -> Result<(), FlowError> {
        let node = self.nodes.get_mut(&id).ok_or(FlowError::UnknownNode(id))?;
        node.label = label.into();
        Ok(())
    }

    pub fn move_node(&mut self, id: NodeId, x: i32, y: i32) -> Result<(), FlowError> {
        let node = self.nodes.get_mut(&id).ok_or(FlowError::UnknownNode(id))?;
        node.x = x;
        node.y = y;
        Ok(())
    }

    /// Removes the node together with every edge touching it.
    pub fn remove_node(&mut self, id: NodeId) -> Result<FlowNode, FlowError> {
        let node = self.nodes.remove(&id).ok_or(FlowError::UnknownNode(id))?;
        self.edges
            .retain(|_, edge| edge.source != id && edge.target != id);
        match self.selection {
            Selection::Node(selected) if selected == id => self.selection = Selection::None,
            Selection::Edge(edge) if !self.edges.contains_key(&edge) => {
                self.selection = Selection::None
            }
            _ => {}
        }
        Ok(node)
    }

    pub fn connect(&mut self, source: NodeId, target: NodeId) -> Result<EdgeId, FlowError> {
        if !self.nodes.contains_key(&source) {
            return Err(FlowError::UnknownNode(source));
        }
        if !self.nodes.contains_key(&target) {
            return Err(FlowError::UnknownNode(target));
        }
        if source == target {
            return Err(FlowError::SelfLoop(source));
        }
        if self
            .edges
            .values()
            .any(|edge| edge.source == source && edge.target == target)
        {
            return Err(FlowError::DuplicateEdge {
                from: source,
                to: target,
            });
        }
        let id = self.next_edge_id.max(1);
        self.next_edge_id = id + 1;
        self.edges.insert(id, FlowEdge { id, source, target });
        Ok(id)
    }

    pub fn disconnect(&mut self, id: EdgeId) -> Result<FlowEdge, FlowError> {
        let edge = self.edges.remove(&id).ok_or(FlowError::UnknownEdge(id))?;
        if self.selection == Selection::Edge(id) {
            self.selection = Selection::None;
        }
        Ok(edge)
    }

    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = &FlowEdge> {
        self.edges.values().filter(move |edge| edge.source == id)
    }

    pub fn incoming(&self, id: NodeId) -> impl Iterator<Item = &FlowEdge> {
        self.edges.values().filter(move |edge| edge.target == id)
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn select_node(&mut self, id: NodeId) -> Result<(), FlowError> {
        if !self.nodes.contains_key(&id) {
            return Err(FlowError::UnknownNode(id));
        }
        self.selection = Selection::Node(id);
        Ok(())
    }

    pub fn select_edge(&mut self, id: EdgeId) -> Result<(), FlowError> {
        if !self.edges.contains_key(&id) {
            return Err(FlowError::UnknownEdge(id));
        }
        self.selection = Selection::Edge(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::None;
    }

    /// Deletes whatever is selected. Returns `false` when nothing was selected.
    pub fn delete_selection(&mut self) -> Result<bool, FlowError> {
        match self.selection {
            Selection::None => Ok(false),
            Selection::Node(id) => self.remove_node(id).map(|_| true),
            Selection::Edge(id) => self.disconnect(id).map(|_| true),
        }
    }
}
