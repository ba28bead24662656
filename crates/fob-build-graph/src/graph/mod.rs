//! Node values layered over the adjacency list.
//!
//! `Graph<N>` owns one value per live node, an optional root, and the
//! [`AdjacencyList`] that stores its edges. Methods are split by concern:
//! edge mutations, depth-first traversals, search/sort queries and
//! persistence each live in their own file and add to the same `impl`.

mod mutations;
mod queries;
pub(crate) mod serialization;
mod traversal;

pub use mutations::EdgeDelta;
pub use serialization::{FORMAT_VERSION, SerializedGraph};

use crate::adjacency::{AdjacencyList, AdjacencyStats};
use crate::config::GraphConfig;
use crate::error::{GraphError, Result};
use crate::types::NodeId;

/// A directed, typed multigraph with a value of type `N` on every node.
#[derive(Debug, Clone)]
pub struct Graph<N> {
    nodes: Vec<Option<N>>,
    adjacency: AdjacencyList,
    root_node_id: Option<NodeId>,
    live_nodes: usize,
}

impl<N> Default for Graph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Graph<N> {
    pub fn new() -> Self {
        Self::from_adjacency(AdjacencyList::new())
    }

    /// Create an empty graph whose buffers are sized by `config`.
    ///
    /// Fails with [`GraphError::Config`] for a config that does not pass
    /// [`GraphConfig::validate`].
    pub fn with_config(config: &GraphConfig) -> Result<Self> {
        let adjacency = AdjacencyList::with_config(config)?;
        let mut graph = Self::from_adjacency(adjacency);
        graph.nodes.reserve(config.initial_node_capacity);
        Ok(graph)
    }

    fn from_adjacency(adjacency: AdjacencyList) -> Self {
        Self {
            nodes: Vec::new(),
            adjacency,
            root_node_id: None,
            live_nodes: 0,
        }
    }

    /// Store `value` under a fresh node id.
    pub fn add_node(&mut self, value: N) -> Result<NodeId> {
        let id = self.adjacency.add_node()?;
        debug_assert_eq!(id.index(), self.nodes.len());
        self.nodes.push(Some(value));
        self.live_nodes += 1;
        Ok(id)
    }

    pub fn has_node(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id.index()), Some(Some(_)))
    }

    /// Value stored at `id`, or `None` for ids that were never allocated or
    /// have been removed.
    pub fn get_node(&self, id: NodeId) -> Option<&N> {
        self.nodes.get(id.index())?.as_ref()
    }

    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut N> {
        self.nodes.get_mut(id.index())?.as_mut()
    }

    /// Replace the value at `id`, returning the previous one.
    pub fn update_node(&mut self, id: NodeId, value: N) -> Result<N> {
        match self.nodes.get_mut(id.index()) {
            Some(Some(slot)) => Ok(std::mem::replace(slot, value)),
            _ => Err(GraphError::UnknownNode(id)),
        }
    }

    /// Remove a node and every edge touching it, returning its value.
    ///
    /// The id is never handed out again. If the node was the root, the graph
    /// is left without a root.
    pub fn remove_node(&mut self, id: NodeId) -> Result<N> {
        self.assert_has_node(id)?;

        for (edge_type, from) in self.adjacency.get_inbound_edges_by_type(id) {
            self.adjacency.remove_edge(from, id, edge_type);
        }
        for (edge_type, to) in self.adjacency.get_outbound_edges_by_type(id) {
            self.adjacency.remove_edge(id, to, edge_type);
        }

        if self.root_node_id == Some(id) {
            self.root_node_id = None;
        }
        self.live_nodes -= 1;
        self.nodes[id.index()]
            .take()
            .ok_or(GraphError::UnknownNode(id))
    }

    /// Mark `id` as the default start of traversals, or clear the root.
    pub fn set_root_node_id(&mut self, id: Option<NodeId>) -> Result<()> {
        if let Some(id) = id {
            self.assert_has_node(id)?;
        }
        self.root_node_id = id;
        Ok(())
    }

    pub fn root_node_id(&self) -> Option<NodeId> {
        self.root_node_id
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.live_nodes
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.live_nodes == 0
    }

    /// Live node ids in ascending order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes().map(|(id, _)| id)
    }

    /// Live `(id, value)` pairs in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &N)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(index, value)| Some((NodeId::new(index as u32), value.as_ref()?)))
    }

    /// Read-only access to the underlying adjacency list.
    pub fn adjacency(&self) -> &AdjacencyList {
        &self.adjacency
    }

    pub fn stats(&self) -> AdjacencyStats {
        self.adjacency.stats()
    }

    pub(crate) fn assert_has_node(&self, id: NodeId) -> Result<()> {
        if self.has_node(id) {
            Ok(())
        } else {
            Err(GraphError::UnknownNode(id))
        }
    }
}
