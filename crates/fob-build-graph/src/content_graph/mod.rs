//! Graph addressed by stable content keys.
//!
//! Pipeline stages know entities by a string identity (a file path, a
//! dependency specifier) rather than by [`NodeId`]. `ContentGraph` keeps a
//! two-way map between those keys and node ids next to a [`Graph`], and routes
//! every mutation that can remove nodes through itself so the two maps stay
//! exact inverses.
//!
//! Read-only graph methods are available through `Deref`.

mod serialization;

pub use serialization::SerializedContentGraph;

use std::ops::Deref;

use rustc_hash::FxHashMap;

use crate::config::GraphConfig;
use crate::error::{GraphError, Result};
use crate::graph::{EdgeDelta, Graph};
use crate::types::{EdgeFilter, EdgeType, NodeId};

#[derive(Debug, Clone)]
pub struct ContentGraph<N> {
    graph: Graph<N>,
    content_key_to_node_id: FxHashMap<String, NodeId>,
    node_id_to_content_key: FxHashMap<NodeId, String>,
}

impl<N> Default for ContentGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Deref for ContentGraph<N> {
    type Target = Graph<N>;

    fn deref(&self) -> &Graph<N> {
        &self.graph
    }
}

impl<N> ContentGraph<N> {
    pub fn new() -> Self {
        Self::wrap(Graph::new())
    }

    pub fn with_config(config: &GraphConfig) -> Result<Self> {
        Ok(Self::wrap(Graph::with_config(config)?))
    }

    fn wrap(graph: Graph<N>) -> Self {
        Self {
            graph,
            content_key_to_node_id: FxHashMap::default(),
            node_id_to_content_key: FxHashMap::default(),
        }
    }

    /// Add a node for an entity that must not exist yet.
    ///
    /// # Errors
    ///
    /// [`GraphError::DuplicateContentKey`] if `key` is already mapped.
    pub fn add_node_by_content_key(&mut self, key: impl Into<String>, value: N) -> Result<NodeId> {
        let key = key.into();
        if self.content_key_to_node_id.contains_key(&key) {
            return Err(GraphError::DuplicateContentKey(key));
        }
        let id = self.graph.add_node(value)?;
        self.bind(key, id);
        Ok(id)
    }

    /// Return the node already mapped to `key`, or add one holding `value`.
    ///
    /// An existing node keeps its current value.
    pub fn add_node_by_content_key_if_needed(
        &mut self,
        key: impl Into<String>,
        value: N,
    ) -> Result<NodeId> {
        let key = key.into();
        if let Some(&id) = self.content_key_to_node_id.get(&key) {
            return Ok(id);
        }
        let id = self.graph.add_node(value)?;
        self.bind(key, id);
        Ok(id)
    }

    /// Store `value` under `key`, overwriting the value of an existing node
    /// in place so its id and edges are kept.
    pub fn upsert_node_by_content_key(
        &mut self,
        key: impl Into<String>,
        value: N,
    ) -> Result<NodeId> {
        let key = key.into();
        match self.content_key_to_node_id.get(&key) {
            Some(&id) => {
                self.graph.update_node(id, value)?;
                Ok(id)
            }
            None => {
                let id = self.graph.add_node(value)?;
                self.bind(key, id);
                Ok(id)
            }
        }
    }

    /// Add a node that has no content key.
    pub fn add_node(&mut self, value: N) -> Result<NodeId> {
        self.graph.add_node(value)
    }

    pub fn has_content_key(&self, key: &str) -> bool {
        self.content_key_to_node_id.contains_key(key)
    }

    pub fn get_node_by_content_key(&self, key: &str) -> Option<&N> {
        let id = *self.content_key_to_node_id.get(key)?;
        self.graph.get_node(id)
    }

    /// Node id mapped to `key`.
    ///
    /// # Errors
    ///
    /// [`GraphError::MissingContentKey`] if nothing is mapped; check with
    /// [`ContentGraph::has_content_key`] when absence is expected.
    pub fn get_node_id_by_content_key(&self, key: &str) -> Result<NodeId> {
        self.content_key_to_node_id
            .get(key)
            .copied()
            .ok_or_else(|| GraphError::MissingContentKey(key.to_string()))
    }

    /// Content key of `id`, if it was added through the keyed API.
    pub fn content_key_for(&self, id: NodeId) -> Option<&str> {
        self.node_id_to_content_key.get(&id).map(String::as_str)
    }

    /// `(key, id)` pairs in no particular order.
    pub fn content_keys(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.content_key_to_node_id
            .iter()
            .map(|(key, &id)| (key.as_str(), id))
    }

    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut N> {
        self.graph.get_node_mut(id)
    }

    pub fn update_node(&mut self, id: NodeId, value: N) -> Result<N> {
        self.graph.update_node(id, value)
    }

    /// Remove a node, its edges and its content key.
    pub fn remove_node(&mut self, id: NodeId) -> Result<N> {
        let value = self.graph.remove_node(id)?;
        self.unbind(id);
        Ok(value)
    }

    pub fn remove_node_by_content_key(&mut self, key: &str) -> Result<N> {
        let id = self.get_node_id_by_content_key(key)?;
        self.remove_node(id)
    }

    pub fn remove_node_pruning_orphans(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        let removed = self.graph.remove_node_pruning_orphans(id)?;
        for &id in &removed {
            self.unbind(id);
        }
        Ok(removed)
    }

    pub fn set_root_node_id(&mut self, id: Option<NodeId>) -> Result<()> {
        self.graph.set_root_node_id(id)
    }

    pub fn add_edge(&mut self, from: NodeId, to: NodeId, edge_type: EdgeType) -> Result<bool> {
        self.graph.add_edge(from, to, edge_type)
    }

    pub fn remove_edge<'a>(
        &mut self,
        from: NodeId,
        to: NodeId,
        filter: impl Into<EdgeFilter<'a>>,
    ) -> Result<bool> {
        self.graph.remove_edge(from, to, filter)
    }

    pub fn remove_edge_pruning_orphans(
        &mut self,
        from: NodeId,
        to: NodeId,
        edge_type: EdgeType,
    ) -> Result<Vec<NodeId>> {
        let removed = self.graph.remove_edge_pruning_orphans(from, to, edge_type)?;
        for &id in &removed {
            self.unbind(id);
        }
        Ok(removed)
    }

    pub fn remove_edges<'a>(
        &mut self,
        id: NodeId,
        filter: impl Into<EdgeFilter<'a>>,
    ) -> Result<()> {
        self.graph.remove_edges(id, filter)
    }

    pub fn replace_node_ids_connected_to(
        &mut self,
        from: NodeId,
        targets: &[NodeId],
        edge_type: EdgeType,
    ) -> Result<EdgeDelta> {
        self.graph
            .replace_node_ids_connected_to(from, targets, edge_type)
    }

    pub fn replace_node_ids_connected_to_filtered<F>(
        &mut self,
        from: NodeId,
        targets: &[NodeId],
        edge_type: EdgeType,
        replace_filter: F,
    ) -> Result<EdgeDelta>
    where
        F: FnMut(NodeId) -> bool,
    {
        self.graph
            .replace_node_ids_connected_to_filtered(from, targets, edge_type, replace_filter)
    }

    /// The underlying graph.
    pub fn graph(&self) -> &Graph<N> {
        &self.graph
    }

    fn bind(&mut self, key: String, id: NodeId) {
        self.node_id_to_content_key.insert(id, key.clone());
        self.content_key_to_node_id.insert(key, id);
    }

    fn unbind(&mut self, id: NodeId) {
        if let Some(key) = self.node_id_to_content_key.remove(&id) {
            self.content_key_to_node_id.remove(&key);
        }
    }
}
