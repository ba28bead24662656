//! Edge mutation and neighbour queries for Graph.

use rustc_hash::FxHashSet;

use super::Graph;
use crate::error::{GraphError, Result};
use crate::types::{Edge, EdgeFilter, EdgeType, NodeId};

/// Edges added and removed by [`Graph::replace_node_ids_connected_to`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeDelta {
    /// Targets that gained an edge.
    pub added: Vec<NodeId>,
    /// Targets that lost their edge.
    pub removed: Vec<NodeId>,
}

impl EdgeDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl<N> Graph<N> {
    /// Add an edge between two live nodes.
    ///
    /// Returns `Ok(false)` if the exact edge already exists.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, edge_type: EdgeType) -> Result<bool> {
        self.assert_has_node(from)?;
        self.assert_has_node(to)?;
        self.adjacency.add_edge(from, to, edge_type)
    }

    pub fn has_edge<'a>(
        &self,
        from: NodeId,
        to: NodeId,
        filter: impl Into<EdgeFilter<'a>>,
    ) -> bool {
        self.has_node(from) && self.has_node(to) && self.adjacency.has_edge(from, to, filter)
    }

    /// Remove the edges from `from` to `to` that pass `filter`.
    ///
    /// Both ends must be live. A missing edge is not an error; the return
    /// value says whether anything was removed.
    pub fn remove_edge<'a>(
        &mut self,
        from: NodeId,
        to: NodeId,
        filter: impl Into<EdgeFilter<'a>>,
    ) -> Result<bool> {
        self.assert_has_node(from)?;
        self.assert_has_node(to)?;
        Ok(self.adjacency.remove_edge(from, to, filter))
    }

    /// Remove one edge, then remove `to` if that left it orphaned.
    ///
    /// Removal continues through the outgoing edges of every node removed this
    /// way. Returns the removed node ids in removal order.
    pub fn remove_edge_pruning_orphans(
        &mut self,
        from: NodeId,
        to: NodeId,
        edge_type: EdgeType,
    ) -> Result<Vec<NodeId>> {
        self.assert_has_node(from)?;
        self.assert_has_node(to)?;
        if !self.adjacency.remove_edge(from, to, edge_type) {
            return Err(GraphError::EdgeNotFound {
                from,
                to,
                edge_type,
            });
        }

        if self.is_orphaned_node(to) {
            self.remove_node_pruning_orphans(to)
        } else {
            Ok(Vec::new())
        }
    }

    /// Remove `id` and, recursively, every node its removal orphans.
    pub fn remove_node_pruning_orphans(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        self.assert_has_node(id)?;

        let mut removed = Vec::new();
        let mut pending = vec![id];
        while let Some(node) = pending.pop() {
            if !self.has_node(node) {
                continue;
            }
            let children = self.adjacency.get_node_ids_connected_from(node, EdgeFilter::All);
            self.remove_node(node)?;
            removed.push(node);

            for child in children.into_iter().rev() {
                if child != node && self.is_orphaned_node(child) {
                    pending.push(child);
                }
            }
        }

        tracing::debug!(count = removed.len(), "removed orphaned nodes");
        Ok(removed)
    }

    /// Whether `id` has lost its connection to the rest of the graph.
    ///
    /// Without a root, a node is orphaned when nothing points at it. With a
    /// root, it is orphaned when no chain of incoming edges reaches the root.
    pub fn is_orphaned_node(&self, id: NodeId) -> bool {
        if !self.has_node(id) {
            return false;
        }
        let Some(root) = self.root_node_id else {
            return !self.adjacency.has_inbound_edges(id);
        };
        if id == root {
            return false;
        }

        let mut seen = FxHashSet::default();
        let mut stack = vec![id];
        seen.insert(id);
        while let Some(node) = stack.pop() {
            for parent in self.adjacency.get_node_ids_connected_to(node, EdgeFilter::All) {
                if parent == root {
                    return false;
                }
                if seen.insert(parent) {
                    stack.push(parent);
                }
            }
        }
        true
    }

    /// Remove every outgoing edge of `id` that passes `filter`.
    pub fn remove_edges<'a>(
        &mut self,
        id: NodeId,
        filter: impl Into<EdgeFilter<'a>>,
    ) -> Result<()> {
        self.assert_has_node(id)?;
        let filter = filter.into();
        for to in self.adjacency.get_node_ids_connected_from(id, filter) {
            self.adjacency.remove_edge(id, to, filter);
        }
        Ok(())
    }

    /// Make `from`'s outgoing edges of `edge_type` point at exactly `targets`.
    ///
    /// Existing edges to targets in the list are left alone, missing ones are
    /// added in list order and the rest are removed.
    pub fn replace_node_ids_connected_to(
        &mut self,
        from: NodeId,
        targets: &[NodeId],
        edge_type: EdgeType,
    ) -> Result<EdgeDelta> {
        self.replace_node_ids_connected_to_filtered(from, targets, edge_type, |_| true)
    }

    /// Like [`Graph::replace_node_ids_connected_to`], but only existing
    /// targets accepted by `replace_filter` are eligible for removal.
    pub fn replace_node_ids_connected_to_filtered<F>(
        &mut self,
        from: NodeId,
        targets: &[NodeId],
        edge_type: EdgeType,
        mut replace_filter: F,
    ) -> Result<EdgeDelta>
    where
        F: FnMut(NodeId) -> bool,
    {
        self.assert_has_node(from)?;
        for &target in targets {
            self.assert_has_node(target)?;
        }

        let wanted: FxHashSet<NodeId> = targets.iter().copied().collect();
        let stale: Vec<NodeId> = self
            .adjacency
            .get_node_ids_connected_from(from, edge_type)
            .into_iter()
            .filter(|to| !wanted.contains(to) && replace_filter(*to))
            .collect();

        let mut delta = EdgeDelta::default();
        for &target in targets {
            if self.adjacency.add_edge(from, target, edge_type)? {
                delta.added.push(target);
            }
        }
        for to in stale {
            self.adjacency.remove_edge(from, to, edge_type);
            delta.removed.push(to);
        }
        Ok(delta)
    }

    pub fn get_node_ids_connected_from<'a>(
        &self,
        from: NodeId,
        filter: impl Into<EdgeFilter<'a>>,
    ) -> Vec<NodeId> {
        self.adjacency.get_node_ids_connected_from(from, filter)
    }

    pub fn get_node_ids_connected_to<'a>(
        &self,
        to: NodeId,
        filter: impl Into<EdgeFilter<'a>>,
    ) -> Vec<NodeId> {
        self.adjacency.get_node_ids_connected_to(to, filter)
    }

    pub fn get_all_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.adjacency.get_all_edges()
    }
}
